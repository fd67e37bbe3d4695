//! Codegen command implementation
//!
//! Parses one package's interface source and writes contracts and stubs for
//! each requested platform the package supports.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use autolink_codegen::{generate_package, parse_options_for, GenerationReport};
use autolink_spec::{parse_interfaces, ManifestLoader, Platform};
use colored::Colorize;

use super::json_output::{
    error_codes, load_error_to_json, validation_warning_to_json, warning_codes, CodegenOutput,
    FailureOutput, JsonError, JsonWarning,
};
use super::{exit_code, fail, load_options, print_errors, print_json, print_warnings};

/// Run the codegen command
///
/// # Arguments
/// * `root` - Project root
/// * `package` - Package directory, relative to the root
/// * `source` - Interface source inside the package (default from options)
/// * `platforms` - Platforms to generate for; empty means the configured set
/// * `json` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if every file was written, 1 otherwise
pub fn run(
    root: &Path,
    package: &Path,
    source: Option<&str>,
    platforms: &[Platform],
    json: bool,
) -> Result<ExitCode> {
    let options = match load_options(root) {
        Ok(options) => options,
        Err(error) => return fail(error, json),
    };
    let package_dir = root.join(package);

    let loaded = match ManifestLoader::new(options.manifest_file.clone()).load(&package_dir) {
        Ok(loaded) => loaded,
        Err(e) => {
            let (errors, warnings) = load_error_to_json(&e);
            if json {
                print_json(&FailureOutput {
                    success: false,
                    errors,
                })?;
            } else {
                print_warnings(&warnings);
                print_errors(&errors);
            }
            return Ok(ExitCode::from(1));
        }
    };

    let source_label = source.unwrap_or(options.interface_source.as_str()).to_string();
    let source_path = package_dir.join(&source_label);
    let text = match std::fs::read_to_string(&source_path) {
        Ok(text) => text,
        Err(e) => {
            let error = JsonError::new(
                error_codes::SOURCE_READ,
                format!("failed to read interface source: {}", e),
            )
            .with_file(source_path.display().to_string());
            return fail(error, json);
        }
    };

    let interfaces = parse_interfaces(&text, &parse_options_for(&loaded.manifest));
    tracing::debug!(
        modules = interfaces.modules.len(),
        elements = interfaces.elements.len(),
        services = interfaces.services.len(),
        skipped = interfaces.skipped.len(),
        "parsed interface source"
    );
    let platforms = if platforms.is_empty() {
        options.platforms.clone()
    } else {
        platforms.to_vec()
    };
    let report = generate_package(
        &package_dir,
        &loaded.manifest,
        &interfaces,
        &platforms,
        &source_label,
    );

    let manifest_file = loaded.path.display().to_string();
    let mut warnings: Vec<JsonWarning> = loaded
        .warnings
        .iter()
        .map(|w| validation_warning_to_json(w).with_file(manifest_file.clone()))
        .collect();
    warnings.extend(interfaces.skipped.iter().map(|reason| {
        JsonWarning::new(warning_codes::SKIPPED_INTERFACE, reason.clone())
            .with_file(source_path.display().to_string())
    }));
    let errors: Vec<JsonError> = report
        .failed
        .iter()
        .map(|f| {
            JsonError::new(error_codes::GENERATION_WRITE, &f.reason)
                .with_file(f.path.display().to_string())
        })
        .collect();

    let output = CodegenOutput {
        success: report.is_success(),
        package: loaded.manifest.name.clone(),
        platforms,
        report,
        errors,
        warnings,
    };
    if json {
        print_json(&output)?;
    } else {
        run_human(&package_dir, &output);
    }
    Ok(exit_code(output.success))
}

fn run_human(package_dir: &Path, output: &CodegenOutput) {
    println!(
        "{} {} ({})",
        "Generating:".cyan().bold(),
        output.package,
        package_dir.display()
    );
    print_report(package_dir, &output.report);
    print_warnings(&output.warnings);
    print_errors(&output.errors);

    let report = &output.report;
    let summary = format!(
        "{} written, {} created, {} skipped, {} failed",
        report.written.len(),
        report.created.len(),
        report.skipped_count(),
        report.failed_count()
    );
    if output.success {
        println!("\n{} {}", "SUCCESS".green().bold(), summary);
    } else {
        println!("\n{} {}", "FAILED".red().bold(), summary);
    }
}

fn print_report(package_dir: &Path, report: &GenerationReport) {
    let relative = |path: &std::path::PathBuf| {
        path.strip_prefix(package_dir)
            .unwrap_or(path)
            .display()
            .to_string()
    };
    for path in &report.written {
        println!("  {} {}", "+".green(), relative(path));
    }
    for path in &report.created {
        println!("  {} {} {}", "+".green(), relative(path), "(stub)".dimmed());
    }
    for path in &report.skipped {
        println!("  {} {} {}", "=".dimmed(), relative(path), "(exists)".dimmed());
    }
}
