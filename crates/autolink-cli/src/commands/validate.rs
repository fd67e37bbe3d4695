//! Validate command implementation
//!
//! Without `--package`, checks every discovered extension against its
//! package contents. With `--package`, validates that package's manifest
//! only.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use autolink_discovery::{discover_with, validate_extensions, Severity, ValidationReport};
use autolink_spec::{AutolinkOptions, ManifestLoader};
use colored::Colorize;

use super::json_output::{
    discovery_error_to_json, discovery_warning_to_json, load_error_to_json,
    validation_warning_to_json, ValidateOutput,
};
use super::{exit_code, fail, load_options, print_errors, print_json, print_warnings};

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if nothing of error severity was found, 1 otherwise
pub fn run(root: &Path, package: Option<&Path>, json: bool) -> Result<ExitCode> {
    let options = match load_options(root) {
        Ok(options) => options,
        Err(error) => return fail(error, json),
    };
    let output = match package {
        Some(package) => validate_package(&root.join(package), &options),
        None => validate_installed(root, &options),
    };
    if json {
        print_json(&output)?;
    } else {
        run_human(root, package, &output);
    }
    Ok(exit_code(output.success))
}

fn validate_package(package_dir: &Path, options: &AutolinkOptions) -> ValidateOutput {
    let loader = ManifestLoader::new(options.manifest_file.clone());
    match loader.load(package_dir) {
        Ok(loaded) => {
            let file = loaded.path.display().to_string();
            ValidateOutput {
                success: true,
                reports: Vec::new(),
                errors: Vec::new(),
                warnings: loaded
                    .warnings
                    .iter()
                    .map(|w| validation_warning_to_json(w).with_file(file.clone()))
                    .collect(),
            }
        }
        Err(e) => {
            let (errors, warnings) = load_error_to_json(&e);
            ValidateOutput {
                success: false,
                reports: Vec::new(),
                errors,
                warnings,
            }
        }
    }
}

fn validate_installed(root: &Path, options: &AutolinkOptions) -> ValidateOutput {
    let discovery = discover_with(root, options);
    let reports = validate_extensions(&discovery.extensions);
    ValidateOutput {
        success: discovery.is_ok() && reports.iter().all(ValidationReport::is_valid),
        reports,
        errors: discovery.errors.iter().map(discovery_error_to_json).collect(),
        warnings: discovery.warnings.iter().map(discovery_warning_to_json).collect(),
    }
}

fn run_human(root: &Path, package: Option<&Path>, output: &ValidateOutput) {
    match package {
        Some(package) => println!("{} {}", "Validating:".cyan().bold(), package.display()),
        None => println!("{} {}", "Validating extensions in:".cyan().bold(), root.display()),
    }

    for report in &output.reports {
        let status = if report.is_valid() {
            "ok".green()
        } else {
            "invalid".red()
        };
        println!("\n  {} {}", report.extension.bold(), status);
        for issue in &report.issues {
            let marker = match issue.severity {
                Severity::Error => "x".red(),
                Severity::Warning => "!".yellow(),
                Severity::Info => "i".dimmed(),
            };
            println!("    {} [{}] {}", marker, issue.code, issue.message);
            if let Some(ref path) = issue.path {
                println!("      {} {}", "path:".dimmed(), path.display());
            }
            if let Some(ref suggestion) = issue.suggestion {
                println!("      {} {}", "hint:".dimmed(), suggestion);
            }
        }
    }

    print_warnings(&output.warnings);
    print_errors(&output.errors);

    let issue_errors: usize = output.reports.iter().map(|r| r.count(Severity::Error)).sum();
    let total_errors = issue_errors + output.errors.len();
    if output.success {
        println!("\n{} No errors found", "SUCCESS".green().bold());
    } else {
        println!("\n{} {} error(s) found", "FAILED".red().bold(), total_errors);
    }
}
