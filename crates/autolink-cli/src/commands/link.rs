//! Link command implementation
//!
//! Discovers installed extensions, orders them by dependency and writes one
//! aggregated registry per platform under the output root.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use autolink_codegen::{generate_registry, write_registry, RegistryGenerationResult};
use autolink_discovery::{
    discover_with, resolve_dependencies, validate_extensions, ResolutionResult, Severity,
};
use autolink_spec::{ExtensionRecord, Platform};
use colored::Colorize;

use super::json_output::{
    cycle_to_json, discovery_error_to_json, discovery_warning_to_json, error_codes,
    missing_dependency_to_json, JsonError, JsonWarning, LinkOutput, RegistryOutput,
};
use super::{exit_code, fail, load_options, print_errors, print_json, print_warnings};

/// Run the link command
///
/// # Arguments
/// * `root` - Project root
/// * `platforms` - Platforms to link; empty means the configured set
/// * `json` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 if any package failed, a cycle was found,
/// an extension has error-severity issues, or a registry is structurally
/// invalid
pub fn run(root: &Path, platforms: &[Platform], json: bool) -> Result<ExitCode> {
    let options = match load_options(root) {
        Ok(options) => options,
        Err(error) => return fail(error, json),
    };
    let platforms = if platforms.is_empty() {
        options.platforms.clone()
    } else {
        platforms.to_vec()
    };

    let discovery = discover_with(root, &options);
    let resolution = resolve_dependencies(&discovery.extensions);
    let records = ordered_records(&discovery.extensions, &resolution);
    tracing::debug!(
        extensions = records.len(),
        cycles = resolution.cycles().len(),
        ordered = resolution.is_ordered(),
        "resolved link order"
    );

    let mut errors: Vec<JsonError> = discovery.errors.iter().map(discovery_error_to_json).collect();
    errors.extend(resolution.cycles().iter().map(cycle_to_json));
    let mut warnings: Vec<JsonWarning> =
        discovery.warnings.iter().map(discovery_warning_to_json).collect();
    warnings.extend(resolution.missing.iter().map(missing_dependency_to_json));

    for report in validate_extensions(&records) {
        for issue in report.issues.iter().filter(|i| i.severity == Severity::Error) {
            let mut error = JsonError::new(issue.code.code(), &issue.message)
                .with_file(report.package_path.display().to_string());
            if let Some(ref suggestion) = issue.suggestion {
                error = error.with_suggestion(suggestion);
            }
            errors.push(error);
        }
    }

    let output_root = options.output_path(root);
    let mut registries = Vec::with_capacity(platforms.len());
    for platform in platforms {
        let result = generate_registry(&records, platform);
        let path = match write_registry(&result, &output_root) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!(platform = %platform, error = %e, "failed to write registry");
                errors.push(
                    JsonError::new(error_codes::REGISTRY_WRITE, e.to_string())
                        .with_file(output_root.join(&result.output_path).display().to_string()),
                );
                None
            }
        };
        registries.push(registry_output(result, path));
    }

    let structural = registries
        .iter()
        .any(|r| r.warnings.iter().any(|w| w.is_structural()));
    let output = LinkOutput {
        success: errors.is_empty() && !structural,
        order: records.iter().map(|r| r.name.clone()).collect(),
        cycles: resolution.cycles().to_vec(),
        registries,
        errors,
        warnings,
    };
    if json {
        print_json(&output)?;
    } else {
        run_human(&output);
    }
    Ok(exit_code(output.success))
}

/// Records in dependency order, or in discovery order when cycles prevent
/// one.
pub(crate) fn ordered_records(
    records: &[ExtensionRecord],
    resolution: &ResolutionResult,
) -> Vec<ExtensionRecord> {
    match resolution.order() {
        Some(order) => order
            .iter()
            .filter_map(|name| records.iter().find(|r| &r.name == name))
            .cloned()
            .collect(),
        None => records.to_vec(),
    }
}

fn registry_output(result: RegistryGenerationResult, path: Option<std::path::PathBuf>) -> RegistryOutput {
    RegistryOutput {
        platform: result.platform,
        path,
        registered: result.registered.len(),
        skipped_extensions: result.skipped_extensions,
        warnings: result.warnings,
    }
}

fn run_human(output: &LinkOutput) {
    println!("{} {} extension(s)", "Linking:".cyan().bold(), output.order.len());
    if !output.cycles.is_empty() {
        println!(
            "  {} dependency cycles found; using discovery order",
            "!".yellow()
        );
    }

    for registry in &output.registries {
        let status = match registry.path {
            Some(ref path) => format!("-> {}", path.display()),
            None => "not written".red().to_string(),
        };
        println!(
            "\n  {} {} registered, {} skipped {}",
            format!("{:<8}", registry.platform.as_str()).bold(),
            registry.registered,
            registry.skipped_extensions.len(),
            status.dimmed()
        );
        for warning in &registry.warnings {
            let marker = if warning.is_structural() {
                "x".red()
            } else {
                "!".yellow()
            };
            println!("    {} {}", marker, warning);
        }
    }

    print_warnings(&output.warnings);
    print_errors(&output.errors);

    let registered: usize = output.registries.iter().map(|r| r.registered).sum();
    let skipped: usize = output
        .registries
        .iter()
        .map(|r| r.skipped_extensions.len())
        .sum();
    let failed = output.registries.iter().filter(|r| r.path.is_none()).count();
    let summary = format!(
        "{} registration(s), {} skipped, {} registr{} failed",
        registered,
        skipped,
        failed,
        if failed == 1 { "y" } else { "ies" }
    );
    if output.success {
        println!("\n{} {}", "SUCCESS".green().bold(), summary);
    } else {
        println!("\n{} {}", "FAILED".red().bold(), summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autolink_discovery::resolve_graph;
    use autolink_spec::{apply_platform_defaults, ExtensionManifest};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn record(name: &str, deps: &[&str]) -> ExtensionRecord {
        let json = serde_json::json!({
            "name": name,
            "version": "1.0.0",
            "platforms": { "web": {} },
            "dependencies": deps,
        });
        let mut manifest: ExtensionManifest = serde_json::from_value(json).unwrap();
        apply_platform_defaults(&mut manifest);
        let modules = manifest.module_bindings();
        ExtensionRecord::build(
            manifest,
            PathBuf::from(name).join("lynx.ext.json"),
            PathBuf::from(name),
            "1.0.0".into(),
            modules,
        )
    }

    #[test]
    fn test_ordered_records_follow_resolution() {
        let records = vec![record("app-ui", &["core"]), record("core", &[])];
        let resolution = resolve_dependencies(&records);
        let names: Vec<String> = ordered_records(&records, &resolution)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["core".to_string(), "app-ui".to_string()]);
    }

    #[test]
    fn test_cycle_keeps_discovery_order() {
        let records = vec![record("b", &["a"]), record("a", &["b"])];
        let resolution = resolve_graph(&[
            ("b".to_string(), vec!["a".to_string()]),
            ("a".to_string(), vec!["b".to_string()]),
        ]);
        assert!(!resolution.is_ordered());
        let names: Vec<String> = ordered_records(&records, &resolution)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["b".to_string(), "a".to_string()]);
    }
}
