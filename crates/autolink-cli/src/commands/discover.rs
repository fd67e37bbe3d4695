//! Discover command implementation
//!
//! Lists installed extensions and the packages that could not be read.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use autolink_discovery::{discover_with, DiscoveryResult};
use colored::Colorize;

use super::json_output::{
    discovery_error_to_json, discovery_warning_to_json, DiscoverOutput, ExtensionSummary,
};
use super::{exit_code, fail, load_options, print_errors, print_json, print_warnings};

/// Run the discover command
///
/// # Returns
/// Exit code: 0 if every candidate package was read, 1 otherwise
pub fn run(root: &Path, json: bool) -> Result<ExitCode> {
    let options = match load_options(root) {
        Ok(options) => options,
        Err(error) => return fail(error, json),
    };
    let result = discover_with(root, &options);
    let output = to_output(&result);
    if json {
        print_json(&output)?;
    } else {
        run_human(root, &output);
    }
    Ok(exit_code(output.success))
}

pub(crate) fn to_output(result: &DiscoveryResult) -> DiscoverOutput {
    DiscoverOutput {
        success: result.is_ok(),
        extensions: result.extensions.iter().map(ExtensionSummary::from_record).collect(),
        errors: result.errors.iter().map(discovery_error_to_json).collect(),
        warnings: result.warnings.iter().map(discovery_warning_to_json).collect(),
    }
}

fn run_human(root: &Path, output: &DiscoverOutput) {
    println!("{} {}", "Discovering:".cyan().bold(), root.display());

    for ext in &output.extensions {
        let platforms: Vec<&str> = ext.platforms.iter().map(|p| p.as_str()).collect();
        println!(
            "\n  {} {} {}",
            ext.name.bold(),
            ext.version.dimmed(),
            format!("[{}]", platforms.join(", ")).cyan()
        );
        println!("    {} {}", "path:".dimmed(), ext.package_path.display());
        for (label, names) in [
            ("modules:", &ext.modules),
            ("elements:", &ext.elements),
            ("services:", &ext.services),
            ("depends on:", &ext.dependencies),
        ] {
            if !names.is_empty() {
                println!("    {} {}", label.dimmed(), names.join(", "));
            }
        }
    }

    print_warnings(&output.warnings);
    print_errors(&output.errors);

    if output.success {
        println!(
            "\n{} {} extension(s) discovered",
            "SUCCESS".green().bold(),
            output.extensions.len()
        );
    } else {
        println!(
            "\n{} {} extension(s) discovered, {} package(s) failed",
            "FAILED".red().bold(),
            output.extensions.len(),
            output.errors.len()
        );
    }
}
