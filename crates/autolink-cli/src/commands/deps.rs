//! Deps command implementation
//!
//! Prints the dependency order of the installed extensions, or the cycles
//! that prevent one.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use autolink_discovery::{discover_with, resolve_dependencies};
use colored::Colorize;

use super::json_output::{
    cycle_to_json, discovery_error_to_json, discovery_warning_to_json, missing_dependency_to_json,
    DepsOutput,
};
use super::{exit_code, fail, load_options, print_errors, print_json, print_warnings};

/// Run the deps command
///
/// # Returns
/// Exit code: 0 if an order exists and every package was read, 1 otherwise
pub fn run(root: &Path, json: bool) -> Result<ExitCode> {
    let options = match load_options(root) {
        Ok(options) => options,
        Err(error) => return fail(error, json),
    };
    let discovery = discover_with(root, &options);
    let resolution = resolve_dependencies(&discovery.extensions);

    let mut errors: Vec<_> = discovery.errors.iter().map(discovery_error_to_json).collect();
    errors.extend(resolution.cycles().iter().map(cycle_to_json));
    let mut warnings: Vec<_> = discovery.warnings.iter().map(discovery_warning_to_json).collect();
    warnings.extend(resolution.missing.iter().map(missing_dependency_to_json));

    let output = DepsOutput {
        success: errors.is_empty(),
        order: resolution.order().map(<[String]>::to_vec),
        cycles: resolution.cycles().to_vec(),
        missing: resolution.missing.clone(),
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

fn run_human(output: &DepsOutput) {
    match output.order {
        Some(ref order) => {
            println!("{}", "Dependency order:".cyan().bold());
            for (i, name) in order.iter().enumerate() {
                println!("  {:>3}. {}", i + 1, name);
            }
        }
        None => {
            println!("{}", "Dependency cycles:".red().bold());
            for cycle in &output.cycles {
                println!("  {} {}", "x".red(), cycle);
            }
        }
    }

    print_warnings(&output.warnings);
    print_errors(&output.errors);

    if output.success {
        println!("\n{} Dependencies resolved", "SUCCESS".green().bold());
    } else {
        println!("\n{} {} error(s)", "FAILED".red().bold(), output.errors.len());
    }
}
