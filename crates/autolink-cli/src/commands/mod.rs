//! CLI command implementations

pub mod codegen;
pub mod deps;
pub mod discover;
pub mod json_output;
pub mod link;
pub mod validate;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use autolink_spec::AutolinkOptions;
use colored::Colorize;
use serde::Serialize;

use json_output::{error_codes, FailureOutput, JsonError};

/// Loads the project options, or reports why they could not be loaded.
pub(crate) fn load_options(root: &Path) -> std::result::Result<AutolinkOptions, JsonError> {
    AutolinkOptions::load(root).map_err(|e| {
        JsonError::new(error_codes::OPTIONS_LOAD, e.to_string())
            .with_file(e.path().display().to_string())
    })
}

/// Reports a failure that happened before the command produced results.
pub(crate) fn fail(error: JsonError, json: bool) -> Result<ExitCode> {
    if json {
        print_json(&FailureOutput::new(error))?;
    } else {
        eprintln!("{} [{}]: {}", "error".red(), error.code, error.message);
    }
    Ok(ExitCode::from(1))
}

pub(crate) fn print_json<T: Serialize>(output: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

pub(crate) fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

/// `[CODE] message` lines under a colored heading.
pub(crate) fn print_errors(errors: &[JsonError]) {
    if errors.is_empty() {
        return;
    }
    println!("\n{}", "Errors:".red().bold());
    for error in errors {
        let location = error
            .file
            .as_ref()
            .map(|f| format!(" in {}", f))
            .unwrap_or_default();
        let path = error
            .path
            .as_ref()
            .map(|p| format!(" at {}", p))
            .unwrap_or_default();
        println!(
            "  {} [{}]{}{}: {}",
            "x".red(),
            error.code.red(),
            location.dimmed(),
            path.dimmed(),
            error.message
        );
        if let Some(ref suggestion) = error.suggestion {
            println!("      {} {}", "hint:".dimmed(), suggestion);
        }
    }
}

pub(crate) fn print_warnings(warnings: &[json_output::JsonWarning]) {
    if warnings.is_empty() {
        return;
    }
    println!("\n{}", "Warnings:".yellow().bold());
    for warning in warnings {
        let location = warning
            .file
            .as_ref()
            .map(|f| format!(" in {}", f))
            .unwrap_or_default();
        let path = warning
            .path
            .as_ref()
            .map(|p| format!(" at {}", p))
            .unwrap_or_default();
        println!(
            "  {} [{}]{}{}: {}",
            "!".yellow(),
            warning.code.yellow(),
            location.dimmed(),
            path.dimmed(),
            warning.message
        );
    }
}
