//! Autolink CLI - links installed Lynx extensions into a host application
//!
//! This binary discovers extension packages, validates them, resolves their
//! dependency order and generates binding scaffolding and registries.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use autolink_cli::{commands, logging};
use autolink_spec::Platform;

/// Autolink - native extension linking for Lynx apps
#[derive(Parser)]
#[command(name = "autolink")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project root containing the install directory
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Output machine-readable JSON (no colored output)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List installed extensions and packages that failed to load
    Discover,

    /// Validate installed extensions, or a single package manifest
    Validate {
        /// Package directory to validate instead of every installed extension
        #[arg(long)]
        package: Option<PathBuf>,
    },

    /// Print dependency order, cycles and missing dependencies
    Deps,

    /// Generate contracts and stubs for one package
    Codegen {
        /// Package directory, relative to the root
        #[arg(long)]
        package: PathBuf,

        /// Interface source inside the package (default: src/index.ts)
        #[arg(long)]
        source: Option<String>,

        /// Platform to generate for (repeatable; default: all configured)
        #[arg(long = "platform")]
        platforms: Vec<Platform>,
    },

    /// Generate and write the aggregated registries
    Link {
        /// Platform to link (repeatable; default: all configured)
        #[arg(long = "platform")]
        platforms: Vec<Platform>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    let root = cli.root.as_path();
    let result = match cli.command {
        Commands::Discover => commands::discover::run(root, cli.json),
        Commands::Validate { package } => {
            commands::validate::run(root, package.as_deref(), cli.json)
        }
        Commands::Deps => commands::deps::run(root, cli.json),
        Commands::Codegen {
            package,
            source,
            platforms,
        } => commands::codegen::run(root, &package, source.as_deref(), &platforms, cli.json),
        Commands::Link { platforms } => commands::link::run(root, &platforms, cli.json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_codegen() {
        let cli = Cli::try_parse_from([
            "autolink",
            "codegen",
            "--package",
            "node_modules/@a/storage",
            "--platform",
            "android",
            "--platform",
            "web",
        ])
        .unwrap();
        match cli.command {
            Commands::Codegen {
                package,
                source,
                platforms,
            } => {
                assert_eq!(package, PathBuf::from("node_modules/@a/storage"));
                assert!(source.is_none());
                assert_eq!(platforms, vec![Platform::Android, Platform::Web]);
            }
            _ => panic!("expected codegen command"),
        }
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["autolink", "link", "--root", "app", "--json"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("app"));
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Link { ref platforms } if platforms.is_empty()));
    }

    #[test]
    fn test_cli_rejects_unknown_platform() {
        let err = Cli::try_parse_from(["autolink", "link", "--platform", "windows"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("unknown platform"));
    }

    #[test]
    fn test_cli_requires_package_for_codegen() {
        assert!(Cli::try_parse_from(["autolink", "codegen"]).is_err());
    }
}
