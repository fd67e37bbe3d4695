//! Test harness over a temporary project root.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;

use autolink_codegen::{generate_registries, write_registry, RegistryGenerationResult};
use autolink_discovery::{discover_with, resolve_dependencies, DiscoveryResult};
use autolink_spec::{AutolinkOptions, ExtensionRecord, Platform};
use tempfile::TempDir;

use crate::fixtures::ExtensionFixture;

/// Result of running the autolink CLI.
#[derive(Debug)]
pub struct CliResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Parse stdout as the JSON document printed under `--json`.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap_or_else(|e| {
            panic!("stdout is not JSON ({}):\n{}\nstderr: {}", e, self.stdout, self.stderr)
        })
    }

    pub fn assert_success(&self) {
        assert!(
            self.success,
            "Command failed with exit code {}.\nstdout: {}\nstderr: {}",
            self.exit_code, self.stdout, self.stderr
        );
    }

    pub fn assert_failure(&self) {
        assert!(
            !self.success,
            "Expected command to fail, but it succeeded.\nstdout: {}",
            self.stdout
        );
    }
}

/// A project root with a `node_modules` install tree.
pub struct TestHarness {
    pub work_dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().expect("Failed to create work dir"),
        }
    }

    /// Project root.
    pub fn path(&self) -> &Path {
        self.work_dir.path()
    }

    pub fn install_dir(&self) -> PathBuf {
        self.path().join("node_modules")
    }

    /// Install `fixture` under its own name.
    pub fn install(&self, fixture: &ExtensionFixture) -> PathBuf {
        fixture.write_to(&self.install_dir().join(&fixture.name))
    }

    /// Install `fixture` at `rel`, relative to the install directory.
    pub fn install_at(&self, rel: &str, fixture: &ExtensionFixture) -> PathBuf {
        fixture.write_to(&self.install_dir().join(rel))
    }

    /// Write a file relative to the project root.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Read a file relative to the project root.
    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path().join(rel))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", rel, e))
    }

    pub fn discover(&self) -> DiscoveryResult {
        discover_with(self.path(), &AutolinkOptions::default())
    }

    /// Discovered records in dependency order (discovery order on cycles).
    pub fn ordered_records(&self) -> Vec<ExtensionRecord> {
        let discovery = self.discover();
        let resolution = resolve_dependencies(&discovery.extensions);
        match resolution.order() {
            Some(order) => order
                .iter()
                .filter_map(|name| discovery.get(name).cloned())
                .collect(),
            None => discovery.extensions,
        }
    }

    /// In-process equivalent of `autolink link`: generates and writes every
    /// registry under the default output root.
    pub fn link(&self) -> Vec<RegistryGenerationResult> {
        let records = self.ordered_records();
        let results = generate_registries(&records, &Platform::ALL);
        let output_root = AutolinkOptions::default().output_path(self.path());
        for result in &results {
            write_registry(result, &output_root).expect("Failed to write registry");
        }
        results
    }

    /// Run the autolink CLI against this project root.
    pub fn run_cli(&self, args: &[&str]) -> CliResult {
        let output = Command::new("cargo")
            .args(["run", "--quiet", "--manifest-path"])
            .arg(workspace_manifest_path())
            .args(["-p", "autolink-cli", "--"])
            .args(args)
            .arg("--root")
            .arg(self.path())
            .output();

        match output {
            Ok(out) => CliResult::from_output(out),
            Err(e) => CliResult {
                success: false,
                exit_code: -1,
                stdout: String::new(),
                stderr: format!("Failed to run CLI: {}", e),
            },
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn workspace_manifest_path() -> PathBuf {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let manifest_path = manifest_dir.join("..").join("..").join("Cargo.toml");
        manifest_path.canonicalize().unwrap_or(manifest_path)
    })
    .clone()
}
