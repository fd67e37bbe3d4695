//! Project-level autolink options (`autolink.config.json`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::interface::DEFAULT_INTERFACE_SOURCE;
use crate::manifest::{Platform, MANIFEST_FILE};

/// Options filename looked up at the project root.
pub const OPTIONS_FILE: &str = "autolink.config.json";

/// Project options. Every field has a default, so an absent file or an
/// empty object both yield [`AutolinkOptions::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutolinkOptions {
    /// Install directory scanned for extensions.
    #[serde(default = "default_install_dir")]
    pub install_dir: String,
    /// Manifest marker filename.
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,
    /// Root for generated registries, relative to the project root.
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
    /// Platforms to generate registries for.
    #[serde(default = "default_platforms")]
    pub platforms: Vec<Platform>,
    /// Interface source path inside each package.
    #[serde(default = "default_interface_source")]
    pub interface_source: String,
}

fn default_install_dir() -> String {
    "node_modules".to_string()
}

fn default_manifest_file() -> String {
    MANIFEST_FILE.to_string()
}

fn default_output_root() -> PathBuf {
    PathBuf::from(".lynx/autolink")
}

fn default_platforms() -> Vec<Platform> {
    Platform::ALL.to_vec()
}

fn default_interface_source() -> String {
    DEFAULT_INTERFACE_SOURCE.to_string()
}

impl Default for AutolinkOptions {
    fn default() -> Self {
        Self {
            install_dir: default_install_dir(),
            manifest_file: default_manifest_file(),
            output_root: default_output_root(),
            platforms: default_platforms(),
            interface_source: default_interface_source(),
        }
    }
}

impl AutolinkOptions {
    /// Loads `autolink.config.json` from `project_root`, falling back to
    /// defaults when the file does not exist.
    pub fn load(project_root: &Path) -> Result<Self, LoadError> {
        let path = project_root.join(OPTIONS_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(LoadError::Read { path, source }),
        };
        serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson { path, source })
    }

    /// Absolute install directory for `project_root`.
    pub fn install_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.install_dir)
    }

    /// Absolute output root for `project_root`.
    pub fn output_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.output_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_absent_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let options = AutolinkOptions::load(tmp.path()).unwrap();
        assert_eq!(options, AutolinkOptions::default());
        assert_eq!(options.install_path(tmp.path()), tmp.path().join("node_modules"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(OPTIONS_FILE),
            r#"{ "installDir": "vendor", "platforms": ["web"] }"#,
        )
        .unwrap();
        let options = AutolinkOptions::load(tmp.path()).unwrap();
        assert_eq!(options.install_dir, "vendor");
        assert_eq!(options.platforms, vec![Platform::Web]);
        assert_eq!(options.manifest_file, MANIFEST_FILE);
    }

    #[test]
    fn test_bad_json_is_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(OPTIONS_FILE), "nope").unwrap();
        assert!(AutolinkOptions::load(tmp.path()).is_err());
    }
}
