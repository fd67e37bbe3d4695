//! Manifest location, parsing, inheritance and platform defaults.

mod merge;


use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{ErrorCode, LoadError, ValidationError, ValidationWarning, WarningCode};
use crate::manifest::{
    AndroidLanguage, ExtensionManifest, PackageDescriptor, MANIFEST_FILE, PACKAGE_DESCRIPTOR_FILE,
};
use crate::validation::validate_manifest_value;

pub use merge::{merge_manifests, merge_values};

/// Default Android source directory.
pub const DEFAULT_ANDROID_SOURCE_DIR: &str = "android/src/main/java";
/// Default iOS source directory.
pub const DEFAULT_IOS_SOURCE_DIR: &str = "ios";
/// Default web entry file.
pub const DEFAULT_WEB_ENTRY: &str = "web/src/index.ts";

fn default_build_types() -> Vec<String> {
    vec!["debug".to_string(), "release".to_string()]
}

/// A manifest that parsed, validated and had platform defaults applied.
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub manifest: ExtensionManifest,
    /// Path of the manifest file.
    pub path: PathBuf,
    /// Validation and inheritance warnings.
    pub warnings: Vec<ValidationWarning>,
}

/// Loads manifests with a configurable marker filename.
#[derive(Debug, Clone)]
pub struct ManifestLoader {
    file_name: String,
}

impl Default for ManifestLoader {
    fn default() -> Self {
        Self::new(MANIFEST_FILE)
    }
}

impl ManifestLoader {
    /// Creates a loader that looks for `file_name` in package directories.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Marker filename this loader looks for.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the manifest path for a package directory, if the file exists.
    pub fn locate(&self, dir: &Path) -> Option<PathBuf> {
        let candidate = dir.join(&self.file_name);
        candidate.is_file().then_some(candidate)
    }

    /// Loads the manifest of a package directory.
    pub fn load(&self, dir: &Path) -> Result<LoadedManifest, LoadError> {
        match self.locate(dir) {
            Some(path) => self.load_file(&path),
            None => Err(LoadError::MissingFile {
                path: dir.join(&self.file_name),
            }),
        }
    }

    /// Loads, validates and completes one manifest file.
    pub fn load_file(&self, path: &Path) -> Result<LoadedManifest, LoadError> {
        let mut warnings = Vec::new();
        let mut visited = HashSet::new();
        let value = self.load_chain(path, &mut visited, &mut warnings)?;

        let validation = validate_manifest_value(&value);
        warnings.extend(validation.warnings.iter().cloned());
        if !validation.is_ok() {
            return Err(LoadError::Invalid {
                path: path.to_path_buf(),
                errors: validation.errors,
                warnings,
            });
        }

        let mut manifest: ExtensionManifest =
            serde_json::from_value(value).map_err(|e| LoadError::Invalid {
                path: path.to_path_buf(),
                errors: vec![ValidationError::new(ErrorCode::InvalidType, e.to_string())],
                warnings: warnings.clone(),
            })?;
        apply_platform_defaults(&mut manifest);

        tracing::debug!(path = %path.display(), name = %manifest.name, "loaded manifest");
        Ok(LoadedManifest {
            manifest,
            path: path.to_path_buf(),
            warnings,
        })
    }

    /// Reads `path` and folds in its `extends` chain. Base failures become
    /// warnings; only the child's own read/parse failures are errors.
    fn load_chain(
        &self,
        path: &Path,
        visited: &mut HashSet<PathBuf>,
        warnings: &mut Vec<ValidationWarning>,
    ) -> Result<Value, LoadError> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        visited.insert(key);

        let value = read_json(path)?;
        let Some(base_ref) = value.get("extends").and_then(Value::as_str) else {
            return Ok(value);
        };

        let base_path = self.resolve_base(path, base_ref);
        let base_key = base_path
            .canonicalize()
            .unwrap_or_else(|_| base_path.clone());
        if visited.contains(&base_key) {
            warnings.push(ValidationWarning::with_path(
                WarningCode::InheritanceFailed,
                format!(
                    "extends chain revisits {}; inheritance stopped",
                    base_path.display()
                ),
                "extends",
            ));
            return Ok(value);
        }

        match self.load_chain(&base_path, visited, warnings) {
            Ok(base) => Ok(merge_values(&base, &value)),
            Err(e) => {
                tracing::warn!(base = %base_path.display(), error = %e, "base manifest not loaded");
                warnings.push(ValidationWarning::with_path(
                    WarningCode::InheritanceFailed,
                    format!("base manifest not loaded: {}", e),
                    "extends",
                ));
                Ok(value)
            }
        }
    }

    fn resolve_base(&self, child: &Path, base_ref: &str) -> PathBuf {
        let dir = child.parent().unwrap_or_else(|| Path::new("."));
        let target = dir.join(base_ref);
        if target.is_dir() {
            target.join(&self.file_name)
        } else {
            target
        }
    }
}

/// Loads the manifest of a package directory with the default marker filename.
pub fn load_manifest(dir: &Path) -> Result<LoadedManifest, LoadError> {
    ManifestLoader::default().load(dir)
}

/// Reads the `package.json` next to a manifest.
pub fn load_package_descriptor(dir: &Path) -> Result<PackageDescriptor, LoadError> {
    let path = dir.join(PACKAGE_DESCRIPTOR_FILE);
    let value = read_json(&path)?;
    serde_json::from_value(value).map_err(|e| LoadError::Invalid {
        path,
        errors: vec![ValidationError::new(
            ErrorCode::MissingPackageDescriptor,
            format!("package descriptor needs string 'name' and 'version': {}", e),
        )],
        warnings: Vec::new(),
    })
}

fn read_json(path: &Path) -> Result<Value, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Fills unset platform fields with defaults. Fields the manifest sets are
/// never touched.
pub fn apply_platform_defaults(manifest: &mut ExtensionManifest) {
    let basename = manifest
        .name
        .rsplit('/')
        .next()
        .unwrap_or(manifest.name.as_str())
        .to_string();

    if let Some(android) = manifest.platforms.android.as_mut() {
        android
            .source_dir
            .get_or_insert_with(|| DEFAULT_ANDROID_SOURCE_DIR.to_string());
        android.build_types.get_or_insert_with(default_build_types);
        android.language.get_or_insert(AndroidLanguage::Kotlin);
    }
    if let Some(ios) = manifest.platforms.ios.as_mut() {
        ios.source_dir
            .get_or_insert_with(|| DEFAULT_IOS_SOURCE_DIR.to_string());
        ios.podspec_path
            .get_or_insert_with(|| format!("{}.podspec", basename));
        ios.frameworks.get_or_insert_with(Vec::new);
    }
    if let Some(web) = manifest.platforms.web.as_mut() {
        web.entry.get_or_insert_with(|| DEFAULT_WEB_ENTRY.to_string());
    }
}
