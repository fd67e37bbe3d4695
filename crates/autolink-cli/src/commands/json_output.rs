//! JSON output types for machine-readable CLI output.
//!
//! Every command prints exactly one JSON document on stdout when `--json`
//! is given. Tracing output stays on stderr.

use std::path::{Path, PathBuf};

use autolink_codegen::{GenerationReport, RegistryWarning};
use autolink_discovery::{DependencyCycle, DiscoveryWarning, MissingDependency, ValidationReport};
use autolink_spec::{
    DiscoveryError, ExtensionRecord, LoadError, Platform, ValidationError, ValidationWarning,
};
use serde::Serialize;

/// Error codes for CLI-level failures. Validation and discovery codes pass
/// through unchanged.
pub mod error_codes {
    /// Options file could not be loaded
    pub const OPTIONS_LOAD: &str = "CLI_001";
    /// Interface source could not be read
    pub const SOURCE_READ: &str = "CLI_002";
    /// Registry could not be written
    pub const REGISTRY_WRITE: &str = "CLI_003";
    /// Dependency cycle
    pub const DEPENDENCY_CYCLE: &str = "CLI_004";
    /// Generated file could not be written
    pub const GENERATION_WRITE: &str = "CLI_005";
}

/// Warning codes for CLI-level findings.
pub mod warning_codes {
    /// Declared dependency is not installed
    pub const MISSING_DEPENDENCY: &str = "CLI_W001";
    /// Interface declaration not turned into a binding
    pub const SKIPPED_INTERFACE: &str = "CLI_W002";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    pub code: String,
    pub message: String,
    /// JSON path of the offending manifest field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl JsonError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            file: None,
            suggestion: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonWarning {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            file: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

// ============================================================================
// Conversions
// ============================================================================

fn display(path: &Path) -> String {
    path.display().to_string()
}

pub fn validation_error_to_json(err: &ValidationError) -> JsonError {
    let mut error = JsonError::new(err.code.to_string(), &err.message);
    if let Some(ref path) = err.path {
        error = error.with_path(path);
    }
    if let Some(ref suggestion) = err.suggestion {
        error = error.with_suggestion(suggestion);
    }
    error
}

pub fn validation_warning_to_json(warn: &ValidationWarning) -> JsonWarning {
    let mut warning = JsonWarning::new(warn.code.to_string(), &warn.message);
    if let Some(ref path) = warn.path {
        warning = warning.with_path(path);
    }
    warning
}

pub fn discovery_error_to_json(err: &DiscoveryError) -> JsonError {
    let message = match err.detail {
        Some(ref detail) => format!("{}: {}", err.reason, detail),
        None => err.reason.clone(),
    };
    JsonError::new(err.code.to_string(), message).with_file(display(&err.package_path))
}

pub fn discovery_warning_to_json(warn: &DiscoveryWarning) -> JsonWarning {
    validation_warning_to_json(&warn.warning).with_file(display(&warn.package_path))
}

/// Expands a load error into its errors and warnings.
pub fn load_error_to_json(err: &LoadError) -> (Vec<JsonError>, Vec<JsonWarning>) {
    let file = display(err.path());
    match err {
        LoadError::Invalid {
            errors, warnings, ..
        } => (
            errors
                .iter()
                .map(|e| validation_error_to_json(e).with_file(file.clone()))
                .collect(),
            warnings
                .iter()
                .map(|w| validation_warning_to_json(w).with_file(file.clone()))
                .collect(),
        ),
        other => (
            vec![JsonError::new(other.code().to_string(), other.to_string()).with_file(file)],
            Vec::new(),
        ),
    }
}

pub fn missing_dependency_to_json(missing: &MissingDependency) -> JsonWarning {
    JsonWarning::new(
        warning_codes::MISSING_DEPENDENCY,
        format!(
            "'{}' depends on '{}', which is not installed",
            missing.dependent, missing.dependency
        ),
    )
}

pub fn cycle_to_json(cycle: &DependencyCycle) -> JsonError {
    JsonError::new(
        error_codes::DEPENDENCY_CYCLE,
        format!("dependency cycle: {}", cycle),
    )
}

// ============================================================================
// Command outputs
// ============================================================================

/// Output of a command that failed before producing results.
#[derive(Debug, Clone, Serialize)]
pub struct FailureOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
}

impl FailureOutput {
    pub fn new(error: JsonError) -> Self {
        Self {
            success: false,
            errors: vec![error],
        }
    }
}

/// One discovered extension.
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionSummary {
    pub name: String,
    pub version: String,
    pub package_path: PathBuf,
    pub platforms: Vec<Platform>,
    pub modules: Vec<String>,
    pub elements: Vec<String>,
    pub services: Vec<String>,
    pub dependencies: Vec<String>,
}

impl ExtensionSummary {
    pub fn from_record(record: &ExtensionRecord) -> Self {
        fn unique<'a>(names: impl Iterator<Item = &'a String>) -> Vec<String> {
            let mut out: Vec<String> = Vec::new();
            for name in names {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            out
        }
        Self {
            name: record.name.clone(),
            version: record.version.clone(),
            package_path: record.package_path.clone(),
            platforms: record.platforms.clone(),
            modules: unique(record.modules.iter().map(|m| &m.name)),
            elements: unique(record.elements.iter().map(|e| &e.tag_name)),
            services: unique(record.services.iter().map(|s| &s.name)),
            dependencies: record.dependencies().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoverOutput {
    pub success: bool,
    pub extensions: Vec<ExtensionSummary>,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidateOutput {
    pub success: bool,
    /// Extension checks; empty when a single manifest was validated.
    pub reports: Vec<ValidationReport>,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepsOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<String>>,
    pub cycles: Vec<DependencyCycle>,
    pub missing: Vec<MissingDependency>,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CodegenOutput {
    pub success: bool,
    pub package: String,
    pub platforms: Vec<Platform>,
    pub report: GenerationReport,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
}

/// One written registry.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryOutput {
    pub platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub registered: usize,
    pub skipped_extensions: Vec<String>,
    pub warnings: Vec<RegistryWarning>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkOutput {
    pub success: bool,
    /// Record order used for the registries.
    pub order: Vec<String>,
    pub cycles: Vec<DependencyCycle>,
    pub registries: Vec<RegistryOutput>,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use autolink_spec::{ErrorCode, WarningCode};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_error_skips_empty_fields() {
        let json = serde_json::to_value(JsonError::new("CLI_001", "boom")).unwrap();
        assert_eq!(json, serde_json::json!({ "code": "CLI_001", "message": "boom" }));
    }

    #[test]
    fn test_validation_error_conversion() {
        let err = ValidationError::with_path(ErrorCode::InvalidName, "bad name", "name")
            .suggest("use a package name");
        let json = validation_error_to_json(&err);
        assert_eq!(json.code, ErrorCode::InvalidName.to_string());
        assert_eq!(json.path.as_deref(), Some("name"));
        assert_eq!(json.suggestion.as_deref(), Some("use a package name"));
    }

    #[test]
    fn test_load_error_expands_validation_errors() {
        let err = LoadError::Invalid {
            path: PathBuf::from("pkg/lynx.ext.json"),
            errors: vec![
                ValidationError::new(ErrorCode::MissingField, "a"),
                ValidationError::new(ErrorCode::InvalidVersion, "b"),
            ],
            warnings: vec![ValidationWarning::new(WarningCode::UnknownField, "c")],
        };
        let (errors, warnings) = load_error_to_json(&err);
        assert_eq!(errors.len(), 2);
        assert_eq!(warnings.len(), 1);
        assert!(errors.iter().all(|e| e.file.as_deref() == Some("pkg/lynx.ext.json")));
    }

    #[test]
    fn test_missing_file_is_single_error() {
        let err = LoadError::MissingFile {
            path: PathBuf::from("pkg/lynx.ext.json"),
        };
        let (errors, warnings) = load_error_to_json(&err);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::MissingFile.to_string());
        assert!(warnings.is_empty());
    }
}
