//! Structural checks of a discovered extension against its package on disk.
//!
//! Manifest schema problems are caught at load time. This pass looks at what
//! the manifest points to: the descriptor, platform sources, build files and
//! the host version range.

use std::path::{Path, PathBuf};

use autolink_spec::validation::grammar::is_valid_version_range;
use autolink_spec::{ExtensionRecord, Platform, PACKAGE_DESCRIPTOR_FILE};
use serde::Serialize;

/// Issue severity. Only errors make a report invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "{}", s)
    }
}

/// Issue codes for extension checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCode {
    /// X001: Manifest file is gone
    MissingManifest,
    /// X002: Package descriptor is missing or unreadable
    MissingPackageDescriptor,
    /// X003: Descriptor name differs from the manifest name
    NameMismatch,
    /// X004: No platform configured
    NoPlatforms,
    /// X005: Platform source directory or entry does not exist
    MissingPlatformSource,
    /// X006: Android build script not found
    MissingBuildScript,
    /// X007: iOS podspec not found
    MissingPodspec,
    /// X008: No host version range declared
    MissingHostVersion,
    /// X009: Host version range does not parse
    InvalidHostVersion,
    /// X010: Extension declares nothing to register
    NoExports,
}

impl IssueCode {
    /// Returns the code string (e.g., "X001").
    pub fn code(&self) -> &'static str {
        match self {
            IssueCode::MissingManifest => "X001",
            IssueCode::MissingPackageDescriptor => "X002",
            IssueCode::NameMismatch => "X003",
            IssueCode::NoPlatforms => "X004",
            IssueCode::MissingPlatformSource => "X005",
            IssueCode::MissingBuildScript => "X006",
            IssueCode::MissingPodspec => "X007",
            IssueCode::MissingHostVersion => "X008",
            IssueCode::InvalidHostVersion => "X009",
            IssueCode::NoExports => "X010",
        }
    }
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for IssueCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// One finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl ValidationIssue {
    fn new(severity: Severity, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            suggestion: None,
            path: None,
        }
    }

    fn at(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.code, self.message)?;
        if let Some(ref path) = self.path {
            write!(f, " ({})", path.display())?;
        }
        if let Some(ref suggestion) = self.suggestion {
            write!(f, "; {}", suggestion)?;
        }
        Ok(())
    }
}

/// All findings for one extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub extension: String,
    pub package_path: PathBuf,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Valid iff no issue is an error.
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Returns true if any issue carries `code`.
    pub fn has(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }
}

/// Checks one extension. Never fails; every problem becomes an issue.
pub fn validate_extension(record: &ExtensionRecord) -> ValidationReport {
    let mut report = ValidationReport {
        extension: record.name.clone(),
        package_path: record.package_path.clone(),
        issues: Vec::new(),
    };

    if !record.manifest_path.is_file() {
        report.push(
            ValidationIssue::new(Severity::Error, IssueCode::MissingManifest, "manifest file not found")
                .at(&record.manifest_path),
        );
    }
    check_descriptor(record, &mut report);

    if record.platforms.is_empty() {
        report.push(
            ValidationIssue::new(Severity::Error, IssueCode::NoPlatforms, "no platform is configured")
                .suggest("add an 'android', 'ios' or 'web' entry under 'platforms'"),
        );
    }
    for &platform in &record.platforms {
        check_platform(record, platform, &mut report);
    }

    match record.manifest.lynx_version.as_deref() {
        None => report.push(
            ValidationIssue::new(
                Severity::Info,
                IssueCode::MissingHostVersion,
                "no 'lynxVersion' range declared; the extension is assumed compatible with any host",
            )
            .suggest("declare a range such as \">=3.0.0\""),
        ),
        Some(range) if !is_valid_version_range(range) => report.push(
            ValidationIssue::new(
                Severity::Warning,
                IssueCode::InvalidHostVersion,
                format!("'lynxVersion' range '{}' does not parse", range),
            )
            .suggest("use a semver range such as \">=3.0.0\""),
        ),
        Some(_) => {}
    }

    // Per-platform lists are empty without platforms, so count declarations.
    if record.manifest.export_count() == 0 && record.modules.is_empty() {
        report.push(
            ValidationIssue::new(
                Severity::Warning,
                IssueCode::NoExports,
                "extension declares no native modules, elements or services",
            )
            .suggest("declare 'nativeModules', 'elements' or 'services'"),
        );
    }

    tracing::debug!(
        extension = %report.extension,
        issues = report.issues.len(),
        valid = report.is_valid(),
        "validated extension"
    );
    report
}

/// Checks every record, in order.
pub fn validate_extensions(records: &[ExtensionRecord]) -> Vec<ValidationReport> {
    records.iter().map(validate_extension).collect()
}

fn check_descriptor(record: &ExtensionRecord, report: &mut ValidationReport) {
    let path = record.package_path.join(PACKAGE_DESCRIPTOR_FILE);
    let descriptor_name = std::fs::read_to_string(&path)
        .ok()
        .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).ok())
        .map(|value| value.get("name").and_then(|n| n.as_str()).map(str::to_string));

    match descriptor_name {
        None => report.push(
            ValidationIssue::new(
                Severity::Error,
                IssueCode::MissingPackageDescriptor,
                "package descriptor is missing or not valid JSON",
            )
            .at(path),
        ),
        Some(Some(name)) if name != record.name => report.push(
            ValidationIssue::new(
                Severity::Warning,
                IssueCode::NameMismatch,
                format!(
                    "manifest name '{}' differs from package name '{}'",
                    record.name, name
                ),
            )
            .at(path)
            .suggest("use the package name as the manifest name"),
        ),
        Some(_) => {}
    }
}

fn check_platform(record: &ExtensionRecord, platform: Platform, report: &mut ValidationReport) {
    let source = autolink_spec::record::platform_source(&record.manifest, &record.package_path, platform);
    if !source.exists() {
        report.push(
            ValidationIssue::new(
                Severity::Error,
                IssueCode::MissingPlatformSource,
                format!("{} source path does not exist", platform),
            )
            .at(source),
        );
    }

    match platform {
        Platform::Android => {
            if !has_build_script(&record.package_path) {
                report.push(
                    ValidationIssue::new(
                        Severity::Warning,
                        IssueCode::MissingBuildScript,
                        "no build.gradle or build.gradle.kts found for the android library",
                    )
                    .at(record.package_path.join("android")),
                );
            }
        }
        Platform::Ios => {
            let podspec = record
                .manifest
                .platforms
                .ios
                .as_ref()
                .and_then(|ios| ios.podspec_path.as_deref())
                .map(|p| record.package_path.join(p));
            if let Some(podspec) = podspec.filter(|p| !p.is_file()) {
                report.push(
                    ValidationIssue::new(Severity::Warning, IssueCode::MissingPodspec, "podspec not found")
                        .at(podspec),
                );
            }
        }
        Platform::Web => {}
    }
}

fn has_build_script(package_path: &Path) -> bool {
    [package_path.join("android"), package_path.to_path_buf()]
        .iter()
        .any(|dir| dir.join("build.gradle").is_file() || dir.join("build.gradle.kts").is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use autolink_spec::{apply_platform_defaults, ExtensionManifest};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn record_in(dir: &Path, manifest_json: &str) -> ExtensionRecord {
        std::fs::write(dir.join("lynx.ext.json"), manifest_json).unwrap();
        let mut manifest = ExtensionManifest::from_json(manifest_json).unwrap();
        apply_platform_defaults(&mut manifest);
        let modules = manifest.module_bindings();
        ExtensionRecord::build(
            manifest,
            dir.join("lynx.ext.json"),
            dir.to_path_buf(),
            "1.0.0".into(),
            modules,
        )
    }

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_complete_android_package_is_clean() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "package.json", r#"{ "name": "@a/cam", "version": "1.0.0" }"#);
        write(tmp.path(), "android/build.gradle", "");
        std::fs::create_dir_all(tmp.path().join("android/src/main/java")).unwrap();

        let record = record_in(
            tmp.path(),
            r#"{ "name": "@a/cam", "version": "1.0.0", "lynxVersion": ">=3.0.0",
                 "platforms": { "android": { "packageName": "com.a.cam" } },
                 "nativeModules": ["Camera"] }"#,
        );
        let report = validate_extension(&record);
        assert_eq!(report.issues, vec![]);
        assert!(report.is_valid());
    }

    #[test]
    fn test_missing_sources_are_errors() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "package.json", r#"{ "name": "w", "version": "1.0.0" }"#);
        let record = record_in(
            tmp.path(),
            r#"{ "name": "w", "version": "1.0.0", "lynxVersion": ">=3.0.0",
                 "platforms": { "web": {}, "ios": {} }, "services": ["S"] }"#,
        );
        let report = validate_extension(&record);
        assert!(!report.is_valid());
        assert_eq!(report.count(Severity::Error), 2);
        assert!(report.has(IssueCode::MissingPlatformSource));
        assert!(report.has(IssueCode::MissingPodspec));
    }

    #[test]
    fn test_soft_findings() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "package.json", r#"{ "name": "other-name", "version": "1.0.0" }"#);
        write(tmp.path(), "web/src/index.ts", "");
        let record = record_in(
            tmp.path(),
            r#"{ "name": "w", "version": "1.0.0", "platforms": { "web": {} } }"#,
        );
        let report = validate_extension(&record);
        assert!(report.is_valid());
        let codes: Vec<_> = report.issues.iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![IssueCode::NameMismatch, IssueCode::MissingHostVersion, IssueCode::NoExports]
        );
        assert_eq!(report.count(Severity::Info), 1);
    }

    #[test]
    fn test_bad_range_and_missing_descriptor() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "web/src/index.ts", "");
        let record = record_in(
            tmp.path(),
            r#"{ "name": "w", "version": "1.0.0", "lynxVersion": "whenever",
                 "platforms": { "web": {} }, "elements": ["Map"] }"#,
        );
        let report = validate_extension(&record);
        assert!(report.has(IssueCode::MissingPackageDescriptor));
        assert!(report.has(IssueCode::InvalidHostVersion));
        assert!(!report.is_valid());
    }

    #[test]
    fn test_npm_host_range_is_accepted() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "package.json", r#"{ "name": "w", "version": "1.0.0" }"#);
        write(tmp.path(), "web/src/index.ts", "");
        let record = record_in(
            tmp.path(),
            r#"{ "name": "w", "version": "1.0.0", "lynxVersion": ">=3.0.0 <4.0.0 || ^5",
                 "platforms": { "web": {} }, "services": ["S"] }"#,
        );
        let report = validate_extension(&record);
        assert!(!report.has(IssueCode::InvalidHostVersion), "{:?}", report.issues);
        assert!(report.is_valid());
    }

    #[test]
    fn test_no_platforms_is_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "package.json", r#"{ "name": "w", "version": "1.0.0" }"#);
        let record = record_in(
            tmp.path(),
            r#"{ "name": "w", "version": "1.0.0", "lynxVersion": ">=3", "platforms": {}, "services": ["S"] }"#,
        );
        let report = validate_extension(&record);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].code, IssueCode::NoPlatforms);
    }

    #[test]
    fn test_declared_exports_count_without_platforms() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "package.json", r#"{ "name": "w", "version": "1.0.0" }"#);
        let record = record_in(
            tmp.path(),
            r#"{ "name": "w", "version": "1.0.0", "lynxVersion": ">=3", "platforms": {},
                 "elements": ["Slider"] }"#,
        );
        assert!(record.elements.is_empty());
        let report = validate_extension(&record);
        assert!(!report.has(IssueCode::NoExports), "{:?}", report.issues);

        let record = record_in(
            tmp.path(),
            r#"{ "name": "w", "version": "1.0.0", "lynxVersion": ">=3", "platforms": {} }"#,
        );
        let report = validate_extension(&record);
        assert!(report.has(IssueCode::NoExports));
    }
}
