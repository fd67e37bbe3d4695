//! Error types for manifest validation and loading.

use std::path::PathBuf;

use thiserror::Error;

/// Error codes for manifest validation and loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Schema errors (E001-E009)
    /// E001: Required field is missing
    MissingField,
    /// E002: Field has the wrong JSON type
    InvalidType,
    /// E003: Package or dependency name does not match the name grammar
    InvalidName,
    /// E004: Version is not strict semver
    InvalidVersion,
    /// E005: No known platform configured
    NoPlatforms,
    /// E006: Android package name is not reverse-domain
    InvalidPackageName,
    /// E007: Binding class name does not match the class-name grammar
    InvalidClassName,
    /// E008: Declaration object is malformed
    InvalidDeclaration,
    /// E009: Element tag name is malformed
    InvalidTagName,

    // Load errors (E010-E014)
    /// E010: Manifest file not found
    MissingFile,
    /// E011: Manifest is not valid JSON
    InvalidJson,
    /// E012: Android language is not supported
    UnsupportedLanguage,
    /// E013: Package descriptor missing or unreadable
    MissingPackageDescriptor,
    /// E014: File could not be read
    ReadFailed,

    // Discovery / structural errors (E020-E024)
    /// E020: Install directory does not exist
    MissingInstallDir,
    /// E021: Circular dependency between extensions
    CircularDependency,
    /// E022: Dependency was never discovered
    MissingDependency,
    /// E023: Two bindings share one registration name
    DuplicateRegistration,
    /// E024: Declared source path does not exist
    MissingSourcePath,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MissingField => "E001",
            ErrorCode::InvalidType => "E002",
            ErrorCode::InvalidName => "E003",
            ErrorCode::InvalidVersion => "E004",
            ErrorCode::NoPlatforms => "E005",
            ErrorCode::InvalidPackageName => "E006",
            ErrorCode::InvalidClassName => "E007",
            ErrorCode::InvalidDeclaration => "E008",
            ErrorCode::InvalidTagName => "E009",
            ErrorCode::MissingFile => "E010",
            ErrorCode::InvalidJson => "E011",
            ErrorCode::UnsupportedLanguage => "E012",
            ErrorCode::MissingPackageDescriptor => "E013",
            ErrorCode::ReadFailed => "E014",
            ErrorCode::MissingInstallDir => "E020",
            ErrorCode::CircularDependency => "E021",
            ErrorCode::MissingDependency => "E022",
            ErrorCode::DuplicateRegistration => "E023",
            ErrorCode::MissingSourcePath => "E024",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes for manifest validation and loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Array field is present but empty
    EmptyArray,
    /// W002: Unknown top-level field
    UnknownField,
    /// W003: Unknown platform key
    UnknownPlatform,
    /// W004: Host version range does not parse
    InvalidVersionRange,
    /// W005: Base manifest could not be loaded
    InheritanceFailed,
    /// W006: Declared and discovered module disagree on binding class
    ModuleBindingConflict,
    /// W007: Module found in interface source but not declared
    UndeclaredModule,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::EmptyArray => "W001",
            WarningCode::UnknownField => "W002",
            WarningCode::UnknownPlatform => "W003",
            WarningCode::InvalidVersionRange => "W004",
            WarningCode::InheritanceFailed => "W005",
            WarningCode::ModuleBindingConflict => "W006",
            WarningCode::UndeclaredModule => "W007",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, optional JSON path and remediation hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// JSON path to the problematic field (e.g., "nativeModules\[0\].className").
    pub path: Option<String>,
    /// How to fix it.
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            suggestion: None,
        }
    }

    /// Creates a new validation error with a JSON path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
            suggestion: None,
        }
    }

    /// Attaches a remediation suggestion.
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)?;
        } else {
            write!(f, "{}: {}", self.code, self.message)?;
        }
        if let Some(ref suggestion) = self.suggestion {
            write!(f, "; {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// JSON path to the problematic field.
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation warning with a JSON path.
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Result of manifest validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether validation passed (no errors).
    pub ok: bool,
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of validation warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
        self.ok = false;
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Returns true if any error carries the given code.
    pub fn has_error(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Returns true if any warning carries the given code.
    pub fn has_warning(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

/// Failure to produce a usable manifest from a package directory.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No manifest file where one was expected.
    #[error("manifest not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not JSON.
    #[error("invalid JSON in {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON does not satisfy the manifest schema.
    #[error("manifest {} failed validation with {} error(s)", path.display(), errors.len())]
    Invalid {
        path: PathBuf,
        errors: Vec<ValidationError>,
        warnings: Vec<ValidationWarning>,
    },
}

impl LoadError {
    /// Returns the error code for reporting.
    pub fn code(&self) -> ErrorCode {
        match self {
            LoadError::MissingFile { .. } => ErrorCode::MissingFile,
            LoadError::Read { .. } => ErrorCode::ReadFailed,
            LoadError::InvalidJson { .. } => ErrorCode::InvalidJson,
            LoadError::Invalid { errors, .. } => errors
                .first()
                .map(|e| e.code)
                .unwrap_or(ErrorCode::InvalidType),
        }
    }

    /// Path of the manifest this error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::MissingFile { path }
            | LoadError::Read { path, .. }
            | LoadError::InvalidJson { path, .. }
            | LoadError::Invalid { path, .. } => path,
        }
    }

    /// One line per validation error, or the source error text.
    pub fn detail(&self) -> Option<String> {
        match self {
            LoadError::MissingFile { .. } => None,
            LoadError::Read { source, .. } => Some(source.to_string()),
            LoadError::InvalidJson { source, .. } => Some(source.to_string()),
            LoadError::Invalid { errors, .. } => Some(
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        }
    }
}
