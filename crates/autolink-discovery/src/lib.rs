//! Autolink Discovery
//!
//! Finds installed extensions, orders them by dependency and checks each
//! package against what its manifest declares.
//!
//! - [`discovery`]: Install-directory scan producing [`ExtensionRecord`]s
//! - [`resolver`]: Dependency order and cycle detection
//! - [`validator`]: Per-extension structural checks
//!
//! [`ExtensionRecord`]: autolink_spec::ExtensionRecord

pub mod discovery;
pub mod resolver;
pub mod validator;

pub use discovery::{discover, discover_with, find_manifests, DiscoveryResult, DiscoveryWarning};
pub use resolver::{
    resolve_dependencies, resolve_graph, DependencyCycle, MissingDependency, Resolution,
    ResolutionResult,
};
pub use validator::{
    validate_extension, validate_extensions, IssueCode, Severity, ValidationIssue,
    ValidationReport,
};
