//! Autolink Spec Library
//!
//! Types, validation, loading and interface parsing for extension manifests.
//! A manifest (`lynx.ext.json`) declares which platforms an installed
//! extension supports and which native modules, elements and services it
//! contributes to the host application.
//!
//! # Example
//!
//! ```
//! use autolink_spec::{validate_manifest_value, ErrorCode};
//!
//! let value = serde_json::json!({
//!     "name": "@a/b",
//!     "version": "1.0",
//!     "platforms": { "android": { "packageName": "com.a.b" } }
//! });
//! let result = validate_manifest_value(&value);
//! assert!(!result.is_ok());
//! assert_eq!(result.errors[0].code, ErrorCode::InvalidVersion);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error and warning codes, validation results, load errors
//! - [`manifest`]: Manifest, platform config and declaration types
//! - [`validation`]: Schema validation of untyped manifest JSON
//! - [`loader`]: Manifest location, inheritance, merging and platform defaults
//! - [`record`]: Discovery output types
//! - [`interface`]: Interface source parsing
//! - [`options`]: Project-level options file

pub mod error;
pub mod interface;
pub mod loader;
pub mod manifest;
pub mod options;
pub mod record;
pub mod validation;

// Re-export commonly used types at the crate root
pub use error::{
    ErrorCode, LoadError, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
pub use interface::{
    discover_module_declarations, parse_interfaces, reconcile_modules, ElementDescriptor,
    InterfaceKind, MethodDescriptor, ModuleDescriptor, ParamDescriptor, ParseOptions,
    ParsedInterfaces, PropertyDescriptor, MODULE_MARKER,
};
pub use loader::{
    apply_platform_defaults, load_manifest, load_package_descriptor, merge_manifests,
    LoadedManifest, ManifestLoader,
};
pub use manifest::{
    derive_tag_name, AndroidConfig, AndroidLanguage, ElementBinding, ElementDeclaration,
    ExtensionManifest, IosConfig, ModuleBinding, ModuleDeclaration, PackageDescriptor, Platform,
    Platforms, WebConfig, MANIFEST_FILE, PACKAGE_DESCRIPTOR_FILE,
};
pub use options::{AutolinkOptions, OPTIONS_FILE};
pub use record::{DiscoveryError, ElementInfo, ExtensionRecord, ModuleInfo, ServiceInfo};
pub use validation::{validate_manifest, validate_manifest_value};
