//! Autolink Codegen
//!
//! Turns parsed interface descriptors into per-target binding scaffolding
//! (Kotlin, Objective-C, TypeScript) and aggregates discovered extensions
//! into one registry per platform.
//!
//! # Modules
//!
//! - [`type_mapper`]: Interface type text to target type syntax
//! - [`targets`]: Contract and stub rendering per target
//! - [`generate`]: Per-package planning and writing
//! - [`registry`]: Aggregated per-platform registries
//! - [`report`]: Generation outcome counts
//! - [`error`]: Codegen errors

pub mod error;
pub mod generate;
pub mod registry;
pub mod report;
pub mod targets;
pub mod type_mapper;

pub use error::{CodegenError, CodegenResult};
pub use generate::{
    generate_package, parse_options_for, plan_package, write_file, write_if_absent, write_plan,
    GenerationPlan,
};
pub use registry::{
    generate_registries, generate_registry, registry_path, write_registry, Registration,
    RegistrationKind, RegistryGenerationResult, RegistryWarning, RegistryWarningKind,
};
pub use report::{GenerationFailure, GenerationReport};
pub use targets::{FileRole, PlannedFile};
pub use type_mapper::{classify, map_optional_type, map_return_type, map_type, TypeCategory};
