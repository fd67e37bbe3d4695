//! Autolink CLI library.
//!
//! Wires discovery, validation, dependency resolution and code generation
//! together for the `autolink` binary.

pub mod commands;
pub mod logging;
