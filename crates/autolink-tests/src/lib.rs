//! Autolink End-to-End Test Infrastructure
//!
//! Materializes install trees in temporary project roots and drives the
//! pipeline over them:
//!
//! - Discovery: install tree -> extension records
//! - Resolution: records -> dependency order or cycles
//! - Codegen: interface source -> per-target contracts and stubs
//! - Registry: records -> one aggregated registry per platform
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p autolink-tests
//! ```

pub mod fixtures;
pub mod harness;

pub use fixtures::{storage_extension, ExtensionFixture, STORAGE_INTERFACE};
pub use harness::{CliResult, TestHarness};
