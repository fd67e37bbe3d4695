//! Per-target rendering of contracts and stubs.
//!
//! Every target renders the same descriptor: identical member set, order,
//! optionality and registration name. Only type syntax and file layout
//! differ.

pub mod android;
pub mod ios;
pub mod web;

use std::path::PathBuf;

use autolink_spec::{ElementDescriptor, ExtensionManifest, ModuleDescriptor, Platform};
use serde::Serialize;

use crate::error::CodegenResult;

/// Contract or stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    /// Rewritten every run.
    Contract,
    /// Written only when absent.
    Stub,
}

/// A rendered file, not yet on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub platform: Platform,
    pub role: FileRole,
    /// Registration name of the module, service or element.
    pub subject: String,
    /// Path relative to the package root.
    pub path: PathBuf,
    pub content: String,
}

/// Native module or service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Module,
    Service,
}

impl BindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingKind::Module => "module",
            BindingKind::Service => "service",
        }
    }
}

/// A method-bearing interface bound to an implementation class.
#[derive(Debug, Clone, Copy)]
pub struct MethodContract<'a> {
    pub kind: BindingKind,
    pub class_name: &'a str,
    pub descriptor: &'a ModuleDescriptor,
}

impl MethodContract<'_> {
    /// Registration name.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

/// An element props interface bound to a view class.
#[derive(Debug, Clone, Copy)]
pub struct ElementContract<'a> {
    pub class_name: &'a str,
    pub descriptor: &'a ElementDescriptor,
}

impl ElementContract<'_> {
    /// Registration name, which is the element name.
    pub fn name(&self) -> &str {
        &self.descriptor.element_name
    }

    pub fn tag(&self) -> &str {
        &self.descriptor.tag_name
    }
}

/// Package-wide inputs shared by every rendered file.
#[derive(Debug, Clone, Copy)]
pub struct TargetContext<'a> {
    pub manifest: &'a ExtensionManifest,
    /// Interface source the descriptors came from, for the file header.
    pub source_label: &'a str,
}

impl TargetContext<'_> {
    pub(crate) fn header(&self) -> String {
        format!(
            "// Generated by autolink from {} ({}). Do not edit.\n",
            self.source_label, self.manifest.name
        )
    }
}

/// Contract and stub for a module or service on `platform`.
pub fn method_files(
    platform: Platform,
    ctx: &TargetContext<'_>,
    contract: &MethodContract<'_>,
) -> CodegenResult<Vec<PlannedFile>> {
    match platform {
        Platform::Android => android::method_files(ctx, contract),
        Platform::Ios => Ok(ios::method_files(ctx, contract)),
        Platform::Web => Ok(web::method_files(ctx, contract)),
    }
}

/// Contract and stub for an element on `platform`.
pub fn element_files(
    platform: Platform,
    ctx: &TargetContext<'_>,
    contract: &ElementContract<'_>,
) -> CodegenResult<Vec<PlannedFile>> {
    match platform {
        Platform::Android => android::element_files(ctx, contract),
        Platform::Ios => Ok(ios::element_files(ctx, contract)),
        Platform::Web => Ok(web::element_files(ctx, contract)),
    }
}

/// Last segment of a possibly qualified class name.
pub fn simple_class_name(class_name: &str) -> &str {
    class_name.rsplit('.').next().unwrap_or(class_name)
}

/// `label` -> `Label`.
pub(crate) fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `FancyButton` -> `FANCY_BUTTON`.
pub(crate) fn screaming_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            out.push('_');
        }
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push('_');
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_helpers() {
        assert_eq!(simple_class_name("com.a.b.XImpl"), "XImpl");
        assert_eq!(simple_class_name("XImpl"), "XImpl");
        assert_eq!(upper_first("label"), "Label");
        assert_eq!(screaming_snake("FancyButton"), "FANCY_BUTTON");
        assert_eq!(screaming_snake("Map3D"), "MAP3_D");
    }
}
