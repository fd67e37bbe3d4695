//! Interface source parsing.
//!
//! Extracts declared TypeScript interfaces from one package's interface
//! source and sorts them into three buckets:
//!
//! - **native modules**: the `extends` clause names the module marker (`NativeModule`)
//! - **elements**: the name ends with `Props`, or the caller lists it as an element
//! - **services**: everything else
//!
//! Type text is captured literally (whitespace collapsed); nothing is inferred.
//!
//! # Example
//!
//! ```
//! use autolink_spec::interface::{parse_interfaces, ParseOptions};
//!
//! let source = r#"
//!     export interface Storage extends NativeModule {
//!         getItem(key: string): Promise<string>;
//!         setItem(key: string, value?: string): void;
//!     }
//!     export interface FancyButtonProps {
//!         label: string;
//!         disabled?: boolean;
//!     }
//! "#;
//! let parsed = parse_interfaces(source, &ParseOptions::default());
//! assert_eq!(parsed.modules[0].name, "Storage");
//! assert_eq!(parsed.modules[0].methods.len(), 2);
//! assert_eq!(parsed.elements[0].tag_name, "fancy-button");
//! ```

mod scan;


use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationWarning, WarningCode};
use crate::manifest::{derive_tag_name, ModuleBinding, ModuleDeclaration};

use scan::{matching_close, normalize_ws, split_top_level, strip_comments, take_identifier};

/// Name of the marker contract module interfaces extend.
pub const MODULE_MARKER: &str = "NativeModule";

/// Conventional interface source path inside a package.
pub const DEFAULT_INTERFACE_SOURCE: &str = "src/index.ts";

static INTERFACE_REGEX: OnceLock<Regex> = OnceLock::new();

fn interface_regex() -> &'static Regex {
    INTERFACE_REGEX.get_or_init(|| {
        Regex::new(
            r"\binterface\s+([A-Za-z_$][\w$]*)\s*(?:<[^{]*?>)?\s*(?:extends\s+([^{]+?))?\s*\{",
        )
        .expect("invalid regex pattern")
    })
}

/// One method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    pub optional: bool,
    /// Literal type text; `any` when the source leaves it out.
    pub type_text: String,
}

/// One method of a module or service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub params: Vec<ParamDescriptor>,
    /// Literal return type text; `void` when the source leaves it out.
    pub return_type: String,
}

/// One element property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub optional: bool,
    pub type_text: String,
}

/// Method-bearing interface: a native module or a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Interface name, used as the registration name.
    pub name: String,
    pub methods: Vec<MethodDescriptor>,
}

/// Element props interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Interface name.
    pub name: String,
    /// Element name: the interface name without a trailing `Props`.
    pub element_name: String,
    pub tag_name: String,
    pub properties: Vec<PropertyDescriptor>,
}

/// Which bucket an interface lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    Module,
    Element,
    Service,
}

/// Caller-supplied classification hints.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Names (interface or element name) that must be treated as elements.
    pub element_names: Vec<String>,
    /// Tag overrides keyed by interface or element name.
    pub tag_overrides: HashMap<String, String>,
    /// Marker interface that identifies native modules.
    pub module_marker: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            element_names: Vec::new(),
            tag_overrides: HashMap::new(),
            module_marker: MODULE_MARKER.to_string(),
        }
    }
}

impl ParseOptions {
    /// Adds an explicit element name.
    pub fn element(mut self, name: impl Into<String>) -> Self {
        self.element_names.push(name.into());
        self
    }

    /// Adds a tag override.
    pub fn tag(mut self, name: impl Into<String>, tag: impl Into<String>) -> Self {
        self.tag_overrides.insert(name.into(), tag.into());
        self
    }
}

/// Everything found in one interface source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInterfaces {
    pub modules: Vec<ModuleDescriptor>,
    pub elements: Vec<ElementDescriptor>,
    pub services: Vec<ModuleDescriptor>,
    /// Members that could not be read, as `Interface.member: reason`.
    pub skipped: Vec<String>,
}

impl ParsedInterfaces {
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.elements.is_empty() && self.services.is_empty()
    }
}

struct RawInterface<'a> {
    name: &'a str,
    extends: Vec<String>,
    body: &'a str,
}

fn raw_interfaces(source: &str) -> Vec<RawInterface<'_>> {
    let mut out = Vec::new();
    let mut search_from = 0;
    while let Some(caps) = interface_regex().captures_at(source, search_from) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        let open = whole.end() - 1;
        let Some(close) = matching_close(source, open) else {
            break;
        };
        let name = caps.get(1).map_or("", |m| m.as_str());
        let extends = caps
            .get(2)
            .map(|m| {
                split_top_level(m.as_str(), &[','], false)
                    .into_iter()
                    .map(|base| match base.find('<') {
                        Some(i) => base[..i].trim().to_string(),
                        None => base,
                    })
                    .collect()
            })
            .unwrap_or_default();
        out.push(RawInterface {
            name,
            extends,
            body: &source[open + 1..close],
        });
        search_from = close + 1;
    }
    out
}

fn classify(raw: &RawInterface<'_>, options: &ParseOptions) -> InterfaceKind {
    if raw.extends.iter().any(|base| base == &options.module_marker) {
        return InterfaceKind::Module;
    }
    let element_name = raw.name.strip_suffix("Props").unwrap_or(raw.name);
    let listed = options
        .element_names
        .iter()
        .any(|n| n == raw.name || n == element_name);
    if listed || (raw.name.ends_with("Props") && raw.name != "Props") {
        InterfaceKind::Element
    } else {
        InterfaceKind::Service
    }
}

/// Parses all interfaces in `source`.
pub fn parse_interfaces(source: &str, options: &ParseOptions) -> ParsedInterfaces {
    let cleaned = strip_comments(source);
    let mut parsed = ParsedInterfaces::default();

    for raw in raw_interfaces(&cleaned) {
        let kind = classify(&raw, options);
        let members = split_top_level(raw.body, &[';', ','], true);
        match kind {
            InterfaceKind::Module | InterfaceKind::Service => {
                let mut methods = Vec::new();
                for member in &members {
                    match parse_method(member) {
                        Ok(Some(method)) => methods.push(method),
                        Ok(None) => {}
                        Err(reason) => parsed.skipped.push(format!("{}.{}: {}", raw.name, member, reason)),
                    }
                }
                let descriptor = ModuleDescriptor {
                    name: raw.name.to_string(),
                    methods,
                };
                if kind == InterfaceKind::Module {
                    parsed.modules.push(descriptor);
                } else {
                    parsed.services.push(descriptor);
                }
            }
            InterfaceKind::Element => {
                let mut properties = Vec::new();
                for member in &members {
                    match parse_property(member) {
                        Ok(Some(property)) => properties.push(property),
                        Ok(None) => {}
                        Err(reason) => parsed.skipped.push(format!("{}.{}: {}", raw.name, member, reason)),
                    }
                }
                let element_name = raw
                    .name
                    .strip_suffix("Props")
                    .filter(|n| !n.is_empty())
                    .unwrap_or(raw.name)
                    .to_string();
                let tag_name = options
                    .tag_overrides
                    .get(raw.name)
                    .or_else(|| options.tag_overrides.get(&element_name))
                    .cloned()
                    .unwrap_or_else(|| derive_tag_name(raw.name));
                parsed.elements.push(ElementDescriptor {
                    name: raw.name.to_string(),
                    element_name,
                    tag_name,
                    properties,
                });
            }
        }
    }

    parsed
}

/// Member name with an optional `readonly` prefix and `?` marker removed.
fn member_head(member: &str) -> Result<Option<(&str, bool, &str)>, String> {
    let text = member.trim();
    let text = text.strip_prefix("readonly ").map(str::trim_start).unwrap_or(text);
    // Index and call signatures carry no named member.
    if text.starts_with('[') || text.starts_with('(') || text.starts_with('<') || text.starts_with("new ") {
        return Ok(None);
    }
    let Some((name, rest)) = take_identifier(text) else {
        return Err("unrecognized member".to_string());
    };
    let rest = rest.trim_start();
    match rest.strip_prefix('?') {
        Some(after) => Ok(Some((name, true, after.trim_start()))),
        None => Ok(Some((name, false, rest))),
    }
}

fn parse_method(member: &str) -> Result<Option<MethodDescriptor>, String> {
    let Some((name, _optional, rest)) = member_head(member)? else {
        return Ok(None);
    };

    // Method signature: name<T>(params): Ret
    let rest = skip_generics(rest);
    if rest.starts_with('(') {
        let (params, ret) = split_signature(rest)?;
        return Ok(Some(MethodDescriptor {
            name: name.to_string(),
            params,
            return_type: ret.unwrap_or_else(|| "void".to_string()),
        }));
    }

    // Property holding a function: name: (params) => Ret
    if let Some(type_text) = rest.strip_prefix(':') {
        let type_text = skip_generics(type_text.trim_start());
        if type_text.starts_with('(') {
            if let Ok((params, Some(ret))) = split_arrow(type_text) {
                return Ok(Some(MethodDescriptor {
                    name: name.to_string(),
                    params,
                    return_type: ret,
                }));
            }
        }
        return Ok(None);
    }

    Err("expected a method signature".to_string())
}

fn parse_property(member: &str) -> Result<Option<PropertyDescriptor>, String> {
    let Some((name, optional, rest)) = member_head(member)? else {
        return Ok(None);
    };
    let rest = skip_generics(rest);
    let type_text = if let Some(t) = rest.strip_prefix(':') {
        normalize_ws(t)
    } else if rest.starts_with('(') {
        // Method-style member in a props interface: keep its literal signature.
        normalize_ws(rest)
    } else if rest.is_empty() {
        "any".to_string()
    } else {
        return Err("expected ':' after property name".to_string());
    };
    Ok(Some(PropertyDescriptor {
        name: name.to_string(),
        optional,
        type_text,
    }))
}

fn skip_generics(text: &str) -> &str {
    if text.starts_with('<') {
        if let Some(close) = matching_close(text, 0) {
            return text[close + 1..].trim_start();
        }
    }
    text
}

/// `(params): Ret` as used in method signatures.
fn split_signature(text: &str) -> Result<(Vec<ParamDescriptor>, Option<String>), String> {
    let close = matching_close(text, 0).ok_or("unbalanced parameter list")?;
    let params = parse_params(&text[1..close])?;
    let tail = text[close + 1..].trim();
    let ret = tail
        .strip_prefix(':')
        .map(normalize_ws)
        .filter(|r| !r.is_empty());
    Ok((params, ret))
}

/// `(params) => Ret` as used in function-typed properties.
fn split_arrow(text: &str) -> Result<(Vec<ParamDescriptor>, Option<String>), String> {
    let close = matching_close(text, 0).ok_or("unbalanced parameter list")?;
    let params = parse_params(&text[1..close])?;
    let tail = text[close + 1..].trim();
    let ret = tail
        .strip_prefix("=>")
        .map(normalize_ws)
        .filter(|r| !r.is_empty());
    Ok((params, ret))
}

fn parse_params(text: &str) -> Result<Vec<ParamDescriptor>, String> {
    let mut params = Vec::new();
    for (i, part) in split_top_level(text, &[','], false).iter().enumerate() {
        let part = part.trim_start_matches("...").trim();
        let (name, rest) = match take_identifier(part) {
            Some((name, rest)) => (name.to_string(), rest.trim_start()),
            // Destructured parameter: keep position, invent a name.
            None if part.starts_with('{') || part.starts_with('[') => {
                let close = matching_close(part, 0).ok_or("unbalanced destructuring")?;
                (format!("arg{}", i), part[close + 1..].trim_start())
            }
            None => return Err(format!("unrecognized parameter '{}'", part)),
        };
        let (optional, rest) = match rest.strip_prefix('?') {
            Some(after) => (true, after.trim_start()),
            None => (false, rest),
        };
        let type_text = match rest.strip_prefix(':') {
            Some(t) => normalize_ws(t),
            None => "any".to_string(),
        };
        params.push(ParamDescriptor {
            name,
            optional,
            type_text,
        });
    }
    Ok(params)
}

/// Lists module-marker interfaces as normalized module declarations.
///
/// Used when a manifest omits `nativeModules`; each interface registers
/// under its own name with a binding class of the same name.
pub fn discover_module_declarations(source: &str, marker: &str) -> Vec<ModuleBinding> {
    let cleaned = strip_comments(source);
    raw_interfaces(&cleaned)
        .into_iter()
        .filter(|raw| raw.extends.iter().any(|base| base == marker))
        .map(|raw| ModuleBinding {
            name: raw.name.to_string(),
            class_name: raw.name.to_string(),
        })
        .collect()
}

/// Combines declared and auto-discovered modules.
///
/// Declared modules win: discovered modules are used only when the manifest
/// omits `nativeModules`. Disagreements are reported as warnings.
pub fn reconcile_modules(
    declared: Option<&[ModuleDeclaration]>,
    discovered: &[ModuleBinding],
) -> (Vec<ModuleBinding>, Vec<ValidationWarning>) {
    let Some(declared) = declared else {
        return (discovered.to_vec(), Vec::new());
    };

    let bindings: Vec<ModuleBinding> = declared.iter().map(ModuleDeclaration::normalize).collect();
    let mut warnings = Vec::new();
    for found in discovered {
        match bindings.iter().find(|b| b.name == found.name) {
            Some(b) if b.class_name != found.class_name => {
                warnings.push(ValidationWarning::with_path(
                    WarningCode::ModuleBindingConflict,
                    format!(
                        "module '{}' is declared with class '{}' but the interface source implies '{}'; using the declared class",
                        found.name, b.class_name, found.class_name
                    ),
                    "nativeModules",
                ));
            }
            Some(_) => {}
            None => warnings.push(ValidationWarning::with_path(
                WarningCode::UndeclaredModule,
                format!(
                    "interface '{}' extends the module marker but is not declared in nativeModules",
                    found.name
                ),
                "nativeModules",
            )),
        }
    }
    (bindings, warnings)
}
