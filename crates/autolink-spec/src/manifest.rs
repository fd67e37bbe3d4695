//! Extension manifest types.
//!
//! A manifest (`lynx.ext.json`) sits at the root of every installed extension
//! package and declares which platforms it supports and what it contributes.
//! Declarations come in two shapes (bare name or structured object); they are
//! parsed into tagged enums and normalized right away with [`ModuleDeclaration::normalize`]
//! and [`ElementDeclaration::normalize`].

use serde::{Deserialize, Serialize};

/// Marker filename of an extension manifest.
pub const MANIFEST_FILE: &str = "lynx.ext.json";

/// Filename of the sibling package descriptor.
pub const PACKAGE_DESCRIPTOR_FILE: &str = "package.json";

/// A runtime platform an extension can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    Web,
}

impl Platform {
    /// Every supported platform, in canonical order.
    pub const ALL: [Platform; 3] = [Platform::Android, Platform::Ios, Platform::Web];

    /// Returns the manifest key for this platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Web => "web",
        }
    }

    /// Parses a manifest key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "android" => Some(Platform::Android),
            "ios" => Some(Platform::Ios),
            "web" => Some(Platform::Web),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::from_key(s).ok_or_else(|| {
            format!("unknown platform '{}' (expected android, ios, or web)", s)
        })
    }
}

/// Android source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AndroidLanguage {
    Java,
    Kotlin,
}

/// Android platform configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidConfig {
    /// Reverse-domain package name (required).
    pub package_name: String,
    /// Source directory relative to the package root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<String>,
    /// Build variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_types: Option<Vec<String>>,
    /// Source language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<AndroidLanguage>,
}

/// iOS platform configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IosConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub podspec_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frameworks: Option<Vec<String>>,
}

/// Web platform configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebConfig {
    /// Entry file relative to the package root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
}

/// Per-platform sub-configurations. Presence of a sub-object means the
/// extension supports that platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Platforms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ios: Option<IosConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebConfig>,
}

impl Platforms {
    /// Platforms with a sub-config, in canonical order.
    pub fn configured(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.has(*p))
            .collect()
    }

    /// Returns true if the platform has a sub-config.
    pub fn has(&self, platform: Platform) -> bool {
        match platform {
            Platform::Android => self.android.is_some(),
            Platform::Ios => self.ios.is_some(),
            Platform::Web => self.web.is_some(),
        }
    }
}

/// A native module or service declaration as written in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleDeclaration {
    /// Bare registration name; the binding class shares the name.
    Name(String),
    /// Registration name with an explicit binding class.
    Binding {
        name: String,
        #[serde(rename = "className")]
        class_name: String,
    },
}

impl ModuleDeclaration {
    /// Creates a declaration with an explicit binding class.
    pub fn binding(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        ModuleDeclaration::Binding {
            name: name.into(),
            class_name: class_name.into(),
        }
    }

    /// Registration name.
    pub fn name(&self) -> &str {
        match self {
            ModuleDeclaration::Name(name) => name,
            ModuleDeclaration::Binding { name, .. } => name,
        }
    }

    /// Reduces either shape to `{name, class_name}`.
    pub fn normalize(&self) -> ModuleBinding {
        match self {
            ModuleDeclaration::Name(name) => ModuleBinding {
                name: name.clone(),
                class_name: name.clone(),
            },
            ModuleDeclaration::Binding { name, class_name } => ModuleBinding {
                name: name.clone(),
                class_name: class_name.clone(),
            },
        }
    }
}

/// Normalized module or service declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleBinding {
    pub name: String,
    pub class_name: String,
}

/// An element declaration as written in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementDeclaration {
    /// Bare element name; tag name is derived from it.
    Name(String),
    /// Element name with an optional explicit tag name.
    Binding {
        name: String,
        #[serde(rename = "tagName", default, skip_serializing_if = "Option::is_none")]
        tag_name: Option<String>,
    },
}

impl ElementDeclaration {
    /// Element name.
    pub fn name(&self) -> &str {
        match self {
            ElementDeclaration::Name(name) => name,
            ElementDeclaration::Binding { name, .. } => name,
        }
    }

    /// Reduces either shape to `{name, tag_name}`.
    pub fn normalize(&self) -> ElementBinding {
        match self {
            ElementDeclaration::Name(name) => ElementBinding {
                name: name.clone(),
                tag_name: derive_tag_name(name),
            },
            ElementDeclaration::Binding { name, tag_name } => ElementBinding {
                name: name.clone(),
                tag_name: tag_name.clone().unwrap_or_else(|| derive_tag_name(name)),
            },
        }
    }
}

/// Normalized element declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementBinding {
    pub name: String,
    pub tag_name: String,
}

/// Derives an element tag from an interface or element name.
///
/// Strips a trailing `Props` and converts PascalCase to kebab-case:
/// `FancyButtonProps` becomes `fancy-button`, `XMLView` becomes `xml-view`.
pub fn derive_tag_name(name: &str) -> String {
    let base = name.strip_suffix("Props").filter(|b| !b.is_empty()).unwrap_or(name);
    let chars: Vec<char> = base.chars().collect();
    let mut out = String::with_capacity(base.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            continue;
        }
        if c.is_ascii_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_ascii_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_ascii_uppercase();
            if !out.is_empty() && !out.ends_with('-') && (prev_lower || (prev_upper && next_lower)) {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Extension manifest as parsed from `lynx.ext.json`.
///
/// Array fields are `Option` so that "omitted" stays distinguishable from
/// "declared empty"; module auto-discovery only applies to the former.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionManifest {
    /// Package name, scoped (`@scope/name`) or single segment.
    #[serde(default)]
    pub name: String,
    /// Strict semver version.
    #[serde(default)]
    pub version: String,
    /// Minimum host version range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lynx_version: Option<String>,
    #[serde(default)]
    pub platforms: Platforms,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_modules: Option<Vec<ModuleDeclaration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<ElementDeclaration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ModuleDeclaration>>,
    /// Base manifest this one inherits from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
}

impl ExtensionManifest {
    /// Parses a manifest from JSON without schema validation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the manifest to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Declared dependency names.
    pub fn dependency_names(&self) -> &[String] {
        self.dependencies.as_deref().unwrap_or(&[])
    }

    /// Native modules in normalized form.
    pub fn module_bindings(&self) -> Vec<ModuleBinding> {
        self.native_modules
            .iter()
            .flatten()
            .map(ModuleDeclaration::normalize)
            .collect()
    }

    /// Elements in normalized form.
    pub fn element_bindings(&self) -> Vec<ElementBinding> {
        self.elements
            .iter()
            .flatten()
            .map(ElementDeclaration::normalize)
            .collect()
    }

    /// Services in normalized form.
    pub fn service_bindings(&self) -> Vec<ModuleBinding> {
        self.services
            .iter()
            .flatten()
            .map(ModuleDeclaration::normalize)
            .collect()
    }

    /// Total number of declared modules, elements and services.
    pub fn export_count(&self) -> usize {
        self.native_modules.as_ref().map_or(0, Vec::len)
            + self.elements.as_ref().map_or(0, Vec::len)
            + self.services.as_ref().map_or(0, Vec::len)
    }
}

/// The sibling `package.json`, reduced to the fields autolink reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    pub name: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_declarations_parse_both_shapes() {
        let json = r#"{
            "name": "@a/b",
            "version": "1.0.0",
            "platforms": { "android": { "packageName": "com.a.b" } },
            "nativeModules": ["Plain", { "name": "X", "className": "XImpl" }],
            "elements": ["FancyButton", { "name": "Slider", "tagName": "x-slider" }]
        }"#;
        let manifest = ExtensionManifest::from_json(json).unwrap();

        assert_eq!(
            manifest.module_bindings(),
            vec![
                ModuleBinding {
                    name: "Plain".into(),
                    class_name: "Plain".into()
                },
                ModuleBinding {
                    name: "X".into(),
                    class_name: "XImpl".into()
                },
            ]
        );
        assert_eq!(
            manifest.element_bindings(),
            vec![
                ElementBinding {
                    name: "FancyButton".into(),
                    tag_name: "fancy-button".into()
                },
                ElementBinding {
                    name: "Slider".into(),
                    tag_name: "x-slider".into()
                },
            ]
        );
        assert_eq!(manifest.platforms.configured(), vec![Platform::Android]);
    }

    #[test]
    fn test_derive_tag_name() {
        assert_eq!(derive_tag_name("FancyButtonProps"), "fancy-button");
        assert_eq!(derive_tag_name("XMLView"), "xml-view");
        assert_eq!(derive_tag_name("input"), "input");
        assert_eq!(derive_tag_name("Props"), "props");
        assert_eq!(derive_tag_name("Map3DView"), "map3-d-view");
    }

    #[test]
    fn test_omitted_arrays_stay_none() {
        let manifest = ExtensionManifest::from_json(r#"{"name":"a","version":"1.0.0"}"#).unwrap();
        assert!(manifest.native_modules.is_none());
        assert!(manifest.dependency_names().is_empty());
        assert_eq!(manifest.export_count(), 0);
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("ios".parse::<Platform>(), Ok(Platform::Ios));
        assert!("windows".parse::<Platform>().is_err());
    }
}
