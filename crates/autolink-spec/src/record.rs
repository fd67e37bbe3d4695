//! Discovery output types.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ErrorCode;
use crate::manifest::{ExtensionManifest, ModuleBinding, Platform};

/// A module or service bound on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    /// Registration name.
    pub name: String,
    /// Binding class.
    pub class_name: String,
    pub platform: Platform,
    /// Platform source directory or entry file inside the package.
    pub source_path: PathBuf,
}

/// Services share the module shape.
pub type ServiceInfo = ModuleInfo;

/// An element bound on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementInfo {
    pub name: String,
    pub class_name: String,
    pub tag_name: String,
    pub platform: Platform,
    pub source_path: PathBuf,
}

/// One discovered extension. Built once per discovery run and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionRecord {
    /// Declared manifest name; the key for duplicate resolution.
    pub name: String,
    /// Version from the package descriptor.
    pub version: String,
    pub package_path: PathBuf,
    pub manifest_path: PathBuf,
    pub manifest: ExtensionManifest,
    /// Platforms with a sub-config, in canonical order.
    pub platforms: Vec<Platform>,
    pub modules: Vec<ModuleInfo>,
    pub elements: Vec<ElementInfo>,
    pub services: Vec<ServiceInfo>,
}

impl ExtensionRecord {
    /// Builds a record, expanding every declaration once per supported platform.
    ///
    /// `modules` overrides the manifest's module list; discovery passes the
    /// reconciled list when interface scanning contributed modules.
    pub fn build(
        manifest: ExtensionManifest,
        manifest_path: PathBuf,
        package_path: PathBuf,
        version: String,
        modules: Vec<ModuleBinding>,
    ) -> Self {
        let platforms = manifest.platforms.configured();
        let mut module_infos = Vec::new();
        let mut element_infos = Vec::new();
        let mut service_infos = Vec::new();

        for binding in &modules {
            for &platform in &platforms {
                module_infos.push(ModuleInfo {
                    name: binding.name.clone(),
                    class_name: binding.class_name.clone(),
                    platform,
                    source_path: platform_source(&manifest, &package_path, platform),
                });
            }
        }
        for binding in manifest.element_bindings() {
            for &platform in &platforms {
                element_infos.push(ElementInfo {
                    name: binding.name.clone(),
                    class_name: binding.name.clone(),
                    tag_name: binding.tag_name.clone(),
                    platform,
                    source_path: platform_source(&manifest, &package_path, platform),
                });
            }
        }
        for binding in manifest.service_bindings() {
            for &platform in &platforms {
                service_infos.push(ServiceInfo {
                    name: binding.name.clone(),
                    class_name: binding.class_name.clone(),
                    platform,
                    source_path: platform_source(&manifest, &package_path, platform),
                });
            }
        }

        Self {
            name: manifest.name.clone(),
            version,
            package_path,
            manifest_path,
            manifest,
            platforms,
            modules: module_infos,
            elements: element_infos,
            services: service_infos,
        }
    }

    /// Returns true if the extension has a sub-config for `platform`.
    pub fn supports(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }

    /// Modules bound on `platform`.
    pub fn modules_for(&self, platform: Platform) -> impl Iterator<Item = &ModuleInfo> {
        self.modules.iter().filter(move |m| m.platform == platform)
    }

    /// Elements bound on `platform`.
    pub fn elements_for(&self, platform: Platform) -> impl Iterator<Item = &ElementInfo> {
        self.elements.iter().filter(move |e| e.platform == platform)
    }

    /// Services bound on `platform`.
    pub fn services_for(&self, platform: Platform) -> impl Iterator<Item = &ServiceInfo> {
        self.services.iter().filter(move |s| s.platform == platform)
    }

    /// Declared dependency names.
    pub fn dependencies(&self) -> &[String] {
        self.manifest.dependency_names()
    }
}

/// Resolved source location of `platform` inside a package.
pub fn platform_source(manifest: &ExtensionManifest, package_path: &Path, platform: Platform) -> PathBuf {
    let relative = match platform {
        Platform::Android => manifest
            .platforms
            .android
            .as_ref()
            .and_then(|a| a.source_dir.clone()),
        Platform::Ios => manifest
            .platforms
            .ios
            .as_ref()
            .and_then(|i| i.source_dir.clone()),
        Platform::Web => manifest.platforms.web.as_ref().and_then(|w| w.entry.clone()),
    };
    match relative {
        Some(rel) => package_path.join(rel),
        None => package_path.to_path_buf(),
    }
}

/// A per-package discovery failure. Always data, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryError {
    pub package_path: PathBuf,
    #[serde(serialize_with = "serialize_code")]
    pub code: ErrorCode,
    pub reason: String,
    pub detail: Option<String>,
}

impl DiscoveryError {
    pub fn new(package_path: impl Into<PathBuf>, code: ErrorCode, reason: impl Into<String>) -> Self {
        Self {
            package_path: package_path.into(),
            code,
            reason: reason.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl std::fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.code,
            self.reason,
            self.package_path.display()
        )?;
        if let Some(ref detail) = self.detail {
            write!(f, "\n  {}", detail.replace('\n', "\n  "))?;
        }
        Ok(())
    }
}

fn serialize_code<S: serde::Serializer>(code: &ErrorCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(code.code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::apply_platform_defaults;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_expands_per_platform() {
        let mut manifest = ExtensionManifest::from_json(
            r#"{
                "name": "@a/b",
                "version": "1.0.0",
                "platforms": { "android": { "packageName": "com.a.b" }, "web": {} },
                "nativeModules": [{ "name": "X", "className": "XImpl" }],
                "elements": ["FancyButton"],
                "services": ["Analytics"]
            }"#,
        )
        .unwrap();
        apply_platform_defaults(&mut manifest);
        let modules = manifest.module_bindings();
        let record = ExtensionRecord::build(
            manifest,
            PathBuf::from("/p/lynx.ext.json"),
            PathBuf::from("/p"),
            "1.0.0".into(),
            modules,
        );

        assert_eq!(record.platforms, vec![Platform::Android, Platform::Web]);
        assert_eq!(record.modules.len(), 2);
        assert_eq!(
            record.modules[0],
            ModuleInfo {
                name: "X".into(),
                class_name: "XImpl".into(),
                platform: Platform::Android,
                source_path: PathBuf::from("/p/android/src/main/java"),
            }
        );
        assert_eq!(
            record.modules_for(Platform::Web).next().unwrap().source_path,
            PathBuf::from("/p/web/src/index.ts")
        );
        assert_eq!(record.elements_for(Platform::Web).next().unwrap().tag_name, "fancy-button");
        assert_eq!(record.services.len(), 2);
        assert!(!record.supports(Platform::Ios));
    }
}
