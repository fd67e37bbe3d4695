//! Aggregated registries: one unit per platform that registers every
//! discovered extension from a single setup entry point.
//!
//! Each registration is wrapped in the target's exception handling so one
//! failing binding is logged and the rest still register. Imports are
//! deduplicated and sorted; output is a pure function of the input records.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use autolink_spec::{ExtensionRecord, Platform};
use serde::Serialize;

use crate::error::CodegenResult;
use crate::generate::write_file;
use crate::targets::simple_class_name;

/// Android registry path, relative to the output root.
pub const ANDROID_REGISTRY_PATH: &str =
    "android/src/main/java/com/lynx/autolink/generated/LynxExtensionRegistry.kt";
/// iOS registry path, relative to the output root.
pub const IOS_REGISTRY_PATH: &str = "ios/LynxExtensionRegistry.m";
/// Web registry path, relative to the output root.
pub const WEB_REGISTRY_PATH: &str = "web/extension-registry.ts";

const HEADER: &str = "// Generated by autolink. Do not edit.\n";

/// Fixed registry path of `platform`.
pub fn registry_path(platform: Platform) -> &'static str {
    match platform {
        Platform::Android => ANDROID_REGISTRY_PATH,
        Platform::Ios => IOS_REGISTRY_PATH,
        Platform::Web => WEB_REGISTRY_PATH,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationKind {
    Module,
    Element,
    Service,
}

impl RegistrationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationKind::Module => "module",
            RegistrationKind::Element => "element",
            RegistrationKind::Service => "service",
        }
    }
}

/// One registration statement in a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub kind: RegistrationKind,
    /// Module or service name, or element tag.
    pub name: String,
    pub class_name: String,
    /// Identifier the registry uses for the class; differs from the simple
    /// class name when two extensions export the same one.
    pub local_name: String,
    pub extension: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryWarningKind {
    /// Extension has no sub-config for the platform.
    PlatformNotSupported,
    /// A registration name was already taken; the later entry was dropped.
    DuplicateRegistration,
    /// Two extensions export a class the target cannot tell apart: the same
    /// Objective-C name, or the same fully qualified JVM class.
    ClassCollision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryWarning {
    pub kind: RegistryWarningKind,
    pub extension: String,
    pub message: String,
}

impl RegistryWarning {
    /// Structural problems must fail a link run even though generation
    /// continued.
    pub fn is_structural(&self) -> bool {
        self.kind == RegistryWarningKind::DuplicateRegistration
    }
}

impl std::fmt::Display for RegistryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.extension)
    }
}

/// A generated registry, not yet written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryGenerationResult {
    pub platform: Platform,
    pub content: String,
    /// Fixed path relative to the output root.
    pub output_path: PathBuf,
    pub warnings: Vec<RegistryWarning>,
    pub registered: Vec<Registration>,
    /// Extension imports, sorted, excluding runtime imports.
    pub imports: Vec<String>,
    pub skipped_extensions: Vec<String>,
}

impl RegistryGenerationResult {
    pub fn has_structural_errors(&self) -> bool {
        self.warnings.iter().any(RegistryWarning::is_structural)
    }
}

/// Generates the registry of `platform` from the whole record collection,
/// in record order.
pub fn generate_registry(records: &[ExtensionRecord], platform: Platform) -> RegistryGenerationResult {
    let mut builder = RegistryBuilder::new(platform);
    for record in records {
        builder.add(record);
    }
    let result = builder.finish();
    tracing::info!(
        platform = %platform,
        registered = result.registered.len(),
        skipped = result.skipped_extensions.len(),
        "generated registry"
    );
    result
}

/// Generates one registry per requested platform.
pub fn generate_registries(records: &[ExtensionRecord], platforms: &[Platform]) -> Vec<RegistryGenerationResult> {
    platforms
        .iter()
        .map(|&platform| generate_registry(records, platform))
        .collect()
}

/// Writes a registry under `output_root`, returning the written path.
pub fn write_registry(result: &RegistryGenerationResult, output_root: &Path) -> CodegenResult<PathBuf> {
    let path = output_root.join(&result.output_path);
    write_file(&path, &result.content)?;
    tracing::debug!(path = %path.display(), "wrote registry");
    Ok(path)
}

/// One extension's registrations, grouped for rendering.
struct Group {
    extension: String,
    version: String,
    entries: Vec<Registration>,
}

struct RegistryBuilder {
    platform: Platform,
    groups: Vec<Group>,
    taken: HashMap<(RegistrationKind, String), String>,
    /// Fully qualified JVM class to the first extension that exported it.
    class_owners: HashMap<String, String>,
    locals: LocalNames,
    imports: BTreeSet<String>,
    warnings: Vec<RegistryWarning>,
    skipped: Vec<String>,
}

impl RegistryBuilder {
    fn new(platform: Platform) -> Self {
        Self {
            platform,
            groups: Vec::new(),
            taken: HashMap::new(),
            class_owners: HashMap::new(),
            locals: LocalNames::default(),
            imports: BTreeSet::new(),
            warnings: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn add(&mut self, record: &ExtensionRecord) {
        if !record.supports(self.platform) {
            tracing::debug!(extension = %record.name, platform = %self.platform, "skipping extension");
            self.warnings.push(RegistryWarning {
                kind: RegistryWarningKind::PlatformNotSupported,
                extension: record.name.clone(),
                message: format!("extension has no '{}' configuration; skipped", self.platform),
            });
            self.skipped.push(record.name.clone());
            return;
        }

        let candidates = record
            .modules_for(self.platform)
            .map(|m| (RegistrationKind::Module, m.name.as_str(), m.class_name.as_str(), m.name.as_str()))
            .chain(
                record
                    .elements_for(self.platform)
                    .map(|e| (RegistrationKind::Element, e.tag_name.as_str(), e.class_name.as_str(), e.name.as_str())),
            )
            .chain(
                record
                    .services_for(self.platform)
                    .map(|s| (RegistrationKind::Service, s.name.as_str(), s.class_name.as_str(), s.name.as_str())),
            );

        let mut entries = Vec::new();
        for (kind, name, class_name, contract_name) in candidates {
            let key = (kind, name.to_string());
            if let Some(owner) = self.taken.get(&key) {
                tracing::warn!(kind = kind.as_str(), name, first = %owner, dropped = %record.name, "duplicate registration");
                self.warnings.push(RegistryWarning {
                    kind: RegistryWarningKind::DuplicateRegistration,
                    extension: record.name.clone(),
                    message: format!(
                        "{} '{}' is already registered by '{}'; this registration was dropped",
                        kind.as_str(),
                        name,
                        owner
                    ),
                });
                continue;
            }
            self.taken.insert(key, record.name.clone());

            let local_name = self.import(record, class_name, contract_name);
            entries.push(Registration {
                kind,
                name: name.to_string(),
                class_name: class_name.to_string(),
                local_name,
                extension: record.name.clone(),
            });
        }

        if !entries.is_empty() {
            self.groups.push(Group {
                extension: record.name.clone(),
                version: record.version.clone(),
                entries,
            });
        }
    }

    /// Records the import for `class_name` and returns the identifier to use.
    fn import(&mut self, record: &ExtensionRecord, class_name: &str, contract_name: &str) -> String {
        let simple = simple_class_name(class_name);
        match self.platform {
            Platform::Android => {
                let qualified = if class_name.contains('.') {
                    class_name.to_string()
                } else {
                    let package = record
                        .manifest
                        .platforms
                        .android
                        .as_ref()
                        .map(|a| a.package_name.as_str())
                        .unwrap_or_default();
                    format!("{}.{}", package, class_name)
                };
                match self.class_owners.get(&qualified) {
                    Some(first) if *first != record.name => {
                        tracing::warn!(class = %qualified, first = %first, extension = %record.name, "class collision");
                        self.warnings.push(RegistryWarning {
                            kind: RegistryWarningKind::ClassCollision,
                            extension: record.name.clone(),
                            message: format!(
                                "class '{}' is also exported by '{}'; both registrations resolve to one class",
                                qualified, first
                            ),
                        });
                    }
                    Some(_) => {}
                    None => {
                        self.class_owners.insert(qualified.clone(), record.name.clone());
                    }
                }
                let local = self.locals.assign(simple, &qualified, &record.name);
                if local == simple {
                    self.imports.insert(format!("import {}", qualified));
                } else {
                    self.imports.insert(format!("import {} as {}", qualified, local));
                }
                local
            }
            Platform::Ios => {
                let owner = format!("{}:{}", record.name, simple);
                if self.locals.owner_of(simple).is_some_and(|o| o != owner) {
                    self.warnings.push(RegistryWarning {
                        kind: RegistryWarningKind::ClassCollision,
                        extension: record.name.clone(),
                        message: format!(
                            "class '{}' is also exported by another extension; Objective-C class names are global",
                            simple
                        ),
                    });
                } else {
                    self.locals.claim(simple, &owner);
                }
                self.imports
                    .insert(format!("#import <{}/{}Spec.h>", pod_name(record), contract_name));
                simple.to_string()
            }
            Platform::Web => {
                let owner = format!("{}:{}", record.name, simple);
                let local = self.locals.assign(simple, &owner, &record.name);
                if local == simple {
                    self.imports
                        .insert(format!("import {{ {} }} from '{}';", simple, record.name));
                } else {
                    self.imports.insert(format!(
                        "import {{ {} as {} }} from '{}';",
                        simple, local, record.name
                    ));
                }
                local
            }
        }
    }

    fn finish(self) -> RegistryGenerationResult {
        let content = match self.platform {
            Platform::Android => render_kotlin(&self.groups, &self.imports),
            Platform::Ios => render_objc(&self.groups, &self.imports),
            Platform::Web => render_typescript(&self.groups, &self.imports),
        };
        RegistryGenerationResult {
            platform: self.platform,
            content,
            output_path: PathBuf::from(registry_path(self.platform)),
            warnings: self.warnings,
            registered: self.groups.into_iter().flat_map(|g| g.entries).collect(),
            imports: self.imports.into_iter().collect(),
            skipped_extensions: self.skipped,
        }
    }
}

/// Identifier allocation across extensions.
#[derive(Default)]
struct LocalNames {
    owners: HashMap<String, String>,
}

impl LocalNames {
    fn owner_of(&self, local: &str) -> Option<&str> {
        self.owners.get(local).map(String::as_str)
    }

    fn claim(&mut self, local: &str, owner: &str) {
        self.owners.insert(local.to_string(), owner.to_string());
    }

    /// Returns `simple` when free or already owned by `owner`, otherwise an
    /// alias prefixed with the extension's name.
    fn assign(&mut self, simple: &str, owner: &str, extension: &str) -> String {
        match self.owner_of(simple) {
            None => {
                self.claim(simple, owner);
                return simple.to_string();
            }
            Some(existing) if existing == owner => return simple.to_string(),
            Some(_) => {}
        }
        let base = format!("{}{}", pascal_case(package_basename(extension)), simple);
        let mut candidate = base.clone();
        let mut n = 2;
        loop {
            match self.owner_of(&candidate) {
                None => {
                    self.claim(&candidate, owner);
                    return candidate;
                }
                Some(existing) if existing == owner => return candidate,
                Some(_) => {
                    candidate = format!("{}{}", base, n);
                    n += 1;
                }
            }
        }
    }
}

fn package_basename(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// `local-storage` -> `LocalStorage`.
fn pascal_case(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(crate::targets::upper_first)
        .collect()
}

/// CocoaPods module name: the podspec file stem.
fn pod_name(record: &ExtensionRecord) -> String {
    record
        .manifest
        .platforms
        .ios
        .as_ref()
        .and_then(|ios| ios.podspec_path.as_deref())
        .and_then(|p| Path::new(p).file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| pascal_case(package_basename(&record.name)))
}

// ============================================================================
// Rendering
// ============================================================================

fn render_kotlin(groups: &[Group], extension_imports: &BTreeSet<String>) -> String {
    let entries = || groups.iter().flat_map(|g| &g.entries);
    let mut imports: BTreeSet<String> = extension_imports.clone();
    imports.insert("import android.content.Context".to_string());
    imports.insert("import android.util.Log".to_string());
    if entries().any(|e| e.kind != RegistrationKind::Service) {
        imports.insert("import com.lynx.tasm.LynxEnv".to_string());
    }
    if entries().any(|e| e.kind == RegistrationKind::Element) {
        imports.insert("import com.lynx.tasm.behavior.Behavior".to_string());
        imports.insert("import com.lynx.tasm.behavior.LynxContext".to_string());
    }
    if entries().any(|e| e.kind == RegistrationKind::Service) {
        imports.insert("import com.lynx.tasm.service.LynxServiceCenter".to_string());
    }

    let mut code = String::from(HEADER);
    code.push_str("package com.lynx.autolink.generated\n\n");
    for import in &imports {
        code.push_str(import);
        code.push('\n');
    }
    code.push_str("\nobject LynxExtensionRegistry {\n");
    code.push_str("    private const val TAG = \"LynxExtensionRegistry\"\n\n");
    code.push_str("    @JvmStatic\n");
    code.push_str("    fun setup(context: Context) {\n");
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            code.push('\n');
        }
        code.push_str(&format!("        // {} {}\n", group.extension, group.version));
        for entry in &group.entries {
            code.push_str("        try {\n");
            match entry.kind {
                RegistrationKind::Module => code.push_str(&format!(
                    "            LynxEnv.inst().registerModule(\"{}\", {}::class.java)\n",
                    entry.name, entry.local_name
                )),
                RegistrationKind::Element => {
                    code.push_str(&format!(
                        "            LynxEnv.inst().addBehavior(object : Behavior(\"{}\") {{\n",
                        entry.name
                    ));
                    code.push_str(&format!(
                        "                override fun createUI(context: LynxContext) = {}(context)\n",
                        entry.local_name
                    ));
                    code.push_str("            })\n");
                }
                RegistrationKind::Service => code.push_str(&format!(
                    "            LynxServiceCenter.inst().registerService({}(context))\n",
                    entry.local_name
                )),
            }
            code.push_str("        } catch (e: Throwable) {\n");
            code.push_str(&format!(
                "            Log.e(TAG, \"Failed to register {} '{}' from {}\", e)\n",
                entry.kind.as_str(),
                entry.name,
                entry.extension
            ));
            code.push_str("        }\n");
        }
    }
    code.push_str("    }\n");
    code.push_str("}\n");
    code
}

fn render_objc(groups: &[Group], extension_imports: &BTreeSet<String>) -> String {
    let mut imports: BTreeSet<String> = extension_imports.clone();
    imports.insert("#import <Foundation/Foundation.h>".to_string());
    imports.insert("#import <Lynx/LynxConfig.h>".to_string());

    let mut code = String::from(HEADER);
    for import in &imports {
        code.push_str(import);
        code.push('\n');
    }
    code.push_str("\n@interface LynxExtensionRegistry : NSObject\n");
    code.push_str("+ (void)setupWithConfig:(LynxConfig *)config;\n");
    code.push_str("@end\n\n");
    code.push_str("@implementation LynxExtensionRegistry\n\n");
    code.push_str("+ (void)setupWithConfig:(LynxConfig *)config {\n");
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            code.push('\n');
        }
        code.push_str(&format!("  // {} {}\n", group.extension, group.version));
        for entry in &group.entries {
            code.push_str("  @try {\n");
            let statement = match entry.kind {
                RegistrationKind::Module => format!("[config registerModule:{}.class];", entry.local_name),
                RegistrationKind::Element => format!(
                    "[config registerUI:{}.class withName:@\"{}\"];",
                    entry.local_name, entry.name
                ),
                RegistrationKind::Service => format!(
                    "[config registerService:{}.class withName:@\"{}\"];",
                    entry.local_name, entry.name
                ),
            };
            code.push_str(&format!("    {}\n", statement));
            code.push_str("  } @catch (NSException *e) {\n");
            code.push_str(&format!(
                "    NSLog(@\"[LynxExtensionRegistry] Failed to register {} '{}' from {}: %@\", e);\n",
                entry.kind.as_str(),
                entry.name,
                entry.extension
            ));
            code.push_str("  }\n");
        }
    }
    code.push_str("}\n\n");
    code.push_str("@end\n");
    code
}

fn render_typescript(groups: &[Group], extension_imports: &BTreeSet<String>) -> String {
    let mut code = String::from(HEADER);
    code.push_str("import type { LynxConfig } from '@lynx-js/types';\n");
    for import in extension_imports {
        code.push_str(import);
        code.push('\n');
    }
    code.push_str("\nexport function setupExtensions(config: LynxConfig): void {\n");
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            code.push('\n');
        }
        code.push_str(&format!("  // {} {}\n", group.extension, group.version));
        for entry in &group.entries {
            let call = match entry.kind {
                RegistrationKind::Module => "registerModule",
                RegistrationKind::Element => "registerElement",
                RegistrationKind::Service => "registerService",
            };
            code.push_str("  try {\n");
            code.push_str(&format!(
                "    config.{}('{}', {});\n",
                call, entry.name, entry.local_name
            ));
            code.push_str("  } catch (e) {\n");
            code.push_str(&format!(
                "    console.error('[autolink] Failed to register {} {} from {}', e);\n",
                entry.kind.as_str(),
                entry.name,
                entry.extension
            ));
            code.push_str("  }\n");
        }
    }
    code.push_str("}\n");
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use autolink_spec::{apply_platform_defaults, ExtensionManifest};
    use pretty_assertions::assert_eq;

    fn record(json: &str) -> ExtensionRecord {
        let mut manifest = ExtensionManifest::from_json(json).unwrap();
        apply_platform_defaults(&mut manifest);
        let modules = manifest.module_bindings();
        let path = PathBuf::from("/nm").join(&manifest.name);
        ExtensionRecord::build(
            manifest,
            path.join("lynx.ext.json"),
            path,
            "1.0.0".into(),
            modules,
        )
    }

    fn storage() -> ExtensionRecord {
        record(
            r#"{ "name": "@acme/storage", "version": "1.0.0",
                 "platforms": { "android": { "packageName": "com.acme.storage" }, "ios": {}, "web": {} },
                 "nativeModules": [{ "name": "LocalStorage", "className": "StorageModule" }],
                 "elements": ["FancyButton"],
                 "services": ["Analytics"] }"#,
        )
    }

    #[test]
    fn test_android_registry() {
        let result = generate_registry(&[storage()], Platform::Android);
        assert_eq!(result.output_path, PathBuf::from(ANDROID_REGISTRY_PATH));
        assert_eq!(result.registered.len(), 3);
        let content = &result.content;
        assert_eq!(content.matches("fun setup(context: Context)").count(), 1);
        assert!(content.contains("import com.acme.storage.StorageModule\n"));
        assert!(content.contains(
            "LynxEnv.inst().registerModule(\"LocalStorage\", StorageModule::class.java)"
        ));
        assert!(content.contains("object : Behavior(\"fancy-button\")"));
        assert!(content.contains("LynxServiceCenter.inst().registerService(Analytics(context))"));
        assert_eq!(content.matches("} catch (e: Throwable) {").count(), 3);
    }

    #[test]
    fn test_ios_registry() {
        let result = generate_registry(&[storage()], Platform::Ios);
        let content = &result.content;
        assert!(content.contains("#import <storage/LocalStorageSpec.h>"));
        assert!(content.contains("#import <storage/FancyButtonSpec.h>"));
        assert!(content.contains("[config registerModule:StorageModule.class];"));
        assert!(content.contains("[config registerUI:FancyButton.class withName:@\"fancy-button\"];"));
        assert_eq!(content.matches("+ (void)setupWithConfig:(LynxConfig *)config {").count(), 1);
        assert_eq!(content.matches("@catch (NSException *e)").count(), 3);
    }

    #[test]
    fn test_web_registry_and_skips() {
        let android_only = record(
            r#"{ "name": "native-only", "version": "1.0.0",
                 "platforms": { "android": { "packageName": "com.n" } }, "nativeModules": ["N"] }"#,
        );
        let result = generate_registry(&[storage(), android_only], Platform::Web);
        assert_eq!(result.skipped_extensions, vec!["native-only".to_string()]);
        assert_eq!(result.warnings.len(), 1);
        assert!(!result.has_structural_errors());
        assert!(result
            .content
            .contains("import { StorageModule } from '@acme/storage';"));
        assert!(result
            .content
            .contains("    config.registerElement('fancy-button', FancyButton);"));
        assert_eq!(
            result.content.matches("export function setupExtensions(config: LynxConfig): void {").count(),
            1
        );
    }

    #[test]
    fn test_duplicate_registration_dropped() {
        let first = record(
            r#"{ "name": "first", "version": "1.0.0", "platforms": { "web": {} }, "nativeModules": ["Shared"] }"#,
        );
        let second = record(
            r#"{ "name": "second", "version": "1.0.0", "platforms": { "web": {} }, "nativeModules": ["Shared"] }"#,
        );
        let result = generate_registry(&[first, second], Platform::Web);
        assert_eq!(result.registered.len(), 1);
        assert_eq!(result.registered[0].extension, "first");
        assert!(result.has_structural_errors());
        assert_eq!(result.warnings[0].kind, RegistryWarningKind::DuplicateRegistration);
    }

    #[test]
    fn test_same_class_from_two_packages_is_aliased() {
        let a = record(
            r#"{ "name": "@x/maps", "version": "1.0.0", "platforms": { "web": {} },
                 "nativeModules": [{ "name": "MapA", "className": "Impl" }] }"#,
        );
        let b = record(
            r#"{ "name": "@y/charts", "version": "1.0.0", "platforms": { "web": {} },
                 "nativeModules": [{ "name": "ChartB", "className": "Impl" }] }"#,
        );
        let result = generate_registry(&[a, b], Platform::Web);
        assert_eq!(
            result.imports,
            vec![
                "import { Impl as ChartsImpl } from '@y/charts';".to_string(),
                "import { Impl } from '@x/maps';".to_string(),
            ]
        );
        assert!(result.content.contains("config.registerModule('ChartB', ChartsImpl);"));
    }

    #[test]
    fn test_shared_android_class_warns() {
        let a = record(
            r#"{ "name": "@x/maps", "version": "1.0.0",
                 "platforms": { "android": { "packageName": "com.shared" } },
                 "nativeModules": [{ "name": "MapA", "className": "Impl" }] }"#,
        );
        let b = record(
            r#"{ "name": "@y/charts", "version": "1.0.0",
                 "platforms": { "android": { "packageName": "com.shared" } },
                 "nativeModules": [{ "name": "ChartB", "className": "Impl" }] }"#,
        );
        let result = generate_registry(&[a, b], Platform::Android);

        assert_eq!(result.registered.len(), 2);
        assert_eq!(result.imports, vec!["import com.shared.Impl".to_string()]);
        let collisions: Vec<_> = result
            .warnings
            .iter()
            .filter(|w| w.kind == RegistryWarningKind::ClassCollision)
            .collect();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].extension, "@y/charts");
        assert!(collisions[0].message.contains("com.shared.Impl"));
        assert!(!result.has_structural_errors());
    }

    #[test]
    fn test_same_extension_reusing_a_class_does_not_warn() {
        let result = generate_registry(
            &[record(
                r#"{ "name": "@x/maps", "version": "1.0.0",
                     "platforms": { "android": { "packageName": "com.maps" } },
                     "nativeModules": [
                         { "name": "MapA", "className": "Impl" },
                         { "name": "MapB", "className": "Impl" }
                     ] }"#,
            )],
            Platform::Android,
        );
        assert_eq!(result.registered.len(), 2);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_output_is_deterministic() {
        let records = vec![storage()];
        assert_eq!(
            generate_registry(&records, Platform::Android).content,
            generate_registry(&records, Platform::Android).content
        );
    }
}
