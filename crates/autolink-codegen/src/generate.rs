//! Per-package generation: plan every contract and stub, then write them.
//!
//! Contracts are rewritten every run. Stubs are created only when absent and
//! are never overwritten. Nothing outside the planned paths is touched.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use autolink_spec::{ExtensionManifest, ParseOptions, ParsedInterfaces, Platform};

use crate::error::{CodegenError, CodegenResult};
use crate::report::{GenerationFailure, GenerationReport};
use crate::targets::{
    element_files, method_files, BindingKind, ElementContract, FileRole, MethodContract,
    PlannedFile, TargetContext,
};

/// Rendered files plus anything that could not be rendered.
#[derive(Debug, Clone, Default)]
pub struct GenerationPlan {
    pub files: Vec<PlannedFile>,
    pub failures: Vec<GenerationFailure>,
}

/// Parse hints derived from a manifest's element declarations.
pub fn parse_options_for(manifest: &ExtensionManifest) -> ParseOptions {
    manifest
        .element_bindings()
        .into_iter()
        .fold(ParseOptions::default(), |options, binding| {
            options
                .element(binding.name.clone())
                .tag(binding.name, binding.tag_name)
        })
}

/// Plans every file for one package.
///
/// Platforms are the requested ones the manifest configures. Modules follow
/// the declared list when the manifest has one; services and elements are
/// generated only when declared, matching what the registry registers.
pub fn plan_package(
    manifest: &ExtensionManifest,
    interfaces: &ParsedInterfaces,
    platforms: &[Platform],
    source_label: &str,
) -> GenerationPlan {
    let ctx = TargetContext {
        manifest,
        source_label,
    };
    let mut plan = GenerationPlan::default();

    let module_bindings = manifest.module_bindings();
    let service_bindings = manifest.service_bindings();
    let element_bindings = manifest.element_bindings();

    let mut methods: Vec<MethodContract<'_>> = Vec::new();
    for descriptor in &interfaces.modules {
        let class_name = match module_bindings.iter().find(|b| b.name == descriptor.name) {
            Some(binding) => binding.class_name.as_str(),
            None if manifest.native_modules.is_none() => descriptor.name.as_str(),
            None => {
                tracing::debug!(module = %descriptor.name, "module not declared; no scaffolding");
                continue;
            }
        };
        methods.push(MethodContract {
            kind: BindingKind::Module,
            class_name,
            descriptor,
        });
    }
    for descriptor in &interfaces.services {
        if let Some(binding) = service_bindings.iter().find(|b| b.name == descriptor.name) {
            methods.push(MethodContract {
                kind: BindingKind::Service,
                class_name: binding.class_name.as_str(),
                descriptor,
            });
        }
    }

    let elements: Vec<ElementContract<'_>> = interfaces
        .elements
        .iter()
        .filter(|descriptor| {
            element_bindings
                .iter()
                .any(|b| b.name == descriptor.element_name || b.name == descriptor.name)
        })
        .map(|descriptor| ElementContract {
            class_name: descriptor.element_name.as_str(),
            descriptor,
        })
        .collect();

    for platform in Platform::ALL {
        if !platforms.contains(&platform) || !manifest.platforms.has(platform) {
            continue;
        }
        for contract in &methods {
            collect(&mut plan, contract.name(), method_files(platform, &ctx, contract));
        }
        for contract in &elements {
            collect(&mut plan, contract.name(), element_files(platform, &ctx, contract));
        }
    }
    plan
}

fn collect(plan: &mut GenerationPlan, subject: &str, rendered: CodegenResult<Vec<PlannedFile>>) {
    match rendered {
        Ok(files) => plan.files.extend(files),
        Err(e) => plan.failures.push(GenerationFailure {
            path: subject.into(),
            reason: e.to_string(),
        }),
    }
}

/// Writes a plan under `package_root`.
pub fn write_plan(package_root: &Path, plan: &GenerationPlan) -> GenerationReport {
    let mut report = GenerationReport {
        failed: plan.failures.clone(),
        ..Default::default()
    };

    for file in &plan.files {
        let path = package_root.join(&file.path);
        let outcome = match file.role {
            FileRole::Contract => write_file(&path, &file.content).map(|()| true),
            FileRole::Stub => write_if_absent(&path, &file.content),
        };
        match (file.role, outcome) {
            (FileRole::Contract, Ok(_)) => report.written.push(path),
            (FileRole::Stub, Ok(true)) => report.created.push(path),
            (FileRole::Stub, Ok(false)) => {
                tracing::debug!(path = %path.display(), "stub exists; left untouched");
                report.skipped.push(path);
            }
            (_, Err(e)) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to write generated file");
                report.failed.push(GenerationFailure {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }
    report
}

/// Plans and writes one package.
pub fn generate_package(
    package_root: &Path,
    manifest: &ExtensionManifest,
    interfaces: &ParsedInterfaces,
    platforms: &[Platform],
    source_label: &str,
) -> GenerationReport {
    let plan = plan_package(manifest, interfaces, platforms, source_label);
    let report = write_plan(package_root, &plan);
    tracing::info!(
        package = %manifest.name,
        written = report.written.len(),
        created = report.created.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "generated package scaffolding"
    );
    report
}

fn ensure_parent(path: &Path) -> CodegenResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| CodegenError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Writes `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) -> CodegenResult<()> {
    ensure_parent(path)?;
    std::fs::write(path, content).map_err(|source| CodegenError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Creates `path` with `content` unless it exists. Returns whether it was
/// created.
pub fn write_if_absent(path: &Path, content: &str) -> CodegenResult<bool> {
    ensure_parent(path)?;
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(source) => {
            return Err(CodegenError::Write {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    file.write_all(content.as_bytes())
        .map_err(|source| CodegenError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autolink_spec::{apply_platform_defaults, parse_interfaces};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const SOURCE: &str = r#"
        export interface LocalStorage extends NativeModule {
          getItem(key: string): Promise<string>;
          setItem(key: string, value?: string): void;
        }
        export interface Hidden extends NativeModule { ping(): void }
        export interface FancyButtonProps { label: string; disabled?: boolean }
        export interface Analytics { track(name: string): void }
        interface Options { deep: boolean }
    "#;

    fn manifest() -> ExtensionManifest {
        let mut manifest = ExtensionManifest::from_json(
            r#"{ "name": "@a/storage", "version": "1.0.0",
                 "platforms": { "android": { "packageName": "com.a.storage" }, "ios": {}, "web": {} },
                 "nativeModules": [{ "name": "LocalStorage", "className": "LocalStorageImpl" }],
                 "elements": ["FancyButton"],
                 "services": ["Analytics"] }"#,
        )
        .unwrap();
        apply_platform_defaults(&mut manifest);
        manifest
    }

    #[test]
    fn test_plan_follows_declarations() {
        let manifest = manifest();
        let interfaces = parse_interfaces(SOURCE, &parse_options_for(&manifest));
        let plan = plan_package(&manifest, &interfaces, &Platform::ALL, "src/index.ts");

        assert!(plan.failures.is_empty());
        // LocalStorage, Analytics, FancyButton on three platforms, contract + stub each.
        assert_eq!(plan.files.len(), 3 * 3 * 2);
        assert!(!plan.files.iter().any(|f| f.subject == "Hidden" || f.subject == "Options"));
    }

    #[test]
    fn test_undeclared_elements_are_not_scaffolded() {
        let mut manifest = manifest();
        manifest.elements = None;
        let interfaces = parse_interfaces(SOURCE, &parse_options_for(&manifest));
        assert!(!interfaces.elements.is_empty());

        let plan = plan_package(&manifest, &interfaces, &Platform::ALL, "src/index.ts");
        assert!(plan.failures.is_empty());
        assert!(!plan.files.iter().any(|f| f.subject == "FancyButton"));
        assert_eq!(plan.files.len(), 2 * 3 * 2);
    }

    #[test]
    fn test_platform_filter() {
        let manifest = manifest();
        let interfaces = parse_interfaces(SOURCE, &parse_options_for(&manifest));
        let plan = plan_package(&manifest, &interfaces, &[Platform::Web], "src/index.ts");
        assert!(plan.files.iter().all(|f| f.platform == Platform::Web));
        assert_eq!(plan.files.len(), 6);
    }

    #[test]
    fn test_stubs_are_never_overwritten() {
        let tmp = TempDir::new().unwrap();
        let manifest = manifest();
        let interfaces = parse_interfaces(SOURCE, &parse_options_for(&manifest));

        let first = generate_package(tmp.path(), &manifest, &interfaces, &[Platform::Web], "src/index.ts");
        assert_eq!(first.written.len(), 3);
        assert_eq!(first.created.len(), 3);
        assert!(first.is_success());

        let stub = tmp.path().join("web/src/LocalStorageImpl.ts");
        std::fs::write(&stub, "// hand written").unwrap();

        let second = generate_package(tmp.path(), &manifest, &interfaces, &[Platform::Web], "src/index.ts");
        assert_eq!(second.written.len(), 3);
        assert_eq!(second.created.len(), 0);
        assert_eq!(second.skipped.len(), 3);
        assert_eq!(std::fs::read_to_string(&stub).unwrap(), "// hand written");
    }

    #[test]
    fn test_write_if_absent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/c.txt");
        assert!(write_if_absent(&path, "one").unwrap());
        assert!(!write_if_absent(&path, "two").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one");
    }
}
