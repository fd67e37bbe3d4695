//! Test fixture utilities for creating synthetic extension packages.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

/// An extension package to materialize inside an install tree.
///
/// By default the package is complete: descriptor, manifest, build script,
/// podspec and platform source directories all exist, so it validates
/// without errors.
#[derive(Debug, Clone)]
pub struct ExtensionFixture {
    pub name: String,
    pub version: String,
    platforms: Map<String, Value>,
    modules: Vec<Value>,
    elements: Vec<Value>,
    services: Vec<Value>,
    dependencies: Vec<String>,
    lynx_version: Option<String>,
    interface: Option<String>,
    raw_manifest: Option<String>,
    with_descriptor: bool,
}

impl ExtensionFixture {
    /// Create a fixture with no platforms and no exports.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            platforms: Map::new(),
            modules: Vec::new(),
            elements: Vec::new(),
            services: Vec::new(),
            dependencies: Vec::new(),
            lynx_version: None,
            interface: None,
            raw_manifest: None,
            with_descriptor: true,
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn android(mut self, package_name: &str) -> Self {
        self.platforms
            .insert("android".into(), json!({ "packageName": package_name }));
        self
    }

    pub fn ios(mut self) -> Self {
        self.platforms.insert("ios".into(), json!({}));
        self
    }

    pub fn web(mut self) -> Self {
        self.platforms.insert("web".into(), json!({}));
        self
    }

    /// Android, iOS and web with `package_name` for Android.
    pub fn all_platforms(self, package_name: &str) -> Self {
        self.android(package_name).ios().web()
    }

    /// Add a structured module declaration.
    pub fn module(mut self, name: &str, class_name: &str) -> Self {
        self.modules
            .push(json!({ "name": name, "className": class_name }));
        self
    }

    /// Add a bare-string module declaration.
    pub fn module_name(mut self, name: &str) -> Self {
        self.modules.push(json!(name));
        self
    }

    pub fn element(mut self, name: &str) -> Self {
        self.elements.push(json!(name));
        self
    }

    pub fn element_with_tag(mut self, name: &str, tag_name: &str) -> Self {
        self.elements
            .push(json!({ "name": name, "tagName": tag_name }));
        self
    }

    pub fn service(mut self, name: &str) -> Self {
        self.services.push(json!(name));
        self
    }

    pub fn depends_on(mut self, name: &str) -> Self {
        self.dependencies.push(name.to_string());
        self
    }

    pub fn lynx_version(mut self, range: &str) -> Self {
        self.lynx_version = Some(range.to_string());
        self
    }

    /// Interface source written to `src/index.ts`.
    pub fn interface(mut self, source: &str) -> Self {
        self.interface = Some(source.to_string());
        self
    }

    /// Write `text` verbatim as the manifest instead of the built one.
    pub fn raw_manifest(mut self, text: &str) -> Self {
        self.raw_manifest = Some(text.to_string());
        self
    }

    /// Do not write a `package.json`.
    pub fn without_descriptor(mut self) -> Self {
        self.with_descriptor = false;
        self
    }

    /// The manifest as JSON.
    pub fn manifest_json(&self) -> Value {
        let mut manifest = Map::new();
        manifest.insert("name".into(), json!(self.name));
        manifest.insert("version".into(), json!(self.version));
        manifest.insert("platforms".into(), Value::Object(self.platforms.clone()));
        if let Some(ref range) = self.lynx_version {
            manifest.insert("lynxVersion".into(), json!(range));
        }
        for (key, values) in [
            ("nativeModules", &self.modules),
            ("elements", &self.elements),
            ("services", &self.services),
        ] {
            if !values.is_empty() {
                manifest.insert(key.into(), Value::Array(values.clone()));
            }
        }
        if !self.dependencies.is_empty() {
            manifest.insert("dependencies".into(), json!(self.dependencies));
        }
        Value::Object(manifest)
    }

    /// Write the package into `dir` and return `dir`.
    pub fn write_to(&self, dir: &Path) -> PathBuf {
        fs::create_dir_all(dir).expect("Failed to create package dir");

        if self.with_descriptor {
            let descriptor = json!({ "name": self.name, "version": self.version });
            write(&dir.join("package.json"), &descriptor.to_string());
        }
        let manifest = match self.raw_manifest {
            Some(ref text) => text.clone(),
            None => serde_json::to_string_pretty(&self.manifest_json())
                .expect("Failed to serialize manifest"),
        };
        write(&dir.join("lynx.ext.json"), &manifest);

        if self.platforms.contains_key("android") {
            fs::create_dir_all(dir.join("android/src/main/java"))
                .expect("Failed to create android sources");
            write(&dir.join("android/build.gradle"), "apply plugin: 'com.android.library'\n");
        }
        if self.platforms.contains_key("ios") {
            fs::create_dir_all(dir.join("ios")).expect("Failed to create ios sources");
            let basename = self.name.rsplit('/').next().unwrap_or(&self.name);
            write(
                &dir.join(format!("{}.podspec", basename)),
                &format!("Pod::Spec.new do |s|\n  s.name = '{}'\nend\n", basename),
            );
        }
        if self.platforms.contains_key("web") {
            write(&dir.join("web/src/index.ts"), "export {};\n");
        }
        if let Some(ref source) = self.interface {
            write(&dir.join("src/index.ts"), source);
        }
        dir.to_path_buf()
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(path, content).expect("Failed to write fixture file");
}

/// Interface source with one module of three methods, one element and one
/// service.
pub const STORAGE_INTERFACE: &str = r#"
import type { NativeModule } from '@lynx-js/types';

export interface LocalStorage extends NativeModule {
  getItem(key: string): Promise<string>;
  setItem(key: string, value?: string): void;
  keys(prefix?: string, limit?: number): string[];
}

export interface FancyButtonProps {
  label: string;
  disabled?: boolean;
  onTap?: (count: number) => void;
}

export interface Analytics {
  track(event: string, payload?: { [key: string]: unknown }): void;
}
"#;

/// A complete storage extension declaring everything in
/// [`STORAGE_INTERFACE`].
pub fn storage_extension(name: &str, package_name: &str) -> ExtensionFixture {
    ExtensionFixture::new(name)
        .all_platforms(package_name)
        .module("LocalStorage", "LocalStorageModule")
        .element("FancyButton")
        .service("Analytics")
        .lynx_version(">=3.0.0")
        .interface(STORAGE_INTERFACE)
}
