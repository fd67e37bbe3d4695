//! Scanning an install directory for extension manifests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use autolink_spec::{
    discover_module_declarations, load_package_descriptor, reconcile_modules, AutolinkOptions,
    DiscoveryError, ErrorCode, ExtensionRecord, LoadError, ManifestLoader, ValidationWarning,
    MODULE_MARKER,
};
use walkdir::{DirEntry, WalkDir};

/// A non-fatal finding attached to one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryWarning {
    pub package_path: PathBuf,
    pub warning: ValidationWarning,
}

impl std::fmt::Display for DiscoveryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.warning, self.package_path.display())
    }
}

/// Outcome of one discovery run.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryResult {
    /// Records in first-seen order, unique by declared name.
    pub extensions: Vec<ExtensionRecord>,
    /// Packages that could not be turned into records.
    pub errors: Vec<DiscoveryError>,
    pub warnings: Vec<DiscoveryWarning>,
}

impl DiscoveryResult {
    /// Returns true if no package failed.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Looks up a record by declared name.
    pub fn get(&self, name: &str) -> Option<&ExtensionRecord> {
        self.extensions.iter().find(|r| r.name == name)
    }

    /// Declared names of all records.
    pub fn names(&self) -> Vec<&str> {
        self.extensions.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Discovers extensions under `project_root` with default options.
pub fn discover(project_root: &Path) -> DiscoveryResult {
    discover_with(project_root, &AutolinkOptions::default())
}

/// Discovers extensions under `project_root`.
///
/// Every call starts from empty state. A missing install directory yields a
/// single error and no records. Any other per-package failure is recorded and
/// the scan continues.
pub fn discover_with(project_root: &Path, options: &AutolinkOptions) -> DiscoveryResult {
    let install_dir = options.install_path(project_root);
    let mut run = DiscoveryRun::new(options);

    if !install_dir.is_dir() {
        tracing::warn!(path = %install_dir.display(), "install directory does not exist");
        run.errors.push(
            DiscoveryError::new(
                &install_dir,
                ErrorCode::MissingInstallDir,
                "install directory does not exist",
            )
            .with_detail("install dependencies before linking"),
        );
        return run.finish();
    }

    for manifest_path in find_manifests(&install_dir, &options.install_dir, &options.manifest_file) {
        run.process(&manifest_path);
    }

    let result = run.finish();
    tracing::info!(
        extensions = result.extensions.len(),
        errors = result.errors.len(),
        "discovery finished"
    );
    result
}

/// Manifest files of the packages directly inside `install_dir` (and inside
/// `@scope/` directories), sorted by path. Install directories nested inside
/// packages are not entered.
pub fn find_manifests(install_dir: &Path, install_dir_name: &str, manifest_file: &str) -> Vec<PathBuf> {
    let nested_name = Path::new(install_dir_name)
        .file_name()
        .map(|n| n.to_os_string());

    let mut found: Vec<PathBuf> = WalkDir::new(install_dir)
        .follow_links(true)
        .max_depth(3)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_nested_install_dir(entry, nested_name.as_deref()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == manifest_file)
        .filter(is_package_root_manifest)
        .map(DirEntry::into_path)
        .collect();
    found.sort();
    found
}

/// `<pkg>/<manifest>` or `@scope/<pkg>/<manifest>`.
fn is_package_root_manifest(entry: &DirEntry) -> bool {
    match entry.depth() {
        2 => true,
        3 => entry
            .path()
            .parent()
            .and_then(Path::parent)
            .and_then(Path::file_name)
            .is_some_and(|scope| scope.to_string_lossy().starts_with('@')),
        _ => false,
    }
}

fn is_nested_install_dir(entry: &DirEntry, name: Option<&std::ffi::OsStr>) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && Some(entry.file_name()) == name
}

/// Per-call accumulation state.
struct DiscoveryRun<'a> {
    loader: ManifestLoader,
    interface_source: &'a str,
    extensions: Vec<ExtensionRecord>,
    index: HashMap<String, usize>,
    errors: Vec<DiscoveryError>,
    warnings: Vec<DiscoveryWarning>,
}

impl<'a> DiscoveryRun<'a> {
    fn new(options: &'a AutolinkOptions) -> Self {
        Self {
            loader: ManifestLoader::new(options.manifest_file.clone()),
            interface_source: &options.interface_source,
            extensions: Vec::new(),
            index: HashMap::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn process(&mut self, manifest_path: &Path) {
        let package_path = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        match self.build_record(manifest_path, &package_path) {
            Ok(record) => self.insert(record),
            Err(error) => {
                tracing::warn!(package = %package_path.display(), code = %error.code, "skipping package");
                self.errors.push(error);
            }
        }
    }

    fn build_record(&mut self, manifest_path: &Path, package_path: &Path) -> Result<ExtensionRecord, DiscoveryError> {
        let loaded = self
            .loader
            .load_file(manifest_path)
            .map_err(|e| load_failure(package_path, "manifest could not be loaded", &e))?;

        let descriptor = load_package_descriptor(package_path).map_err(|e| {
            let reason = match e {
                LoadError::MissingFile { .. } => "package descriptor not found next to manifest",
                _ => "package descriptor could not be read",
            };
            let error = DiscoveryError::new(package_path, ErrorCode::MissingPackageDescriptor, reason);
            match e.detail() {
                Some(detail) => error.with_detail(detail),
                None => error,
            }
        })?;

        for warning in loaded.warnings {
            self.warn(package_path, warning);
        }

        let manifest = loaded.manifest;
        let discovered = self.scan_interface_source(package_path);
        let (modules, reconcile_warnings) =
            reconcile_modules(manifest.native_modules.as_deref(), &discovered);
        for warning in reconcile_warnings {
            self.warn(package_path, warning);
        }

        Ok(ExtensionRecord::build(
            manifest,
            loaded.path,
            package_path.to_path_buf(),
            descriptor.version,
            modules,
        ))
    }

    fn scan_interface_source(&self, package_path: &Path) -> Vec<autolink_spec::ModuleBinding> {
        let source_path = package_path.join(self.interface_source);
        match std::fs::read_to_string(&source_path) {
            Ok(source) => discover_module_declarations(&source, MODULE_MARKER),
            Err(_) => Vec::new(),
        }
    }

    fn warn(&mut self, package_path: &Path, warning: ValidationWarning) {
        self.warnings.push(DiscoveryWarning {
            package_path: package_path.to_path_buf(),
            warning,
        });
    }

    /// Last write wins: a later record with the same declared name replaces
    /// the earlier one in place.
    fn insert(&mut self, record: ExtensionRecord) {
        match self.index.get(&record.name) {
            Some(&slot) => {
                tracing::debug!(
                    name = %record.name,
                    replaced = %self.extensions[slot].package_path.display(),
                    by = %record.package_path.display(),
                    "duplicate extension name"
                );
                self.extensions[slot] = record;
            }
            None => {
                tracing::debug!(name = %record.name, "discovered extension");
                self.index.insert(record.name.clone(), self.extensions.len());
                self.extensions.push(record);
            }
        }
    }

    fn finish(self) -> DiscoveryResult {
        DiscoveryResult {
            extensions: self.extensions,
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

fn load_failure(package_path: &Path, reason: &str, error: &LoadError) -> DiscoveryError {
    let discovery_error = DiscoveryError::new(package_path, error.code(), reason);
    match error.detail() {
        Some(detail) => discovery_error.with_detail(detail),
        None => discovery_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_package(root: &Path, rel: &str, manifest: &str, version: Option<&str>) -> PathBuf {
        let dir = root.join("node_modules").join(rel);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("lynx.ext.json"), manifest).unwrap();
        if let Some(version) = version {
            std::fs::write(
                dir.join("package.json"),
                format!(r#"{{ "name": "{}", "version": "{}" }}"#, rel, version),
            )
            .unwrap();
        }
        dir
    }

    fn manifest(name: &str) -> String {
        format!(
            r#"{{ "name": "{}", "version": "1.0.0", "platforms": {{ "web": {{}} }}, "nativeModules": ["M"] }}"#,
            name
        )
    }

    #[test]
    fn test_missing_install_dir() {
        let tmp = TempDir::new().unwrap();
        let result = discover(tmp.path());
        assert!(result.extensions.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, ErrorCode::MissingInstallDir);
    }

    #[test]
    fn test_discovers_scoped_and_plain_packages() {
        let tmp = TempDir::new().unwrap();
        write_package(tmp.path(), "@acme/storage", &manifest("@acme/storage"), Some("2.1.0"));
        write_package(tmp.path(), "plain", &manifest("plain"), Some("0.1.0"));

        let result = discover(tmp.path());
        assert!(result.is_ok(), "{:?}", result.errors);
        assert_eq!(result.names(), vec!["@acme/storage", "plain"]);
        assert_eq!(result.get("@acme/storage").unwrap().version, "2.1.0");
    }

    #[test]
    fn test_failures_are_isolated() {
        let tmp = TempDir::new().unwrap();
        write_package(tmp.path(), "good", &manifest("good"), Some("1.0.0"));
        write_package(tmp.path(), "broken", "{ not json", Some("1.0.0"));
        write_package(tmp.path(), "nodesc", &manifest("nodesc"), None);

        let result = discover(tmp.path());
        assert_eq!(result.names(), vec!["good"]);
        let mut codes: Vec<_> = result.errors.iter().map(|e| e.code).collect();
        codes.sort_by_key(|c| c.code());
        assert_eq!(codes, vec![ErrorCode::InvalidJson, ErrorCode::MissingPackageDescriptor]);
    }

    #[test]
    fn test_nested_install_dir_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write_package(tmp.path(), "outer", &manifest("outer"), Some("1.0.0"));
        write_package(
            tmp.path(),
            "outer/node_modules/inner",
            &manifest("inner"),
            Some("1.0.0"),
        );

        let result = discover(tmp.path());
        assert_eq!(result.names(), vec!["outer"]);
    }

    #[test]
    fn test_manifests_below_package_root_are_ignored() {
        let tmp = TempDir::new().unwrap();
        write_package(tmp.path(), "plain", &manifest("plain"), Some("1.0.0"));
        write_package(tmp.path(), "plain/fixtures", &manifest("fixture"), Some("1.0.0"));

        let found = find_manifests(&tmp.path().join("node_modules"), "node_modules", "lynx.ext.json");
        assert_eq!(found, vec![tmp.path().join("node_modules/plain/lynx.ext.json")]);
    }

    #[test]
    fn test_duplicate_name_last_write_wins() {
        let tmp = TempDir::new().unwrap();
        write_package(tmp.path(), "a-first", &manifest("dup"), Some("1.0.0"));
        write_package(tmp.path(), "b-second", &manifest("dup"), Some("2.0.0"));

        let result = discover(tmp.path());
        assert_eq!(result.extensions.len(), 1);
        let record = result.get("dup").unwrap();
        assert_eq!(record.version, "2.0.0");
        assert!(record.package_path.ends_with("b-second"));
    }

    #[test]
    fn test_modules_discovered_from_interface_source() {
        let tmp = TempDir::new().unwrap();
        let dir = write_package(
            tmp.path(),
            "auto",
            r#"{ "name": "auto", "version": "1.0.0", "platforms": { "web": {} } }"#,
            Some("1.0.0"),
        );
        std::fs::create_dir_all(dir.join("src")).unwrap();
        std::fs::write(
            dir.join("src/index.ts"),
            "export interface Clipboard extends NativeModule { copy(text: string): void; }",
        )
        .unwrap();

        let result = discover(tmp.path());
        let record = result.get("auto").unwrap();
        assert_eq!(record.modules.len(), 1);
        assert_eq!(record.modules[0].name, "Clipboard");
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let tmp = TempDir::new().unwrap();
        write_package(tmp.path(), "one", &manifest("one"), Some("1.0.0"));
        write_package(tmp.path(), "two", &manifest("two"), Some("1.0.0"));

        let first = discover(tmp.path());
        let second = discover(tmp.path());
        assert_eq!(first.extensions, second.extensions);
    }
}
