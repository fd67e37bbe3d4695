//! Aggregated registry generation over discovered extensions.

use autolink_codegen::{generate_registry, registry_path, RegistrationKind, RegistryWarningKind};
use autolink_spec::Platform;
use autolink_tests::{storage_extension, ExtensionFixture, TestHarness};
use pretty_assertions::assert_eq;

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn every_extension_is_registered_once() {
    let harness = TestHarness::new();
    let k = 4;
    for i in 0..k {
        harness.install(
            &ExtensionFixture::new(&format!("ext-{}", i))
                .web()
                .module(&format!("Mod{}", i), &format!("Mod{}Impl", i)),
        );
    }

    let records = harness.ordered_records();
    let result = generate_registry(&records, Platform::Web);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    assert_eq!(result.registered.len(), k);
    assert_eq!(result.imports.len(), k);
    assert_eq!(result.content.matches("export function setupExtensions").count(), 1);
    assert_eq!(result.content.matches("config.registerModule(").count(), k);
    for i in 0..k {
        assert!(result
            .content
            .contains(&format!("import {{ Mod{}Impl }} from 'ext-{}';", i, i)));
    }
}

#[test]
fn registrations_follow_dependency_order() {
    let harness = TestHarness::new();
    harness.install(&ExtensionFixture::new("aaa-app").web().module("App", "AppImpl").depends_on("zzz-core"));
    harness.install(&ExtensionFixture::new("zzz-core").web().module("Core", "CoreImpl"));

    let records = harness.ordered_records();
    let result = generate_registry(&records, Platform::Web);
    let names: Vec<&str> = result.registered.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Core", "App"]);
    let core = result.content.find("\"Core\"").or_else(|| result.content.find("'Core'"));
    let app = result.content.find("\"App\"").or_else(|| result.content.find("'App'"));
    assert!(core.unwrap() < app.unwrap(), "{}", result.content);
}

#[test]
fn all_kinds_are_registered_on_android() {
    let harness = TestHarness::new();
    harness.install(&storage_extension("@acme/storage", "com.acme.storage"));

    let records = harness.ordered_records();
    let result = generate_registry(&records, Platform::Android);
    let kinds: Vec<RegistrationKind> = result.registered.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RegistrationKind::Module,
            RegistrationKind::Element,
            RegistrationKind::Service
        ]
    );
    assert!(result
        .content
        .contains("LynxEnv.inst().registerModule(\"LocalStorage\", LocalStorageModule::class.java)"));
    assert!(result.content.contains("Behavior(\"fancy-button\")"));
    assert!(result.content.contains("import com.acme.storage.LocalStorageModule"));
}

// ============================================================================
// Defects
// ============================================================================

#[test]
fn duplicate_registration_is_dropped_and_structural() {
    let harness = TestHarness::new();
    harness.install(&ExtensionFixture::new("first").web().module("Storage", "FirstStorage"));
    harness.install(&ExtensionFixture::new("second").web().module("Storage", "SecondStorage"));

    let records = harness.ordered_records();
    let result = generate_registry(&records, Platform::Web);
    assert_eq!(result.registered.len(), 1);
    assert_eq!(result.registered[0].extension, "first");
    assert!(result.has_structural_errors());
    let duplicates: Vec<_> = result
        .warnings
        .iter()
        .filter(|w| w.kind == RegistryWarningKind::DuplicateRegistration)
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].extension, "second");
    assert!(!result.content.contains("SecondStorage"));
}

#[test]
fn unsupported_platform_is_skipped_not_fatal() {
    let harness = TestHarness::new();
    harness.install(&ExtensionFixture::new("web-only").web().module("Web", "WebImpl"));
    harness.install(&ExtensionFixture::new("droid").android("com.droid").module("Droid", "DroidImpl"));

    let records = harness.ordered_records();
    let result = generate_registry(&records, Platform::Android);
    assert_eq!(result.skipped_extensions, vec!["web-only"]);
    assert_eq!(result.registered.len(), 1);
    assert!(!result.has_structural_errors());
    assert_eq!(
        result.warnings[0].kind,
        RegistryWarningKind::PlatformNotSupported
    );
}

#[test]
fn empty_collection_still_has_entry_point() {
    let result = generate_registry(&[], Platform::Ios);
    assert!(result.registered.is_empty());
    assert!(result.warnings.is_empty());
    assert!(result.content.contains("LynxExtensionRegistry"));
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn link_writes_one_file_per_platform() {
    let harness = TestHarness::new();
    harness.install(&storage_extension("@acme/storage", "com.acme.storage"));

    let results = harness.link();
    assert_eq!(results.len(), 3);
    for platform in Platform::ALL {
        let written = harness.read(&format!(".lynx/autolink/{}", registry_path(platform)));
        let result = results.iter().find(|r| r.platform == platform).unwrap();
        assert_eq!(written, result.content);
    }
}

#[test]
fn relinking_is_byte_identical() {
    let harness = TestHarness::new();
    harness.install(&storage_extension("@acme/storage", "com.acme.storage"));
    harness.install(&ExtensionFixture::new("extra").all_platforms("com.extra").module_name("Extra"));

    harness.link();
    let first = harness.read(&format!(".lynx/autolink/{}", registry_path(Platform::Web)));
    harness.link();
    let second = harness.read(&format!(".lynx/autolink/{}", registry_path(Platform::Web)));
    assert_eq!(first, second);
}
