//! Property tests for type mapping and manifest validation.

use autolink_codegen::{map_optional_type, map_return_type, map_type};
use autolink_spec::{validate_manifest_value, Platform};
use proptest::prelude::*;
use serde_json::{json, Value};

fn type_text() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::string::string_regex("[A-Za-z][A-Za-z0-9_]{0,12}").unwrap(),
        proptest::string::string_regex("(string|number|boolean|ArrayBuffer)(\\[\\])?").unwrap(),
        proptest::string::string_regex("Promise<[a-z]{1,8}>").unwrap(),
        proptest::string::string_regex("[a-z]{1,6} \\| (null|undefined)").unwrap(),
        ".{0,24}",
    ]
}

fn platform() -> impl Strategy<Value = Platform> {
    prop_oneof![
        Just(Platform::Android),
        Just(Platform::Ios),
        Just(Platform::Web),
    ]
}

fn base_manifest(name: &str) -> Value {
    json!({
        "name": name,
        "version": "1.2.3",
        "platforms": { "android": { "packageName": "com.example.ext" } },
        "nativeModules": ["Storage"]
    })
}

proptest! {
    #[test]
    fn mapping_is_total(text in type_text(), platform in platform()) {
        prop_assert!(!map_type(&text, platform).is_empty());
        prop_assert!(!map_optional_type(&text, platform).is_empty());
        prop_assert!(!map_return_type(&text, platform).is_empty());
    }

    #[test]
    fn mapping_is_deterministic(text in type_text(), platform in platform()) {
        prop_assert_eq!(map_type(&text, platform), map_type(&text, platform));
    }

    #[test]
    fn valid_names_pass(name in proptest::string::string_regex("(@[a-z][a-z0-9-]{0,8}/)?[a-z][a-z0-9-]{0,12}").unwrap()) {
        let result = validate_manifest_value(&base_manifest(&name));
        prop_assert!(result.ok, "{:?}", result.errors);
    }

    #[test]
    fn unknown_fields_only_warn(field in proptest::string::string_regex("x[A-Za-z]{1,10}").unwrap()) {
        let mut manifest = base_manifest("ext");
        manifest[field.as_str()] = json!(true);
        let result = validate_manifest_value(&manifest);
        prop_assert!(result.ok, "{:?}", result.errors);
        prop_assert!(!result.warnings.is_empty());
    }

    #[test]
    fn bad_version_stays_invalid(
        version in proptest::string::string_regex("[a-z ]{1,10}").unwrap(),
        field in proptest::string::string_regex("x[A-Za-z]{1,10}").unwrap(),
    ) {
        let mut manifest = base_manifest("ext");
        manifest["version"] = json!(version);
        prop_assert!(!validate_manifest_value(&manifest).ok);

        // Further defects never make it valid again.
        manifest[field.as_str()] = json!(1);
        manifest["platforms"] = json!({});
        let result = validate_manifest_value(&manifest);
        prop_assert!(!result.ok);
        prop_assert!(result.errors.len() >= 2);
    }
}
