//! Tests for manifest schema validation.

use super::*;
use serde_json::json;

fn valid_manifest() -> Value {
    json!({
        "name": "@a/b",
        "version": "1.0.0",
        "platforms": { "android": { "packageName": "com.a.b" } },
        "nativeModules": [{ "name": "X", "className": "XImpl" }]
    })
}

#[test]
fn test_scenario_manifest_is_valid() {
    let result = validate_manifest_value(&valid_manifest());
    assert!(result.is_ok(), "errors: {:?}", result.errors);
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_non_object_root() {
    let result = validate_manifest_value(&json!([1, 2]));
    assert!(!result.is_ok());
    assert!(result.has_error(ErrorCode::InvalidType));
}

#[test]
fn test_missing_required_fields_all_reported() {
    let result = validate_manifest_value(&json!({}));
    assert!(!result.is_ok());
    let missing: Vec<_> = result
        .errors
        .iter()
        .filter(|e| e.code == ErrorCode::MissingField)
        .filter_map(|e| e.path.as_deref())
        .collect();
    assert_eq!(missing, vec!["name", "version", "platforms"]);
}

#[test]
fn test_bad_name_and_version_aggregate() {
    let mut value = valid_manifest();
    value["name"] = json!("Bad Name");
    value["version"] = json!("1.0");
    let result = validate_manifest_value(&value);

    assert!(result.has_error(ErrorCode::InvalidName));
    assert!(result.has_error(ErrorCode::InvalidVersion));
    assert_eq!(result.errors.len(), 2);
    let version_error = result
        .errors
        .iter()
        .find(|e| e.code == ErrorCode::InvalidVersion)
        .unwrap();
    assert!(version_error.suggestion.is_some());
}

#[test]
fn test_platforms_need_a_known_key() {
    let mut value = valid_manifest();
    value["platforms"] = json!({ "windows": {} });
    let result = validate_manifest_value(&value);
    assert!(result.has_error(ErrorCode::NoPlatforms));
    assert!(result.has_warning(WarningCode::UnknownPlatform));
}

#[test]
fn test_android_package_grammar() {
    let mut value = valid_manifest();
    value["platforms"]["android"]["packageName"] = json!("Com.A");
    let result = validate_manifest_value(&value);
    assert!(result.has_error(ErrorCode::InvalidPackageName));

    value["platforms"]["android"] = json!({ "sourceDir": "src" });
    let result = validate_manifest_value(&value);
    let error = result
        .errors
        .iter()
        .find(|e| e.code == ErrorCode::MissingField)
        .unwrap();
    assert_eq!(error.path.as_deref(), Some("platforms.android.packageName"));
}

#[test]
fn test_android_language() {
    let mut value = valid_manifest();
    value["platforms"]["android"]["language"] = json!("scala");
    let result = validate_manifest_value(&value);
    assert!(result.has_error(ErrorCode::UnsupportedLanguage));
}

#[test]
fn test_heterogeneous_module_declarations() {
    let mut value = valid_manifest();
    value["nativeModules"] = json!([
        "Plain",
        { "name": "X", "className": "com.a.XImpl" },
        { "name": "Y" },
        { "name": "Z", "className": "not valid" },
        42
    ]);
    let result = validate_manifest_value(&value);

    let paths: Vec<_> = result
        .errors
        .iter()
        .map(|e| (e.code, e.path.clone().unwrap_or_default()))
        .collect();
    assert_eq!(
        paths,
        vec![
            (ErrorCode::InvalidDeclaration, "nativeModules[2].className".to_string()),
            (ErrorCode::InvalidClassName, "nativeModules[3].className".to_string()),
            (ErrorCode::InvalidType, "nativeModules[4]".to_string()),
        ]
    );
}

#[test]
fn test_elements_tag_name() {
    let mut value = valid_manifest();
    value["elements"] = json!(["FancyButton", { "name": "Slider", "tagName": "Bad_Tag" }]);
    let result = validate_manifest_value(&value);
    assert!(result.has_error(ErrorCode::InvalidTagName));
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn test_empty_arrays_only_warn() {
    let mut value = valid_manifest();
    value["dependencies"] = json!([]);
    value["services"] = json!([]);
    let result = validate_manifest_value(&value);
    assert!(result.is_ok());
    assert_eq!(
        result
            .warnings
            .iter()
            .filter(|w| w.code == WarningCode::EmptyArray)
            .count(),
        2
    );
}

#[test]
fn test_array_elements_type_checked() {
    let mut value = valid_manifest();
    value["dependencies"] = json!(["ok-dep", 3, "Bad Dep"]);
    value["platforms"]["android"]["buildTypes"] = json!(["debug", false]);
    let result = validate_manifest_value(&value);
    let paths: Vec<_> = result.errors.iter().filter_map(|e| e.path.as_deref()).collect();
    assert!(paths.contains(&"dependencies[1]"));
    assert!(paths.contains(&"dependencies[2]"));
    assert!(paths.contains(&"platforms.android.buildTypes[1]"));
}

#[test]
fn test_malformed_lynx_version_is_warning() {
    let mut value = valid_manifest();
    value["lynxVersion"] = json!("three point oh");
    let result = validate_manifest_value(&value);
    assert!(result.is_ok());
    assert!(result.has_warning(WarningCode::InvalidVersionRange));
}

#[test]
fn test_npm_lynx_version_ranges_are_accepted() {
    for range in [">=3.0.0 <4.0.0", "^3.0.0 || ^4.0.0", "3.x"] {
        let mut value = valid_manifest();
        value["lynxVersion"] = json!(range);
        let result = validate_manifest_value(&value);
        assert!(!result.has_warning(WarningCode::InvalidVersionRange), "{}", range);
    }
}

#[test]
fn test_unknown_top_level_field_warns() {
    let mut value = valid_manifest();
    value["main"] = json!("index.js");
    let result = validate_manifest_value(&value);
    assert!(result.is_ok());
    assert!(result.has_warning(WarningCode::UnknownField));
}

#[test]
fn test_removing_errors_restores_validity() {
    let mut value = valid_manifest();
    value["version"] = json!("x");
    value["dependencies"] = json!([]);
    assert!(!validate_manifest_value(&value).is_ok());

    value["version"] = json!("2.0.0");
    let result = validate_manifest_value(&value);
    assert!(result.is_ok());
    assert!(!result.warnings.is_empty());
}

#[test]
fn test_validate_typed_manifest() {
    let manifest: ExtensionManifest = serde_json::from_value(valid_manifest()).unwrap();
    assert!(validate_manifest(&manifest).is_ok());
}
