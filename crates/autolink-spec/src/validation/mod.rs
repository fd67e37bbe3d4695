//! Manifest schema validation.
//!
//! Works on the untyped JSON value so that type errors are reported with
//! paths instead of surfacing as a single deserialization failure. Every
//! check runs; the validator never stops at the first defect.

pub mod grammar;

#[cfg(test)]
mod tests;

use serde_json::{Map, Value};

use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::manifest::ExtensionManifest;

pub use grammar::{
    is_strict_semver, is_valid_android_package, is_valid_class_name, is_valid_package_name,
    is_valid_registration_name, is_valid_tag_name, is_valid_version_range,
};

const KNOWN_FIELDS: &[&str] = &[
    "name",
    "version",
    "lynxVersion",
    "platforms",
    "dependencies",
    "nativeModules",
    "elements",
    "services",
    "extends",
];

const ANDROID_LANGUAGES: &[&str] = &["java", "kotlin"];

/// Validates a parsed manifest document.
///
/// # Example
/// ```
/// use autolink_spec::validation::validate_manifest_value;
///
/// let value = serde_json::json!({
///     "name": "@a/b",
///     "version": "1.0.0",
///     "platforms": { "android": { "packageName": "com.a.b" } },
///     "nativeModules": [{ "name": "X", "className": "XImpl" }]
/// });
/// let result = validate_manifest_value(&value);
/// assert!(result.is_ok());
/// assert!(result.errors.is_empty());
/// ```
pub fn validate_manifest_value(value: &Value) -> ValidationResult {
    let mut result = ValidationResult::default();

    let Some(root) = value.as_object() else {
        result.add_error(
            ValidationError::new(
                ErrorCode::InvalidType,
                format!("manifest must be a JSON object, got {}", type_name(value)),
            )
            .suggest("wrap the manifest fields in { ... }"),
        );
        return result;
    };

    validate_name(root, &mut result);
    validate_version(root, &mut result);
    validate_lynx_version(root, &mut result);
    validate_platforms(root, &mut result);
    validate_dependencies(root, &mut result);
    validate_module_array(root, "nativeModules", &mut result);
    validate_module_array(root, "services", &mut result);
    validate_elements(root, &mut result);
    validate_extends(root, &mut result);

    for key in root.keys() {
        if !KNOWN_FIELDS.contains(&key.as_str()) {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::UnknownField,
                format!("unknown field '{}' is ignored", key),
                key.as_str(),
            ));
        }
    }

    result
}

/// Validates a typed manifest by round-tripping it through JSON.
pub fn validate_manifest(manifest: &ExtensionManifest) -> ValidationResult {
    match serde_json::to_value(manifest) {
        Ok(value) => validate_manifest_value(&value),
        Err(e) => {
            let mut result = ValidationResult::default();
            result.add_error(ValidationError::new(
                ErrorCode::InvalidType,
                format!("manifest could not be serialized: {}", e),
            ));
            result
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(path: &str, expected: &str, got: &Value) -> ValidationError {
    ValidationError::with_path(
        ErrorCode::InvalidType,
        format!("{} must be {}, got {}", path, expected, type_name(got)),
        path,
    )
}

/// Returns the string at `key`, recording missing/type errors.
fn required_string<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &str,
    result: &mut ValidationResult,
) -> Option<&'a str> {
    match obj.get(key) {
        None | Some(Value::Null) => {
            result.add_error(ValidationError::with_path(
                ErrorCode::MissingField,
                format!("required field '{}' is missing", path),
                path,
            ));
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            result.add_error(type_error(path, "a string", other));
            None
        }
    }
}

/// Returns the string at `key` if present, recording type errors.
fn optional_string<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &str,
    result: &mut ValidationResult,
) -> Option<&'a str> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            result.add_error(type_error(path, "a string", other));
            None
        }
    }
}

/// Returns the array at `key` if present, recording type errors and
/// warning on empty arrays.
fn optional_array<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &str,
    result: &mut ValidationResult,
) -> Option<&'a Vec<Value>> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => {
            if items.is_empty() {
                result.add_warning(ValidationWarning::with_path(
                    WarningCode::EmptyArray,
                    format!("{} is empty; omit it instead", path),
                    path,
                ));
            }
            Some(items)
        }
        Some(other) => {
            result.add_error(type_error(path, "an array", other));
            None
        }
    }
}

fn string_array(
    obj: &Map<String, Value>,
    key: &str,
    path: &str,
    result: &mut ValidationResult,
) -> Vec<(String, String)> {
    let mut out = Vec::new();
    if let Some(items) = optional_array(obj, key, path, result) {
        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{}[{}]", path, i);
            match item {
                Value::String(s) => out.push((item_path, s.clone())),
                other => result.add_error(type_error(&item_path, "a string", other)),
            }
        }
    }
    out
}

fn validate_name(root: &Map<String, Value>, result: &mut ValidationResult) {
    if let Some(name) = required_string(root, "name", "name", result) {
        if !is_valid_package_name(name) {
            result.add_error(
                ValidationError::with_path(
                    ErrorCode::InvalidName,
                    format!("name '{}' is not a valid package name", name),
                    "name",
                )
                .suggest("use lowercase 'name' or scoped '@scope/name'"),
            );
        }
    }
}

fn validate_version(root: &Map<String, Value>, result: &mut ValidationResult) {
    if let Some(version) = required_string(root, "version", "version", result) {
        if !is_strict_semver(version) {
            result.add_error(
                ValidationError::with_path(
                    ErrorCode::InvalidVersion,
                    format!("version '{}' is not strict semver", version),
                    "version",
                )
                .suggest("use MAJOR.MINOR.PATCH, e.g. 1.0.0"),
            );
        }
    }
}

fn validate_lynx_version(root: &Map<String, Value>, result: &mut ValidationResult) {
    if let Some(range) = optional_string(root, "lynxVersion", "lynxVersion", result) {
        if !is_valid_version_range(range) {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::InvalidVersionRange,
                format!(
                    "lynxVersion '{}' is not a semver range (e.g. '>=3.0.0')",
                    range
                ),
                "lynxVersion",
            ));
        }
    }
}

fn validate_platforms(root: &Map<String, Value>, result: &mut ValidationResult) {
    let platforms = match root.get("platforms") {
        None | Some(Value::Null) => {
            result.add_error(
                ValidationError::with_path(
                    ErrorCode::MissingField,
                    "required field 'platforms' is missing",
                    "platforms",
                )
                .suggest("add \"platforms\": { \"android\": { \"packageName\": \"com.example.ext\" } }"),
            );
            return;
        }
        Some(Value::Object(map)) => map,
        Some(other) => {
            result.add_error(type_error("platforms", "an object", other));
            return;
        }
    };

    let mut known = 0usize;
    for (key, value) in platforms {
        let path = format!("platforms.{}", key);
        let sub = match key.as_str() {
            "android" | "ios" | "web" => {
                known += 1;
                match value {
                    Value::Object(sub) => sub,
                    other => {
                        result.add_error(type_error(&path, "an object", other));
                        continue;
                    }
                }
            }
            _ => {
                result.add_warning(ValidationWarning::with_path(
                    WarningCode::UnknownPlatform,
                    format!("unknown platform '{}' is ignored", key),
                    path,
                ));
                continue;
            }
        };

        match key.as_str() {
            "android" => validate_android(sub, &path, result),
            "ios" => {
                optional_string(sub, "podspecPath", &format!("{}.podspecPath", path), result);
                optional_string(sub, "sourceDir", &format!("{}.sourceDir", path), result);
                string_array(sub, "frameworks", &format!("{}.frameworks", path), result);
            }
            _ => {
                optional_string(sub, "entry", &format!("{}.entry", path), result);
            }
        }
    }

    if known == 0 {
        result.add_error(
            ValidationError::with_path(
                ErrorCode::NoPlatforms,
                "platforms must configure at least one of android, ios, web",
                "platforms",
            )
            .suggest("add an \"android\", \"ios\" or \"web\" sub-object"),
        );
    }
}

fn validate_android(sub: &Map<String, Value>, path: &str, result: &mut ValidationResult) {
    let package_path = format!("{}.packageName", path);
    if let Some(package) = required_string(sub, "packageName", &package_path, result) {
        if !is_valid_android_package(package) {
            result.add_error(
                ValidationError::with_path(
                    ErrorCode::InvalidPackageName,
                    format!("'{}' is not a reverse-domain package name", package),
                    package_path,
                )
                .suggest("use lowercase dot-separated segments, e.g. com.example.ext"),
            );
        }
    }
    optional_string(sub, "sourceDir", &format!("{}.sourceDir", path), result);
    string_array(sub, "buildTypes", &format!("{}.buildTypes", path), result);

    let language_path = format!("{}.language", path);
    if let Some(language) = optional_string(sub, "language", &language_path, result) {
        if !ANDROID_LANGUAGES.contains(&language) {
            result.add_error(
                ValidationError::with_path(
                    ErrorCode::UnsupportedLanguage,
                    format!("unsupported android language '{}'", language),
                    language_path,
                )
                .suggest("use \"java\" or \"kotlin\""),
            );
        }
    }
}

fn validate_dependencies(root: &Map<String, Value>, result: &mut ValidationResult) {
    for (path, name) in string_array(root, "dependencies", "dependencies", result) {
        if !is_valid_package_name(&name) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidName,
                format!("dependency '{}' is not a valid package name", name),
                path,
            ));
        }
    }
}

/// `nativeModules` and `services`: each item is a name or `{name, className}`.
fn validate_module_array(root: &Map<String, Value>, key: &str, result: &mut ValidationResult) {
    let Some(items) = optional_array(root, key, key, result) else {
        return;
    };
    for (i, item) in items.iter().enumerate() {
        let path = format!("{}[{}]", key, i);
        match item {
            Value::String(name) => check_registration_name(name, &path, result),
            Value::Object(obj) => {
                let name_path = format!("{}.name", path);
                let class_path = format!("{}.className", path);
                match obj.get("name") {
                    Some(Value::String(name)) => check_registration_name(name, &name_path, result),
                    _ => result.add_error(
                        ValidationError::with_path(
                            ErrorCode::InvalidDeclaration,
                            format!("{} must have a string 'name'", path),
                            name_path,
                        )
                        .suggest("use { \"name\": \"Foo\", \"className\": \"FooImpl\" }"),
                    ),
                }
                match obj.get("className") {
                    Some(Value::String(class)) => {
                        if !is_valid_class_name(class) {
                            result.add_error(
                                ValidationError::with_path(
                                    ErrorCode::InvalidClassName,
                                    format!("className '{}' is not a valid class name", class),
                                    class_path,
                                )
                                .suggest("use an identifier such as FooImpl or com.example.FooImpl"),
                            );
                        }
                    }
                    _ => result.add_error(
                        ValidationError::with_path(
                            ErrorCode::InvalidDeclaration,
                            format!("{} must have a string 'className'", path),
                            class_path,
                        )
                        .suggest("use a bare string when the class shares the registration name"),
                    ),
                }
            }
            other => result.add_error(type_error(&path, "a string or an object", other)),
        }
    }
}

fn check_registration_name(name: &str, path: &str, result: &mut ValidationResult) {
    if !is_valid_registration_name(name) {
        result.add_error(
            ValidationError::with_path(
                ErrorCode::InvalidClassName,
                format!("'{}' is not a valid registration name", name),
                path,
            )
            .suggest("use an identifier: letters, digits and underscores"),
        );
    }
}

fn validate_elements(root: &Map<String, Value>, result: &mut ValidationResult) {
    let Some(items) = optional_array(root, "elements", "elements", result) else {
        return;
    };
    for (i, item) in items.iter().enumerate() {
        let path = format!("elements[{}]", i);
        match item {
            Value::String(name) => check_registration_name(name, &path, result),
            Value::Object(obj) => {
                let name_path = format!("{}.name", path);
                match obj.get("name") {
                    Some(Value::String(name)) => check_registration_name(name, &name_path, result),
                    _ => result.add_error(ValidationError::with_path(
                        ErrorCode::InvalidDeclaration,
                        format!("{} must have a string 'name'", path),
                        name_path,
                    )),
                }
                let tag_path = format!("{}.tagName", path);
                if let Some(tag) = optional_string(obj, "tagName", &tag_path, result) {
                    if !is_valid_tag_name(tag) {
                        result.add_error(
                            ValidationError::with_path(
                                ErrorCode::InvalidTagName,
                                format!("tagName '{}' is not a valid tag", tag),
                                tag_path,
                            )
                            .suggest("use lowercase words joined by hyphens, e.g. fancy-button"),
                        );
                    }
                }
            }
            other => result.add_error(type_error(&path, "a string or an object", other)),
        }
    }
}

fn validate_extends(root: &Map<String, Value>, result: &mut ValidationResult) {
    if let Some(base) = optional_string(root, "extends", "extends", result) {
        if base.trim().is_empty() {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidType,
                "extends must be a non-empty path",
                "extends",
            ));
        }
    }
}
