//! Manifest merging.
//!
//! Rules, applied left to right:
//! - scalars: the last value that is present and not `null` wins
//! - arrays: concatenated, duplicates dropped, first occurrence order kept
//! - `platforms`: each platform sub-object merged field by field, later fields override

use serde_json::{Map, Value};

use crate::manifest::ExtensionManifest;

/// Merges `overlay` on top of `base` at the JSON level.
pub fn merge_values(base: &Value, overlay: &Value) -> Value {
    let (Value::Object(base_obj), Value::Object(overlay_obj)) = (base, overlay) else {
        return if overlay.is_null() {
            base.clone()
        } else {
            overlay.clone()
        };
    };

    let mut merged = base_obj.clone();
    for (key, value) in overlay_obj {
        if value.is_null() {
            continue;
        }
        let combined = match (key.as_str(), merged.get(key), value) {
            ("platforms", Some(Value::Object(earlier)), Value::Object(later)) => {
                Value::Object(merge_platforms(earlier, later))
            }
            (_, Some(Value::Array(earlier)), Value::Array(later)) => {
                Value::Array(concat_dedup(earlier, later))
            }
            _ => value.clone(),
        };
        merged.insert(key.clone(), combined);
    }
    Value::Object(merged)
}

fn merge_platforms(earlier: &Map<String, Value>, later: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = earlier.clone();
    for (platform, config) in later {
        if config.is_null() {
            continue;
        }
        let combined = match (merged.get(platform), config) {
            (Some(Value::Object(base_fields)), Value::Object(fields)) => {
                let mut out = base_fields.clone();
                for (field, value) in fields {
                    if !value.is_null() {
                        out.insert(field.clone(), value.clone());
                    }
                }
                Value::Object(out)
            }
            _ => config.clone(),
        };
        merged.insert(platform.clone(), combined);
    }
    merged
}

fn concat_dedup(earlier: &[Value], later: &[Value]) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::with_capacity(earlier.len() + later.len());
    for item in earlier.iter().chain(later) {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

/// Merges typed manifests in order; later manifests override earlier ones.
///
/// # Example
/// ```
/// use autolink_spec::loader::merge_manifests;
/// use autolink_spec::ExtensionManifest;
///
/// let base = ExtensionManifest::from_json(r#"{"name":"a","version":"1.0.0","dependencies":["x","y"]}"#).unwrap();
/// let child = ExtensionManifest::from_json(r#"{"version":"1.1.0","dependencies":["y","z"]}"#).unwrap();
/// let merged = merge_manifests(&[base, child]).unwrap();
/// assert_eq!(merged.name, "a");
/// assert_eq!(merged.version, "1.1.0");
/// assert_eq!(merged.dependency_names(), ["x", "y", "z"]);
/// ```
pub fn merge_manifests(manifests: &[ExtensionManifest]) -> Result<ExtensionManifest, serde_json::Error> {
    let mut merged = Value::Object(Map::new());
    for manifest in manifests {
        let mut value = serde_json::to_value(manifest)?;
        strip_empty_scalars(&mut value);
        merged = merge_values(&merged, &value);
    }
    serde_json::from_value(merged)
}

/// Typed manifests serialize unset `name`/`version` as empty strings; treat
/// those as absent so they never override an earlier value.
fn strip_empty_scalars(value: &mut Value) {
    if let Value::Object(obj) = value {
        obj.retain(|_, v| !matches!(v, Value::String(s) if s.is_empty()));
    }
}
