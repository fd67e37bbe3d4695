//! Platform-neutral type text to target type text.
//!
//! Classification runs an ordered rule table; the first rule that matches
//! decides the category, and each target renders categories its own way.
//! Mapping is total: every input, including empty or malformed text, yields a
//! non-empty result.

use std::sync::OnceLock;

use autolink_spec::Platform;
use regex::Regex;

/// Known primitive type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Null,
    Undefined,
    Boolean,
    Number,
    String,
    BigInt,
    ArrayBuffer,
}

impl Primitive {
    /// Parses an exact primitive name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(Primitive::Null),
            "undefined" => Some(Primitive::Undefined),
            "boolean" => Some(Primitive::Boolean),
            "number" => Some(Primitive::Number),
            "string" => Some(Primitive::String),
            "BigInt" | "bigint" => Some(Primitive::BigInt),
            "ArrayBuffer" => Some(Primitive::ArrayBuffer),
            _ => None,
        }
    }
}

/// Outcome of classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Unit,
    Callback,
    Array,
    Map,
    Primitive(Primitive),
    /// Bare identifier with no specific rule.
    Untyped,
    /// Left as written.
    Passthrough,
}

/// One classification rule.
pub struct TypeRule {
    pub name: &'static str,
    pub matches: fn(&str) -> Option<TypeCategory>,
}

/// Rules in priority order. A callback returning an array must hit the
/// callback rule before the array rule.
pub const RULES: &[TypeRule] = &[
    TypeRule {
        name: "unit",
        matches: unit_rule,
    },
    TypeRule {
        name: "callback",
        matches: callback_rule,
    },
    TypeRule {
        name: "array",
        matches: array_rule,
    },
    TypeRule {
        name: "map",
        matches: map_rule,
    },
    TypeRule {
        name: "primitive",
        matches: primitive_rule,
    },
    TypeRule {
        name: "untyped",
        matches: untyped_rule,
    },
];

fn unit_rule(text: &str) -> Option<TypeCategory> {
    matches!(text, "" | "void" | "Promise<void>").then_some(TypeCategory::Unit)
}

fn callback_rule(text: &str) -> Option<TypeCategory> {
    (text.contains("=>") || text.to_ascii_lowercase().contains("callback"))
        .then_some(TypeCategory::Callback)
}

fn array_rule(text: &str) -> Option<TypeCategory> {
    let wrapped = text.starts_with("Array<") && text.ends_with('>');
    (wrapped || text.ends_with("[]")).then_some(TypeCategory::Array)
}

fn map_rule(text: &str) -> Option<TypeCategory> {
    if !(text.starts_with('{') && text.ends_with('}')) {
        return None;
    }
    let mut depth = 0i32;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                // Closing before the end means `{a} | {b}`, not one literal.
                if depth == 0 && i != text.len() - 1 {
                    return None;
                }
            }
            _ => {}
        }
    }
    (depth == 0).then_some(TypeCategory::Map)
}

fn primitive_rule(text: &str) -> Option<TypeCategory> {
    Primitive::from_name(text).map(TypeCategory::Primitive)
}

static IDENTIFIER_REGEX: OnceLock<Regex> = OnceLock::new();

fn untyped_rule(text: &str) -> Option<TypeCategory> {
    let re = IDENTIFIER_REGEX.get_or_init(|| Regex::new(r"^\w+$").expect("invalid regex pattern"));
    re.is_match(text).then_some(TypeCategory::Untyped)
}

/// Classifies `text` with the first matching rule.
pub fn classify(text: &str) -> TypeCategory {
    let text = text.trim();
    RULES
        .iter()
        .find_map(|rule| (rule.matches)(text))
        .unwrap_or(TypeCategory::Passthrough)
}

/// Rendered names of each category on one target.
#[derive(Debug)]
pub struct TargetTypes {
    pub unit: &'static str,
    pub callback: &'static str,
    pub array: &'static str,
    pub map: &'static str,
    pub untyped: &'static str,
    pub primitive: fn(Primitive) -> &'static str,
}

pub static KOTLIN_TYPES: TargetTypes = TargetTypes {
    unit: "Unit",
    callback: "Callback",
    array: "ReadableArray",
    map: "ReadableMap",
    untyped: "Any",
    primitive: kotlin_primitive,
};

pub static OBJC_TYPES: TargetTypes = TargetTypes {
    unit: "void",
    callback: "LynxCallbackBlock",
    array: "NSArray *",
    map: "NSDictionary *",
    untyped: "id",
    primitive: objc_primitive,
};

pub static TYPESCRIPT_TYPES: TargetTypes = TargetTypes {
    unit: "void",
    callback: "(...args: any[]) => void",
    array: "unknown[]",
    map: "Record<string, unknown>",
    untyped: "unknown",
    primitive: typescript_primitive,
};

fn kotlin_primitive(p: Primitive) -> &'static str {
    match p {
        Primitive::Null | Primitive::Undefined => "Any?",
        Primitive::Boolean => "Boolean",
        Primitive::Number => "Double",
        Primitive::String => "String",
        Primitive::BigInt => "Long",
        Primitive::ArrayBuffer => "ByteArray",
    }
}

fn objc_primitive(p: Primitive) -> &'static str {
    match p {
        Primitive::Null | Primitive::Undefined => "NSNull *",
        Primitive::Boolean => "BOOL",
        Primitive::Number => "double",
        Primitive::String => "NSString *",
        Primitive::BigInt => "int64_t",
        Primitive::ArrayBuffer => "NSData *",
    }
}

fn typescript_primitive(p: Primitive) -> &'static str {
    match p {
        Primitive::Null => "null",
        Primitive::Undefined => "undefined",
        Primitive::Boolean => "boolean",
        Primitive::Number => "number",
        Primitive::String => "string",
        Primitive::BigInt => "bigint",
        Primitive::ArrayBuffer => "ArrayBuffer",
    }
}

/// Type table of a platform's rendering language.
pub fn target_types(platform: Platform) -> &'static TargetTypes {
    match platform {
        Platform::Android => &KOTLIN_TYPES,
        Platform::Ios => &OBJC_TYPES,
        Platform::Web => &TYPESCRIPT_TYPES,
    }
}

/// Maps neutral type text to the platform's type text.
pub fn map_type(text: &str, platform: Platform) -> String {
    let types = target_types(platform);
    match classify(text) {
        TypeCategory::Unit => types.unit.to_string(),
        TypeCategory::Callback => types.callback.to_string(),
        TypeCategory::Array => types.array.to_string(),
        TypeCategory::Map => types.map.to_string(),
        TypeCategory::Primitive(p) => (types.primitive)(p).to_string(),
        TypeCategory::Untyped => types.untyped.to_string(),
        TypeCategory::Passthrough => text.trim().to_string(),
    }
}

/// Maps a return type. `Promise<T>` renders as `T`.
pub fn map_return_type(text: &str, platform: Platform) -> String {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix("Promise<")
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(trimmed);
    map_type(inner, platform)
}

/// Maps the type of an optional parameter or property.
///
/// TypeScript marks optionality on the name, so its type is unchanged.
pub fn map_optional_type(text: &str, platform: Platform) -> String {
    let mapped = map_type(text, platform);
    match platform {
        Platform::Android if mapped.ends_with('?') => mapped,
        Platform::Android => format!("{}?", mapped),
        Platform::Ios if is_objc_value_type(&mapped) => "nullable NSNumber *".to_string(),
        Platform::Ios => format!("nullable {}", mapped),
        Platform::Web => mapped,
    }
}

/// Objective-C scalar types that cannot be nil.
pub fn is_objc_value_type(mapped: &str) -> bool {
    matches!(mapped, "BOOL" | "double" | "int64_t")
}

/// Returns true if `text` maps to the unit type.
pub fn is_unit(text: &str) -> bool {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix("Promise<")
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(trimmed);
    classify(inner) == TypeCategory::Unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ========================================================================
    // Individual rules
    // ========================================================================

    #[test]
    fn test_unit_rule() {
        for text in ["", "  ", "void", "Promise<void>"] {
            assert_eq!(classify(text), TypeCategory::Unit, "{:?}", text);
        }
        assert_eq!(unit_rule("Promise<string>"), None);
    }

    #[test]
    fn test_callback_rule() {
        assert_eq!(callback_rule("(x: number) => void"), Some(TypeCategory::Callback));
        assert_eq!(callback_rule("SuccessCallback"), Some(TypeCategory::Callback));
        assert_eq!(callback_rule("onCALLBACKish"), Some(TypeCategory::Callback));
        assert_eq!(callback_rule("string"), None);
    }

    #[test]
    fn test_callback_before_array() {
        assert_eq!(classify("() => string[]"), TypeCategory::Callback);
        assert_eq!(classify("Array<() => void>"), TypeCategory::Callback);
    }

    #[test]
    fn test_array_rule() {
        assert_eq!(array_rule("string[]"), Some(TypeCategory::Array));
        assert_eq!(array_rule("Array<number>"), Some(TypeCategory::Array));
        assert_eq!(array_rule("Set<number>"), None);
    }

    #[test]
    fn test_map_rule() {
        assert_eq!(map_rule("{ a: string; b: { c: number } }"), Some(TypeCategory::Map));
        assert_eq!(map_rule("{ a: 1 } | { b: 2 }"), None);
        assert_eq!(map_rule("{ unclosed"), None);
    }

    #[test]
    fn test_primitive_and_untyped_rules() {
        assert_eq!(classify("number"), TypeCategory::Primitive(Primitive::Number));
        assert_eq!(classify("bigint"), TypeCategory::Primitive(Primitive::BigInt));
        assert_eq!(classify("Options"), TypeCategory::Untyped);
        assert_eq!(classify("'a' | 'b'"), TypeCategory::Passthrough);
    }

    // ========================================================================
    // Target rendering
    // ========================================================================

    #[test]
    fn test_numbers_are_doubles() {
        assert_eq!(map_type("number", Platform::Android), "Double");
        assert_eq!(map_type("number", Platform::Ios), "double");
        assert_eq!(map_type("number", Platform::Web), "number");
    }

    #[test]
    fn test_array_buffer_per_target() {
        let mapped: Vec<_> = Platform::ALL
            .iter()
            .map(|&p| map_type("ArrayBuffer", p))
            .collect();
        assert_eq!(mapped, vec!["ByteArray", "NSData *", "ArrayBuffer"]);
    }

    #[test]
    fn test_passthrough_keeps_text() {
        assert_eq!(map_type(" Map<string, number> ", Platform::Android), "Map<string, number>");
    }

    #[test]
    fn test_return_types_unwrap_promise() {
        assert_eq!(map_return_type("Promise<string>", Platform::Ios), "NSString *");
        assert_eq!(map_return_type("Promise<void>", Platform::Android), "Unit");
        assert!(is_unit("Promise<void>"));
        assert!(!is_unit("Promise<number>"));
    }

    #[test]
    fn test_optional_rendering() {
        assert_eq!(map_optional_type("string", Platform::Android), "String?");
        assert_eq!(map_optional_type("null", Platform::Android), "Any?");
        assert_eq!(map_optional_type("string", Platform::Ios), "nullable NSString *");
        assert_eq!(map_optional_type("boolean", Platform::Ios), "nullable NSNumber *");
        assert_eq!(map_optional_type("string", Platform::Web), "string");
    }
}
