//! Name grammars shared by the manifest and extension validators.

use std::sync::OnceLock;

use regex::Regex;

/// Package name: optional `@scope/` prefix, then one lowercase segment.
pub const PACKAGE_NAME_PATTERN: &str = r"^(@[a-z0-9][a-z0-9._-]*/)?[a-z0-9][a-z0-9._-]*$";

/// Android package name: reverse-domain, at least two segments.
pub const ANDROID_PACKAGE_PATTERN: &str = r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)+$";

/// Binding class: identifier, optionally dot-qualified.
pub const CLASS_NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$";

/// Registration name of a module, element or service.
pub const REGISTRATION_NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

/// Element tag: lowercase words joined by single hyphens.
pub const TAG_NAME_PATTERN: &str = r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$";

static PACKAGE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
static ANDROID_PACKAGE_REGEX: OnceLock<Regex> = OnceLock::new();
static CLASS_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
static REGISTRATION_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
static TAG_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("invalid regex pattern"))
}

/// Checks a package (or dependency) name.
pub fn is_valid_package_name(name: &str) -> bool {
    name.len() <= 214 && compiled(&PACKAGE_NAME_REGEX, PACKAGE_NAME_PATTERN).is_match(name)
}

/// Checks an Android reverse-domain package name.
pub fn is_valid_android_package(name: &str) -> bool {
    compiled(&ANDROID_PACKAGE_REGEX, ANDROID_PACKAGE_PATTERN).is_match(name)
}

/// Checks a binding class name.
pub fn is_valid_class_name(name: &str) -> bool {
    compiled(&CLASS_NAME_REGEX, CLASS_NAME_PATTERN).is_match(name)
}

/// Checks a module/element/service registration name.
pub fn is_valid_registration_name(name: &str) -> bool {
    compiled(&REGISTRATION_NAME_REGEX, REGISTRATION_NAME_PATTERN).is_match(name)
}

/// Checks an element tag name.
pub fn is_valid_tag_name(name: &str) -> bool {
    compiled(&TAG_NAME_REGEX, TAG_NAME_PATTERN).is_match(name)
}

/// Checks a strict semver version (`MAJOR.MINOR.PATCH[-pre][+build]`).
pub fn is_strict_semver(version: &str) -> bool {
    semver::Version::parse(version).is_ok()
}

/// Checks an npm-style range: `||`-separated comparator sets, each a
/// whitespace-separated list of comparators or a hyphen range
/// (`>=3.0.0 <4.0.0 || ^5`, `1.2 - 2.0`). Comma-joined sets are also accepted.
pub fn is_valid_version_range(range: &str) -> bool {
    range.split("||").all(|set| is_valid_comparator_set(set.trim()))
}

fn is_valid_comparator_set(set: &str) -> bool {
    if set.is_empty() {
        return true;
    }
    if set.contains(',') {
        return semver::VersionReq::parse(set).is_ok();
    }
    if let Some((low, high)) = set.split_once(" - ") {
        return is_partial_version(low.trim()) && is_partial_version(high.trim());
    }

    let mut pending_op: Option<&str> = None;
    for token in set.split_whitespace() {
        let comparator = match pending_op.take() {
            Some(op) => format!("{}{}", op, token),
            None if token.chars().all(|c| matches!(c, '<' | '>' | '=' | '~' | '^')) => {
                pending_op = Some(token);
                continue;
            }
            None => token.to_string(),
        };
        let version_at = comparator
            .find(|c: char| !matches!(c, '<' | '>' | '=' | '~' | '^'))
            .unwrap_or(comparator.len());
        let (op, version) = comparator.split_at(version_at);
        let version = version.strip_prefix('v').unwrap_or(version);
        if semver::VersionReq::parse(&format!("{}{}", op, version)).is_err() {
            return false;
        }
    }
    pending_op.is_none()
}

/// `1`, `1.2`, `1.2.3`, `1.x`, with an optional leading `v`.
fn is_partial_version(text: &str) -> bool {
    let text = text.strip_prefix('v').unwrap_or(text);
    text.starts_with(|c: char| c.is_ascii_digit())
        && semver::VersionReq::parse(&format!("={}", text)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_names() {
        assert!(is_valid_package_name("dup"));
        assert!(is_valid_package_name("@a/b"));
        assert!(is_valid_package_name("@lynx-js/storage.kit"));
        assert!(!is_valid_package_name("Upper"));
        assert!(!is_valid_package_name("@scope"));
        assert!(!is_valid_package_name("a/b"));
        assert!(!is_valid_package_name(""));
    }

    #[test]
    fn test_android_packages() {
        assert!(is_valid_android_package("com.a.b"));
        assert!(is_valid_android_package("org.lynx_js.ext2"));
        assert!(!is_valid_android_package("com"));
        assert!(!is_valid_android_package("Com.a"));
        assert!(!is_valid_android_package("com..a"));
        assert!(!is_valid_android_package("com.1a"));
    }

    #[test]
    fn test_class_and_registration_names() {
        assert!(is_valid_class_name("XImpl"));
        assert!(is_valid_class_name("com.a.XImpl"));
        assert!(!is_valid_class_name("X Impl"));
        assert!(!is_valid_class_name("1X"));
        assert!(is_valid_registration_name("LocalStorage"));
        assert!(!is_valid_registration_name("com.a.X"));
    }

    #[test]
    fn test_tag_names() {
        assert!(is_valid_tag_name("fancy-button"));
        assert!(is_valid_tag_name("input"));
        assert!(!is_valid_tag_name("Fancy"));
        assert!(!is_valid_tag_name("a--b"));
        assert!(!is_valid_tag_name("-a"));
    }

    #[test]
    fn test_versions() {
        assert!(is_strict_semver("1.0.0"));
        assert!(is_strict_semver("1.2.3-beta.1"));
        assert!(!is_strict_semver("1.0"));
        assert!(!is_strict_semver("v1.0.0"));
        assert!(is_valid_version_range(">=3.0.0"));
        assert!(is_valid_version_range("^3.1"));
        assert!(!is_valid_version_range("three"));
    }

    #[test]
    fn test_npm_version_ranges() {
        assert!(is_valid_version_range(">=3.0.0 <4.0.0"));
        assert!(is_valid_version_range("^3.0.0 || ^4.0.0"));
        assert!(is_valid_version_range(">= 3.0.0"));
        assert!(is_valid_version_range("3.x"));
        assert!(is_valid_version_range("1.2 - 2.3.4"));
        assert!(is_valid_version_range("*"));
        assert!(is_valid_version_range(">=3.0.0, <4.0.0"));
        assert!(!is_valid_version_range(">=3.0.0 <four"));
        assert!(!is_valid_version_range("^3 || banana"));
        assert!(!is_valid_version_range(">="));
        assert!(!is_valid_version_range("x - 2.0.0"));
    }
}
