//! Low-level text scanning for interface sources.

/// Removes `//` and `/* */` comments, leaving string literals intact.
pub(super) fn strip_comments(source: &str) -> String {
    let bytes: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut i = 0;
    let mut quote: Option<char> = None;

    while i < bytes.len() {
        let c = bytes[i];
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' && i + 1 < bytes.len() {
                out.push(bytes[i + 1]);
                i += 2;
                continue;
            }
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match c {
            '"' | '\'' | '`' => {
                quote = Some(c);
                out.push(c);
                i += 1;
            }
            '/' if bytes.get(i + 1) == Some(&'/') => {
                while i < bytes.len() && bytes[i] != '\n' {
                    i += 1;
                }
            }
            '/' if bytes.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == '*' && bytes.get(i + 1) == Some(&'/')) {
                    // Keep line structure so member splitting still sees newlines.
                    if bytes[i] == '\n' {
                        out.push('\n');
                    }
                    i += 1;
                }
                i += 2;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Byte index of the bracket closing the one at `open`, if balanced.
pub(super) fn matching_close(text: &str, open: usize) -> Option<usize> {
    let open_char = text[open..].chars().next()?;
    let close_char = match open_char {
        '{' => '}',
        '(' => ')',
        '[' => ']',
        '<' => '>',
        _ => return None,
    };
    let mut depth = 0i32;
    let mut prev = '\0';
    for (offset, c) in text[open..].char_indices() {
        if c == open_char {
            depth += 1;
        } else if c == close_char && !(close_char == '>' && prev == '=') {
            depth -= 1;
            if depth == 0 {
                return Some(open + offset);
            }
        }
        prev = c;
    }
    None
}

/// Splits `text` on `separators` that occur outside any bracket pair.
/// `=>` never closes an angle bracket.
pub(super) fn split_top_level(text: &str, separators: &[char], split_on_newline: bool) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut prev = '\0';
    let chars: Vec<char> = text.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '(' | '{' | '[' | '<' => depth += 1,
            ')' | '}' | ']' => depth -= 1,
            '>' if prev != '=' => depth -= 1,
            _ => {}
        }
        let at_top = depth <= 0;
        if at_top && separators.contains(&c) {
            push_part(&mut parts, &mut current);
        } else if at_top && split_on_newline && c == '\n' {
            if member_continues(&current, &chars[i + 1..]) {
                current.push(' ');
            } else {
                push_part(&mut parts, &mut current);
            }
        } else {
            current.push(c);
        }
        prev = c;
    }
    push_part(&mut parts, &mut current);
    parts
}

fn push_part(parts: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_string());
    }
    current.clear();
}

/// A newline does not end a member when the text so far is dangling or the
/// next line starts with a continuation token.
fn member_continues(current: &str, rest: &[char]) -> bool {
    let tail = current.trim_end();
    if tail.is_empty() {
        return false;
    }
    if tail.ends_with(':') || tail.ends_with('|') || tail.ends_with('&') || tail.ends_with("=>") {
        return true;
    }
    matches!(
        rest.iter().find(|c| !c.is_whitespace()),
        Some(':' | '|' | '&' | '=' | '.')
    )
}

/// Collapses runs of whitespace to a single space.
pub(super) fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits a leading identifier off `text`.
pub(super) fn take_identifier(text: &str) -> Option<(&str, &str)> {
    let end = text
        .char_indices()
        .find(|(i, c)| {
            !(c.is_ascii_alphanumeric() || *c == '_' || *c == '$') || (*i == 0 && c.is_ascii_digit())
        })
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    (end > 0).then(|| (&text[..end], &text[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments_keeps_strings() {
        let src = "a: string; // trailing\n/* block\n */ b: '//not a comment';";
        let out = strip_comments(src);
        assert!(!out.contains("trailing"));
        assert!(!out.contains("block"));
        assert!(out.contains("'//not a comment'"));
    }

    #[test]
    fn test_matching_close_ignores_arrows() {
        let text = "{ cb: (x: number) => void; }";
        assert_eq!(matching_close(text, 0), Some(text.len() - 1));
        let generic = "<(a: T) => void>";
        assert_eq!(matching_close(generic, 0), Some(generic.len() - 1));
    }

    #[test]
    fn test_split_top_level() {
        let parts = split_top_level("a: Array<string>, b: { x: 1, y: 2 }, cb: (e: E) => void", &[','], false);
        assert_eq!(parts, vec!["a: Array<string>", "b: { x: 1, y: 2 }", "cb: (e: E) => void"]);
    }

    #[test]
    fn test_split_members_on_newlines() {
        let body = "\n  get(key: string): string\n  mode:\n    | 'a'\n    | 'b'\n  set(k: string, v: string): void\n";
        let parts = split_top_level(body, &[';', ','], true);
        assert_eq!(parts.len(), 3, "{:?}", parts);
        assert_eq!(normalize_ws(&parts[1]), "mode: | 'a' | 'b'");
    }

    #[test]
    fn test_take_identifier() {
        assert_eq!(take_identifier("getItem(key)"), Some(("getItem", "(key)")));
        assert_eq!(take_identifier("(x)"), None);
        assert_eq!(take_identifier("9abc"), None);
    }
}
