//! Scalar handling utilities.
//!
//! Decides whether a string can be written as a bare word and converts
//! between a string's text and its escaped form inside quotes.

use std::borrow::Cow;

use pbxproj_tokenizer::is_bare_atom_char;

/// Check if a string can be written as a bare (unquoted) atom.
///
/// A bare atom is valid when:
/// 1. It's not empty
/// 2. It doesn't start with `//` and doesn't contain `/*` (both read as comments)
/// 3. It contains no whitespace, quotes, control characters, or `{}(),;=`
pub fn can_be_bare(s: &str) -> bool {
    if s.is_empty() || s.starts_with("//") || s.contains("/*") {
        return false;
    }
    s.chars().all(is_bare_atom_char)
}

/// Check if a string has the shape of an object identifier:
/// 24 hexadecimal digits.
pub fn is_identifier(s: &str) -> bool {
    s.len() == 24 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Escape a string for output between `quote` delimiters.
///
/// Returns the escaped content (without surrounding quotes).
pub fn escape_quoted(s: &str, quote: char) -> Cow<'_, str> {
    if !s
        .chars()
        .any(|c| c == quote || matches!(c, '\\' | '\n' | '\r' | '\t'))
    {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c == quote => {
                result.push('\\');
                result.push(c);
            }
            c => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Unescape the content of a quoted atom (without the surrounding quotes).
///
/// Understands `\\ \" \' \n \r \t \0` and the `\Uxxxx` / `\uxxxx` forms
/// Xcode uses for non-ASCII characters. Unknown escapes are kept as written.
pub fn unescape_quoted(s: &str) -> Cow<'_, str> {
    if !s.contains('\\') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('0') => result.push('\0'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('\'') => result.push('\''),
            Some(marker @ ('U' | 'u')) => {
                let mut hex = String::with_capacity(4);
                while hex.len() < 4 {
                    match chars.peek() {
                        Some(h) if h.is_ascii_hexdigit() => {
                            hex.push(*h);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) if hex.len() == 4 => result.push(ch),
                    _ => {
                        result.push('\\');
                        result.push(marker);
                        result.push_str(&hex);
                    }
                }
            }
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_be_bare() {
        // These should be bare
        assert!(can_be_bare("PBXGroup"));
        assert!(can_be_bare("46"));
        assert!(can_be_bare("sourcecode.c.objc"));
        assert!(can_be_bare("/bin/sh"));
        assert!(can_be_bare("$SRCROOT/Vendor"));
        assert!(can_be_bare("Info-Debug.plist"));

        // These must be quoted
        assert!(!can_be_bare("")); // empty
        assert!(!can_be_bare("My App")); // space
        assert!(!can_be_bare("{braces}")); // braces
        assert!(!can_be_bare("(parens)")); // parens
        assert!(!can_be_bare("DEBUG=1")); // equals
        assert!(!can_be_bare("a;b")); // semicolon
        assert!(!can_be_bare("a,b")); // comma
        assert!(!can_be_bare("say\"hi")); // quote
        assert!(!can_be_bare("//comment")); // looks like comment
        assert!(!can_be_bare("a/*b")); // opens a comment
        assert!(!can_be_bare("tab\there")); // whitespace
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("29B97316FDCFA39411CA2CEA"));
        assert!(is_identifier("1d60589b0d05dd56006bfb54"));
        assert!(!is_identifier("29B97316FDCFA39411CA2CE")); // 23 chars
        assert!(!is_identifier("29B97316FDCFA39411CA2CEG")); // not hex
        assert!(!is_identifier("46"));
    }

    #[test]
    fn test_escape_quoted() {
        assert_eq!(escape_quoted("hello", '"'), "hello");
        assert_eq!(escape_quoted("hello world", '"'), "hello world");
        assert_eq!(escape_quoted("say \"hi\"", '"'), "say \\\"hi\\\"");
        assert_eq!(escape_quoted("it's", '\''), "it\\'s");
        assert_eq!(escape_quoted("it's", '"'), "it's");
        assert_eq!(escape_quoted("line1\nline2", '"'), "line1\\nline2");
        assert_eq!(escape_quoted("path\\to\\file", '"'), "path\\\\to\\\\file");
    }

    #[test]
    fn test_unescape_quoted() {
        assert_eq!(unescape_quoted("hello"), "hello");
        assert_eq!(unescape_quoted("say \\\"hi\\\""), "say \"hi\"");
        assert_eq!(unescape_quoted("line1\\nline2"), "line1\nline2");
        assert_eq!(unescape_quoted("path\\\\to\\\\file"), "path\\to\\file");
        assert_eq!(unescape_quoted("tab\\there"), "tab\there");
        assert_eq!(unescape_quoted("caf\\U00e9"), "café");
        assert_eq!(unescape_quoted("bad \\Uzz"), "bad \\Uzz");
        assert_eq!(unescape_quoted("keep \\q"), "keep \\q");
    }

    #[test]
    fn test_escape_then_unescape() {
        for case in ["hello", "hello world", "say \"hi\"", "line1\nline2", "a\\b"] {
            let escaped = escape_quoted(case, '"');
            assert_eq!(unescape_quoted(&escaped), case, "failed for: {case:?}");
        }
    }
}
