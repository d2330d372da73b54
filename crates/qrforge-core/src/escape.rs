//! Character escaping for the text serialization grammars.
//!
//! vCard (RFC 2426) and MeCard each reserve their own set of separator
//! characters. Backslash is always escaped first so that backslashes
//! inserted by later replacements are never double-escaped.

/// Escape a value for embedding in a vCard property line.
pub fn escape_vcard(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace('\n', "\\n")
}

/// Undo [`escape_vcard`].
pub fn unescape_vcard(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }
    out
}

/// Escape a value for embedding in a MeCard field.
pub fn escape_mecard(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('"', "\\\"")
}

/// Undo [`escape_mecard`].
pub fn unescape_mecard(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vcard_escapes_reserved_characters() {
        assert_eq!(escape_vcard("a,b"), "a\\,b");
        assert_eq!(escape_vcard("a;b"), "a\\;b");
        assert_eq!(escape_vcard("a\nb"), "a\\nb");
        assert_eq!(escape_vcard("a\\b"), "a\\\\b");
    }

    #[test]
    fn vcard_backslash_is_escaped_first() {
        // A literal backslash-comma must become \\ followed by \, and
        // not have its inserted backslash re-escaped.
        assert_eq!(escape_vcard("\\,"), "\\\\\\,");
    }

    #[test]
    fn vcard_round_trips() {
        for v in ["plain", "a,b", "a;b", "a\nb", "a\\b", "\\;,\n"] {
            assert_eq!(unescape_vcard(&escape_vcard(v)), v);
        }
    }

    #[test]
    fn mecard_escapes_reserved_characters() {
        assert_eq!(escape_mecard("a:b"), "a\\:b");
        assert_eq!(escape_mecard("a;b"), "a\\;b");
        assert_eq!(escape_mecard("a,b"), "a\\,b");
        assert_eq!(escape_mecard("a\"b"), "a\\\"b");
        assert_eq!(escape_mecard("a\\b"), "a\\\\b");
    }

    #[test]
    fn mecard_round_trips() {
        for v in ["plain", "a:b", "a;b", "a,b", "a\"b", "a\\b", ":;,\"\\"] {
            assert_eq!(unescape_mecard(&escape_mecard(v)), v);
        }
    }
}
