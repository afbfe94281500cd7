//! HTML utility functions.
//!
//! - `escape()`, `escape_attr()` - HTML entity escaping
//! - `escape_style()` - text safe to place inside a `<style>` element
//! - `sanitize_tag()`, `sanitize_name()` - keep element/attribute names well-formed

use std::borrow::Cow;

/// Element name used when a node's type has no usable characters.
const FALLBACK_TAG: &str = "div";

fn entity(c: char) -> Option<&'static str> {
    Some(match c {
        '<' => "&lt;",
        '>' => "&gt;",
        '&' => "&amp;",
        '"' => "&quot;",
        '\'' => "&#39;",
        _ => return None,
    })
}

/// Escape text content. Borrows when nothing needs replacing.
pub fn escape(s: &str) -> Cow<'_, str> {
    let Some(first) = s.find(|c: char| entity(c).is_some()) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len() + 8);
    out.push_str(&s[..first]);
    for c in s[first..].chars() {
        match entity(c) {
            Some(e) => out.push_str(e),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape a double-quoted attribute value. Quotes of both kinds are encoded,
/// so this is the same set as [`escape`].
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape(s)
}

/// Text inside a `<style>` element. `<` becomes the CSS escape `\3c ` so a
/// selector or declaration can never close the element.
pub fn escape_style(s: &str) -> Cow<'_, str> {
    if s.contains('<') {
        Cow::Owned(s.replace('<', "\\3c "))
    } else {
        Cow::Borrowed(s)
    }
}

// =============================================================================
// Names
// =============================================================================

/// Keep only ASCII alphanumerics and `-` so a name cannot break out of a tag.
pub fn sanitize_name(name: &str) -> Cow<'_, str> {
    let valid = |c: char| c.is_ascii_alphanumeric() || c == '-';
    if name.chars().all(valid) {
        return Cow::Borrowed(name);
    }
    Cow::Owned(name.chars().filter(|&c| valid(c)).collect())
}

/// Element name for a node type, falling back to `div`.
pub fn sanitize_tag(kind: &str) -> Cow<'_, str> {
    let name = sanitize_name(kind);
    if name.is_empty() {
        Cow::Borrowed(FALLBACK_TAG)
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<script>"), "&lt;script&gt;");
        assert_eq!(escape("a & 'b'"), "a &amp; &#39;b&#39;");
        assert!(matches!(escape("hello"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("say \"hi\""), "say &quot;hi&quot;");
    }

    #[test]
    fn test_escape_style() {
        assert_eq!(escape_style("red</style>"), "red\\3c /style>");
        assert!(matches!(escape_style("#ff0000"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_sanitize_tag() {
        assert_eq!(sanitize_tag("section"), "section");
        assert_eq!(sanitize_tag("my-widget"), "my-widget");
        assert_eq!(sanitize_tag("div onclick=x"), "divonclickx");
        assert_eq!(sanitize_tag("<>"), "div");
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("data-id"), "data-id");
        assert_eq!(sanitize_name("\" x"), "x");
        assert_eq!(sanitize_name("=\""), "");
    }
}
