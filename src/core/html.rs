// src/core/html.rs
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use super::sanitize::{normalize_entities, normalize_ws};

static BR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("br pattern"));

/// Parse a selector known at compile time. Panics only on a malformed literal.
pub fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("bad selector {css:?}: {e}"))
}

/// Split serialized inner HTML on `<br>`, `<BR>`, `<br/>` and `<br />`.
pub fn split_br(inner: &str) -> Vec<&str> {
    BR.split(inner).collect()
}

/// Drop everything between `<` and `>`, then collapse whitespace.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&out)
}

/// Visible text of an HTML fragment: tags removed, entities decoded.
pub fn fragment_text(s: &str) -> String {
    normalize_ws(&normalize_entities(&strip_tags(s)))
}

/// Concatenated text nodes of an element, whitespace collapsed.
pub fn element_text(el: ElementRef<'_>) -> String {
    let joined: String = el.text().collect::<Vec<_>>().join(" ");
    normalize_ws(&joined)
}

/// First run of ASCII digits in `s`.
pub fn first_digits(s: &str) -> Option<&str> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..len])
}
