// src/core/sanitize.rs

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Make a section id safe as part of a filename.
/// Keeps ASCII alphanumerics, `-` and `.`; whitespace and `_` become a single `_`;
/// anything else is dropped.
pub fn sanitize_filename_part(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    let mut last_us = false;
    for ch in part.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '.' {
            out.push(ch);
            last_us = false;
        } else if ch.is_whitespace() || ch == '_' {
            if !last_us { out.push('_'); last_us = true; }
        }
    }
    out.trim_matches(|c| c == '_' || c == '.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amp_decoded_last() {
        assert_eq!(normalize_entities("&amp;nbsp;"), "&nbsp;");
    }

    #[test]
    fn filename_part_drops_separators() {
        assert_eq!(sanitize_filename_part("CIS-1200-001"), "CIS-1200-001");
        assert_eq!(sanitize_filename_part(" ECON  001 / 002 "), "ECON_001_002");
        assert_eq!(sanitize_filename_part("../.."), "");
    }
}
