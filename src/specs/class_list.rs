// src/specs/class_list.rs
//! Class list report page (`ClassListInstructor.aspx`).
//!
//! Each student is one `.pdfClassListEntry` row holding a photo cell
//! (`td.pdfImageTd` with an `img.pdfImage`) and a details cell
//! (`td.TableRecords_EvenLine`) laid out as `<b>Key: </b>value<br>` lines.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

use crate::config::consts::*;
use crate::core::html::{first_digits, fragment_text, sel, split_br};
use crate::progress::Progress;
use crate::record::{FieldValue, StudentRecord};
use crate::section::{page_section_hint, SectionId};

static ROW: LazyLock<Selector> = LazyLock::new(|| sel(ROW_SELECTOR));
static IMAGE: LazyLock<Selector> = LazyLock::new(|| sel(IMAGE_SELECTOR));
static DETAILS: LazyLock<Selector> = LazyLock::new(|| sel(DETAILS_SELECTOR));

static FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<b>\s*([^:<]+?)\s*:\s*</b>(.*)").expect("field pattern")
});
static MAILTO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href\s*=\s*"mailto:([^"]+)""#).expect("mailto pattern")
});
static CODE_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z0-9_]+) \(([^)]+)\)").expect("code/title pattern")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("row has no image and no labelled fields")]
    Empty,
}

/// Everything read from one page, before any network work.
#[derive(Debug, Default)]
pub struct ClassListPage {
    pub records: Vec<StudentRecord>,
    /// `.pdfClassListEntry` elements found, including dropped ones.
    pub rows_seen: usize,
    pub rows_failed: usize,
    pub section_hint: Option<SectionId>,
}

/// Parse a full report document.
pub fn parse_doc(html_doc: &str, base: Option<&Url>) -> ClassListPage {
    parse_doc_with_progress(html_doc, base, None)
}

/// [`parse_doc`], reporting each row as it is read.
pub fn parse_doc_with_progress(
    html_doc: &str,
    base: Option<&Url>,
    mut progress: Option<&mut dyn Progress>,
) -> ClassListPage {
    let doc = Html::parse_document(html_doc);
    let mut page = ClassListPage {
        section_hint: page_section_hint(&doc),
        ..Default::default()
    };

    let rows: Vec<ElementRef<'_>> = doc.select(&ROW).collect();
    page.rows_seen = rows.len();
    if let Some(p) = progress.as_deref_mut() {
        p.begin(rows.len());
    }

    for (i, row) in rows.into_iter().enumerate() {
        match extract_row(row, base) {
            Ok(rec) => page.records.push(rec),
            Err(e) => {
                page.rows_failed += 1;
                logw!("Row {i}: {e}; skipped");
            }
        }
        if let Some(p) = progress.as_deref_mut() {
            p.entry_done(i);
        }
    }

    logf!(
        "Class list: {} rows, {} records, {} dropped",
        page.rows_seen, page.records.len(), page.rows_failed
    );
    page
}

/// Count rows without extracting them.
pub fn count_rows(html_doc: &str) -> usize {
    Html::parse_document(html_doc).select(&ROW).count()
}

/// Turn one `.pdfClassListEntry` element into a record.
pub fn extract_row(row: ElementRef<'_>, base: Option<&Url>) -> Result<StudentRecord, RowError> {
    let mut rec = StudentRecord::new();

    if let Some(img) = row.select(&IMAGE).next() {
        if let Some(src) = img.value().attr("src").map(str::trim).filter(|s| !s.is_empty()) {
            rec.insert(KEY_IMAGE_LINK, resolve_link(src, base));
        }
        if let Some(id) = img.value().attr("alt").and_then(first_digits) {
            rec.insert(KEY_STUDENT_ID, id);
        }
    }

    if let Some(cell) = row.select(&DETAILS).next() {
        let inner = cell.inner_html();
        for fragment in split_br(&inner) {
            if let Some((key, value)) = parse_field(fragment) {
                rec.insert(key, value);
            }
        }
    }

    if rec.is_empty() {
        return Err(RowError::Empty);
    }

    normalize(&mut rec);
    Ok(rec)
}

/// `<b>Key: </b>value` → (Key, value). Values are decoded to plain text except
/// e-mail links, which collapse to the bare address.
pub fn parse_field(fragment: &str) -> Option<(String, String)> {
    let caps = FIELD.captures(fragment)?;
    let key = fragment_text(&caps[1]);
    if key.is_empty() {
        return None;
    }
    let raw = caps[2].trim();

    let value = if key == KEY_EMAIL && raw.contains("mailto:") {
        match MAILTO.captures(raw) {
            Some(m) => s!(m[1].trim()),
            None => fragment_text(raw),
        }
    } else {
        fragment_text(raw)
    };
    Some((key, value))
}

fn resolve_link(src: &str, base: Option<&Url>) -> String {
    match base.map(|b| b.join(src)) {
        Some(Ok(abs)) => abs.into(),
        Some(Err(e)) => {
            logd!("Could not resolve image link {src:?}: {e}");
            s!(src)
        }
        None => s!(src),
    }
}

/// Post-processing: name split, privacy flag, advisor list, code/title split.
pub fn normalize(rec: &mut StudentRecord) {
    if let Some(name) = non_empty_text(rec, KEY_NAME) {
        let mut parts = name.split(',');
        let last = parts.next().map(str::trim).map(str::to_string);
        let first = parts.next().map(str::trim).map(str::to_string);
        if let Some(last) = last {
            rec.insert(KEY_LAST, last);
        }
        if let Some(first) = first {
            rec.insert(KEY_FIRST, first);
        }
    }

    if let Some(privacy) = non_empty_text(rec, KEY_PRIVACY) {
        rec.insert(KEY_PRIVACY, privacy == "Y");
    }

    if let Some(advisors) = non_empty_text(rec, KEY_ADVISOR) {
        let list: Vec<String> = advisors.split(';').map(|a| s!(a.trim())).collect();
        rec.insert(KEY_ADVISOR, FieldValue::List(list));
    }

    for key in [KEY_PRIMARY_MAJOR, KEY_PRIMARY_DIVISION] {
        split_code_title(rec, key);
    }
}

fn non_empty_text(rec: &StudentRecord, key: &str) -> Option<String> {
    rec.text(key).filter(|v| !v.is_empty()).map(str::to_string)
}

/// `CIS (Computer Science)` → `CIS` plus a `<key> Title` field.
fn split_code_title(rec: &mut StudentRecord, key: &str) {
    let Some(value) = non_empty_text(rec, key) else { return };
    let Some(caps) = CODE_TITLE.captures(&value) else { return };
    let code = s!(&caps[1]);
    let title = s!(&caps[2]);
    rec.insert(key, code);
    rec.insert(join!(key, " Title"), title);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_fragment_parses() {
        assert_eq!(
            parse_field("<b>Name: </b>Franklin, Ben "),
            Some((s!("Name"), s!("Franklin, Ben")))
        );
        assert_eq!(parse_field("no label here"), None);
    }

    #[test]
    fn email_collapses_to_address() {
        let (k, v) = parse_field(r#"<b>EmailAddress: </b><a href="mailto:ben@upenn.edu">ben@upenn.edu</a>"#).unwrap();
        assert_eq!(k, "EmailAddress");
        assert_eq!(v, "ben@upenn.edu");
    }

    #[test]
    fn normalize_splits_everything() {
        let mut r = StudentRecord::new();
        r.insert("Name", "Franklin, Ben");
        r.insert("Privacy", "N");
        r.insert("Advisor", "Smith, A; Jones, B ;");
        r.insert("Primary Major", "CIS (Computer Science)");
        r.insert("Primary Division", "EAS");
        normalize(&mut r);

        assert_eq!(r.text("Last"), Some("Franklin"));
        assert_eq!(r.text("First"), Some("Ben"));
        assert_eq!(r.get("Privacy"), Some(&FieldValue::Flag(false)));
        assert_eq!(
            r.get("Advisor"),
            Some(&FieldValue::List(vec![s!("Smith, A"), s!("Jones, B"), s!("")]))
        );
        assert_eq!(r.text("Primary Major"), Some("CIS"));
        assert_eq!(r.text("Primary Major Title"), Some("Computer Science"));
        assert_eq!(r.text("Primary Division"), Some("EAS"));
        assert!(r.get("Primary Division Title").is_none());
    }

    #[test]
    fn name_without_comma_has_no_first() {
        let mut r = StudentRecord::new();
        r.insert("Name", "Cher");
        normalize(&mut r);
        assert_eq!(r.text("Last"), Some("Cher"));
        assert!(r.get("First").is_none());
    }

    #[test]
    fn empty_privacy_stays_text() {
        let mut r = StudentRecord::new();
        r.insert("Privacy", "");
        normalize(&mut r);
        assert_eq!(r.text("Privacy"), Some(""));
    }
}
