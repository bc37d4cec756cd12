// src/section.rs
//! Section identity for class-list rows.
//!
//! A row usually names its section in `Registered Section`, but older report
//! layouts only carry `Section`, or a `Course` + `Section Number` pair, and some
//! exports drop the field entirely and only show the section in the page
//! heading. [`section_of`] walks those sources in that order.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::config::consts::{
    KEY_COURSE, KEY_REGISTERED_SECTION, KEY_SECTION, KEY_SECTION_NUMBER, ROW_SELECTOR,
    SECTION_HINT_SELECTOR,
};
use crate::core::html::{element_text, sel};
use crate::record::StudentRecord;

static HINT: LazyLock<Selector> = LazyLock::new(|| sel(SECTION_HINT_SELECTOR));
static ROW: LazyLock<Selector> = LazyLock::new(|| sel(ROW_SELECTOR));

static EXACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*([a-z]{2,5})\s*[- ]?\s*(\d{3,4})\s*[- ]?\s*(\d{3})\s*$").expect("section pattern")
});

static EMBEDDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]{2,5})[ -]?(\d{3,4})[ -]?(\d{3})\b").expect("embedded section pattern")
});

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SectionParts {
    pub subject: String,
    pub course: String,
    pub number: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SectionId {
    raw: String,
    parts: Option<SectionParts>,
}

impl SectionId {
    /// Parse `SUBJ 1200 001` / `SUBJ-1200-001` / `SUBJ1200001`.
    /// Anything else is kept verbatim (trimmed) without parts.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let parts = EXACT.captures(raw).map(|c| SectionParts {
            subject: c[1].to_ascii_uppercase(),
            course: s!(&c[2]),
            number: s!(&c[3]),
        });
        Self { raw: s!(raw), parts }
    }

    /// First section-looking token inside free text.
    pub fn find_in(text: &str) -> Option<Self> {
        let m = EMBEDDED.find(text)?;
        Some(Self::parse(m.as_str()))
    }

    pub fn raw(&self) -> &str { &self.raw }

    pub fn parts(&self) -> Option<&SectionParts> { self.parts.as_ref() }

    /// Canonical `SUBJ-1200-001` when parsed, otherwise the raw text.
    pub fn display(&self) -> String {
        match &self.parts {
            Some(p) => format!("{}-{}-{}", p.subject, p.course, p.number),
            None => self.raw.clone(),
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

fn non_empty<'a>(rec: &'a StudentRecord, key: &str) -> Option<&'a str> {
    rec.text(key).map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve a record's section, falling back to the page-level hint.
pub fn section_of(rec: &StudentRecord, page_hint: Option<&SectionId>) -> Option<SectionId> {
    if let Some(v) = non_empty(rec, KEY_REGISTERED_SECTION) {
        return Some(SectionId::parse(v));
    }
    if let Some(v) = non_empty(rec, KEY_SECTION) {
        return Some(SectionId::parse(v));
    }
    if let Some(course) = non_empty(rec, KEY_COURSE) {
        let raw = match non_empty(rec, KEY_SECTION_NUMBER) {
            Some(num) => join!(course, " ", num),
            None => s!(course),
        };
        return Some(SectionId::parse(&raw));
    }
    page_hint.cloned()
}

/// Section named in the page chrome (title, headings, labels), if any.
/// Student rows are not chrome: cells inside a row, and layout cells wrapping
/// rows, are never read.
pub fn page_section_hint(doc: &Html) -> Option<SectionId> {
    let hint = doc
        .select(&HINT)
        .filter(|el| !touches_row(*el))
        .find_map(|el| SectionId::find_in(&element_text(el)));
    if let Some(h) = &hint {
        logd!("Section hint from page: {h}");
    }
    hint
}

fn touches_row(el: ElementRef<'_>) -> bool {
    ROW.matches(&el)
        || el.ancestors().filter_map(ElementRef::wrap).any(|a| ROW.matches(&a))
        || el.select(&ROW).next().is_some()
}

pub struct SectionGroup<'a> {
    pub section: Option<SectionId>,
    pub records: Vec<&'a StudentRecord>,
}

/// Group records by section, first-seen order. Records with no section at all
/// land in one trailing group whose `section` is `None`.
pub fn group_by_section<'a>(
    records: &'a [StudentRecord],
    page_hint: Option<&SectionId>,
) -> Vec<SectionGroup<'a>> {
    let mut groups: Vec<SectionGroup<'a>> = Vec::new();
    let mut orphans: Vec<&'a StudentRecord> = Vec::new();

    for rec in records {
        match section_of(rec, page_hint) {
            Some(id) => {
                let key = id.display();
                match groups.iter_mut().find(|g| g.section.as_ref().map(SectionId::display).as_deref() == Some(key.as_str())) {
                    Some(g) => g.records.push(rec),
                    None => groups.push(SectionGroup { section: Some(id), records: vec![rec] }),
                }
            }
            None => orphans.push(rec),
        }
    }

    if !orphans.is_empty() {
        groups.push(SectionGroup { section: None, records: orphans });
    }
    groups
}

/// Distinct section displays, first-seen order.
pub fn unique_sections(records: &[StudentRecord], page_hint: Option<&SectionId>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for rec in records {
        if let Some(id) = section_of(rec, page_hint) {
            let d = id.display();
            if !out.contains(&d) {
                out.push(d);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_layouts() {
        for raw in ["CIS 1200 001", "CIS-1200-001", "cis1200001", " CIS - 1200 - 001 "] {
            let id = SectionId::parse(raw);
            assert_eq!(id.display(), "CIS-1200-001", "{raw}");
        }
        let old = SectionId::parse("MATH 104 002");
        assert_eq!(old.parts().map(|p| p.course.as_str()), Some("104"));
    }

    #[test]
    fn unparsed_kept_verbatim() {
        let id = SectionId::parse("  Independent Study ");
        assert!(id.parts().is_none());
        assert_eq!(id.display(), "Independent Study");
    }

    #[test]
    fn finds_section_in_heading_text() {
        let id = SectionId::find_in("Class List for ECON 0100 201 (Spring)").unwrap();
        assert_eq!(id.display(), "ECON-0100-201");
        assert!(SectionId::find_in("Student ID 12345678").is_none());
    }

    #[test]
    fn fallbacks_in_order() {
        let hint = SectionId::parse("HIST 0100 001");

        let mut r = StudentRecord::new();
        assert_eq!(section_of(&r, Some(&hint)).unwrap().display(), "HIST-0100-001");

        r.insert(KEY_COURSE, "PHYS 0150");
        r.insert(KEY_SECTION_NUMBER, "003");
        assert_eq!(section_of(&r, Some(&hint)).unwrap().display(), "PHYS-0150-003");

        r.insert(KEY_SECTION, "PHYS-0150-004");
        assert_eq!(section_of(&r, None).unwrap().display(), "PHYS-0150-004");

        r.insert(KEY_REGISTERED_SECTION, "PHYS 0150 005");
        assert_eq!(section_of(&r, None).unwrap().display(), "PHYS-0150-005");
    }

    #[test]
    fn empty_field_falls_through() {
        let mut r = StudentRecord::new();
        r.insert(KEY_REGISTERED_SECTION, "  ");
        assert!(section_of(&r, None).is_none());
    }
}
