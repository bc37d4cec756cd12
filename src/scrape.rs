// src/scrape.rs
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use reqwest::blocking::Client;
use url::Url;

use crate::{
    config::options::ScrapeOptions,
    core::net,
    error::{Error, Result},
    images::{self, ImageFetcher},
    progress::{reborrow, Progress},
    record::StudentRecord,
    section::{self, SectionGroup, SectionId},
    specs::class_list,
};

/// Where the report HTML comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Stdin,
    Url(Url),
}

impl Source {
    /// `-` is stdin, `http(s)://…` is fetched, anything else is a path.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::InvalidInput(s!("empty input")));
        }
        if input == "-" {
            return Ok(Source::Stdin);
        }
        let lower = input.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(Source::Url(Url::parse(input)?));
        }
        Ok(Source::File(PathBuf::from(input)))
    }

    /// Default base for relative image links.
    pub fn base_url(&self) -> Option<&Url> {
        match self {
            Source::Url(u) => Some(u),
            _ => None,
        }
    }

    pub fn read(&self, client: &Client) -> Result<String> {
        match self {
            Source::File(path) => {
                let bytes = fs::read(path)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            Source::Stdin => {
                let mut bytes = Vec::new();
                std::io::stdin().read_to_end(&mut bytes)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            Source::Url(u) => net::http_get_text(client, u.as_str()),
        }
    }
}

/// Result of one scrape run.
#[derive(Debug)]
pub struct ClassList {
    pub records: Vec<StudentRecord>,
    pub section_hint: Option<SectionId>,
    pub rows_seen: usize,
    pub rows_failed: usize,
}

impl ClassList {
    pub fn sections(&self) -> Vec<String> {
        section::unique_sections(&self.records, self.section_hint.as_ref())
    }

    pub fn groups(&self) -> Vec<SectionGroup<'_>> {
        section::group_by_section(&self.records, self.section_hint.as_ref())
    }
}

/// Parse the page and, unless disabled, inline every photo.
/// `fetcher` may be `None` when images are off.
pub fn collect_class_list(
    html_doc: &str,
    opts: &ScrapeOptions,
    fetcher: Option<&dyn ImageFetcher>,
    mut progress: Option<&mut dyn Progress>,
) -> Result<ClassList> {
    if let Some(p) = progress.as_deref_mut() {
        p.status("Extracting class list…");
    }

    let page = class_list::parse_doc_with_progress(
        html_doc,
        opts.base_url.as_ref(),
        reborrow(&mut progress),
    );
    if page.rows_seen == 0 {
        logw!("No class list data found. Ensure a search has been run before saving the page.");
        if let Some(p) = progress.as_deref_mut() {
            p.status("No class list data found.");
            p.finish();
        }
        return Err(Error::NoClassList);
    }

    let mut records = page.records;

    match (opts.fetch_images, fetcher) {
        (true, Some(f)) => {
            if let Some(p) = progress.as_deref_mut() {
                p.status("Fetching images…");
            }
            images::attach_images(&mut records, f, opts.workers, reborrow(&mut progress));
        }
        (true, None) => logw!("Image fetching requested but no fetcher available; skipping"),
        (false, _) => logd!("Image fetching disabled"),
    }

    if let Some(p) = progress.as_deref_mut() {
        p.status("Extraction complete.");
        p.finish();
    }

    Ok(ClassList {
        records,
        section_hint: page.section_hint,
        rows_seen: page.rows_seen,
        rows_failed: page.rows_failed,
    })
}
