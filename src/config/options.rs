// src/config/options.rs
use std::path::PathBuf;

use url::Url;

use super::consts::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub export: ExportOptions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Resolve relative `<img src>` against this. Defaults to the page URL when fetched.
    pub base_url: Option<Url>,
    /// Sent as the `Cookie` header for page and image requests.
    pub cookie: Option<String>,
    pub fetch_images: bool,
    pub workers: usize,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            cookie: None,
            fetch_images: true,
            workers: WORKERS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportType {
    SingleFile,
    PerSection,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub export_type: ExportType,
    pub out_dir: PathBuf,
    /// Overrides the derived filename (single-file export only).
    pub file_name: Option<String>,
    pub overwrite: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            export_type: ExportType::SingleFile,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_name: None,
            overwrite: false,
        }
    }
}

impl ExportOptions {
    /// Apply a user-supplied filename, forcing the `.json` extension.
    pub fn set_file_name(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.file_name = None;
            return;
        }
        let stem = name
            .strip_suffix(&join!(".", FILE_EXT))
            .unwrap_or(name);
        self.file_name = Some(join!(stem, ".", FILE_EXT));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_gets_json_extension_once() {
        let mut e = ExportOptions::default();
        e.set_file_name("roster");
        assert_eq!(e.file_name.as_deref(), Some("roster.json"));
        e.set_file_name("roster.json");
        assert_eq!(e.file_name.as_deref(), Some("roster.json"));
        e.set_file_name("   ");
        assert_eq!(e.file_name, None);
    }
}
