// src/file.rs

use std::{
    collections::HashMap,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::config::consts::{FILE_EXT, FILE_STEM, MAX_FILENAME_BYTES};
use crate::config::options::{ExportOptions, ExportType};
use crate::core::sanitize::sanitize_filename_part;
use crate::error::{Error, Result};
use crate::json::write_json;
use crate::scrape::ClassList;

const UNSECTIONED: &str = "unsectioned";

/// `penn_class_list_data_<S1>_<S2>.json`, or the bare stem when no section
/// survives sanitizing. Duplicates are dropped, first-seen order kept.
/// Past [`MAX_FILENAME_BYTES`] the tail is cut to `_and_<N>_more`.
pub fn generate_filename<S: AsRef<str>>(sections: &[S]) -> String {
    let mut parts: Vec<String> = Vec::new();
    for s in sections {
        let part = sanitize_filename_part(s.as_ref());
        if !part.is_empty() && !parts.contains(&part) {
            parts.push(part);
        }
    }
    if parts.is_empty() {
        return join!(FILE_STEM, ".", FILE_EXT);
    }

    let full = format!("{FILE_STEM}_{}.{FILE_EXT}", parts.join("_"));
    if full.len() <= MAX_FILENAME_BYTES {
        return full;
    }

    // Reserve the widest suffix this list could need
    let reserve = format!("_and_{}_more", parts.len()).len();
    let mut name = s!(FILE_STEM);
    let mut kept = 0;
    for part in &parts {
        if name.len() + 1 + part.len() + reserve + 1 + FILE_EXT.len() > MAX_FILENAME_BYTES {
            break;
        }
        name.push('_');
        name.push_str(part);
        kept += 1;
    }
    let omitted = parts.len() - kept;
    logd!("Filename shortened: {omitted} of {} sections left out", parts.len());
    format!("{name}_and_{omitted}_more.{FILE_EXT}")
}

/// Write the class list according to `export`. Returns every path written.
pub fn write_export(export: &ExportOptions, list: &ClassList) -> Result<Vec<PathBuf>> {
    ensure_directory(&export.out_dir)?;
    let mut seen: HashMap<String, usize> = HashMap::new();

    match export.export_type {
        ExportType::SingleFile => {
            let name = export
                .file_name
                .clone()
                .unwrap_or_else(|| generate_filename(&list.sections()));
            let path = resolve_file_name(&export.out_dir, &name, &mut seen, export.overwrite);
            write_json_file(&path, &list.records)?;
            logf!("Wrote {} records to {}", list.records.len(), path.display());
            Ok(vec![path])
        }
        ExportType::PerSection => {
            let groups = list.groups();
            let mut written = Vec::with_capacity(groups.len());
            for group in &groups {
                let name = match &group.section {
                    Some(id) => generate_filename(&[id.display()]),
                    None => format!("{FILE_STEM}_{UNSECTIONED}.{FILE_EXT}"),
                };
                let path = resolve_file_name(&export.out_dir, &name, &mut seen, export.overwrite);
                write_json_file(&path, &group.records)?;
                logf!("Wrote {} records to {}", group.records.len(), path.display());
                written.push(path);
            }
            Ok(written)
        }
    }
}

fn write_json_file<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)?; // truncate/overwrite
    let mut out = BufWriter::new(file);
    write_json(&mut out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if dir.exists() && !dir.is_dir() {
        return Err(Error::InvalidInput(format!(
            "Path exists but is not a directory: {}", dir.display()
        )));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Pick a path for `file_name` in `dir`.
/// Repeats within this run, and files already on disk unless `overwrite`,
/// become `<stem> (N).<ext>` with N starting at 2.
pub fn resolve_file_name(
    dir: &Path,
    file_name: &str,
    seen_names: &mut HashMap<String, usize>,
    overwrite: bool,
) -> PathBuf {
    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((s, e)) if !s.is_empty() => (s, Some(e)),
        _ => (file_name, None),
    };
    let name_for = |n: usize| -> String {
        let base = if n <= 1 { s!(stem) } else { format!("{stem} ({n})") };
        match ext {
            Some(e) => join!(&base, ".", e),
            None => base,
        }
    };

    let count = seen_names.entry(s!(file_name)).or_insert(0);
    let mut n = *count + 1;
    loop {
        let candidate = dir.join(name_for(n));
        let taken_on_disk = !overwrite && candidate.exists();
        if !taken_on_disk {
            *count = n;
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_from_sections() {
        assert_eq!(generate_filename::<&str>(&[]), "penn_class_list_data.json");
        assert_eq!(
            generate_filename(&["CIS-1200-001", "CIS-1200-002", "CIS-1200-001"]),
            "penn_class_list_data_CIS-1200-001_CIS-1200-002.json"
        );
        assert_eq!(generate_filename(&["", "//"]), "penn_class_list_data.json");
    }

    #[test]
    fn many_sections_stay_under_name_limit() {
        let sections: Vec<String> = (0..25).map(|i| format!("CIS-1200-{:03}", 200 + i)).collect();
        let name = generate_filename(&sections);
        assert!(name.len() <= MAX_FILENAME_BYTES, "{} bytes: {name}", name.len());
        assert!(name.starts_with("penn_class_list_data_CIS-1200-200_CIS-1200-201_"));
        assert!(name.ends_with("_more.json"));

        let kept = name.matches("CIS-1200-").count();
        assert!(kept > 0 && kept < 25);
        assert!(name.contains(&format!("_and_{}_more", 25 - kept)));
    }

    #[test]
    fn oversized_single_section_is_cut() {
        let huge = "x".repeat(400);
        assert_eq!(generate_filename(&[huge]), "penn_class_list_data_and_1_more.json");
    }

    #[test]
    fn repeats_within_run_are_numbered() {
        let dir = std::env::temp_dir().join("classlist_resolve_unit_nonexistent");
        let mut seen = HashMap::new();
        let a = resolve_file_name(&dir, "x.json", &mut seen, false);
        let b = resolve_file_name(&dir, "x.json", &mut seen, false);
        assert!(a.ends_with("x.json"));
        assert!(b.ends_with("x (2).json"));
    }
}
