// tests/export_e2e.rs
use std::fs;
use std::path::PathBuf;

use penn_classlist::config::options::{ExportOptions, ExportType, ScrapeOptions};
use penn_classlist::file::write_export;
use penn_classlist::{collect_class_list, ClassList};
use serde_json::Value;

const PAGE: &str = include_str!("fixtures/class_list.html");

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("classlist_e2e_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

fn class_list() -> ClassList {
    let opts = ScrapeOptions { fetch_images: false, ..Default::default() };
    collect_class_list(PAGE, &opts, None, None).unwrap()
}

#[test]
fn single_file_named_after_sections() {
    let dir = tmp_dir("single");
    let export = ExportOptions { out_dir: dir.clone(), ..Default::default() };

    let written = write_export(&export, &class_list()).unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(
        written[0].file_name().unwrap().to_string_lossy(),
        "penn_class_list_data_CIS-1200-001_CIS-1200-002.json"
    );

    let text = fs::read_to_string(&written[0]).unwrap();
    assert!(text.starts_with("[\n    {\n        \"imageLink\""));

    let json: Value = serde_json::from_str(&text).unwrap();
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["Privacy"], Value::Bool(false));
    assert_eq!(arr[1]["Privacy"], Value::Bool(true));
    assert_eq!(arr[0]["Advisor"][1], "Jones, Bob");
    assert_eq!(arr[0]["First"], "Benjamin");
}

#[test]
fn existing_file_is_not_overwritten_by_default() {
    let dir = tmp_dir("collide");
    let mut export = ExportOptions { out_dir: dir.clone(), ..Default::default() };
    export.set_file_name("roster");
    let list = class_list();

    let first = write_export(&export, &list).unwrap();
    let second = write_export(&export, &list).unwrap();
    assert!(first[0].ends_with("roster.json"));
    assert!(second[0].ends_with("roster (2).json"));

    export.overwrite = true;
    let third = write_export(&export, &list).unwrap();
    assert!(third[0].ends_with("roster.json"));
}

#[test]
fn per_section_writes_one_file_each() {
    let dir = tmp_dir("per_section");
    let export = ExportOptions {
        out_dir: dir.clone(),
        export_type: ExportType::PerSection,
        ..Default::default()
    };

    let written = write_export(&export, &class_list()).unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "penn_class_list_data_CIS-1200-001.json".to_string(),
            "penn_class_list_data_CIS-1200-002.json".to_string(),
        ]
    );

    let first: Value = serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
    assert_eq!(first.as_array().unwrap().len(), 2);
}

#[test]
fn output_dir_is_created() {
    let dir = tmp_dir("nested").join("a").join("b");
    let export = ExportOptions { out_dir: dir.clone(), ..Default::default() };
    let written = write_export(&export, &class_list()).unwrap();
    assert!(dir.is_dir());
    assert!(written[0].starts_with(&dir));
}

#[test]
fn many_sections_still_write_one_file() {
    let rows: String = (0..25)
        .map(|i| {
            format!(
                r#"<tr class="pdfClassListEntry"><td class="TableRecords_EvenLine">
                <b>Name: </b>Student, Number{i}<br>
                <b>Registered Section: </b>CIS 1200 {:03}<br></td></tr>"#,
                200 + i
            )
        })
        .collect();
    let html = format!("<html><body><table><tbody>{rows}</tbody></table></body></html>");
    let opts = ScrapeOptions { fetch_images: false, ..Default::default() };
    let list = collect_class_list(&html, &opts, None, None).unwrap();
    assert_eq!(list.sections().len(), 25);

    let dir = tmp_dir("many_sections");
    let export = ExportOptions { out_dir: dir.clone(), ..Default::default() };
    let written = write_export(&export, &list).unwrap();

    let name = written[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.len() <= 200, "{name}");
    assert!(name.ends_with("_more.json"));
    let json: Value = serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 25);
}
