// src/json.rs
use std::io::Write;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::config::consts::JSON_INDENT;
use crate::error::Result;

/// Pretty JSON with 4-space indentation to any writer.
pub fn write_json<W: Write, T: Serialize + ?Sized>(w: W, value: &T) -> Result<()> {
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut ser = Serializer::with_formatter(w, formatter);
    value.serialize(&mut ser)?;
    Ok(())
}

/// Serialize records (or any slice of them) as a JSON array.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    write_json(&mut buf, value)?;
    // serde_json only emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StudentRecord;

    #[test]
    fn four_space_indent() {
        let mut r = StudentRecord::new();
        r.insert("Name", "Franklin, Ben");
        let out = to_json(&vec![r]).unwrap();
        assert_eq!(out, "[\n    {\n        \"Name\": \"Franklin, Ben\"\n    }\n]");
    }

    #[test]
    fn empty_list() {
        let none: Vec<StudentRecord> = Vec::new();
        assert_eq!(to_json(&none).unwrap(), "[]");
    }
}
