// src/record.rs
//! One student row, as an ordered set of named fields.
//!
//! Field order matters for the exported JSON: keys come out in the order they
//! were first inserted, and overwriting a key keeps its original position.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::consts::{KEY_IMAGE_BLOB, KEY_IMAGE_LINK, KEY_STUDENT_ID};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    List(Vec<String>),
    Null,
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self { FieldValue::Text(s!(s)) }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self { FieldValue::Text(s) }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self { FieldValue::Flag(b) }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self { FieldValue::List(v) }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => ser.serialize_str(s),
            FieldValue::Flag(b) => ser.serialize_bool(*b),
            FieldValue::List(v) => v.serialize(ser),
            FieldValue::Null => ser.serialize_none(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StudentRecord {
    fields: Vec<(String, FieldValue)>,
}

impl StudentRecord {
    pub fn new() -> Self { Self::default() }

    /// Insert or overwrite in place.
    pub fn insert<K: Into<String>, V: Into<FieldValue>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Text value of `key`; `None` for missing or non-text fields.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    pub fn image_link(&self) -> Option<&str> { self.text(KEY_IMAGE_LINK) }

    pub fn student_id(&self) -> Option<&str> { self.text(KEY_STUDENT_ID) }

    pub fn set_image_blob(&mut self, blob: Option<String>) {
        match blob {
            Some(data_url) => self.insert(KEY_IMAGE_BLOB, data_url),
            None => self.insert(KEY_IMAGE_BLOB, FieldValue::Null),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }
}

impl Serialize for StudentRecord {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_keeps_position() {
        let mut r = StudentRecord::new();
        r.insert("A", "1");
        r.insert("B", "2");
        r.insert("A", "3");
        assert_eq!(r.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(r.text("A"), Some("3"));
    }

    #[test]
    fn serializes_in_insertion_order() {
        let mut r = StudentRecord::new();
        r.insert("Zed", "z");
        r.insert("Privacy", true);
        r.insert("Advisor", vec![s!("X"), s!("Y")]);
        r.set_image_blob(None);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"Zed":"z","Privacy":true,"Advisor":["X","Y"],"imageBlob":null}"#);
    }
}
