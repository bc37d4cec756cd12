// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod specs;

pub mod file;
pub mod images;
pub mod json;
pub mod progress;
pub mod record;
pub mod scrape;
pub mod section;

pub use error::{Error, Result};
pub use record::{FieldValue, StudentRecord};
pub use scrape::{collect_class_list, ClassList};
