// src/specs/mod.rs
//! # Page specs
//!
//! Page-specific extraction rules. A spec knows *where the ground truth lives in
//! the HTML* for one report page and how to read it; it never does I/O.
//!
//! ## What lives here
//! - Selector choice (`.pdfClassListEntry` rows, the photo cell, the details cell).
//! - Field parsing of `<b>Key: </b>value` fragments and their normalization.
//!
//! ## What does **not** live here
//! - Image fetching (`images`), section grouping (`section`), writing files (`file`).
//!
//! ## Typical call chain
//! ```text
//! cli → scrape::collect_class_list → specs::class_list::parse_doc
//!                                  ↘ images::attach_images
//!                    file::write_export (outside of specs)
//! ```
//!
//! Specs are tested offline against inline fixtures.
pub mod class_list;
