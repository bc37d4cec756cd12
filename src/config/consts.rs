// src/config/consts.rs

// Page structure
pub const ROW_SELECTOR: &str = ".pdfClassListEntry";
pub const IMAGE_SELECTOR: &str = ".pdfImage";
pub const DETAILS_SELECTOR: &str = "td.TableRecords_EvenLine:not(.pdfImageTd)";
pub const SECTION_HINT_SELECTOR: &str = "title, h1, h2, h3, span, td";

// Field names
pub const KEY_IMAGE_LINK: &str = "imageLink";
pub const KEY_STUDENT_ID: &str = "studentId";
pub const KEY_IMAGE_BLOB: &str = "imageBlob";
pub const KEY_NAME: &str = "Name";
pub const KEY_LAST: &str = "Last";
pub const KEY_FIRST: &str = "First";
pub const KEY_EMAIL: &str = "EmailAddress";
pub const KEY_PRIVACY: &str = "Privacy";
pub const KEY_ADVISOR: &str = "Advisor";
pub const KEY_PRIMARY_MAJOR: &str = "Primary Major";
pub const KEY_PRIMARY_DIVISION: &str = "Primary Division";
pub const KEY_REGISTERED_SECTION: &str = "Registered Section";
pub const KEY_SECTION: &str = "Section";
pub const KEY_COURSE: &str = "Course";
pub const KEY_SECTION_NUMBER: &str = "Section Number";

// Net
pub const USER_AGENT: &str = concat!("penn_classlist/", env!("CARGO_PKG_VERSION"));
pub const CONNECT_TIMEOUT_SECS: u64 = 10;
pub const REQUEST_TIMEOUT_SECS: u64 = 20;

// Concurrency
pub const WORKERS: usize = 4;

// Export
pub const DEFAULT_OUT_DIR: &str = ".";
pub const FILE_STEM: &str = "penn_class_list_data";
pub const FILE_EXT: &str = "json";
/// Generated names stay well under the common 255-byte filesystem limit,
/// leaving room for a ` (N)` suffix.
pub const MAX_FILENAME_BYTES: usize = 200;
pub const JSON_INDENT: &[u8] = b"    ";
