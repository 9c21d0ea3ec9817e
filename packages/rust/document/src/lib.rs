//! Document source collaborator.
//!
//! The extractor never touches PDFs directly: it reads pages through
//! [`PageSource`], which yields each page's tables and plain text in reading
//! order. [`PageDump`] implements it over JSON or form-feed separated text
//! dumps produced by an upstream page-extraction step.

mod dump;
mod page;

pub use dump::{DumpFormat, PageDump};
pub use page::{Page, PageSource, Row, Table};
