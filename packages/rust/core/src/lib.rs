//! Pipeline orchestration for skillmap.
//!
//! Ties the document source, record extractor and reference matcher into a
//! single run (`Engine::run`) that yields an [`ExtractionReport`], plus the
//! presentation view and report writers built on top of it.

pub mod pipeline;
pub mod presentation;
pub mod report;

pub use pipeline::{
    Engine, ExtractionReport, ProgressReporter, SilentProgress, SourceDocument, open_document,
};
pub use presentation::{DomainSection, MasteryCounts, SubdomainSection, present, render_text};
pub use report::{WrittenFile, to_json, write_atomic, write_report};
