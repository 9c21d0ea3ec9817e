//! Page dumps written by an upstream PDF extraction step.
//!
//! Two formats are understood:
//! - JSON: `{"source": "...", "pages": [{"tables": [...], "text": "...", "error": "..."}]}`.
//!   A page carrying `error` was unreadable upstream.
//! - Plain text: pages separated by form feeds (`\x0c`), as `pdftotext` writes
//!   them. Text only, no tables.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use skillmap_shared::{Result, SkillmapError};

use crate::page::{Page, PageSource, Table};

/// Form feed, the page separator in text dumps.
const PAGE_BREAK: char = '\u{c}';

/// On-disk format of a page dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    Json,
    Text,
}

impl DumpFormat {
    /// `.json` files are JSON dumps; anything else is read as text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonDump {
    #[serde(default)]
    source: Option<String>,
    pages: Vec<JsonDumpPage>,
}

#[derive(Debug, Deserialize)]
struct JsonDumpPage {
    #[serde(default)]
    tables: Vec<Table>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// A fully loaded document: each slot is a page or the reason it is unreadable.
#[derive(Debug, Clone)]
pub struct PageDump {
    name: String,
    pages: Vec<std::result::Result<Page, String>>,
}

impl PageDump {
    pub fn new(name: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            name: name.into(),
            pages: pages.into_iter().map(Ok).collect(),
        }
    }

    /// Build from slots that may mark individual pages unreadable.
    pub fn from_slots(
        name: impl Into<String>,
        pages: Vec<std::result::Result<Page, String>>,
    ) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }

    /// Read and parse a dump file, picking the format from its extension.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| SkillmapError::io(path, e))?;
        let name = path.display().to_string();
        Self::parse(DumpFormat::from_path(path), name, &bytes)
    }

    /// Parse dump bytes in the given format.
    #[instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn parse(format: DumpFormat, name: String, bytes: &[u8]) -> Result<Self> {
        let dump = match format {
            DumpFormat::Json => Self::parse_json(name, bytes)?,
            DumpFormat::Text => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| SkillmapError::parse(format!("{name}: not UTF-8 text: {e}")))?;
                Self::parse_text(name, text)
            }
        };
        debug!(name = %dump.name, pages = dump.pages.len(), "page dump loaded");
        Ok(dump)
    }

    fn parse_json(name: String, bytes: &[u8]) -> Result<Self> {
        let raw: JsonDump = serde_json::from_slice(bytes)
            .map_err(|e| SkillmapError::parse(format!("{name}: invalid page dump: {e}")))?;

        let pages = raw
            .pages
            .into_iter()
            .map(|p| match p.error {
                Some(reason) => Err(reason),
                None => Ok(Page {
                    tables: p.tables,
                    text: p.text,
                }),
            })
            .collect();

        Ok(Self {
            name: raw.source.unwrap_or(name),
            pages,
        })
    }

    fn parse_text(name: String, text: &str) -> Self {
        let mut segments: Vec<&str> = text.split(PAGE_BREAK).collect();
        // pdftotext terminates every page, leaving an empty tail.
        if segments.len() > 1 && segments.last().is_some_and(|s| s.trim().is_empty()) {
            segments.pop();
        }

        let pages = segments
            .into_iter()
            .map(|segment| {
                Ok(Page {
                    tables: Vec::new(),
                    text: (!segment.trim().is_empty()).then(|| segment.to_string()),
                })
            })
            .collect();

        Self { name, pages }
    }
}

impl PageSource for PageDump {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<Page> {
        match self.pages.get(index) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(reason)) => Err(SkillmapError::document(index, reason.clone())),
            None => Err(SkillmapError::document(
                index,
                format!("page index out of range (document has {})", self.pages.len()),
            )),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
