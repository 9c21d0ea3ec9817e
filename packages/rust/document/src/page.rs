//! Page model and the page source trait.

use serde::{Deserialize, Serialize};

use skillmap_shared::Result;

/// One table row: cells in reading order, `None` for cells the upstream
/// extractor could not fill.
pub type Row = Vec<Option<String>>;

/// One extracted table: rows in reading order.
pub type Table = Vec<Row>;

/// Page-level extraction output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Tables found on the page (empty if none).
    #[serde(default)]
    pub tables: Vec<Table>,
    /// Plain text of the page, if any was extracted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Page {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            tables: Vec::new(),
            text: Some(text.into()),
        }
    }

    pub fn from_table(table: Table) -> Self {
        Self {
            tables: vec![table],
            text: None,
        }
    }

    /// No tables and no non-blank text.
    pub fn is_blank(&self) -> bool {
        self.tables.is_empty() && self.text.as_deref().is_none_or(|t| t.trim().is_empty())
    }
}

/// A document that yields pages by index, in reading order.
///
/// `page` is only called for indexes below `page_count`. An `Err` means the
/// page exists but could not be read.
pub trait PageSource: Send + Sync {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Extract one page.
    fn page(&self, index: usize) -> Result<Page>;

    /// Human-readable source name for tracing and reports.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_pages() {
        assert!(Page::default().is_blank());
        assert!(Page::from_text("  \n\t").is_blank());
        assert!(!Page::from_text("Motor: Fine | Copies circle | MASTERED").is_blank());
        assert!(!Page::from_table(vec![vec![None]]).is_blank());
    }

    #[test]
    fn page_json_shape() {
        let page: Page = serde_json::from_str(
            r#"{"tables": [[["Motor: Fine Motor", null, "MASTERED"]]]}"#,
        )
        .expect("deserialize");
        assert_eq!(page.tables[0][0][1], None);
        assert!(page.text.is_none());
    }
}
