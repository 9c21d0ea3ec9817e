//! Row-shape matchers for the tabular path.
//!
//! The report's tables come out of the PDF in several column layouts. Each
//! layout is a [`RowShape`]; [`ROW_SHAPES`] lists them in priority order and
//! the first shape that accepts a row decides which cells hold the label,
//! the skill and the mastery status.

use crate::fields::{RowFields, has_domain_signal, is_label_continuation};

/// Known column layouts, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape {
    /// `[Domain: Sub, label tail, skill, mastery, ...]`: the subdomain name
    /// wrapped into the second column.
    WrappedLabel,
    /// `[Domain: Sub, skill, mastery, ...]` with extra trailing columns.
    SplitLabel,
    /// `[label, skill, mastery, ...]`.
    Direct,
}

/// Shapes in dispatch order.
pub const ROW_SHAPES: [RowShape; 3] = [RowShape::WrappedLabel, RowShape::SplitLabel, RowShape::Direct];

impl RowShape {
    /// Pull fields out of trimmed cells if this shape applies.
    pub fn fields(self, cells: &[String], continuation_max_len: usize) -> Option<RowFields> {
        match self {
            Self::WrappedLabel => {
                if cells.len() < 4
                    || !has_domain_signal(&cells[0])
                    || !is_label_continuation(&cells[1], continuation_max_len)
                {
                    return None;
                }
                Some(RowFields::new(
                    format!("{} {}", cells[0], cells[1]),
                    cells[2].clone(),
                    cells[3].clone(),
                ))
            }
            Self::SplitLabel => {
                if cells.len() < 4 || !has_domain_signal(&cells[0]) {
                    return None;
                }
                Some(RowFields::new(cells[0].clone(), cells[1].clone(), cells[2].clone()))
            }
            Self::Direct => {
                if cells.len() < 3 {
                    return None;
                }
                Some(RowFields::new(cells[0].clone(), cells[1].clone(), cells[2].clone()))
            }
        }
    }
}

/// Trim cells, mapping missing cells to empty strings.
pub fn clean_cells(row: &[Option<String>]) -> Vec<String> {
    row.iter()
        .map(|cell| cell.as_deref().unwrap_or("").trim().to_string())
        .collect()
}

/// Run the shape list over a row. Rows with fewer than two non-empty cells
/// never match.
pub fn dispatch(cells: &[String], continuation_max_len: usize) -> Option<(RowShape, RowFields)> {
    if cells.iter().filter(|c| !c.is_empty()).count() < 2 {
        return None;
    }
    ROW_SHAPES
        .iter()
        .find_map(|shape| shape.fields(cells, continuation_max_len).map(|f| (*shape, f)))
}
