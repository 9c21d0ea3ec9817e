//! Field-level parsing shared by the table and text paths.

use std::sync::LazyLock;

use regex::Regex;

use skillmap_shared::{Domain, MasteryStatus};

/// Matches `Domain: subdomain` at the start of a label.
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(Adaptive|Social-Emotional|Motor|Cognitive):\s*(.+)").expect("label regex")
});

/// Domain names whose presence marks a cell as a `Domain: subdomain` label.
const DOMAIN_HINTS: [&str; 4] = ["adaptive", "social", "motor", "cognitive"];

/// Words that rule a cell out as the tail of a wrapped label.
const NON_LABEL_WORDS: [&str; 6] = ["mastered", "emerging", "future", "the ", "a ", "an "];

/// Raw (label, skill, mastery) triple pulled from a row or line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFields {
    pub label: String,
    pub skill: String,
    pub mastery: String,
}

impl RowFields {
    pub fn new(label: impl Into<String>, skill: impl Into<String>, mastery: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            skill: skill.into(),
            mastery: mastery.into(),
        }
    }
}

/// Split a `Domain: subdomain` label into its canonical domain and the raw
/// subdomain text. Returns `None` for anything else.
pub fn parse_label(label: &str) -> Option<(Domain, &str)> {
    let caps = LABEL_RE.captures(label.trim())?;
    let domain = Domain::from_token(caps.get(1)?.as_str())?;
    let rest = caps.get(2)?.as_str().trim();
    Some((domain, rest))
}

/// Classify a mastery cell by containment; MASTERED beats EMERGING beats FUTURE.
pub fn classify_mastery(text: &str) -> Option<MasteryStatus> {
    let upper = text.to_uppercase();
    if upper.contains("MASTERED") {
        Some(MasteryStatus::Mastered)
    } else if upper.contains("EMERGING") {
        Some(MasteryStatus::Emerging)
    } else if upper.contains("FUTURE") {
        Some(MasteryStatus::FutureLearningObjective)
    } else {
        None
    }
}

/// Column header rows repeat on every page of the table.
pub fn is_header(fields: &RowFields) -> bool {
    fields.label.to_uppercase().contains("DOMAIN") || fields.skill.to_uppercase().contains("SKILL")
}

/// A cell that carries a colon and names one of the four domains.
pub fn has_domain_signal(cell: &str) -> bool {
    if !cell.contains(':') {
        return false;
    }
    let lower = cell.to_lowercase();
    DOMAIN_HINTS.iter().any(|d| lower.contains(d))
}

/// Short text with no status words or articles: the wrapped tail of a label.
pub fn is_label_continuation(cell: &str, max_len: usize) -> bool {
    if cell.is_empty() || cell.chars().count() >= max_len {
        return false;
    }
    let lower = cell.to_lowercase();
    !NON_LABEL_WORDS.iter().any(|w| lower.contains(w))
}
