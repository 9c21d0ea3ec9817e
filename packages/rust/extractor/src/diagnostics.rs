//! Per-run extraction diagnostics.
//!
//! Owned by a single extraction call and returned with its results, so
//! concurrent runs never share counters.

use std::collections::BTreeMap;

use serde::Serialize;

use skillmap_shared::MatchTier;

/// Why a row or line produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Row/line layout matched no known shape.
    Shape,
    /// Column header row.
    Header,
    /// Label is not `Domain: subdomain`.
    UnrecognizedLabel,
    /// Mastery text holds no known status.
    MissingMastery,
    /// Skill text too short.
    ShortSkill,
}

/// Which path produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourcePath {
    Table,
    Text,
}

/// Counters and the unmatched-skill list for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionDiagnostics {
    pub pages_visited: usize,
    pub pages_with_tables: usize,
    pub pages_with_text: usize,
    pub table_rows_seen: usize,
    /// Text lines containing a `|` delimiter.
    pub text_lines_seen: usize,
    pub records_from_tables: usize,
    pub records_from_text: usize,
    pub dropped: BTreeMap<DropReason, usize>,
    pub tiers: BTreeMap<MatchTier, usize>,
    /// Subdomain labels that did not resolve to a canonical name.
    pub unresolved_subdomains: Vec<String>,
    /// Skills with no reference match, in document order (duplicates kept).
    pub unmatched: Vec<String>,
}

impl ExtractionDiagnostics {
    pub(crate) fn drop_row(&mut self, reason: DropReason) {
        *self.dropped.entry(reason).or_default() += 1;
    }

    pub(crate) fn record_kept(&mut self, path: SourcePath, tier: MatchTier, skill: &str) {
        match path {
            SourcePath::Table => self.records_from_tables += 1,
            SourcePath::Text => self.records_from_text += 1,
        }
        *self.tiers.entry(tier).or_default() += 1;
        if tier == MatchTier::Unmatched {
            self.unmatched.push(skill.to_string());
        }
    }

    pub(crate) fn unresolved_subdomain(&mut self, label: &str) {
        if !self.unresolved_subdomains.iter().any(|l| l == label) {
            self.unresolved_subdomains.push(label.to_string());
        }
    }

    /// Total records kept across both paths.
    pub fn records(&self) -> usize {
        self.records_from_tables + self.records_from_text
    }

    pub fn dropped_total(&self) -> usize {
        self.dropped.values().sum()
    }

    pub fn dropped_for(&self, reason: DropReason) -> usize {
        self.dropped.get(&reason).copied().unwrap_or(0)
    }

    pub fn tier_count(&self, tier: MatchTier) -> usize {
        self.tiers.get(&tier).copied().unwrap_or(0)
    }

    pub fn unmatched_count(&self) -> usize {
        self.unmatched.len()
    }

    /// Unmatched skills with duplicates removed, first occurrence order.
    pub fn unique_unmatched(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for skill in &self.unmatched {
            if !seen.contains(&skill.as_str()) {
                seen.push(skill);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut diag = ExtractionDiagnostics::default();
        diag.drop_row(DropReason::Header);
        diag.drop_row(DropReason::Header);
        diag.drop_row(DropReason::ShortSkill);
        diag.record_kept(SourcePath::Table, MatchTier::Exact, "Runs fast");
        diag.record_kept(SourcePath::Text, MatchTier::Unmatched, "Rolls over");
        diag.record_kept(SourcePath::Table, MatchTier::Unmatched, "Rolls over");

        assert_eq!(diag.dropped_for(DropReason::Header), 2);
        assert_eq!(diag.dropped_total(), 3);
        assert_eq!(diag.records(), 3);
        assert_eq!(diag.tier_count(MatchTier::Unmatched), 2);
        assert_eq!(diag.unmatched_count(), 2);
        assert_eq!(diag.unique_unmatched(), vec!["Rolls over"]);
    }

    #[test]
    fn serializes_reason_keys() {
        let mut diag = ExtractionDiagnostics::default();
        diag.drop_row(DropReason::MissingMastery);
        let json = serde_json::to_value(&diag).expect("serialize");
        assert_eq!(json["dropped"]["missing_mastery"], 1);
    }
}
