//! Four-tier skill matching against the reference dictionary.
//!
//! Tiers are tried in precedence order and the first hit wins:
//! exact, case-insensitive, substring, word overlap. The substring tier is
//! permissive and can pair short common-word skills with the wrong entry;
//! that is accepted behaviour, not something to tighten here.

use std::collections::HashSet;

use tracing::trace;

use skillmap_shared::{AgeRange, MatchSettings, MatchTier};

use crate::dictionary::{ReferenceDictionary, ReferenceEntry};

/// Result of matching one skill description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillMatch<'a> {
    pub age: AgeRange,
    pub tier: MatchTier,
    /// The dictionary entry that matched, if any.
    pub entry: Option<&'a ReferenceEntry>,
}

impl SkillMatch<'_> {
    fn unmatched() -> Self {
        Self {
            age: AgeRange::unmatched(),
            tier: MatchTier::Unmatched,
            entry: None,
        }
    }
}

/// Matches skill text against a borrowed dictionary.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceMatcher<'a> {
    dict: &'a ReferenceDictionary,
    word_overlap_threshold: usize,
}

impl<'a> ReferenceMatcher<'a> {
    /// A word-overlap threshold of zero is treated as one.
    pub fn new(dict: &'a ReferenceDictionary, settings: MatchSettings) -> Self {
        Self {
            dict,
            word_overlap_threshold: settings.word_overlap_threshold.max(1),
        }
    }

    pub fn dictionary(&self) -> &'a ReferenceDictionary {
        self.dict
    }

    /// Find the expected age for a skill description.
    pub fn match_skill(&self, skill_text: &str) -> SkillMatch<'a> {
        let cleaned = clean_skill_text(skill_text);
        if cleaned.is_empty() {
            return SkillMatch::unmatched();
        }

        if let Some(i) = self.dict.exact_index(cleaned) {
            return self.hit(i, MatchTier::Exact);
        }

        let lower = cleaned.to_lowercase();
        if let Some(i) = self.dict.folded_index(&lower) {
            return self.hit(i, MatchTier::CaseInsensitive);
        }

        let entries = self.dict.entries();

        if let Some(i) = entries
            .iter()
            .position(|e| lower.contains(e.skill_lower.as_str()) || e.skill_lower.contains(lower.as_str()))
        {
            return self.hit(i, MatchTier::Substring);
        }

        let words: HashSet<&str> = lower.split_whitespace().collect();
        if words.len() >= self.word_overlap_threshold {
            if let Some(i) = entries.iter().position(|e| {
                e.skill_lower
                    .split_whitespace()
                    .collect::<HashSet<_>>()
                    .intersection(&words)
                    .count()
                    >= self.word_overlap_threshold
            }) {
                return self.hit(i, MatchTier::WordOverlap);
            }
        }

        trace!(skill = cleaned, "no reference match");
        SkillMatch::unmatched()
    }

    fn hit(&self, index: usize, tier: MatchTier) -> SkillMatch<'a> {
        let entry = &self.dict.entries()[index];
        trace!(skill = %entry.skill, tier = tier.as_str(), "reference match");
        SkillMatch {
            age: entry.age.clone(),
            tier,
            entry: Some(entry),
        }
    }
}

/// Trim whitespace, then drop one trailing period.
fn clean_skill_text(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed.strip_suffix('.').unwrap_or(trimmed)
}
