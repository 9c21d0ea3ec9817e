//! Presentation order for age labels.
//!
//! Age labels are opaque strings, so sorting uses a hand-authored list,
//! youngest first, ending with the unmatched sentinel. Labels missing from
//! the list rank after every listed label.

use std::cmp::Ordering;

use skillmap_shared::{AgeRange, SkillRecord};

const BUILTIN_AGE_ORDER: &[&str] = &[
    "(0-5mths)",
    "(6-11mths)",
    "(12-23mths)",
    "(2 yrs)",
    "(3 yrs)",
    "(4 yrs)",
    "(5 yrs)",
    "(6 yrs)",
    "(7 yrs)",
    AgeRange::UNMATCHED,
];

/// Total order over known age labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeOrder {
    labels: Vec<String>,
}

impl AgeOrder {
    /// Build an order from labels, youngest first. The unmatched sentinel
    /// always ranks last, wherever the list placed it.
    pub fn new(labels: Vec<String>) -> Self {
        let mut labels = labels;
        labels.retain(|l| l != AgeRange::UNMATCHED);
        labels.push(AgeRange::UNMATCHED.to_string());
        Self { labels }
    }

    pub fn builtin() -> Self {
        Self {
            labels: BUILTIN_AGE_ORDER.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Sort key for a label; unknown labels share the rank after the last one.
    pub fn rank(&self, age: &AgeRange) -> usize {
        self.labels
            .iter()
            .position(|l| l == age.as_str())
            .unwrap_or(self.labels.len())
    }

    pub fn compare(&self, a: &AgeRange, b: &AgeRange) -> Ordering {
        self.rank(a).cmp(&self.rank(b))
    }

    /// Stable sort of records by age rank; equal ranks keep document order.
    pub fn sort_records(&self, records: &mut [SkillRecord]) {
        records.sort_by_key(|r| self.rank(&r.age));
    }
}

impl Default for AgeOrder {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillmap_shared::{Domain, MasteryStatus, MatchTier};

    fn record(skill: &str, age: &str) -> SkillRecord {
        SkillRecord {
            skill: skill.into(),
            domain: Domain::Motor,
            subdomain: "Gross Motor".into(),
            mastery: MasteryStatus::Emerging,
            age: AgeRange::new(age),
            tier: MatchTier::Exact,
        }
    }

    #[test]
    fn known_labels_rank_youngest_first() {
        let order = AgeOrder::builtin();
        assert!(order.rank(&AgeRange::new("(12-23mths)")) < order.rank(&AgeRange::new("(2 yrs)")));
        assert!(order.rank(&AgeRange::new("(5 yrs)")) < order.rank(&AgeRange::unmatched()));
    }

    #[test]
    fn unknown_labels_sort_after_all_known() {
        let order = AgeOrder::builtin();
        let unknown = AgeRange::new("(9 yrs)");
        assert_eq!(order.rank(&unknown), order.labels().len());
        assert_eq!(order.compare(&AgeRange::unmatched(), &unknown), Ordering::Less);
    }

    #[test]
    fn sort_is_stable() {
        let order = AgeOrder::builtin();
        let mut records = vec![
            record("Skips", "(5 yrs)"),
            record("Rolls over", "unmatched"),
            record("Runs", "(2 yrs)"),
            record("Kicks ball", "(2 yrs)"),
            record("Walks independently", "(12-23mths)"),
        ];
        order.sort_records(&mut records);
        let skills: Vec<&str> = records.iter().map(|r| r.skill.as_str()).collect();
        assert_eq!(
            skills,
            vec!["Walks independently", "Runs", "Kicks ball", "Skips", "Rolls over"]
        );
    }

    #[test]
    fn custom_order_gets_sentinel() {
        let order = AgeOrder::new(vec!["young".into(), "old".into()]);
        assert_eq!(order.labels().last().map(String::as_str), Some(AgeRange::UNMATCHED));
        assert_eq!(order.rank(&AgeRange::new("old")), 1);
    }

    #[test]
    fn sentinel_is_moved_to_the_end() {
        let order = AgeOrder::new(vec!["(2 yrs)".into(), "unmatched".into(), "(3 yrs)".into()]);
        assert_eq!(order.labels(), ["(2 yrs)", "(3 yrs)", "unmatched"]);
        assert!(order.rank(&AgeRange::unmatched()) > order.rank(&AgeRange::new("(3 yrs)")));

        let mut records = vec![record("Unmatched", "unmatched"), record("Three", "(3 yrs)")];
        order.sort_records(&mut records);
        assert_eq!(records[0].skill, "Three");
    }
}
