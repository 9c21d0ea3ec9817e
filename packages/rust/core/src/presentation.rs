//! Presentation view over a [`ResultSet`].
//!
//! Domains come out in canonical order and subdomains in first-seen order.
//! Skills within a subdomain are stably re-sorted youngest age first, so
//! records sharing an age keep document order.

use std::fmt::Write as _;

use serde::Serialize;
use tracing::instrument;

use skillmap_reference::AgeOrder;
use skillmap_shared::{Domain, MasteryStatus, ResultSet, SkillRecord};

use crate::pipeline::ExtractionReport;

/// One domain of the presentation view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainSection {
    pub domain: Domain,
    pub subdomains: Vec<SubdomainSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubdomainSection {
    pub name: String,
    pub skills: Vec<SkillRecord>,
    pub mastery: MasteryCounts,
}

/// Skills per mastery status within a subdomain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MasteryCounts {
    pub mastered: usize,
    pub emerging: usize,
    pub future_learning_objective: usize,
}

impl MasteryCounts {
    fn tally(skills: &[SkillRecord]) -> Self {
        let mut counts = Self::default();
        for record in skills {
            match record.mastery {
                MasteryStatus::Mastered => counts.mastered += 1,
                MasteryStatus::Emerging => counts.emerging += 1,
                MasteryStatus::FutureLearningObjective => counts.future_learning_objective += 1,
            }
        }
        counts
    }
}

/// Build the presentation view. Empty subdomains are omitted.
#[instrument(skip_all, fields(records = results.len()))]
pub fn present(results: &ResultSet, order: &AgeOrder) -> Vec<DomainSection> {
    results
        .domains()
        .filter_map(|(domain, buckets)| {
            let subdomains: Vec<SubdomainSection> = buckets
                .iter()
                .filter(|bucket| !bucket.skills.is_empty())
                .map(|bucket| {
                    let mut skills = bucket.skills.clone();
                    order.sort_records(&mut skills);
                    SubdomainSection {
                        name: bucket.name.clone(),
                        mastery: MasteryCounts::tally(&skills),
                        skills,
                    }
                })
                .collect();
            (!subdomains.is_empty()).then_some(DomainSection { domain, subdomains })
        })
        .collect()
}

/// Plain-text listing of a report, one block per domain.
pub fn render_text(report: &ExtractionReport, order: &AgeOrder) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({} skills)", report.source, report.results.len());

    for section in present(&report.results, order) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", section.domain);
        for sub in &section.subdomains {
            let m = sub.mastery;
            let _ = writeln!(
                out,
                "  {} [{} mastered, {} emerging, {} future]",
                sub.name, m.mastered, m.emerging, m.future_learning_objective
            );
            for record in &sub.skills {
                let _ = writeln!(
                    out,
                    "    - {} | {} | {}",
                    record.skill,
                    record.mastery.as_str(),
                    record.age.as_str()
                );
            }
        }
    }

    let unmatched = report.diagnostics.unique_unmatched();
    if !unmatched.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Unmatched skills ({}):", unmatched.len());
        for skill in unmatched {
            let _ = writeln!(out, "  - {skill}");
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use skillmap_shared::{AgeRange, MatchTier};

    fn record(domain: Domain, sub: &str, skill: &str, mastery: MasteryStatus, age: &str) -> SkillRecord {
        SkillRecord {
            skill: skill.into(),
            domain,
            subdomain: sub.into(),
            mastery,
            age: AgeRange::new(age),
            tier: if age == AgeRange::UNMATCHED {
                MatchTier::Unmatched
            } else {
                MatchTier::Exact
            },
        }
    }

    fn sample() -> ResultSet {
        let mut results = ResultSet::new();
        results.push(record(Domain::Motor, "Gross Motor", "Skips", MasteryStatus::Emerging, "(5 yrs)"));
        results.push(record(Domain::Motor, "Gross Motor", "Kicks a ball", MasteryStatus::Emerging, "unmatched"));
        results.push(record(Domain::Motor, "Gross Motor", "Runs", MasteryStatus::Mastered, "(2 yrs)"));
        results.push(record(Domain::Motor, "Gross Motor", "Walks", MasteryStatus::Mastered, "(12-23mths)"));
        results.push(record(Domain::Motor, "Gross Motor", "Climbs", MasteryStatus::Mastered, "(2 yrs)"));
        results.push(record(Domain::Adaptive, "Self-Care", "Uses the toilet", MasteryStatus::FutureLearningObjective, "(4 yrs)"));
        results
    }

    #[test]
    fn domains_in_canonical_order() {
        let view = present(&sample(), &AgeOrder::builtin());
        let domains: Vec<Domain> = view.iter().map(|s| s.domain).collect();
        assert_eq!(domains, vec![Domain::Adaptive, Domain::Motor]);
    }

    #[test]
    fn skills_sorted_by_age_stably() {
        let view = present(&sample(), &AgeOrder::builtin());
        let gross = &view[1].subdomains[0];
        let skills: Vec<&str> = gross.skills.iter().map(|r| r.skill.as_str()).collect();
        assert_eq!(skills, vec!["Walks", "Runs", "Climbs", "Skips", "Kicks a ball"]);
    }

    #[test]
    fn unknown_ages_sort_after_unmatched() {
        let mut results = ResultSet::new();
        results.push(record(Domain::Cognitive, "Attention and Memory", "A custom item", MasteryStatus::Mastered, "(8 yrs)"));
        results.push(record(Domain::Cognitive, "Attention and Memory", "Unknown item", MasteryStatus::Mastered, "unmatched"));
        results.push(record(Domain::Cognitive, "Attention and Memory", "Attends", MasteryStatus::Mastered, "(0-5mths)"));

        let view = present(&results, &AgeOrder::builtin());
        let skills: Vec<&str> = view[0].subdomains[0].skills.iter().map(|r| r.skill.as_str()).collect();
        assert_eq!(skills, vec!["Attends", "Unknown item", "A custom item"]);
    }

    #[test]
    fn mastery_counts_per_subdomain() {
        let view = present(&sample(), &AgeOrder::builtin());
        assert_eq!(
            view[1].subdomains[0].mastery,
            MasteryCounts {
                mastered: 3,
                emerging: 2,
                future_learning_objective: 0,
            }
        );
        assert_eq!(view[0].subdomains[0].mastery.future_learning_objective, 1);
    }

    #[test]
    fn presenting_does_not_reorder_results() {
        let results = sample();
        let _ = present(&results, &AgeOrder::builtin());
        let first = results.subdomain(Domain::Motor, "Gross Motor").unwrap();
        assert_eq!(first[0].skill, "Skips");
    }

    #[test]
    fn empty_results_present_nothing() {
        assert!(present(&ResultSet::new(), &AgeOrder::builtin()).is_empty());
    }

    #[test]
    fn text_rendering_lists_skills_and_unmatched() {
        let fixture = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/pages/bdi3-report.txt");
        let engine = crate::pipeline::Engine::from_config(&skillmap_shared::AppConfig::default()).unwrap();
        let report = engine.run_path(&fixture, &crate::pipeline::SilentProgress).unwrap();

        let text = render_text(&report, engine.reference().age_order());
        assert!(text.contains("Motor\n"));
        assert!(text.contains("  Fine Motor [0 mastered, 1 emerging, 0 future]"));
        assert!(text.contains("    - Jumps. | MASTERED | (3 yrs)"));
        assert!(text.contains("Unmatched skills (1):\n  - Puts on socks"));
    }
}
