//! Core domain types for skill extraction results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one extraction run (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Domain
// ---------------------------------------------------------------------------

/// Top-level developmental domain. Closed set; order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Domain {
    Adaptive,
    #[serde(rename = "Social-Emotional")]
    SocialEmotional,
    Motor,
    Cognitive,
}

impl Domain {
    /// All domains in report order.
    pub const ALL: [Domain; 4] = [
        Domain::Adaptive,
        Domain::SocialEmotional,
        Domain::Motor,
        Domain::Cognitive,
    ];

    /// Canonical display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adaptive => "Adaptive",
            Self::SocialEmotional => "Social-Emotional",
            Self::Motor => "Motor",
            Self::Cognitive => "Cognitive",
        }
    }

    /// Canonicalize a domain token by case-insensitive substring containment.
    ///
    /// `adaptive`, `social`, `motor` and `cognitive` are checked in that order;
    /// a token containing none of them yields `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        let lower = token.to_lowercase();
        if lower.contains("adaptive") {
            Some(Self::Adaptive)
        } else if lower.contains("social") {
            Some(Self::SocialEmotional)
        } else if lower.contains("motor") {
            Some(Self::Motor)
        } else if lower.contains("cognitive") {
            Some(Self::Cognitive)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| format!("unknown domain '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// MasteryStatus
// ---------------------------------------------------------------------------

/// How far a child has progressed on a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MasteryStatus {
    #[serde(rename = "MASTERED")]
    Mastered,
    #[serde(rename = "EMERGING")]
    Emerging,
    #[serde(rename = "FUTURE LEARNING OBJECTIVE")]
    FutureLearningObjective,
}

impl MasteryStatus {
    /// Report label, as printed on the assessment form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mastered => "MASTERED",
            Self::Emerging => "EMERGING",
            Self::FutureLearningObjective => "FUTURE LEARNING OBJECTIVE",
        }
    }
}

impl std::fmt::Display for MasteryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AgeRange / MatchTier
// ---------------------------------------------------------------------------

/// Expected age-of-acquisition label, e.g. `(3 yrs)`.
///
/// Opaque: ordering is only defined by an explicit age order table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgeRange(String);

impl AgeRange {
    /// Sentinel label for skills with no reference correspondence.
    pub const UNMATCHED: &'static str = "unmatched";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn unmatched() -> Self {
        Self(Self::UNMATCHED.to_string())
    }

    pub fn is_unmatched(&self) -> bool {
        self.0 == Self::UNMATCHED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The reference-matching tier that produced an age, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    CaseInsensitive,
    Substring,
    WordOverlap,
    #[serde(rename = "none")]
    Unmatched,
}

impl MatchTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::CaseInsensitive => "case_insensitive",
            Self::Substring => "substring",
            Self::WordOverlap => "word_overlap",
            Self::Unmatched => "none",
        }
    }
}

// ---------------------------------------------------------------------------
// SkillRecord / ResultSet
// ---------------------------------------------------------------------------

/// One recognised skill line from the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    /// Skill description as printed.
    pub skill: String,
    pub domain: Domain,
    /// Canonical subdomain name (or the raw label when it could not be repaired).
    pub subdomain: String,
    pub mastery: MasteryStatus,
    /// Expected age of acquisition.
    pub age: AgeRange,
    /// Tier at which `age` was matched.
    pub tier: MatchTier,
}

/// Skills for one subdomain, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdomainBucket {
    pub name: String,
    pub skills: Vec<SkillRecord>,
}

/// Extraction output: domain -> subdomain -> ordered skills.
///
/// Domains iterate in [`Domain::ALL`] order, subdomains in first-insertion
/// order. Records can only enter the bucket named by their own
/// domain/subdomain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    domains: BTreeMap<Domain, Vec<SubdomainBucket>>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to its domain/subdomain bucket, creating it on first use.
    pub fn push(&mut self, record: SkillRecord) {
        let buckets = self.domains.entry(record.domain).or_default();
        match buckets.iter_mut().find(|b| b.name == record.subdomain) {
            Some(bucket) => bucket.skills.push(record),
            None => buckets.push(SubdomainBucket {
                name: record.subdomain.clone(),
                skills: vec![record],
            }),
        }
    }

    /// Subdomain buckets for a domain (empty slice if none were created).
    pub fn domain(&self, domain: Domain) -> &[SubdomainBucket] {
        self.domains.get(&domain).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Skills for a single domain/subdomain pair.
    pub fn subdomain(&self, domain: Domain, name: &str) -> Option<&[SkillRecord]> {
        self.domain(domain)
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.skills.as_slice())
    }

    /// Domains that hold at least one bucket, in report order.
    pub fn domains(&self) -> impl Iterator<Item = (Domain, &[SubdomainBucket])> {
        self.domains.iter().map(|(d, b)| (*d, b.as_slice()))
    }

    /// All records, domain by domain, bucket by bucket.
    pub fn records(&self) -> impl Iterator<Item = &SkillRecord> {
        self.domains
            .values()
            .flat_map(|buckets| buckets.iter().flat_map(|b| b.skills.iter()))
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.records().count()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
