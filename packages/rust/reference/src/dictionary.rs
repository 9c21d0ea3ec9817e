//! Reference dictionary of known skill descriptions and their ages.
//!
//! Entries are kept in an ordered `Vec`: iteration order is the tie-break for
//! the substring and word-overlap tiers, so it must be the file order.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use skillmap_shared::{AgeRange, Domain, Result, SkillmapError};

use crate::age_order::AgeOrder;

/// Version tag of the compiled-in table.
pub const BUILTIN_VERSION: &str = "bdi3-builtin";

/// Built-in BDI-3 reference table: (domain, subdomain, skill, age).
const BUILTIN_ENTRIES: &[(Domain, &str, &str, &str)] = &[
    (Domain::Adaptive, "Self-Care", "Communicates the need or desire for food", "(12-23mths)"),
    (Domain::Adaptive, "Self-Care", "Washes his or her hands", "(2 yrs)"),
    (Domain::Adaptive, "Self-Care", "Shows signs of pretoileting readiness", "(3 yrs)"),
    (Domain::Adaptive, "Self-Care", "Removes clothing without fasteners", "(3 yrs)"),
    (Domain::Adaptive, "Self-Care", "Uses the toilet", "(4 yrs)"),
    (Domain::Adaptive, "Self-Care", "Dresses self completely", "(5 yrs)"),
    (Domain::Adaptive, "Personal Responsibility", "Follows simple rules", "(2 yrs)"),
    (Domain::Adaptive, "Personal Responsibility", "Uses appropriate behavior in public", "(4 yrs)"),
    (Domain::Adaptive, "Personal Responsibility", "Follows safety rules", "(5 yrs)"),
    (Domain::SocialEmotional, "Self-Concept and Social Role", "Shows awareness of self", "(12-23mths)"),
    (Domain::SocialEmotional, "Self-Concept and Social Role", "Shows independence", "(2 yrs)"),
    (Domain::SocialEmotional, "Self-Concept and Social Role", "Shows self-confidence", "(3 yrs)"),
    (Domain::SocialEmotional, "Adult Interaction", "Interacts with familiar adults", "(12-23mths)"),
    (Domain::SocialEmotional, "Peer Interaction", "Interacts with peers", "(2 yrs)"),
    (Domain::SocialEmotional, "Peer Interaction", "Shows empathy", "(3 yrs)"),
    (Domain::SocialEmotional, "Peer Interaction", "Engages in cooperative play", "(4 yrs)"),
    (Domain::Motor, "Gross Motor", "Walks independently", "(12-23mths)"),
    (Domain::Motor, "Gross Motor", "Runs", "(2 yrs)"),
    (Domain::Motor, "Gross Motor", "Jumps", "(3 yrs)"),
    (Domain::Motor, "Gross Motor", "Hops on one foot", "(4 yrs)"),
    (Domain::Motor, "Gross Motor", "Skips", "(5 yrs)"),
    (Domain::Motor, "Fine Motor", "Uses pincer grasp", "(12-23mths)"),
    (Domain::Motor, "Fine Motor", "Builds tower of blocks", "(2 yrs)"),
    (Domain::Motor, "Fine Motor", "Copies circle", "(3 yrs)"),
    (Domain::Motor, "Fine Motor", "Cuts with scissors", "(4 yrs)"),
    (Domain::Motor, "Fine Motor", "Writes letters", "(5 yrs)"),
    (Domain::Cognitive, "Attention and Memory", "Attends to object or person", "(12-23mths)"),
    (Domain::Cognitive, "Attention and Memory", "Remembers familiar people", "(2 yrs)"),
    (Domain::Cognitive, "Attention and Memory", "Follows two-step directions", "(3 yrs)"),
    (Domain::Cognitive, "Reasoning and Academic Skills", "Matches objects", "(12-23mths)"),
    (Domain::Cognitive, "Reasoning and Academic Skills", "Sorts by one attribute", "(2 yrs)"),
    (Domain::Cognitive, "Reasoning and Academic Skills", "Counts objects", "(3 yrs)"),
    (Domain::Cognitive, "Reasoning and Academic Skills", "Identifies letters", "(4 yrs)"),
    (Domain::Cognitive, "Reasoning and Academic Skills", "Reads simple words", "(5 yrs)"),
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A known skill description with its expected age.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    /// Canonical skill description (dictionary key).
    pub skill: String,
    pub age: AgeRange,
    /// Owning domain, when the source groups entries.
    pub domain: Option<Domain>,
    /// Owning subdomain, when the source groups entries.
    pub subdomain: Option<String>,
    /// Lower-cased `skill`, precomputed for the fuzzy tiers.
    pub(crate) skill_lower: String,
}

impl ReferenceEntry {
    pub fn new(
        skill: impl Into<String>,
        age: AgeRange,
        domain: Option<Domain>,
        subdomain: Option<String>,
    ) -> Self {
        let skill = skill.into();
        let skill_lower = skill.to_lowercase();
        Self {
            skill,
            age,
            domain,
            subdomain,
            skill_lower,
        }
    }
}

/// Read-only, ordered skill-to-age reference data.
#[derive(Debug, Clone)]
pub struct ReferenceDictionary {
    version: String,
    entries: Vec<ReferenceEntry>,
    /// skill -> first entry index
    exact: HashMap<String, usize>,
    /// lower-cased skill -> first entry index
    folded: HashMap<String, usize>,
    age_order: AgeOrder,
}

// ---------------------------------------------------------------------------
// TOML file schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ReferenceFile {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    age_order: Option<Vec<String>>,
    #[serde(default)]
    entries: Vec<ReferenceFileEntry>,
}

#[derive(Debug, Deserialize)]
struct ReferenceFileEntry {
    skill: String,
    age: String,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    subdomain: Option<String>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl ReferenceDictionary {
    /// Build a dictionary from ordered entries. Duplicate skills keep the
    /// first occurrence for exact lookups.
    pub fn new(version: impl Into<String>, entries: Vec<ReferenceEntry>, age_order: AgeOrder) -> Self {
        let mut exact = HashMap::with_capacity(entries.len());
        let mut folded = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            exact.entry(entry.skill.clone()).or_insert(i);
            folded.entry(entry.skill_lower.clone()).or_insert(i);
        }

        Self {
            version: version.into(),
            entries,
            exact,
            folded,
            age_order,
        }
    }

    /// The compiled-in BDI-3 table.
    pub fn builtin() -> Self {
        let entries = BUILTIN_ENTRIES
            .iter()
            .map(|(domain, subdomain, skill, age)| {
                ReferenceEntry::new(
                    *skill,
                    AgeRange::new(*age),
                    Some(*domain),
                    Some((*subdomain).to_string()),
                )
            })
            .collect();
        Self::new(BUILTIN_VERSION, entries, AgeOrder::builtin())
    }

    /// Load a dictionary from a TOML file. Any problem is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SkillmapError::io(path, e))?;
        let dict = Self::from_toml_str(&content).map_err(|e| match e {
            SkillmapError::Reference { message } => {
                SkillmapError::reference(format!("{}: {message}", path.display()))
            }
            other => other,
        })?;
        info!(
            path = %path.display(),
            version = %dict.version,
            entries = dict.len(),
            "loaded reference dictionary"
        );
        Ok(dict)
    }

    /// Parse a dictionary from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ReferenceFile = toml::from_str(content)
            .map_err(|e| SkillmapError::reference(format!("invalid reference file: {e}")))?;

        if file.entries.is_empty() {
            return Err(SkillmapError::reference("reference file has no entries"));
        }

        let mut entries = Vec::with_capacity(file.entries.len());
        for (i, raw) in file.entries.into_iter().enumerate() {
            let skill = raw.skill.trim();
            let age = raw.age.trim();
            if skill.is_empty() {
                return Err(SkillmapError::reference(format!("entry {i} has an empty skill")));
            }
            if age.is_empty() {
                return Err(SkillmapError::reference(format!("entry {i} has an empty age")));
            }
            let domain = match raw.domain.as_deref() {
                Some(name) => Some(name.parse::<Domain>().map_err(|e| {
                    SkillmapError::reference(format!("entry {i} ({skill}): {e}"))
                })?),
                None => None,
            };
            let subdomain = raw
                .subdomain
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
            entries.push(ReferenceEntry::new(skill, AgeRange::new(age), domain, subdomain));
        }

        let age_order = match file.age_order {
            Some(labels) => AgeOrder::new(labels),
            None => AgeOrder::builtin(),
        };
        let version = file.version.unwrap_or_else(|| "unversioned".to_string());

        debug!(entries = entries.len(), %version, "parsed reference file");
        Ok(Self::new(version, entries, age_order))
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl ReferenceDictionary {
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Entries in dictionary order.
    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Age order shipped with this dictionary.
    pub fn age_order(&self) -> &AgeOrder {
        &self.age_order
    }

    pub(crate) fn exact_index(&self, skill: &str) -> Option<usize> {
        self.exact.get(skill).copied()
    }

    pub(crate) fn folded_index(&self, skill_lower: &str) -> Option<usize> {
        self.folded.get(skill_lower).copied()
    }

    /// Entry counts per domain (entries without a domain are not counted).
    pub fn domain_counts(&self) -> Vec<(Domain, usize)> {
        Domain::ALL
            .iter()
            .map(|d| {
                (
                    *d,
                    self.entries.iter().filter(|e| e.domain == Some(*d)).count(),
                )
            })
            .collect()
    }
}

impl Default for ReferenceDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}
