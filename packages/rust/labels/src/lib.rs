//! Subdomain label repair.
//!
//! Report layouts wrap long subdomain names across cells or lines, so the
//! extracted label is often a truncated prefix ("Reasoning and") of the real
//! name ("Reasoning and Academic Skills"). [`SubdomainAliasTable::normalize`]
//! maps such fragments back to the canonical BDI-3 subdomain name.

use skillmap_shared::AliasEntry;
use tracing::trace;

/// Built-in aliases in lookup order.
///
/// Order matters: the prefix scan returns the first hit. Domains are listed
/// Social-Emotional, Adaptive, Motor, Cognitive, and within a subdomain the
/// full name comes first, followed by progressively shorter truncations.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    // Social-Emotional
    ("Adult Interaction", "Adult Interaction"),
    ("Adult", "Adult Interaction"),
    ("Peer Interaction", "Peer Interaction"),
    ("Peer", "Peer Interaction"),
    ("Self-Concept and Social Role", "Self-Concept and Social Role"),
    ("Self-Concept and", "Self-Concept and Social Role"),
    ("Self-Concept", "Self-Concept and Social Role"),
    // Adaptive
    ("Self-Care", "Self-Care"),
    ("Personal Responsibility", "Personal Responsibility"),
    ("Personal", "Personal Responsibility"),
    // Motor
    ("Gross Motor", "Gross Motor"),
    ("Gross", "Gross Motor"),
    ("Fine Motor", "Fine Motor"),
    ("Fine", "Fine Motor"),
    ("Perceptual Motor", "Perceptual Motor"),
    ("Perceptual", "Perceptual Motor"),
    // Cognitive
    ("Attention and Memory", "Attention and Memory"),
    ("Attention and", "Attention and Memory"),
    ("Attention", "Attention and Memory"),
    ("Reasoning and Academic Skills", "Reasoning and Academic Skills"),
    ("Reasoning and Academic", "Reasoning and Academic Skills"),
    ("Reasoning and", "Reasoning and Academic Skills"),
    ("Reasoning", "Reasoning and Academic Skills"),
    ("Perception and Concepts", "Perception and Concepts"),
    ("Perception and", "Perception and Concepts"),
    ("Perception", "Perception and Concepts"),
];

/// Ordered `(alias, canonical)` lookup table.
///
/// Every canonical name is also present as a self-mapping alias, which is
/// what makes [`normalize`](Self::normalize) idempotent.
#[derive(Debug, Clone)]
pub struct SubdomainAliasTable {
    entries: Vec<(String, String)>,
}

impl SubdomainAliasTable {
    /// The built-in BDI-3 table.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_ALIASES
                .iter()
                .map(|(alias, canonical)| ((*alias).to_string(), (*canonical).to_string()))
                .collect(),
        }
    }

    /// Built-in table followed by `extra` aliases, in the given order.
    ///
    /// A configured canonical that is already an alias key resolves to that
    /// key's canonical name. Otherwise it gets a self-mapping, appended
    /// before the alias. Every value in the table is therefore also a key
    /// mapping to itself.
    pub fn with_aliases(extra: &[AliasEntry]) -> Self {
        let mut table = Self::builtin();
        for entry in extra {
            let alias = entry.alias.trim();
            let canonical = entry.canonical.trim();
            if alias.is_empty() || canonical.is_empty() {
                continue;
            }
            let canonical = match table.lookup(canonical) {
                Some(resolved) => resolved.to_string(),
                None => {
                    table
                        .entries
                        .push((canonical.to_string(), canonical.to_string()));
                    canonical.to_string()
                }
            };
            if table.lookup(alias).is_none() {
                table.entries.push((alias.to_string(), canonical));
            }
        }
        table
    }

    /// Canonical name for an exact alias key.
    fn lookup(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(alias, _)| alias == key)
            .map(|(_, canonical)| canonical.as_str())
    }

    /// Number of aliases, including canonical self-mappings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Repair a possibly truncated subdomain label.
    ///
    /// 1. exact alias hit
    /// 2. first alias (table order) that is a prefix of the label, or that the
    ///    label is a prefix of
    /// 3. the trimmed label unchanged
    ///
    /// Never fails. An empty label stays empty.
    pub fn normalize(&self, label: &str) -> String {
        let label = label.trim();
        if label.is_empty() {
            return String::new();
        }

        if let Some(canonical) = self.lookup(label) {
            return canonical.to_string();
        }

        for (alias, canonical) in &self.entries {
            if label.starts_with(alias.as_str()) || alias.starts_with(label) {
                trace!(label, alias = %alias, canonical = %canonical, "prefix alias match");
                return canonical.clone();
            }
        }

        label.to_string()
    }

    /// Whether `name` is one of the canonical names in this table.
    pub fn is_canonical(&self, name: &str) -> bool {
        self.entries.iter().any(|(_, canonical)| canonical == name)
    }
}

impl Default for SubdomainAliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}
