//! Application configuration for skillmap.
//!
//! User config lives at `~/.skillmap/skillmap.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillmapError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "skillmap.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".skillmap";

// ---------------------------------------------------------------------------
// Config structs (matching skillmap.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Page walk and row heuristics.
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Reference matching.
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Extra subdomain aliases.
    #[serde(default)]
    pub labels: LabelsConfig,
}

/// `[extraction]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// First page index (0-based) of the item-level scores section.
    #[serde(default = "default_first_page")]
    pub first_page: usize,

    /// Page index (0-based, exclusive) where the section ends.
    #[serde(default = "default_end_page")]
    pub end_page: usize,

    /// A second table cell shorter than this may continue a wrapped label.
    #[serde(default = "default_label_continuation_max_len")]
    pub label_continuation_max_len: usize,

    /// Skills must be longer than this many characters to be kept.
    #[serde(default = "default_min_skill_len")]
    pub min_skill_len: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            first_page: default_first_page(),
            end_page: default_end_page(),
            label_continuation_max_len: default_label_continuation_max_len(),
            min_skill_len: default_min_skill_len(),
        }
    }
}

fn default_first_page() -> usize {
    3
}
fn default_end_page() -> usize {
    13
}
fn default_label_continuation_max_len() -> usize {
    30
}
fn default_min_skill_len() -> usize {
    3
}

/// `[matching]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum shared words for the word-overlap tier.
    #[serde(default = "default_word_overlap_threshold")]
    pub word_overlap_threshold: usize,

    /// Reference dictionary TOML file. Built-in table when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_path: Option<String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            word_overlap_threshold: default_word_overlap_threshold(),
            reference_path: None,
        }
    }
}

fn default_word_overlap_threshold() -> usize {
    4
}

/// `[labels]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelsConfig {
    /// Aliases appended after the built-in table, in file order.
    #[serde(default)]
    pub aliases: Vec<AliasEntry>,
}

/// `[[labels.aliases]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    /// Label as it appears (possibly truncated) in reports.
    pub alias: String,
    /// Canonical subdomain name.
    pub canonical: String,
}

// ---------------------------------------------------------------------------
// Runtime settings (merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime extraction settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSettings {
    /// Pages `first_page..end_page` are walked.
    pub first_page: usize,
    pub end_page: usize,
    pub label_continuation_max_len: usize,
    pub min_skill_len: usize,
}

impl ExtractionSettings {
    /// Reject empty or inverted page ranges.
    pub fn validate(&self) -> Result<()> {
        if self.first_page >= self.end_page {
            return Err(SkillmapError::validation(format!(
                "page range {}..{} is empty",
                self.first_page, self.end_page
            )));
        }
        Ok(())
    }
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ExtractionSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            first_page: config.extraction.first_page,
            end_page: config.extraction.end_page,
            label_continuation_max_len: config.extraction.label_continuation_max_len,
            min_skill_len: config.extraction.min_skill_len,
        }
    }
}

/// Runtime matching settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSettings {
    pub word_overlap_threshold: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for MatchSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            word_overlap_threshold: config.matching.word_overlap_threshold,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.skillmap/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SkillmapError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.skillmap/skillmap.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SkillmapError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        SkillmapError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SkillmapError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SkillmapError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SkillmapError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("first_page"));
        assert!(toml_str.contains("word_overlap_threshold"));
        assert!(!toml_str.contains("reference_path"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.extraction.first_page, 3);
        assert_eq!(parsed.extraction.end_page, 13);
        assert_eq!(parsed.matching.word_overlap_threshold, 4);
    }

    #[test]
    fn config_with_aliases() {
        let toml_str = r#"
[matching]
reference_path = "/etc/skillmap/bdi3.toml"

[[labels.aliases]]
alias = "Self-Care and"
canonical = "Self-Care"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.labels.aliases.len(), 1);
        assert_eq!(config.labels.aliases[0].canonical, "Self-Care");
        assert_eq!(
            config.matching.reference_path.as_deref(),
            Some("/etc/skillmap/bdi3.toml")
        );
        // Untouched sections keep their defaults.
        assert_eq!(config.extraction.label_continuation_max_len, 30);
    }

    #[test]
    fn settings_from_app_config() {
        let mut app = AppConfig::default();
        app.extraction.end_page = 20;
        app.matching.word_overlap_threshold = 5;

        let extraction = ExtractionSettings::from(&app);
        assert_eq!(extraction.first_page, 3);
        assert_eq!(extraction.end_page, 20);
        assert_eq!(extraction.min_skill_len, 3);

        let matching = MatchSettings::from(&app);
        assert_eq!(matching.word_overlap_threshold, 5);
    }

    #[test]
    fn inverted_page_range_is_rejected() {
        let settings = ExtractionSettings {
            first_page: 10,
            end_page: 4,
            ..ExtractionSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("10..4"));
    }
}
