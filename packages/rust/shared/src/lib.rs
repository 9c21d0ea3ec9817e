//! Shared types, error model, and configuration for skillmap.
//!
//! This crate is the foundation depended on by all other skillmap crates.
//! It provides:
//! - [`SkillmapError`]: the unified error type
//! - Domain types ([`Domain`], [`MasteryStatus`], [`AgeRange`], [`SkillRecord`], [`ResultSet`])
//! - Configuration ([`AppConfig`], [`ExtractionSettings`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AliasEntry, AppConfig, ExtractionConfig, ExtractionSettings, LabelsConfig, MatchSettings,
    MatchingConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{Result, SkillmapError};
pub use types::{
    AgeRange, Domain, MasteryStatus, MatchTier, ResultSet, RunId, SkillRecord, SubdomainBucket,
};
