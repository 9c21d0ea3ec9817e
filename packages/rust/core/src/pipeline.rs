//! End-to-end extraction pipeline: document → pages → records → report.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, instrument};

use skillmap_document::{DumpFormat, PageDump, PageSource};
use skillmap_extractor::{ExtractionDiagnostics, Extractor, PageObserver};
use skillmap_labels::SubdomainAliasTable;
use skillmap_reference::ReferenceDictionary;
use skillmap_shared::{
    AppConfig, ExtractionSettings, MatchSettings, Result, ResultSet, RunId, SkillmapError,
};

/// Everything one extraction run produced, ready to serialise.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub run_id: RunId,
    pub extracted_at: DateTime<Utc>,
    /// Document name (dump `source` field or file path).
    pub source: String,
    /// SHA-256 of the raw dump bytes.
    pub source_sha256: String,
    pub reference_version: String,
    pub results: ResultSet,
    pub diagnostics: ExtractionDiagnostics,
    pub elapsed_ms: u64,
}

/// A loaded input document plus its content hash.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub dump: PageDump,
    pub sha256: String,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each page in the item-level range is processed.
    fn page_processed(&self, index: usize, records_added: usize);
    /// Called when the run completes.
    fn done(&self, report: &ExtractionReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_processed(&self, _index: usize, _records_added: usize) {}
    fn done(&self, _report: &ExtractionReport) {}
}

/// Read-only state shared by every run: alias table, reference dictionary
/// and settings. Safe to share across threads.
#[derive(Debug, Clone)]
pub struct Engine {
    aliases: SubdomainAliasTable,
    reference: ReferenceDictionary,
    extraction: ExtractionSettings,
    matching: MatchSettings,
}

impl Engine {
    pub fn new(
        aliases: SubdomainAliasTable,
        reference: ReferenceDictionary,
        extraction: ExtractionSettings,
        matching: MatchSettings,
    ) -> Self {
        Self {
            aliases,
            reference,
            extraction,
            matching,
        }
    }

    /// Build from configuration. A configured reference file that cannot be
    /// loaded is fatal; without one the built-in table is used.
    #[instrument(skip_all)]
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let extraction = ExtractionSettings::from(config);
        extraction.validate()?;

        let reference = match config.matching.reference_path.as_deref() {
            Some(path) => ReferenceDictionary::load(Path::new(path))?,
            None => ReferenceDictionary::builtin(),
        };
        let aliases = SubdomainAliasTable::with_aliases(&config.labels.aliases);

        info!(
            reference = reference.version(),
            entries = reference.len(),
            aliases = aliases.len(),
            "engine ready"
        );

        Ok(Self::new(aliases, reference, extraction, MatchSettings::from(config)))
    }

    pub fn reference(&self) -> &ReferenceDictionary {
        &self.reference
    }

    pub fn aliases(&self) -> &SubdomainAliasTable {
        &self.aliases
    }

    pub fn extraction_settings(&self) -> &ExtractionSettings {
        &self.extraction
    }

    fn extractor(&self) -> Extractor<'_> {
        Extractor::new(
            &self.aliases,
            &self.reference,
            self.extraction.clone(),
            self.matching,
        )
    }

    /// Extract a loaded document into a report.
    ///
    /// A page read failure fails the run; no partial report is produced.
    #[instrument(skip_all, fields(source = %document.path.display()))]
    pub fn run(
        &self,
        document: &SourceDocument,
        progress: &dyn ProgressReporter,
    ) -> Result<ExtractionReport> {
        let start = Instant::now();
        let run_id = RunId::new();
        info!(%run_id, pages = document.dump.page_count(), "starting extraction");

        progress.phase("Extracting item-level scores");
        let observer = ProgressObserver { inner: progress };
        let extraction = self.extractor().extract_with(&document.dump, &observer)?;

        let report = ExtractionReport {
            run_id,
            extracted_at: Utc::now(),
            source: document.dump.name().to_string(),
            source_sha256: document.sha256.clone(),
            reference_version: self.reference.version().to_string(),
            results: extraction.results,
            diagnostics: extraction.diagnostics,
            elapsed_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        progress.done(&report);

        info!(
            run_id = %report.run_id,
            records = report.results.len(),
            unmatched = report.diagnostics.unmatched_count(),
            elapsed_ms = report.elapsed_ms,
            "extraction complete"
        );

        Ok(report)
    }

    /// Open `path` and run it.
    pub fn run_path(&self, path: &Path, progress: &dyn ProgressReporter) -> Result<ExtractionReport> {
        progress.phase("Reading document");
        let document = open_document(path)?;
        self.run(&document, progress)
    }
}

/// Load a page dump from disk, hashing the raw bytes.
///
/// An empty path or a file that does not exist is rejected before any read.
pub fn open_document(path: &Path) -> Result<SourceDocument> {
    if path.as_os_str().is_empty() {
        return Err(SkillmapError::validation("no input file given"));
    }
    if !path.is_file() {
        return Err(SkillmapError::validation(format!(
            "input file not found: {}",
            path.display()
        )));
    }

    let bytes = std::fs::read(path).map_err(|e| SkillmapError::io(path, e))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let sha256 = format!("{:x}", hasher.finalize());

    let dump = PageDump::parse(
        DumpFormat::from_path(path),
        path.display().to_string(),
        &bytes,
    )?;

    Ok(SourceDocument {
        path: path.to_path_buf(),
        dump,
        sha256,
    })
}

// ---------------------------------------------------------------------------
// Page progress adapter
// ---------------------------------------------------------------------------

/// Adapts a `ProgressReporter` to the extractor's `PageObserver` interface.
struct ProgressObserver<'a> {
    inner: &'a dyn ProgressReporter,
}

impl PageObserver for ProgressObserver<'_> {
    fn page_extracted(&self, index: usize, records_added: usize) {
        self.inner.page_processed(index, records_added);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use skillmap_shared::{Domain, MatchTier};

    fn fixture(rel: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(rel)
    }

    #[derive(Default)]
    struct RecordingProgress {
        phases: Mutex<Vec<String>>,
        pages: Mutex<Vec<(usize, usize)>>,
        done: Mutex<Option<usize>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, name: &str) {
            self.phases.lock().unwrap().push(name.to_string());
        }
        fn page_processed(&self, index: usize, records_added: usize) {
            self.pages.lock().unwrap().push((index, records_added));
        }
        fn done(&self, report: &ExtractionReport) {
            *self.done.lock().unwrap() = Some(report.results.len());
        }
    }

    #[test]
    fn default_engine_uses_builtin_reference() {
        let engine = Engine::from_config(&AppConfig::default()).unwrap();
        assert_eq!(engine.reference().version(), skillmap_reference::BUILTIN_VERSION);
        assert_eq!(engine.extraction_settings().first_page, 3);
        assert_eq!(engine.extraction_settings().end_page, 13);
    }

    #[test]
    fn configured_reference_is_loaded() {
        let mut config = AppConfig::default();
        config.matching.reference_path =
            Some(fixture("reference/bdi3-sample.toml").display().to_string());

        let engine = Engine::from_config(&config).unwrap();
        assert_eq!(engine.reference().version(), "bdi3-sample-2024");
        assert_eq!(engine.reference().len(), 6);
    }

    #[test]
    fn broken_reference_is_fatal() {
        let mut config = AppConfig::default();
        config.matching.reference_path =
            Some(fixture("reference/broken.toml").display().to_string());
        let err = Engine::from_config(&config).unwrap_err();
        assert!(matches!(err, SkillmapError::Reference { .. }));

        config.matching.reference_path =
            Some(fixture("reference/does-not-exist.toml").display().to_string());
        let err = Engine::from_config(&config).unwrap_err();
        assert!(matches!(err, SkillmapError::Io { .. }));
    }

    #[test]
    fn empty_page_range_is_rejected_at_startup() {
        let mut config = AppConfig::default();
        config.extraction.first_page = 13;
        let err = Engine::from_config(&config).unwrap_err();
        assert!(matches!(err, SkillmapError::Validation { .. }));
    }

    #[test]
    fn configured_aliases_extend_builtins() {
        let mut config = AppConfig::default();
        config.labels.aliases.push(skillmap_shared::AliasEntry {
            alias: "Oral".into(),
            canonical: "Oral Motor".into(),
        });
        let engine = Engine::from_config(&config).unwrap();
        assert_eq!(engine.aliases().normalize("Oral"), "Oral Motor");
    }

    #[test]
    fn open_document_hashes_and_parses() {
        let doc = open_document(&fixture("pages/bdi3-report.json")).unwrap();
        assert_eq!(doc.dump.page_count(), 14);
        assert_eq!(doc.dump.name(), "bdi3-sample-report.pdf");
        assert_eq!(doc.sha256.len(), 64);

        let again = open_document(&fixture("pages/bdi3-report.json")).unwrap();
        assert_eq!(doc.sha256, again.sha256);
    }

    #[test]
    fn open_document_rejects_missing_input() {
        let err = open_document(Path::new("")).unwrap_err();
        assert!(err.to_string().contains("no input file"));

        let err = open_document(&fixture("pages/missing.json")).unwrap_err();
        assert!(matches!(err, SkillmapError::Validation { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn run_builds_report() {
        let engine = Engine::from_config(&AppConfig::default()).unwrap();
        let progress = RecordingProgress::default();
        let report = engine
            .run_path(&fixture("pages/bdi3-report.json"), &progress)
            .unwrap();

        assert_eq!(report.source, "bdi3-sample-report.pdf");
        assert_eq!(report.reference_version, skillmap_reference::BUILTIN_VERSION);
        assert_eq!(report.results.len(), 15);
        assert_eq!(report.diagnostics.tier_count(MatchTier::Exact), 13);

        let pincer = report
            .results
            .subdomain(Domain::Motor, "Fine Motor")
            .unwrap();
        assert_eq!(pincer[0].skill, "Uses pincer grasp");
        assert_eq!(pincer[0].age.as_str(), "(12-23mths)");

        assert_eq!(progress.pages.lock().unwrap().len(), 10);
        assert_eq!(*progress.done.lock().unwrap(), Some(15));
        assert_eq!(
            progress.phases.lock().unwrap().as_slice(),
            ["Reading document", "Extracting item-level scores"]
        );
    }

    #[test]
    fn report_serializes_to_json() {
        let engine = Engine::from_config(&AppConfig::default()).unwrap();
        let report = engine
            .run_path(&fixture("pages/bdi3-report.txt"), &SilentProgress)
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["results"]["Motor"][0]["name"], "Gross Motor");
        assert_eq!(json["results"]["Motor"][0]["skills"][0]["tier"], "exact");
        assert_eq!(json["diagnostics"]["unmatched"][0], "Puts on socks");
        assert_eq!(json["run_id"].as_str().unwrap().len(), 36);
    }

    #[test]
    fn page_failure_fails_the_run() {
        let engine = Engine::from_config(&AppConfig::default()).unwrap();
        let progress = RecordingProgress::default();
        let err = engine
            .run_path(&fixture("pages/broken-page.json"), &progress)
            .unwrap_err();

        assert!(matches!(err, SkillmapError::Document { page: 4, .. }));
        assert!(progress.done.lock().unwrap().is_none());
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        let engine = std::sync::Arc::new(Engine::from_config(&AppConfig::default()).unwrap());
        let doc = std::sync::Arc::new(open_document(&fixture("pages/bdi3-report.json")).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                let doc = doc.clone();
                std::thread::spawn(move || engine.run(&doc, &SilentProgress).unwrap())
            })
            .collect();

        for handle in handles {
            let report = handle.join().unwrap();
            assert_eq!(report.results.len(), 15);
            assert_eq!(report.diagnostics.unmatched, vec!["Kicks a ball forward".to_string()]);
        }
    }
}
