//! Report output.
//!
//! Reports are written atomically: content goes to a hidden temp file next to
//! the target, then is renamed over it, so readers never observe a partial
//! report.

use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use skillmap_shared::{Result, SkillmapError};

use crate::pipeline::ExtractionReport;

/// Metadata for a written output file.
#[derive(Debug, Clone, Serialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Serialise a report as pretty-printed JSON.
pub fn to_json(report: &ExtractionReport) -> Result<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| SkillmapError::validation(format!("JSON serialization failed: {e}")))
}

/// Write a report as JSON to `path`.
#[instrument(skip_all, fields(path = %path.display(), run_id = %report.run_id))]
pub fn write_report(path: &Path, report: &ExtractionReport) -> Result<WrittenFile> {
    let json = to_json(report)?;
    let written = write_atomic(path, &json)?;
    info!(
        records = report.results.len(),
        sha256 = %written.sha256,
        "report written"
    );
    Ok(written)
}

/// Write `content` to `path` via a temp file and rename.
pub fn write_atomic(path: &Path, content: &str) -> Result<WrittenFile> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            SkillmapError::validation(format!("not a file path: {}", path.display()))
        })?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| SkillmapError::io(parent, e))?;
            parent.to_path_buf()
        }
        _ => PathBuf::from("."),
    };

    let temp = dir.join(format!(".{file_name}.tmp"));
    std::fs::write(&temp, content).map_err(|e| SkillmapError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| SkillmapError::io(path, e))?;

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let sha256 = format!("{:x}", hasher.finalize());

    debug!(path = %path.display(), size = content.len(), "wrote file");

    Ok(WrittenFile {
        path: path.to_path_buf(),
        sha256,
        size_bytes: content.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Engine, SilentProgress};
    use skillmap_shared::AppConfig;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("skillmap-report-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_report() -> ExtractionReport {
        let fixture = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/pages/bdi3-report.txt");
        Engine::from_config(&AppConfig::default())
            .unwrap()
            .run_path(&fixture, &SilentProgress)
            .unwrap()
    }

    #[test]
    fn write_report_round_trips_key_fields() {
        let tmp = temp_dir();
        let report = sample_report();
        let target = tmp.join("out/report.json");

        let written = write_report(&target, &report).unwrap();
        assert_eq!(written.path, target);
        assert_eq!(written.sha256.len(), 64);
        assert!(written.size_bytes > 0);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(value["run_id"], report.run_id.to_string());
        assert_eq!(value["source_sha256"], report.source_sha256);
        assert_eq!(value["diagnostics"]["records_from_text"], 4);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn write_atomic_leaves_no_temp_files() {
        let tmp = temp_dir();
        write_atomic(&tmp.join("summary.txt"), "hello").unwrap();
        write_atomic(&tmp.join("summary.txt"), "hello again").unwrap();

        for entry in std::fs::read_dir(&tmp).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().to_string();
            assert!(!name.starts_with('.'), "temp file left behind: {name}");
        }
        assert_eq!(
            std::fs::read_to_string(tmp.join("summary.txt")).unwrap(),
            "hello again"
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn write_atomic_rejects_directory_like_paths() {
        let err = write_atomic(Path::new("/"), "x").unwrap_err();
        assert!(err.to_string().contains("not a file path"));
    }
}
