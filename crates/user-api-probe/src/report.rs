// crates/user-api-probe/src/report.rs
// ============================================================================
// Module: Run Reports
// Description: Artifact writer for suite reports and transcripts.
// Purpose: Persist canonical JSON and Markdown summaries of a probe run.
// Dependencies: serde, serde_jcs, thiserror
// ============================================================================

//! ## Overview
//! A run directory receives `report.json` (canonical JCS JSON),
//! `report.md` (human summary), and optionally `transcript.json`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use thiserror::Error;

use crate::client::TranscriptEntry;
use crate::suite::OutcomeStatus;
use crate::suite::SuiteReport;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Report writing errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem failure.
    #[error("report io error at {}: {message}", path.display())]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error text.
        message: String,
    },
    /// Serialization failure.
    #[error("report serialization failed: {0}")]
    Json(String),
}

// ============================================================================
// SECTION: Writer
// ============================================================================

/// Writes run artifacts into one directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    /// Run directory.
    root: PathBuf,
}

impl ReportWriter {
    /// Creates the run directory (and parents) if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] when the directory cannot be created.
    pub fn new(root: PathBuf) -> Result<Self, ReportError> {
        fs::create_dir_all(&root).map_err(|err| ReportError::Io {
            path: root.clone(),
            message: err.to_string(),
        })?;
        Ok(Self {
            root,
        })
    }

    /// Default run directory: `target/user-api-probe/run_<millis>`.
    #[must_use]
    pub fn default_run_root() -> PathBuf {
        let stamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        PathBuf::from("target/user-api-probe").join(format!("run_{stamp}"))
    }

    /// Returns the run directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `report.json` and `report.md`; returns the written paths.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when serialization or writing fails.
    pub fn write_report(&self, report: &SuiteReport) -> Result<Vec<PathBuf>, ReportError> {
        Ok(vec![
            self.write_json("report.json", report)?,
            self.write_text("report.md", &render_markdown(report))?,
        ])
    }

    /// Writes `transcript.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when serialization or writing fails.
    pub fn write_transcript(&self, transcript: &[TranscriptEntry]) -> Result<PathBuf, ReportError> {
        self.write_json("transcript.json", &transcript)
    }

    /// Writes a JSON artifact using canonical JCS serialization.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when serialization or writing fails.
    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        name: &str,
        value: &T,
    ) -> Result<PathBuf, ReportError> {
        let bytes = serde_jcs::to_vec(value).map_err(|err| ReportError::Json(err.to_string()))?;
        self.write_bytes(name, &bytes)
    }

    /// Writes a UTF-8 text artifact.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] when writing fails.
    pub fn write_text(&self, name: &str, value: &str) -> Result<PathBuf, ReportError> {
        self.write_bytes(name, value.as_bytes())
    }

    /// Writes raw bytes under the run directory.
    fn write_bytes(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, ReportError> {
        let path = self.root.join(name);
        fs::write(&path, bytes).map_err(|err| ReportError::Io {
            path: path.clone(),
            message: err.to_string(),
        })?;
        Ok(path)
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the human-readable summary.
#[must_use]
pub fn render_markdown(report: &SuiteReport) -> String {
    let mut out = String::new();
    out.push_str("# User API Probe Report\n\n");
    out.push_str("## Summary\n\n");
    let _ = writeln!(out, "- Target: {}", report.base_url);
    let _ = writeln!(out, "- Passed: {}", report.passed());
    let _ = writeln!(out, "- Failed: {}", report.failed());
    let _ = writeln!(out, "- Duration (ms): {}", report.duration_ms);
    out.push_str("\n## Outcomes\n\n");
    if report.outcomes.is_empty() {
        out.push_str("- None\n");
    }
    for outcome in &report.outcomes {
        let mark = match outcome.status {
            OutcomeStatus::Passed => "PASS",
            OutcomeStatus::Failed => "FAIL",
        };
        let _ = write!(out, "- {mark} `{}` / {}", outcome.probe, outcome.case);
        if let Some(detail) = &outcome.detail {
            let _ = write!(out, ": {detail}");
        }
        out.push('\n');
    }
    out
}
