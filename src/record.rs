//! Best-score records
//!
//! The simulation only announces a new best; what happens to it is up to the
//! host. Sinks are fire-and-forget: failures are logged, never reported back.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the best-score file
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("failed to access record file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record file: {0}")]
    Json(#[from] serde_json::Error),
}

/// A run that beat the previous best
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSubmission {
    pub score: u64,
    pub previous_best: u64,
}

impl RecordSubmission {
    /// A record only counts when it is positive and beats the previous best
    pub fn qualifies(&self) -> bool {
        self.score > 0 && self.score > self.previous_best
    }
}

/// Receives new best scores
pub trait RecordSink {
    fn submit(&mut self, record: &RecordSubmission);
}

/// Just logs the record
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl RecordSink for LogSink {
    fn submit(&mut self, record: &RecordSubmission) {
        log::info!(
            "New best score {} (was {})",
            record.score,
            record.previous_best
        );
    }
}

/// On-disk layout of the record file
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredRecord {
    best_score: u64,
}

/// JSON file holding the single best-score value
#[derive(Debug, Clone)]
pub struct BestScoreFile {
    path: PathBuf,
}

impl BestScoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored best score; a missing file means no record yet
    pub fn load(&self) -> Result<u64, RecordError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No record file at {}, starting fresh", self.path.display());
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };
        let stored: StoredRecord = serde_json::from_str(&json)?;
        log::info!("Loaded best score {}", stored.best_score);
        Ok(stored.best_score)
    }

    pub fn save(&self, best_score: u64) -> Result<(), RecordError> {
        let json = serde_json::to_string_pretty(&StoredRecord { best_score })?;
        std::fs::write(&self.path, json)?;
        log::info!("Best score {} saved to {}", best_score, self.path.display());
        Ok(())
    }
}

impl RecordSink for BestScoreFile {
    fn submit(&mut self, record: &RecordSubmission) {
        if !record.qualifies() {
            return;
        }
        if let Err(e) = self.save(record.score) {
            log::warn!("Failed to persist best score {}: {e}", record.score);
        }
    }
}
