//! Serializable run reports.
//!
//! Written as JSON by the CLI's `--report` flag. Durations are in
//! milliseconds as `f64`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::audio::AudioFormat;
use crate::engine::RunMode;
use crate::error::{ParafiltError, Result};
use crate::parallel::ExecutionMode;
use crate::tuning::Trial;

pub(crate) fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// One point on a filter's sweep curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialRecord {
    pub threads: usize,
    pub elapsed_ms: f64,
}

impl From<Trial> for TrialRecord {
    fn from(t: Trial) -> Self {
        Self {
            threads: t.threads,
            elapsed_ms: duration_ms(t.elapsed),
        }
    }
}

/// Result of running one filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterReport {
    /// Stable filter name (`bandpass`, `notch`, `fir`, `iir`).
    pub filter: String,
    /// Human-readable parameters.
    pub description: String,
    /// Chosen thread count (1 outside the parallel sweep).
    pub thread_count: usize,
    /// Measured duration of the chosen configuration.
    pub elapsed_ms: f64,
    pub output_path: PathBuf,
    /// Every timed trial, in the order it ran. Empty outside the sweep.
    #[serde(default)]
    pub trials: Vec<TrialRecord>,
}

/// Result of running every configured filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub mode: RunMode,
    pub execution: ExecutionMode,
    /// Search strategy, present only for the parallel sweep.
    pub strategy: Option<String>,
    pub format: AudioFormat,
    pub total_ms: f64,
    pub filters: Vec<FilterReport>,
}

impl RunSummary {
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ParafiltError::Other(e.into()))
    }
}
