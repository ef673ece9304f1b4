//! `Orchestrator`: runs every configured filter and hands results to the sink.
//!
//! ## Run modes
//!
//! ```text
//! Parallel    for each filter: ThreadCountOptimizer sweep ─► best output ─► sink
//! Serial      for each filter: FilterSpec::apply on this thread ─► sink
//! Concurrent  all filters at once, one thread each ─► join ─► sink (config order)
//! ```
//!
//! Outputs are written as `<mode>_<filter>_filter_output.wav` inside
//! `RunConfig::output_dir`, using the input's format metadata.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    audio::{SampleBuffer, SampleSink, WavFile},
    error::Result,
    filter::FilterSpec,
    parallel::{ExecutionMode, ForkJoin, ScopedThreads, Stopwatch, WallClock},
    report::{duration_ms, FilterReport, RunSummary, TrialRecord},
    tuning::{CandidateSet, ThreadCountOptimizer, Trial},
};

/// How the configured filters are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Thread-count sweep per filter.
    #[default]
    Parallel,
    /// Each filter once, unchunked, on the calling thread.
    Serial,
    /// Each filter once, unchunked, all filters on their own threads at once.
    Concurrent,
}

impl RunMode {
    /// Prefix used for output file names.
    pub fn label(self) -> &'static str {
        match self {
            RunMode::Parallel => "parallel",
            RunMode::Serial => "serial",
            RunMode::Concurrent => "concurrent",
        }
    }
}

/// Everything a run needs. Built once by the caller.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub mode: RunMode,
    pub execution: ExecutionMode,
    /// Thread counts tried by the parallel sweep.
    pub candidates: CandidateSet,
    /// Filters to run, in order.
    pub filters: Vec<FilterSpec>,
    /// Directory output files are written to. Created if missing.
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Parallel,
            execution: ExecutionMode::Exact,
            candidates: CandidateSet::default(),
            filters: default_filters(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// The four-filter bank with fixed reference coefficients.
pub fn default_filters() -> Vec<FilterSpec> {
    vec![
        FilterSpec::Bandpass { df: 2.0 },
        FilterSpec::Notch { f0: 3.0, order: 4 },
        FilterSpec::Fir {
            coefficients: vec![0.2, 0.3, 0.5],
        },
        FilterSpec::Iir {
            feedforward: vec![0.5, 0.2],
            feedback: vec![1.0, -0.5],
        },
    ]
}

/// Output of one filter before it is written.
struct FilterOutcome {
    output: Vec<f32>,
    thread_count: usize,
    elapsed: Duration,
    trials: Vec<Trial>,
}

/// Sequences the filters of a [`RunConfig`] over one decoded buffer.
pub struct Orchestrator<K = WavFile> {
    config: RunConfig,
    sink: K,
    optimizer: ThreadCountOptimizer,
}

impl<K: SampleSink> Orchestrator<K> {
    pub fn new(config: RunConfig, sink: K) -> Self {
        let optimizer = ThreadCountOptimizer::new(config.execution);
        Self::with_optimizer(config, sink, optimizer)
    }

    /// Use a custom optimizer (e.g. a different search strategy).
    pub fn with_optimizer(config: RunConfig, sink: K, optimizer: ThreadCountOptimizer) -> Self {
        Self {
            config,
            sink,
            optimizer,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// `<output_dir>/<mode>_<filter>_filter_output.wav`
    pub fn output_path(&self, spec: &FilterSpec) -> PathBuf {
        output_path(&self.config.output_dir, self.config.mode, spec)
    }

    /// Run every configured filter over `buffer` and write each output.
    ///
    /// # Errors
    /// The first failing filter or write aborts the run.
    pub fn run(&self, buffer: &SampleBuffer) -> Result<RunSummary> {
        if !self.config.output_dir.as_os_str().is_empty() {
            std::fs::create_dir_all(&self.config.output_dir)?;
        }

        info!(
            mode = self.config.mode.label(),
            execution = self.config.execution.label(),
            filters = self.config.filters.len(),
            samples = buffer.len(),
            "run started"
        );
        let started = Instant::now();

        let samples = buffer.samples();
        let mut reports = Vec::with_capacity(self.config.filters.len());
        match self.config.mode {
            RunMode::Parallel => {
                for spec in &self.config.filters {
                    let outcome = self.run_parallel(spec, samples)?;
                    reports.push(self.emit(spec, outcome, buffer)?);
                }
            }
            RunMode::Serial => {
                for spec in &self.config.filters {
                    let outcome = self.run_serial(spec, samples);
                    reports.push(self.emit(spec, outcome, buffer)?);
                }
            }
            RunMode::Concurrent => {
                let outcomes = self.run_concurrent(samples)?;
                for (spec, outcome) in self.config.filters.iter().zip(outcomes) {
                    reports.push(self.emit(spec, outcome, buffer)?);
                }
            }
        }

        let total = started.elapsed();
        info!(total_ms = duration_ms(total), "run finished");

        Ok(RunSummary {
            mode: self.config.mode,
            execution: self.config.execution,
            strategy: (self.config.mode == RunMode::Parallel)
                .then(|| self.optimizer.strategy_name().to_string()),
            format: *buffer.format(),
            total_ms: duration_ms(total),
            filters: reports,
        })
    }

    // ── Modes ────────────────────────────────────────────────────────────────

    fn run_parallel(&self, spec: &FilterSpec, samples: &[f32]) -> Result<FilterOutcome> {
        let result = self
            .optimizer
            .optimize(spec, samples, &self.config.candidates)?;
        Ok(FilterOutcome {
            output: result.output,
            thread_count: result.thread_count,
            elapsed: result.elapsed,
            trials: result.trials,
        })
    }

    fn run_serial(&self, spec: &FilterSpec, samples: &[f32]) -> FilterOutcome {
        let (output, elapsed) = WallClock.time(|| spec.apply(samples));
        debug!(filter = spec.name(), elapsed_ms = duration_ms(elapsed), "serial pass");
        FilterOutcome {
            output,
            thread_count: 1,
            elapsed,
            trials: Vec::new(),
        }
    }

    /// Every filter on its own thread; outcomes come back in config order.
    fn run_concurrent(&self, samples: &[f32]) -> Result<Vec<FilterOutcome>> {
        let jobs: Vec<_> = self
            .config
            .filters
            .iter()
            .map(|spec| move || WallClock.time(|| spec.apply(samples)))
            .collect();
        let results = ScopedThreads.join_ordered(jobs)?;

        Ok(self
            .config
            .filters
            .iter()
            .zip(results)
            .map(|(spec, (output, elapsed))| {
                debug!(
                    filter = spec.name(),
                    elapsed_ms = duration_ms(elapsed),
                    "concurrent pass"
                );
                FilterOutcome {
                    output,
                    thread_count: 1,
                    elapsed,
                    trials: Vec::new(),
                }
            })
            .collect())
    }

    // ── Output ───────────────────────────────────────────────────────────────

    fn emit(
        &self,
        spec: &FilterSpec,
        outcome: FilterOutcome,
        buffer: &SampleBuffer,
    ) -> Result<FilterReport> {
        let path = self.output_path(spec);
        self.sink.write(&path, &outcome.output, buffer.format())?;

        info!(
            filter = spec.name(),
            threads = outcome.thread_count,
            elapsed_ms = duration_ms(outcome.elapsed),
            path = %path.display(),
            "filter output written"
        );

        Ok(FilterReport {
            filter: spec.name().to_string(),
            description: spec.to_string(),
            thread_count: outcome.thread_count,
            elapsed_ms: duration_ms(outcome.elapsed),
            output_path: path,
            trials: outcome.trials.into_iter().map(TrialRecord::from).collect(),
        })
    }
}

/// `<dir>/<mode>_<filter>_filter_output.wav`
pub fn output_path(dir: &Path, mode: RunMode, spec: &FilterSpec) -> PathBuf {
    dir.join(format!("{}_{}_filter_output.wav", mode.label(), spec.name()))
}
