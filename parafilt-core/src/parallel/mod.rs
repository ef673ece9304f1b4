//! Chunked-parallel execution of a filter.
//!
//! ## Pass structure
//!
//! ```text
//! ExecutionPlan ─► one job per chunk ─► ForkJoin (timed) ─► concat in chunk order
//!                                                              │
//!                                                     FilterSpec::finish
//!                                            (IIR feedback, single-threaded)
//! ```
//!
//! Workers share the input read-only and each returns its own `Vec`, so no
//! locks are taken during a pass. Only the fork-to-join interval is timed;
//! partitioning, merging and the sequential IIR feedback stage are not.
//!
//! ## Known limitation
//!
//! There is no cancellation and no timeout. A worker that never returns
//! blocks `execute` forever.

pub mod fork_join;
pub mod partition;
pub mod stopwatch;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ParafiltError, Result};
use crate::filter::FilterSpec;

pub use fork_join::{ForkJoin, Inline, ScopedThreads};
pub use partition::{Chunk, ExecutionPlan};
pub use stopwatch::{Stopwatch, WallClock};

/// How chunk boundaries treat convolution history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Each worker also reads the `M-1` input samples preceding its chunk, so
    /// chunked output equals the sequential output for every filter.
    #[default]
    Exact,
    /// History resets to zero at every chunk boundary. FIR and the IIR
    /// feedforward stage diverge from the sequential result near boundaries.
    Approximate,
}

impl ExecutionMode {
    pub fn label(self) -> &'static str {
        match self {
            ExecutionMode::Exact => "exact",
            ExecutionMode::Approximate => "approximate",
        }
    }
}

/// Output of one pass plus its measured fork-to-join time.
#[derive(Debug, Clone)]
pub struct Execution {
    pub output: Vec<f32>,
    pub elapsed: Duration,
    /// Workers actually spawned (after clamping to the buffer length).
    pub threads: usize,
}

/// Runs a filter over a buffer with one worker per chunk.
#[derive(Debug, Clone, Default)]
pub struct ChunkExecutor<J = ScopedThreads, W = WallClock> {
    fork_join: J,
    stopwatch: W,
    mode: ExecutionMode,
}

impl ChunkExecutor {
    pub fn new(mode: ExecutionMode) -> Self {
        Self::with_parts(ScopedThreads, WallClock, mode)
    }
}

impl<J: ForkJoin, W: Stopwatch> ChunkExecutor<J, W> {
    pub fn with_parts(fork_join: J, stopwatch: W, mode: ExecutionMode) -> Self {
        Self {
            fork_join,
            stopwatch,
            mode,
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Partition `input` for `threads` workers and execute.
    pub fn run(&self, spec: &FilterSpec, input: &[f32], threads: usize) -> Result<Execution> {
        let plan = ExecutionPlan::new(input.len(), threads)?;
        self.execute(spec, input, &plan)
    }

    /// Execute `spec` over `input` following `plan`.
    ///
    /// # Errors
    /// - the plan does not cover exactly `input.len()` samples;
    /// - a worker could not be spawned or panicked.
    pub fn execute(
        &self,
        spec: &FilterSpec,
        input: &[f32],
        plan: &ExecutionPlan,
    ) -> Result<Execution> {
        if plan.len() != input.len() {
            return Err(ParafiltError::Other(anyhow::anyhow!(
                "execution plan covers {} samples but input has {}",
                plan.len(),
                input.len()
            )));
        }

        let kernel = spec.kernel();
        let history = match self.mode {
            ExecutionMode::Exact => kernel.history_len(),
            ExecutionMode::Approximate => 0,
        };

        let jobs: Vec<_> = plan
            .chunks()
            .iter()
            .map(|chunk| {
                let lead = history.min(chunk.start);
                let window = &input[chunk.start - lead..chunk.end()];
                move || kernel.process(window, lead)
            })
            .collect();

        let (parts, elapsed) = self
            .stopwatch
            .time(|| self.fork_join.join_ordered(jobs));
        let parts = parts?;

        let mut merged = Vec::with_capacity(input.len());
        for part in parts {
            merged.extend(part);
        }

        Ok(Execution {
            output: spec.finish(merged),
            elapsed,
            threads: plan.threads(),
        })
    }
}
