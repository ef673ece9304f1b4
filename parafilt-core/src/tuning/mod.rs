//! Thread-count optimizer.
//!
//! Runs the chunked executor once per candidate thread count, lets a
//! [`SearchStrategy`] pick the fastest, then executes once more at the winning
//! count to produce the authoritative output. Trial outputs are dropped as
//! soon as they have been timed.

pub mod strategy;

use std::time::Duration;

use tracing::{info, info_span, warn};

use crate::error::{ParafiltError, Result};
use crate::filter::FilterSpec;
use crate::parallel::{
    ChunkExecutor, ExecutionMode, ExecutionPlan, ForkJoin, ScopedThreads, Stopwatch, WallClock,
};

pub use strategy::{ExhaustiveSweep, SearchStrategy, Selection, Trial};

/// Upper bound of the default sweep (`1..=100`).
pub const DEFAULT_MAX_THREADS: usize = 100;

/// Bounded, strictly ascending set of thread counts, all ≥ 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet(Vec<usize>);

impl Default for CandidateSet {
    fn default() -> Self {
        Self((1..=DEFAULT_MAX_THREADS).collect())
    }
}

impl CandidateSet {
    /// # Errors
    /// `InvalidCandidates` if empty, not strictly ascending, or containing 0.
    pub fn new(counts: Vec<usize>) -> Result<Self> {
        if counts.is_empty() {
            return Err(ParafiltError::InvalidCandidates("empty candidate set".into()));
        }
        if counts[0] == 0 {
            return Err(ParafiltError::InvalidCandidates(
                "thread counts must be at least 1".into(),
            ));
        }
        if counts.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ParafiltError::InvalidCandidates(format!(
                "thread counts must be strictly ascending: {counts:?}"
            )));
        }
        Ok(Self(counts))
    }

    /// `1..=max`.
    pub fn up_to(max: usize) -> Result<Self> {
        Self::new((1..=max).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Outcome of optimizing one filter.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub thread_count: usize,
    /// Best fork-to-join time observed during the search.
    pub elapsed: Duration,
    /// Output of the final run at `thread_count`.
    pub output: Vec<f32>,
    pub trials: Vec<Trial>,
}

/// Searches for the thread count that minimises fork-to-join latency.
pub struct ThreadCountOptimizer<J = ScopedThreads, W = WallClock> {
    executor: ChunkExecutor<J, W>,
    strategy: Box<dyn SearchStrategy>,
}

impl ThreadCountOptimizer {
    /// Exhaustive sweep over scoped threads, timed with the wall clock.
    pub fn new(mode: ExecutionMode) -> Self {
        Self::with_parts(ChunkExecutor::new(mode), Box::new(ExhaustiveSweep))
    }
}

impl<J: ForkJoin, W: Stopwatch> ThreadCountOptimizer<J, W> {
    pub fn with_parts(executor: ChunkExecutor<J, W>, strategy: Box<dyn SearchStrategy>) -> Self {
        Self { executor, strategy }
    }

    pub fn executor(&self) -> &ChunkExecutor<J, W> {
        &self.executor
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Search `candidates` for `spec` over `input` and return the winner's output.
    pub fn optimize(
        &self,
        spec: &FilterSpec,
        input: &[f32],
        candidates: &CandidateSet,
    ) -> Result<BenchmarkResult> {
        let span = info_span!(
            "optimize",
            filter = spec.name(),
            samples = input.len(),
            candidates = candidates.len()
        );
        let _guard = span.enter();

        if let Some(max) = candidates.as_slice().last().copied() {
            if max > input.len() && !input.is_empty() {
                warn!(
                    max_candidate = max,
                    samples = input.len(),
                    "candidates above the buffer length run clamped to one sample per thread"
                );
            }
        }

        let selection = self.strategy.select(candidates, &mut |threads| {
            // Fresh plan per trial; partitioning stays outside the timed region.
            let plan = ExecutionPlan::new(input.len(), threads)?;
            Ok(self.executor.execute(spec, input, &plan)?.elapsed)
        })?;

        let authoritative = self.executor.run(spec, input, selection.threads)?;

        info!(
            filter = spec.name(),
            threads = selection.threads,
            effective_threads = authoritative.threads,
            best_ms = selection.elapsed.as_secs_f64() * 1000.0,
            strategy = self.strategy.name(),
            "thread count selected"
        );

        Ok(BenchmarkResult {
            thread_count: selection.threads,
            elapsed: selection.elapsed,
            output: authoritative.output,
            trials: selection.trials,
        })
    }
}
