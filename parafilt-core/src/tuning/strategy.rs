//! Search strategies over candidate thread counts.

use std::time::Duration;

use tracing::debug;

use super::CandidateSet;
use crate::error::{ParafiltError, Result};

/// One timed execution at a given thread count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trial {
    pub threads: usize,
    pub elapsed: Duration,
}

/// Winner of a search plus every trial that was run to find it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub threads: usize,
    pub elapsed: Duration,
    pub trials: Vec<Trial>,
}

/// Decides which candidates to time and which one wins.
///
/// `trial` executes the filter once at the given thread count and returns the
/// measured duration. Strategies never see the filter or the executor, so a
/// new strategy can be dropped in without touching either.
pub trait SearchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn select(
        &self,
        candidates: &CandidateSet,
        trial: &mut dyn FnMut(usize) -> Result<Duration>,
    ) -> Result<Selection>;
}

/// Times every candidate once, in ascending order, and keeps the fastest.
///
/// Comparison is strict `<`, so on a tie the earlier (smaller) thread count
/// wins. Costs one full filter execution per candidate: offline tuning only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveSweep;

impl SearchStrategy for ExhaustiveSweep {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn select(
        &self,
        candidates: &CandidateSet,
        trial: &mut dyn FnMut(usize) -> Result<Duration>,
    ) -> Result<Selection> {
        let mut trials = Vec::with_capacity(candidates.len());
        let mut best: Option<Trial> = None;

        for threads in candidates.iter() {
            let elapsed = trial(threads)?;
            debug!(
                threads,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                "sweep trial"
            );
            let current = Trial { threads, elapsed };
            trials.push(current);
            let faster = match best {
                Some(b) => current.elapsed < b.elapsed,
                None => true,
            };
            if faster {
                best = Some(current);
            }
        }

        let best = best.ok_or_else(|| {
            ParafiltError::InvalidCandidates("no candidates to sweep".into())
        })?;
        Ok(Selection {
            threads: best.threads,
            elapsed: best.elapsed,
            trials,
        })
    }
}
