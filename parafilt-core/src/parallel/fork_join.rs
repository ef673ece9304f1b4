//! Fork/join primitive returning results in job order.
//!
//! The executor only talks to [`ForkJoin`], so a bounded pool can replace
//! [`ScopedThreads`] without touching call sites.

use std::thread;

use crate::error::{ParafiltError, Result};

/// Runs every job to completion and returns their results in job order.
///
/// Implementations block until all jobs have finished. There is no
/// cancellation: a job that never returns blocks the caller forever.
pub trait ForkJoin {
    fn join_ordered<R, F>(&self, jobs: Vec<F>) -> Result<Vec<R>>
    where
        R: Send,
        F: FnOnce() -> R + Send;
}

/// One fresh, named OS thread per job, torn down at join.
///
/// Threads are scoped, so jobs may borrow the caller's input buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopedThreads;

impl ForkJoin for ScopedThreads {
    fn join_ordered<R, F>(&self, jobs: Vec<F>) -> Result<Vec<R>>
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(jobs.len());
            for (index, job) in jobs.into_iter().enumerate() {
                let handle = thread::Builder::new()
                    .name(format!("parafilt-chunk-{index}"))
                    .spawn_scoped(scope, job)
                    .map_err(|source| ParafiltError::ThreadSpawn { index, source })?;
                handles.push(handle);
            }

            // Join every handle in spawn order before reporting, so results
            // line up with jobs and no panicked worker is left to the scope.
            let joined: Vec<_> = handles.into_iter().map(|h| h.join()).collect();
            joined
                .into_iter()
                .enumerate()
                .map(|(index, r)| r.map_err(|_| ParafiltError::WorkerPanicked { index }))
                .collect()
        })
    }
}

/// Runs every job on the calling thread. Useful as a baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl ForkJoin for Inline {
    fn join_ordered<R, F>(&self, jobs: Vec<F>) -> Result<Vec<R>>
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        Ok(jobs.into_iter().map(|job| job()).collect())
    }
}
