//! Deterministic split of a buffer into contiguous chunks.
//!
//! For `L` samples and `T` threads the effective thread count is
//! `min(T, L)`. The first `T-1` chunks get `floor(L / T)` samples and the last
//! absorbs the remainder, so chunks never overlap, never come out empty and
//! always cover the buffer exactly once.

use std::ops::Range;

use tracing::debug;

use crate::error::{ParafiltError, Result};

/// A contiguous sub-range of a sample buffer owned by one worker for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    pub len: usize,
}

impl Chunk {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Chunk list for one pass. Built fresh for every trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    chunks: Vec<Chunk>,
}

impl ExecutionPlan {
    /// Partition `len` samples across `threads` workers.
    ///
    /// # Errors
    /// `ZeroThreadCount` if `threads == 0`.
    pub fn new(len: usize, threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(ParafiltError::ZeroThreadCount);
        }
        let effective = threads.min(len);
        if effective < threads {
            debug!(
                requested = threads,
                effective, "thread count clamped to buffer length"
            );
        }

        let mut chunks = Vec::with_capacity(effective);
        if effective > 0 {
            let chunk_size = len / effective;
            for i in 0..effective - 1 {
                chunks.push(Chunk {
                    start: i * chunk_size,
                    len: chunk_size,
                });
            }
            let last_start = chunk_size * (effective - 1);
            chunks.push(Chunk {
                start: last_start,
                len: len - last_start,
            });
        }

        Ok(Self { chunks })
    }

    /// Workers that will actually be spawned.
    pub fn threads(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Total samples covered.
    pub fn len(&self) -> usize {
        self.chunks.last().map(Chunk::end).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lens(plan: &ExecutionPlan) -> Vec<usize> {
        plan.chunks().iter().map(|c| c.len).collect()
    }

    #[test]
    fn last_chunk_absorbs_remainder() {
        let plan = ExecutionPlan::new(10, 3).unwrap();
        assert_eq!(lens(&plan), vec![3, 3, 4]);
        assert_eq!(plan.chunks()[2].range(), 6..10);
    }

    #[test]
    fn chunks_cover_buffer_exactly_once() {
        for len in 1..=64 {
            for threads in 1..=len {
                let plan = ExecutionPlan::new(len, threads).unwrap();
                assert_eq!(plan.threads(), threads);
                assert_eq!(lens(&plan).iter().sum::<usize>(), len);
                assert!(plan.chunks().iter().all(|c| c.len > 0));
                let mut expected_start = 0;
                for chunk in plan.chunks() {
                    assert_eq!(chunk.start, expected_start);
                    expected_start = chunk.end();
                }
                assert_eq!(plan.len(), len);
            }
        }
    }

    #[test]
    fn more_threads_than_samples_clamps_to_one_sample_each() {
        let plan = ExecutionPlan::new(3, 8).unwrap();
        assert_eq!(plan.threads(), 3);
        assert_eq!(lens(&plan), vec![1, 1, 1]);
    }

    #[test]
    fn empty_buffer_has_no_chunks() {
        let plan = ExecutionPlan::new(0, 4).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
    }

    #[test]
    fn zero_threads_is_rejected() {
        assert!(matches!(
            ExecutionPlan::new(10, 0),
            Err(ParafiltError::ZeroThreadCount)
        ));
    }

    #[test]
    fn single_thread_is_whole_buffer() {
        let plan = ExecutionPlan::new(7, 1).unwrap();
        assert_eq!(plan.chunks(), &[Chunk { start: 0, len: 7 }]);
    }
}
