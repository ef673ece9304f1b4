//! # parafilt-core
//!
//! Filter bank plus a chunked-parallel executor and a thread-count optimizer.
//!
//! ## Architecture
//!
//! ```text
//! SampleSource ─► SampleBuffer ─► Orchestrator ─┬─► ThreadCountOptimizer ─► ChunkExecutor
//!                                               │        (per candidate)        │
//!                                               │                       ExecutionPlan chunks
//!                                               │                               │
//!                                               │                 ForkJoin: one thread per chunk
//!                                               │                               │
//!                                               │                    concat in chunk order
//!                                               │                    + FilterSpec::finish
//!                                               └─► SampleSink (<mode>_<filter>_filter_output.wav)
//! ```
//!
//! The input buffer is shared read-only by every worker; each worker owns its
//! output `Vec`. No locks are taken while filtering.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod audio;
pub mod coefficients;
pub mod engine;
pub mod error;
pub mod filter;
pub mod parallel;
pub mod report;
pub mod tuning;

// Convenience re-exports for downstream crates
pub use audio::{AudioFormat, SampleBuffer, SampleSink, SampleSource, WavFile};
pub use coefficients::CoefficientGenerator;
pub use engine::{Orchestrator, RunConfig, RunMode};
pub use error::{ParafiltError, Result};
pub use filter::FilterSpec;
pub use parallel::{ChunkExecutor, ExecutionMode, ExecutionPlan};
pub use report::{FilterReport, RunSummary, TrialRecord};
pub use tuning::{BenchmarkResult, CandidateSet, ExhaustiveSweep, SearchStrategy, ThreadCountOptimizer};
