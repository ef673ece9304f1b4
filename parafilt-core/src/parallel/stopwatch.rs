//! Timing seam for the spawn-to-join interval.

use std::time::{Duration, Instant};

/// Measures how long a closure takes.
///
/// Injected into the executor so tests can script durations.
pub trait Stopwatch {
    fn time<R>(&self, f: impl FnOnce() -> R) -> (R, Duration);
}

/// Monotonic wall-clock timing via [`Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl Stopwatch for WallClock {
    fn time<R>(&self, f: impl FnOnce() -> R) -> (R, Duration) {
        let started = Instant::now();
        let out = f();
        (out, started.elapsed())
    }
}
