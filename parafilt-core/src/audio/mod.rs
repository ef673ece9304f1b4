//! Decoded audio buffers and the file collaborators that produce/consume them.
//!
//! The filter engine only ever sees a flat, interleaved `&[f32]`. Everything
//! about containers lives behind [`SampleSource`] and [`SampleSink`] so the
//! engine can be driven from memory in tests.

pub mod wav;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use wav::WavFile;

/// Format metadata carried alongside a decoded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
    /// Frames per channel.
    pub frames: usize,
}

impl AudioFormat {
    /// Number of interleaved samples a buffer in this format must hold.
    pub fn sample_count(&self) -> usize {
        self.frames * usize::from(self.channels)
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames as f64 / self.sample_rate as f64
    }
}

/// Interleaved samples plus the format they were decoded with.
///
/// Immutable once built: filters borrow the samples read-only.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    format: AudioFormat,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>, format: AudioFormat) -> Self {
        Self { samples, format }
    }

    /// Wrap mono samples, deriving the frame count from the length.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        let format = AudioFormat {
            sample_rate,
            channels: 1,
            frames: samples.len(),
        };
        Self { samples, format }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn format(&self) -> &AudioFormat {
        &self.format
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Decoder collaborator: turns a path into a [`SampleBuffer`].
pub trait SampleSource {
    /// # Errors
    /// Missing or corrupt files and short reads are fatal to the caller.
    fn read(&self, path: &Path) -> Result<SampleBuffer>;
}

/// Encoder collaborator: writes filtered samples using the source's format.
pub trait SampleSink {
    /// # Errors
    /// An unusable path or a sample count that does not match
    /// `format.frames * format.channels`.
    fn write(&self, path: &Path, samples: &[f32], format: &AudioFormat) -> Result<()>;
}
