//! WAV decode/encode via `hound`.
//!
//! Decoding keeps channels interleaved (no downmix). Integer PCM is scaled to
//! `[-1.0, 1.0]` by `2^(bits-1) - 1`. Encoding always writes 32-bit IEEE
//! float so filter outputs outside `[-1, 1]` survive unclipped.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::debug;

use super::{AudioFormat, SampleBuffer, SampleSink, SampleSource};
use crate::error::{ParafiltError, Result};

/// Stateless WAV reader/writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavFile;

impl SampleSource for WavFile {
    fn read(&self, path: &Path) -> Result<SampleBuffer> {
        let mut reader = WavReader::open(path).map_err(|source| ParafiltError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let spec = reader.spec();
        let format = AudioFormat {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            frames: reader.duration() as usize,
        };
        let expected = format.sample_count();

        let samples = match spec.sample_format {
            SampleFormat::Float => drain(reader.samples::<f32>(), path, expected)?,
            SampleFormat::Int => {
                let max = ((1_i64 << (spec.bits_per_sample - 1)) - 1) as f32;
                drain(
                    reader.samples::<i32>().map(|s| s.map(|v| v as f32 / max)),
                    path,
                    expected,
                )?
            }
        };

        if samples.len() != expected {
            return Err(ParafiltError::FrameCountMismatch {
                path: path.to_path_buf(),
                expected,
                actual: samples.len(),
            });
        }

        debug!(
            path = %path.display(),
            frames = format.frames,
            channels = format.channels,
            sample_rate = format.sample_rate,
            "decoded wav"
        );
        Ok(SampleBuffer::new(samples, format))
    }
}

/// Collect decoded samples, counting them so a data chunk that ends early is
/// reported as a short read rather than a decode failure.
fn drain<I>(samples: I, path: &Path, expected: usize) -> Result<Vec<f32>>
where
    I: Iterator<Item = hound::Result<f32>>,
{
    let mut out = Vec::with_capacity(expected);
    for sample in samples {
        match sample {
            Ok(v) => out.push(v),
            // The header has already been parsed; running out of bytes here
            // means the file is shorter than it claims.
            Err(hound::Error::IoError(_)) => {
                return Err(ParafiltError::FrameCountMismatch {
                    path: path.to_path_buf(),
                    expected,
                    actual: out.len(),
                });
            }
            Err(source) => {
                return Err(ParafiltError::Decode {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }
    Ok(out)
}

impl SampleSink for WavFile {
    fn write(&self, path: &Path, samples: &[f32], format: &AudioFormat) -> Result<()> {
        let expected = format.sample_count();
        if samples.len() != expected {
            return Err(ParafiltError::FrameCountMismatch {
                path: path.to_path_buf(),
                expected,
                actual: samples.len(),
            });
        }

        let spec = WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(path, spec).map_err(|source| {
            ParafiltError::FileOpen {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let encode_err = |source| ParafiltError::Encode {
            path: path.to_path_buf(),
            source,
        };

        for &sample in samples {
            writer.write_sample(sample).map_err(encode_err)?;
        }
        let written = writer.len() as usize;
        writer.finalize().map_err(encode_err)?;

        if written != expected {
            return Err(ParafiltError::FrameCountMismatch {
                path: path.to_path_buf(),
                expected,
                actual: written,
            });
        }

        debug!(path = %path.display(), samples = written, "encoded wav");
        Ok(())
    }
}
