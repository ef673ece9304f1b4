//! The filter bank.
//!
//! [`FilterSpec`] names a filter and its parameters. Every variant has:
//!
//! - [`FilterSpec::apply`]: the unchunked sequential reference result;
//! - [`FilterSpec::kernel`]: the chunk-local part the executor may split;
//! - [`FilterSpec::finish`]: the part that must see the merged sequence.
//!
//! ```text
//! Bandpass / Notch   kernel = pointwise          finish = identity
//! Fir                kernel = convolution(c)     finish = identity
//! Iir                kernel = convolution(b)     finish = feedback(a), sequential
//! ```

pub mod convolution;
pub mod pointwise;

use std::fmt;

/// A filter from the bank plus its parameters.
///
/// Coefficient index 0 weights the most recent sample.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    Bandpass { df: f32 },
    Notch { f0: f32, order: u32 },
    Fir { coefficients: Vec<f32> },
    Iir { feedforward: Vec<f32>, feedback: Vec<f32> },
}

impl FilterSpec {
    /// Stable lowercase name, used in output file names and reports.
    pub fn name(&self) -> &'static str {
        match self {
            FilterSpec::Bandpass { .. } => "bandpass",
            FilterSpec::Notch { .. } => "notch",
            FilterSpec::Fir { .. } => "fir",
            FilterSpec::Iir { .. } => "iir",
        }
    }

    /// Single-pass sequential result over the whole input.
    pub fn apply(&self, input: &[f32]) -> Vec<f32> {
        match self {
            FilterSpec::Bandpass { df } => pointwise::bandpass(input, *df),
            FilterSpec::Notch { f0, order } => pointwise::notch(input, *f0, *order),
            FilterSpec::Fir { coefficients } => convolution::fir(input, coefficients),
            FilterSpec::Iir {
                feedforward,
                feedback,
            } => convolution::iir(input, feedforward, feedback),
        }
    }

    /// The part of the filter that may run per chunk.
    pub fn kernel(&self) -> Kernel<'_> {
        match self {
            FilterSpec::Bandpass { df } => Kernel::Bandpass { df: *df },
            FilterSpec::Notch { f0, order } => Kernel::Notch {
                f0: *f0,
                order: *order,
            },
            FilterSpec::Fir { coefficients } => Kernel::Convolution { coefficients },
            FilterSpec::Iir { feedforward, .. } => Kernel::Convolution {
                coefficients: feedforward,
            },
        }
    }

    /// Sequential stage applied to the merged kernel output.
    pub fn finish(&self, merged: Vec<f32>) -> Vec<f32> {
        match self {
            FilterSpec::Iir { feedback, .. } => convolution::iir_feedback(merged, feedback),
            _ => merged,
        }
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSpec::Bandpass { df } => write!(f, "bandpass(df={df})"),
            FilterSpec::Notch { f0, order } => write!(f, "notch(f0={f0}, n={order})"),
            FilterSpec::Fir { coefficients } => write!(f, "fir({} taps)", coefficients.len()),
            FilterSpec::Iir {
                feedforward,
                feedback,
            } => write!(
                f,
                "iir({} feedforward, {} feedback)",
                feedforward.len(),
                feedback.len()
            ),
        }
    }
}

/// Chunk-local transfer function.
///
/// `Copy` and borrow-only so one value can be handed to every worker.
#[derive(Debug, Clone, Copy)]
pub enum Kernel<'a> {
    Bandpass { df: f32 },
    Notch { f0: f32, order: u32 },
    Convolution { coefficients: &'a [f32] },
}

impl Kernel<'_> {
    /// Preceding input samples needed to compute a chunk's first output exactly.
    pub fn history_len(&self) -> usize {
        match self {
            Kernel::Convolution { coefficients } => coefficients.len().saturating_sub(1),
            _ => 0,
        }
    }

    /// Filter `window[lead..]`, reading `window[..lead]` only as history.
    pub fn process(&self, window: &[f32], lead: usize) -> Vec<f32> {
        let lead = lead.min(window.len());
        match *self {
            Kernel::Bandpass { df } => pointwise::bandpass(&window[lead..], df),
            Kernel::Notch { f0, order } => pointwise::notch(&window[lead..], f0, order),
            Kernel::Convolution { coefficients } => {
                convolution::convolve_from(window, lead, coefficients)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> Vec<FilterSpec> {
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

    #[test]
    fn names_are_stable() {
        let names: Vec<_> = bank().iter().map(FilterSpec::name).collect();
        assert_eq!(names, ["bandpass", "notch", "fir", "iir"]);
    }

    #[test]
    fn kernel_then_finish_matches_apply() {
        let input: Vec<f32> = (0..40).map(|i| (i as f32 * 0.21).cos() * 2.0).collect();
        for spec in bank() {
            let staged = spec.finish(spec.kernel().process(&input, 0));
            assert_eq!(staged, spec.apply(&input), "{spec}");
        }
    }

    #[test]
    fn history_len_only_for_convolution() {
        let specs = bank();
        let lens: Vec<_> = specs.iter().map(|s| s.kernel().history_len()).collect();
        assert_eq!(lens, [0, 0, 2, 1]);
        let empty = FilterSpec::Fir {
            coefficients: vec![],
        };
        assert_eq!(empty.kernel().history_len(), 0);
    }

    #[test]
    fn pointwise_kernel_skips_history_prefix() {
        let k = FilterSpec::Bandpass { df: 2.0 }.kernel();
        let out = k.process(&[9.0, 9.0, 2.0], 2);
        assert_eq!(out, vec![1.0]);
    }

    #[test]
    fn display_summarises_parameters() {
        let spec = FilterSpec::Fir {
            coefficients: vec![0.0; 100],
        };
        assert_eq!(spec.to_string(), "fir(100 taps)");
    }
}
