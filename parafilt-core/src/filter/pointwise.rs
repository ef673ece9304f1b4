//! Memoryless amplitude-shaping filters.
//!
//! Both treat a sample's own value as a surrogate "frequency" and scale the
//! sample by a magnitude response evaluated there. They are not spectral
//! filters; every output depends on exactly one input.

/// `H(f) = f² / (f² + df²)`.
#[inline]
pub fn bandpass_gain(f: f32, df: f32) -> f32 {
    let f2 = f * f;
    f2 / (f2 + df * df)
}

/// `H(f) = 1 / ((f / f0)^(2n) + 1)`.
///
/// Exponents past `i32::MAX` saturate; the response is already a step there.
#[inline]
pub fn notch_gain(f: f32, f0: f32, order: u32) -> f32 {
    let exponent = i32::try_from(order.saturating_mul(2)).unwrap_or(i32::MAX);
    1.0 / ((f / f0).powi(exponent) + 1.0)
}

/// `output[i] = H(input[i]) * input[i]` with the bandpass response.
pub fn bandpass(input: &[f32], df: f32) -> Vec<f32> {
    input.iter().map(|&f| bandpass_gain(f, df) * f).collect()
}

/// `output[i] = H(input[i]) * input[i]` with the notch response.
pub fn notch(input: &[f32], f0: f32, order: u32) -> Vec<f32> {
    input.iter().map(|&f| notch_gain(f, f0, order) * f).collect()
}
