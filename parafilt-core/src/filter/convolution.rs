//! Causal convolution (FIR) and the two-stage IIR recurrence.
//!
//! `convolve_from` is the chunk-local primitive: it filters `window[lead..]`
//! and uses `window[..lead]` only as input history. With `lead == 0` it is the
//! plain FIR with implicit zero history.

/// `out[n - lead] = Σ_{k=0}^{min(n, M-1)} c[k] * window[n - k]` for `n` in `lead..len`.
pub fn convolve_from(window: &[f32], lead: usize, coefficients: &[f32]) -> Vec<f32> {
    let lead = lead.min(window.len());
    let mut out = Vec::with_capacity(window.len() - lead);
    for n in lead..window.len() {
        let taps = coefficients.len().min(n + 1);
        let mut acc = 0.0f32;
        for (k, c) in coefficients[..taps].iter().enumerate() {
            acc += c * window[n - k];
        }
        out.push(acc);
    }
    out
}

/// Causal FIR over the whole input.
pub fn fir(input: &[f32], coefficients: &[f32]) -> Vec<f32> {
    convolve_from(input, 0, coefficients)
}

/// Sequential IIR recurrence over the whole input:
/// `y[n] = Σ b[k] x[n-k] − Σ_{j≥1} a[j] y[n-j]`.
///
/// `feedback[0]` is ignored (implicitly normalised to 1).
pub fn iir(input: &[f32], feedforward: &[f32], feedback: &[f32]) -> Vec<f32> {
    let mut out: Vec<f32> = Vec::with_capacity(input.len());
    for n in 0..input.len() {
        let mut acc = 0.0f32;
        for (k, b) in feedforward.iter().enumerate().take(n + 1) {
            acc += b * input[n - k];
        }
        for (j, a) in feedback.iter().enumerate().take(n + 1).skip(1) {
            acc -= a * out[n - j];
        }
        out.push(acc);
    }
    out
}

/// Feedback half of the IIR: runs the recursion in place over a feedforward
/// result. Must see the full sequence; never chunked.
pub fn iir_feedback(mut intermediate: Vec<f32>, feedback: &[f32]) -> Vec<f32> {
    for n in 0..intermediate.len() {
        let mut acc = intermediate[n];
        for (j, a) in feedback.iter().enumerate().take(n + 1).skip(1) {
            acc -= a * intermediate[n - j];
        }
        intermediate[n] = acc;
    }
    intermediate
}
