//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * value[t] + (1 - alpha) * EMA[t-1]
//! with alpha = 2 / (window + 1).
//! Seed: EMA[0] = value[0], so the average is defined from the first
//! observation — unlike the SMA there is no warmup gap.

/// Span-parameterized exponential average of `values`.
///
/// Defined from index 0 even when `window` exceeds the slice length; the
/// window only controls the smoothing factor.
pub fn ema(values: &[f64], window: usize) -> Vec<Option<f64>> {
    assert!(window >= 1, "EMA window must be >= 1");
    let n = values.len();
    let mut result = vec![None; n];

    if n == 0 {
        return result;
    }

    let alpha = 2.0 / (window as f64 + 1.0);

    let mut prev = values[0];
    result[0] = Some(prev);

    for i in 1..n {
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = Some(prev);
    }

    result
}
