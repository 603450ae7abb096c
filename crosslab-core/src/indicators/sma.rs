//! Simple Moving Average (SMA).
//!
//! Rolling mean over a lookback window.
//! Undefined until `window` observations exist (first value at index window-1).

/// Rolling mean of `values` over `window` observations.
///
/// `result[t]` covers `values[t+1-window ..= t]` and is `None` for
/// `t < window - 1`. A window longer than the whole slice yields all `None`.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    assert!(window >= 1, "SMA window must be >= 1");
    let n = values.len();
    let mut result = vec![None; n];

    if n < window {
        return result;
    }

    // Compute initial window sum, then roll it forward.
    let mut sum: f64 = values.iter().take(window).sum();
    result[window - 1] = Some(sum / window as f64);

    for i in window..n {
        sum = sum - values[i - window] + values[i];
        result[i] = Some(sum / window as f64);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx_opt, DEFAULT_EPSILON};

    #[test]
    fn sma_5_basic() {
        let values = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0];
        let result = sma(&values, 5);

        assert_eq!(result.len(), 7);
        for (i, v) in result.iter().take(4).enumerate() {
            assert!(v.is_none(), "expected None at index {i}");
        }
        // SMA[4] = mean(10,11,12,13,14) = 12.0
        assert_approx_opt(result[4], 12.0, DEFAULT_EPSILON);
        // SMA[5] = mean(11,12,13,14,15) = 13.0
        assert_approx_opt(result[5], 13.0, DEFAULT_EPSILON);
        // SMA[6] = mean(12,13,14,15,16) = 14.0
        assert_approx_opt(result[6], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_identity() {
        let values = [100.0, 200.0, 300.0];
        let result = sma(&values, 1);
        assert_approx_opt(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx_opt(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx_opt(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_2_first_defined_at_index_1() {
        let values = [100.0, 110.0, 99.0, 108.0];
        let result = sma(&values, 2);
        assert!(result[0].is_none());
        assert_approx_opt(result[1], 105.0, DEFAULT_EPSILON);
        assert_approx_opt(result[2], 104.5, DEFAULT_EPSILON);
        assert_approx_opt(result[3], 103.5, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_window_longer_than_series_is_all_none() {
        let values = [10.0, 11.0];
        let result = sma(&values, 5);
        assert!(result.iter().all(|v| v.is_none()));
    }

    #[test]
    fn sma_empty_input() {
        assert!(sma(&[], 3).is_empty());
    }

    #[test]
    fn sma_rolling_matches_direct_mean() {
        let values: Vec<f64> = (1..=50).map(|i| (i as f64).sin() * 10.0 + 100.0).collect();
        let window = 7;
        let result = sma(&values, window);
        for t in (window - 1)..values.len() {
            let direct: f64 =
                values[t + 1 - window..=t].iter().sum::<f64>() / window as f64;
            assert_approx_opt(result[t], direct, 1e-9);
        }
    }

    #[test]
    #[should_panic(expected = "SMA window must be >= 1")]
    fn sma_zero_window_panics() {
        sma(&[1.0, 2.0], 0);
    }
}
