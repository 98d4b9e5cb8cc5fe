// =============================================================================
// Rolling Mean — shared by SMA and RSI
// =============================================================================
//
// A trailing, unweighted mean over a fixed window.  Input values are
// `Option<f64>` so that undefined leading entries (e.g. the first price delta)
// propagate: any window that contains an undefined value is itself undefined.
// =============================================================================

/// Compute the rolling mean of `values` over `window` elements.
///
/// The output has the same length as the input. Index `i` is `Some(mean)` only
/// when `i >= window - 1` and every value in `values[i + 1 - window ..= i]` is
/// defined.
///
/// # Edge cases
/// - `window == 0` => every output is `None`
/// - `values.len() < window` => every output is `None`
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return result;
    }

    let window_f = window as f64;
    for (offset, slice) in values.windows(window).enumerate() {
        let sum: Option<f64> = slice.iter().copied().sum();
        result[offset + window - 1] = sum.map(|s| s / window_f);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defined(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn mean_over_full_windows() {
        let out = rolling_mean(&defined(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2);
        assert_eq!(out, vec![None, Some(1.5), Some(2.5), Some(3.5), Some(4.5)]);
    }

    #[test]
    fn window_of_one_is_identity() {
        let input = defined(&[7.0, 8.0, 9.0]);
        assert_eq!(rolling_mean(&input, 1), input);
    }

    #[test]
    fn undefined_value_poisons_its_windows() {
        let input = vec![None, Some(2.0), Some(4.0), Some(6.0)];
        let out = rolling_mean(&input, 2);
        assert_eq!(out, vec![None, None, Some(3.0), Some(5.0)]);
    }

    #[test]
    fn zero_window_is_all_undefined() {
        assert_eq!(rolling_mean(&defined(&[1.0, 2.0]), 0), vec![None, None]);
    }

    #[test]
    fn short_input_is_all_undefined() {
        assert_eq!(rolling_mean(&defined(&[1.0, 2.0]), 3), vec![None, None]);
        assert!(rolling_mean(&[], 3).is_empty());
    }
}
