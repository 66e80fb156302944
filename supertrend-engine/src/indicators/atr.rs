use common::AtrSeeding;

/// Calculate True Range for a single bar
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// Calculate True Range for every bar
///
/// The first bar has no previous close, so its range is high - low.
pub fn calculate_true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = highs.len();
    if n == 0 {
        return vec![];
    }

    let mut tr = vec![0.0; n];
    tr[0] = highs[0] - lows[0];

    for i in 1..n {
        tr[i] = true_range(highs[i], lows[i], closes[i - 1]);
    }

    tr
}

/// Wilder's running moving average seeded with the first sample
///
/// `out[i] = alpha * values[i] + (1 - alpha) * out[i - 1]`, alpha = 1 / period.
/// Weights are not renormalized as history grows.
pub fn calculate_rma(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    if n == 0 || period == 0 {
        return vec![];
    }

    let alpha = 1.0 / period as f64;
    let mut rma = vec![0.0; n];
    rma[0] = values[0];

    for i in 1..n {
        rma[i] = alpha * values[i] + (1.0 - alpha) * rma[i - 1];
    }

    rma
}

/// Wilder's moving average seeded with the mean of the first window
///
/// Bars before `period - 1` hold the expanding mean so every index is defined.
pub fn calculate_rma_windowed(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    if n == 0 || period == 0 {
        return vec![];
    }

    let alpha = 1.0 / period as f64;
    let mut rma = vec![0.0; n];
    let mut sum = 0.0;

    for i in 0..n {
        if i < period {
            sum += values[i];
            rma[i] = sum / (i + 1) as f64;
        } else {
            rma[i] = alpha * values[i] + (1.0 - alpha) * rma[i - 1];
        }
    }

    rma
}

/// Smooth a True Range series into ATR
pub fn smooth_true_range(tr: &[f64], period: usize, seeding: AtrSeeding) -> Vec<f64> {
    match seeding {
        AtrSeeding::FirstBar => calculate_rma(tr, period),
        AtrSeeding::Window => calculate_rma_windowed(tr, period),
    }
}

/// Calculate Average True Range
///
/// # Arguments
/// * `highs` - Slice of high prices
/// * `lows` - Slice of low prices
/// * `closes` - Slice of closing prices
/// * `period` - ATR period (typically 10 for Supertrend)
/// * `seeding` - How the first ATR values are formed
///
/// # Returns
/// Vector of ATR values, same length as the input
pub fn calculate_atr(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
    seeding: AtrSeeding,
) -> Vec<f64> {
    let tr = calculate_true_range(highs, lows, closes);
    smooth_true_range(&tr, period, seeding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_atr_basic() {
        let highs = vec![48.7, 48.72, 48.9, 48.87, 48.82, 49.05, 49.2, 49.35, 49.92, 50.19];
        let lows = vec![47.79, 48.14, 48.39, 48.37, 48.24, 48.64, 48.94, 48.86, 49.5, 49.87];
        let closes = vec![48.16, 48.61, 48.75, 48.63, 48.74, 49.03, 49.07, 49.32, 49.91, 50.13];

        let atr = calculate_atr(&highs, &lows, &closes, 5, AtrSeeding::FirstBar);

        assert_eq!(atr.len(), highs.len());
        assert_relative_eq!(atr[0], 48.7 - 47.79, epsilon = 1e-12);
        for value in &atr {
            assert!(*value > 0.0);
        }
    }

    #[test]
    fn test_true_range() {
        let tr = true_range(50.0, 48.0, 49.0);
        // TR should be max(50-48, |50-49|, |48-49|) = max(2, 1, 1) = 2
        assert_eq!(tr, 2.0);
    }

    #[test]
    fn test_true_range_gap_up() {
        // Gap up scenario
        let tr = true_range(52.0, 51.0, 48.0);
        // TR should be max(52-51, |52-48|, |51-48|) = max(1, 4, 3) = 4
        assert_eq!(tr, 4.0);
    }

    #[test]
    fn test_true_range_gap_down() {
        let tr = true_range(45.0, 44.0, 48.0);
        // max(1, 3, 4) = 4
        assert_eq!(tr, 4.0);
    }

    #[test]
    fn test_first_true_range_ignores_missing_close() {
        let tr = calculate_true_range(&[10.0, 12.0], &[9.0, 11.5], &[9.5, 12.0]);
        assert_eq!(tr[0], 1.0);
        // max(0.5, |12-9.5|, |11.5-9.5|) = 2.5
        assert_eq!(tr[1], 2.5);
    }

    #[test]
    fn test_rma_unadjusted() {
        let rma = calculate_rma(&[2.0, 4.0, 4.0], 2);
        assert_eq!(rma[0], 2.0);
        assert_relative_eq!(rma[1], 3.0);
        assert_relative_eq!(rma[2], 3.5);
    }

    #[test]
    fn test_rma_windowed_seed() {
        let rma = calculate_rma_windowed(&[1.0, 2.0, 3.0, 6.0], 3);
        assert_relative_eq!(rma[0], 1.0);
        assert_relative_eq!(rma[1], 1.5);
        // SMA of the first window
        assert_relative_eq!(rma[2], 2.0);
        assert_relative_eq!(rma[3], 6.0 / 3.0 + 2.0 * 2.0 / 3.0);
    }

    #[test]
    fn test_period_one_tracks_true_range() {
        let tr = vec![1.0, 5.0, 2.0];
        assert_eq!(calculate_rma(&tr, 1), tr);
        assert_eq!(calculate_rma_windowed(&tr, 1), tr);
    }

    #[test]
    fn test_empty_input() {
        assert!(calculate_true_range(&[], &[], &[]).is_empty());
        assert!(calculate_rma(&[], 10).is_empty());
    }
}
