use common::{
    IndicatorBar, PriceBar, Regime, RegimeChange, Result, SupertrendError, SupertrendParameters,
};

use super::atr::{calculate_true_range, smooth_true_range};

/// Check the series and parameters before anything is computed
///
/// Rejects empty input, bad parameters, non-finite prices, impossible
/// OHLC relations and dates that are not strictly increasing.
pub fn validate_input(bars: &[PriceBar], params: &SupertrendParameters) -> Result<()> {
    params.validate()?;

    if bars.is_empty() {
        return Err(SupertrendError::InvalidInput("price series is empty".to_string()));
    }

    for (i, bar) in bars.iter().enumerate() {
        let prices = [bar.open, bar.high, bar.low, bar.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err(SupertrendError::invalid_at(i, "non-finite price"));
        }
        if bar.low > bar.high {
            return Err(SupertrendError::invalid_at(
                i,
                format!("low {} above high {}", bar.low, bar.high),
            ));
        }
        if bar.open < bar.low || bar.open > bar.high {
            return Err(SupertrendError::invalid_at(
                i,
                format!("open {} outside [{}, {}]", bar.open, bar.low, bar.high),
            ));
        }
        if bar.close < bar.low || bar.close > bar.high {
            return Err(SupertrendError::invalid_at(
                i,
                format!("close {} outside [{}, {}]", bar.close, bar.low, bar.high),
            ));
        }
        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(SupertrendError::invalid_at(
                i,
                format!("date {} does not follow {}", bar.date, bars[i - 1].date),
            ));
        }
    }

    Ok(())
}

/// Upper band only moves down, unless the previous close broke above it
pub fn next_final_upper(basic_upper: f64, prev_final_upper: f64, prev_close: f64) -> f64 {
    if basic_upper < prev_final_upper || prev_close > prev_final_upper {
        basic_upper
    } else {
        prev_final_upper
    }
}

/// Lower band only moves up, unless the previous close broke below it
pub fn next_final_lower(basic_lower: f64, prev_final_lower: f64, prev_close: f64) -> f64 {
    if basic_lower > prev_final_lower || prev_close < prev_final_lower {
        basic_lower
    } else {
        prev_final_lower
    }
}

/// Regime stays put unless the close crosses the band opposing it
pub fn next_regime(prev: Regime, close: f64, final_upper: f64, final_lower: f64) -> Regime {
    match prev {
        Regime::Up if close < final_lower => Regime::Down,
        Regime::Down if close > final_upper => Regime::Up,
        _ => prev,
    }
}

/// Calculate the Supertrend series
///
/// # Arguments
/// * `bars` - Chronologically ordered daily bars
/// * `params` - ATR period, multiplier and ATR seeding
///
/// # Returns
/// One `IndicatorBar` per input bar, or `InvalidInput` with nothing computed
pub fn calculate_supertrend(
    bars: &[PriceBar],
    params: &SupertrendParameters,
) -> Result<Vec<IndicatorBar>> {
    validate_input(bars, params)?;

    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    // Per-bar stages: TR, ATR, basic bands
    let tr = calculate_true_range(&highs, &lows, &closes);
    let atr = smooth_true_range(&tr, params.period, params.atr_seeding);

    let mut out: Vec<IndicatorBar> = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let mid = bar.hl2();
        let offset = params.multiplier * atr[i];
        let basic_upper = mid + offset;
        let basic_lower = mid - offset;

        let (final_upper, final_lower, regime) = match out.last() {
            None => (basic_upper, basic_lower, Regime::Up),
            Some(prev) => {
                let upper = next_final_upper(basic_upper, prev.final_upper_band, prev.close);
                let lower = next_final_lower(basic_lower, prev.final_lower_band, prev.close);
                (upper, lower, next_regime(prev.regime, bar.close, upper, lower))
            }
        };

        out.push(IndicatorBar {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            true_range: tr[i],
            atr: atr[i],
            basic_upper_band: basic_upper,
            basic_lower_band: basic_lower,
            final_upper_band: final_upper,
            final_lower_band: final_lower,
            regime,
            supertrend_level: regime.level(final_upper, final_lower),
        });
    }

    Ok(out)
}

/// List every bar where the regime flipped
pub fn regime_changes(bars: &[IndicatorBar]) -> Vec<RegimeChange> {
    bars.windows(2)
        .enumerate()
        .filter(|(_, w)| w[0].regime != w[1].regime)
        .map(|(i, w)| RegimeChange {
            index: i + 1,
            date: w[1].date,
            from: w[0].regime,
            to: w[1].regime,
            level: w[1].supertrend_level,
        })
        .collect()
}
