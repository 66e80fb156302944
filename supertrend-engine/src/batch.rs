//! Parameter sweeps over a single series.

use common::{PriceBar, Regime, Result, SupertrendError, SupertrendParameters, SweepReport};
use rayon::prelude::*;

use crate::indicators::{calculate_supertrend, regime_changes, validate_input};

/// Cartesian grid of ATR periods and multipliers
#[derive(Debug, Clone)]
pub struct ParameterGrid {
    pub periods: Vec<usize>,
    pub multipliers: Vec<f64>,
    pub base: SupertrendParameters,
}

impl ParameterGrid {
    pub fn new(periods: Vec<usize>, multipliers: Vec<f64>) -> Self {
        Self {
            periods,
            multipliers,
            base: SupertrendParameters::default(),
        }
    }

    pub fn with_base(mut self, base: SupertrendParameters) -> Self {
        self.base = base;
        self
    }

    /// Expand into parameter sets, periods outer, multipliers inner
    pub fn combinations(&self) -> Vec<SupertrendParameters> {
        self.periods
            .iter()
            .flat_map(|&period| {
                self.multipliers.iter().map(move |&multiplier| {
                    self.base
                        .clone()
                        .with_period(period)
                        .with_multiplier(multiplier)
                })
            })
            .collect()
    }
}

/// Evaluate every grid combination on the same series in parallel.
///
/// The series and every combination are validated before any work starts.
pub fn evaluate_grid(bars: &[PriceBar], grid: &ParameterGrid) -> Result<Vec<SweepReport>> {
    let combos = grid.combinations();
    if combos.is_empty() {
        return Err(SupertrendError::InvalidInput(
            "parameter grid is empty".to_string(),
        ));
    }
    for params in &combos {
        validate_input(bars, params)?;
    }

    combos
        .par_iter()
        .map(|params| summarize(bars, params))
        .collect()
}

fn summarize(bars: &[PriceBar], params: &SupertrendParameters) -> Result<SweepReport> {
    let out = calculate_supertrend(bars, params)?;
    let flips = regime_changes(&out).len();
    let up = out.iter().filter(|b| b.regime == Regime::Up).count();
    let last = &out[out.len() - 1];

    Ok(SweepReport {
        period: params.period,
        multiplier: params.multiplier,
        final_regime: last.regime,
        final_level: last.supertrend_level,
        regime_changes: flips,
        up_pct: up as f64 / out.len() as f64 * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn test_bars(n: usize) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        (0..n)
            .map(|i| {
                let price = 20.0 + (i as f64 * 0.2).sin() * 3.0;
                PriceBar::new(
                    start + Duration::days(i as i64),
                    price,
                    price + 0.4,
                    price - 0.4,
                    price,
                )
            })
            .collect()
    }

    #[test]
    fn test_grid_order() {
        let grid = ParameterGrid::new(vec![7, 10], vec![2.0, 3.0]);
        let combos: Vec<(usize, f64)> = grid
            .combinations()
            .iter()
            .map(|p| (p.period, p.multiplier))
            .collect();
        assert_eq!(combos, vec![(7, 2.0), (7, 3.0), (10, 2.0), (10, 3.0)]);
    }

    #[test]
    fn test_evaluate_grid_matches_single_runs() {
        let bars = test_bars(150);
        let grid = ParameterGrid::new(vec![5, 10, 14], vec![1.5, 3.0]);

        let reports = evaluate_grid(&bars, &grid).unwrap();
        assert_eq!(reports.len(), 6);

        for (report, params) in reports.iter().zip(grid.combinations()) {
            assert_eq!(report.period, params.period);
            assert_eq!(report.multiplier, params.multiplier);
            let single = calculate_supertrend(&bars, &params).unwrap();
            assert_eq!(report.final_level, single[single.len() - 1].supertrend_level);
            assert_eq!(report.regime_changes, regime_changes(&single).len());
            assert!(report.up_pct >= 0.0 && report.up_pct <= 100.0);
        }
    }

    #[test]
    fn test_invalid_combination_fails_whole_grid() {
        let bars = test_bars(20);
        let grid = ParameterGrid::new(vec![10, 0], vec![3.0]);
        let err = evaluate_grid(&bars, &grid).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_empty_grid_rejected() {
        let bars = test_bars(20);
        let grid = ParameterGrid::new(vec![], vec![3.0]);
        assert!(evaluate_grid(&bars, &grid).is_err());
    }
}
