use std::time::Instant;

use common::{PriceBar, Regime, Result, SupertrendParameters, SupertrendResult};
use tracing::debug;

use crate::indicators::{calculate_supertrend, regime_changes};

/// Supertrend engine: a pure function of the input series and its parameters
pub struct SupertrendEngine {
    params: SupertrendParameters,
}

impl SupertrendEngine {
    pub fn new(params: SupertrendParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SupertrendParameters {
        &self.params
    }

    /// Run the indicator over provided bar data
    pub fn run(&self, bars: &[PriceBar]) -> Result<SupertrendResult> {
        let start_time = Instant::now();

        let enriched = calculate_supertrend(bars, &self.params)?;
        let changes = regime_changes(&enriched);

        // Validation guarantees at least one bar
        let start_date = bars[0].date;
        let end_date = bars[bars.len() - 1].date;

        debug!(
            bars = enriched.len(),
            period = self.params.period,
            multiplier = self.params.multiplier,
            flips = changes.len(),
            "supertrend computed"
        );

        Ok(SupertrendResult {
            parameters: self.params.clone(),
            bars: enriched,
            regime_changes: changes,
            start_date,
            end_date,
            execution_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    /// Share of bars in the UP regime, in percent
    pub fn up_percentage(result: &SupertrendResult) -> f64 {
        if result.bars.is_empty() {
            return 0.0;
        }
        let up = result.bars.iter().filter(|b| b.regime == Regime::Up).count();
        up as f64 / result.bars.len() as f64 * 100.0
    }
}
