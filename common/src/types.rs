use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::SupertrendParameters;

/// One daily OHLC session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
        }
    }

    /// Midpoint of the session range, (high + low) / 2
    pub fn hl2(&self) -> f64 {
        (self.high + self.low) / 2.0
    }
}

/// Trend regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Up,
    Down,
}

impl Regime {
    /// +1 for an uptrend, -1 for a downtrend
    pub fn direction(self) -> i8 {
        match self {
            Regime::Up => 1,
            Regime::Down => -1,
        }
    }

    /// Pick the band exposed as the supertrend level for this regime
    pub fn level(self, final_upper: f64, final_lower: f64) -> f64 {
        match self {
            Regime::Up => final_lower,
            Regime::Down => final_upper,
        }
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Regime::Up => "UP",
            Regime::Down => "DOWN",
        };
        f.pad(label)
    }
}

/// Price bar enriched with the Supertrend derivation
///
/// Fields are flat so the row serializes cleanly to both JSON and CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub true_range: f64,
    pub atr: f64,
    pub basic_upper_band: f64,
    pub basic_lower_band: f64,
    pub final_upper_band: f64,
    pub final_lower_band: f64,
    pub regime: Regime,
    pub supertrend_level: f64,
}

/// A bar where the regime differs from the previous bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeChange {
    pub index: usize,
    pub date: NaiveDate,
    pub from: Regime,
    pub to: Regime,
    pub level: f64,
}

/// Summary of one parameter combination in a sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub period: usize,
    pub multiplier: f64,
    pub final_regime: Regime,
    pub final_level: f64,
    pub regime_changes: usize,
    pub up_pct: f64,
}

/// Result of one engine run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupertrendResult {
    pub parameters: SupertrendParameters,
    pub bars: Vec<IndicatorBar>,
    pub regime_changes: Vec<RegimeChange>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub execution_time_ms: u64,
}

impl SupertrendResult {
    pub fn last(&self) -> Option<&IndicatorBar> {
        self.bars.last()
    }
}
