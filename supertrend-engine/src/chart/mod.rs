pub mod html;

pub use html::{render_html, write_html};

use chrono::NaiveDate;
use common::{IndicatorBar, Regime};
use serde::Serialize;

/// Supertrend level split by regime for two-colour plotting
///
/// A presentation view only; the engine never stores it.
#[derive(Debug, Clone, Serialize)]
pub struct TrendZones {
    pub dates: Vec<NaiveDate>,
    /// Level where the regime is UP
    pub buy_zone: Vec<Option<f64>>,
    /// Level where the regime is DOWN
    pub sell_zone: Vec<Option<f64>>,
}

impl TrendZones {
    pub fn from_bars(bars: &[IndicatorBar]) -> Self {
        let zone = |regime: Regime| -> Vec<Option<f64>> {
            bars.iter()
                .map(|b| (b.regime == regime).then_some(b.supertrend_level))
                .collect()
        };

        Self {
            dates: bars.iter().map(|b| b.date).collect(),
            buy_zone: zone(Regime::Up),
            sell_zone: zone(Regime::Down),
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
