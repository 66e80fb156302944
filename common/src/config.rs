use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SupertrendError};

/// How the ATR recurrence is started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtrSeeding {
    /// atr[0] = tr[0], then unadjusted exponential smoothing from the first bar
    #[default]
    FirstBar,
    /// Expanding mean of TR over the first `period` bars, then Wilder's smoothing
    Window,
}

/// Supertrend parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupertrendParameters {
    /// ATR period
    pub period: usize,
    /// Band offset in ATR multiples
    pub multiplier: f64,
    pub atr_seeding: AtrSeeding,
}

impl Default for SupertrendParameters {
    fn default() -> Self {
        Self {
            period: 10,
            multiplier: 3.0,
            atr_seeding: AtrSeeding::FirstBar,
        }
    }
}

impl SupertrendParameters {
    pub fn new(period: usize, multiplier: f64) -> Self {
        Self {
            period,
            multiplier,
            ..Default::default()
        }
    }

    pub fn with_period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_atr_seeding(mut self, seeding: AtrSeeding) -> Self {
        self.atr_seeding = seeding;
        self
    }

    /// Reject non-positive period or multiplier
    pub fn validate(&self) -> Result<()> {
        if self.period == 0 {
            return Err(SupertrendError::InvalidInput(
                "ATR period must be at least 1".to_string(),
            ));
        }
        if !self.multiplier.is_finite() || self.multiplier <= 0.0 {
            return Err(SupertrendError::InvalidInput(format!(
                "multiplier must be a positive finite number, got {}",
                self.multiplier
            )));
        }
        Ok(())
    }
}

/// Chart rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub symbol: String,
    /// Overrides the generated "<symbol> Supertrend" title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub output_path: PathBuf,
    /// Plot height in pixels
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            symbol: "562590".to_string(),
            title: None,
            output_path: PathBuf::from("supertrend.html"),
            height: 700,
        }
    }
}

impl ChartConfig {
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("{} Supertrend", self.symbol))
    }
}

/// Everything one invocation needs: where data comes from, how much of it,
/// indicator parameters and chart settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub symbol: String,
    /// Keep only the most recent `limit` bars
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    pub supertrend: SupertrendParameters,
    pub chart: ChartConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            symbol: "562590".to_string(),
            limit: 700,
            data_file: None,
            supertrend: SupertrendParameters::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl RunConfig {
    /// Load from a JSON file; missing fields fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            SupertrendError::DataLoadError(format!("config {}: {}", path.display(), e))
        })?;
        let config: RunConfig = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        self.chart.symbol = symbol.clone();
        self.symbol = symbol;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = SupertrendParameters::default();
        assert_eq!(params.period, 10);
        assert_eq!(params.multiplier, 3.0);
        assert_eq!(params.atr_seeding, AtrSeeding::FirstBar);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_params() {
        assert!(SupertrendParameters::new(0, 3.0).validate().is_err());
        assert!(SupertrendParameters::new(10, 0.0).validate().is_err());
        assert!(SupertrendParameters::new(10, -1.0).validate().is_err());
        assert!(SupertrendParameters::new(10, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RunConfig =
            serde_json::from_str(r#"{"symbol": "SPY", "supertrend": {"period": 14}}"#).unwrap();
        assert_eq!(config.symbol, "SPY");
        assert_eq!(config.limit, 700);
        assert_eq!(config.supertrend.period, 14);
        assert_eq!(config.supertrend.multiplier, 3.0);
        assert_eq!(config.chart.height, 700);
    }

    #[test]
    fn test_atr_seeding_serde() {
        let params: SupertrendParameters =
            serde_json::from_str(r#"{"atr_seeding": "window"}"#).unwrap();
        assert_eq!(params.atr_seeding, AtrSeeding::Window);
    }

    #[test]
    fn test_with_symbol_updates_chart() {
        let config = RunConfig::default().with_symbol("QQQ");
        assert_eq!(config.chart.symbol, "QQQ");
        assert_eq!(config.chart.display_title(), "QQQ Supertrend");
    }
}
