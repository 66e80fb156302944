use std::path::PathBuf;

use chrono::{Duration, NaiveDate, Utc};
use common::{PriceBar, Result, SupertrendError};
use tracing::{info, warn};

use super::load_file;
use super::synthetic::{generate_seeded_bars, generate_synthetic_bars_from};

/// Supplier of a daily OHLC series for a symbol
pub trait BarSource {
    fn name(&self) -> String;

    fn fetch(&self, symbol: &str) -> Result<Vec<PriceBar>>;
}

/// Reads bars from a CSV or JSON file
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BarSource for FileSource {
    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn fetch(&self, _symbol: &str) -> Result<Vec<PriceBar>> {
        let bars = load_file(&self.path)?;
        if bars.is_empty() {
            return Err(SupertrendError::DataLoadError(format!(
                "{} contains no bars",
                self.path.display()
            )));
        }
        Ok(bars)
    }
}

/// Random-walk bars, reproducible when seeded
pub struct SyntheticSource {
    pub days: usize,
    pub initial_price: f64,
    pub seed: Option<u64>,
    /// Date of the first generated bar
    pub start_date: NaiveDate,
}

impl SyntheticSource {
    /// Bars starting at `start_date`
    pub fn new(days: usize, initial_price: f64, start_date: NaiveDate) -> Self {
        Self {
            days,
            initial_price,
            seed: None,
            start_date,
        }
    }

    /// Bars covering the `days` leading up to today
    pub fn ending_today(days: usize, initial_price: f64) -> Self {
        let start_date = Utc::now().date_naive() - Duration::days(days as i64);
        Self::new(days, initial_price, start_date)
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

impl BarSource for SyntheticSource {
    fn name(&self) -> String {
        "synthetic".to_string()
    }

    fn fetch(&self, _symbol: &str) -> Result<Vec<PriceBar>> {
        if self.days == 0 {
            return Err(SupertrendError::DataLoadError(
                "synthetic source asked for zero days".to_string(),
            ));
        }
        let bars = match self.seed {
            Some(seed) => generate_seeded_bars(self.days, self.initial_price, self.start_date, seed),
            None => generate_synthetic_bars_from(self.days, self.initial_price, self.start_date),
        };
        Ok(bars)
    }
}

/// Tries each source in order and returns the first success
pub struct FallbackSource {
    sources: Vec<Box<dyn BarSource>>,
}

impl FallbackSource {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl BarSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for FallbackSource {
    fn default() -> Self {
        Self::new()
    }
}

impl BarSource for FallbackSource {
    fn name(&self) -> String {
        let names: Vec<String> = self.sources.iter().map(|s| s.name()).collect();
        format!("fallback[{}]", names.join(", "))
    }

    fn fetch(&self, symbol: &str) -> Result<Vec<PriceBar>> {
        let mut failures = Vec::new();

        for source in &self.sources {
            match source.fetch(symbol) {
                Ok(bars) => {
                    info!(source = %source.name(), symbol = %symbol, bars = bars.len(), "loaded bars");
                    return Ok(bars);
                }
                Err(e) => {
                    warn!(source = %source.name(), symbol = %symbol, error = %e, "source failed, trying next");
                    failures.push(format!("{}: {}", source.name(), e));
                }
            }
        }

        if failures.is_empty() {
            return Err(SupertrendError::DataLoadError(
                "no data sources configured".to_string(),
            ));
        }
        Err(SupertrendError::DataLoadError(format!(
            "all sources failed for {}: {}",
            symbol,
            failures.join("; ")
        )))
    }
}

/// Assemble the sources for one run
///
/// A named data file is the only source unless `synthetic_fallback` is set;
/// synthetic bars are used on their own when no file is named.
pub fn build_source(
    data_file: Option<PathBuf>,
    synthetic: SyntheticSource,
    synthetic_fallback: bool,
) -> FallbackSource {
    match data_file {
        Some(path) => {
            let source = FallbackSource::new().with_source(FileSource::new(path));
            if synthetic_fallback {
                source.with_source(synthetic)
            } else {
                source
            }
        }
        None => FallbackSource::new().with_source(synthetic),
    }
}

/// Sort ascending by date and keep the most recent `limit` bars
///
/// Duplicate dates are left in place for the engine to reject.
pub fn prepare_series(mut bars: Vec<PriceBar>, limit: usize) -> Vec<PriceBar> {
    bars.sort_by_key(|b| b.date);
    if limit > 0 && bars.len() > limit {
        let excess = bars.len() - limit;
        bars.drain(..excess);
    }
    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl BarSource for Failing {
        fn name(&self) -> String {
            "failing".to_string()
        }

        fn fetch(&self, _symbol: &str) -> Result<Vec<PriceBar>> {
            Err(SupertrendError::DataLoadError("offline".to_string()))
        }
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
    }

    fn bar(day: u32, close: f64) -> PriceBar {
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        PriceBar::new(date, close, close, close, close)
    }

    #[test]
    fn test_fallback_uses_next_source() {
        let synthetic = SyntheticSource::new(30, 1.0, start()).with_seed(Some(1));
        let source = FallbackSource::new().with_source(Failing).with_source(synthetic);

        let bars = source.fetch("562590").unwrap();
        assert_eq!(bars.len(), 30);
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn test_fallback_reports_all_failures() {
        let source = FallbackSource::new()
            .with_source(Failing)
            .with_source(FileSource::new("/nonexistent/bars.csv"));

        let err = source.fetch("562590").unwrap_err().to_string();
        assert!(err.contains("failing: "));
        assert!(err.contains("file:/nonexistent/bars.csv"));
    }

    #[test]
    fn test_seeded_synthetic_is_reproducible() {
        let a = SyntheticSource::new(40, 2.0, start()).with_seed(Some(9));
        let b = SyntheticSource::new(40, 2.0, start()).with_seed(Some(9));

        let first = a.fetch("X").unwrap();
        assert_eq!(first, b.fetch("X").unwrap());
        assert_eq!(first[0].date, start());
        assert_eq!(first[39].date, start() + Duration::days(39));
    }

    #[test]
    fn test_unseeded_synthetic_honours_start_date() {
        let bars = SyntheticSource::new(5, 2.0, start()).fetch("X").unwrap();
        assert_eq!(bars[0].date, start());
    }

    #[test]
    fn test_named_file_has_no_synthetic_fallback() {
        let synthetic = SyntheticSource::new(30, 1.0, start()).with_seed(Some(1));
        let source = build_source(Some(PathBuf::from("/nonexistent/bars.csv")), synthetic, false);

        assert_eq!(source.len(), 1);
        let err = source.fetch("562590").unwrap_err();
        assert!(matches!(err, SupertrendError::DataLoadError(_)));
    }

    #[test]
    fn test_synthetic_fallback_is_opt_in() {
        let synthetic = SyntheticSource::new(30, 1.0, start()).with_seed(Some(1));
        let source = build_source(Some(PathBuf::from("/nonexistent/bars.csv")), synthetic, true);

        assert_eq!(source.len(), 2);
        assert_eq!(source.fetch("562590").unwrap().len(), 30);
    }

    #[test]
    fn test_no_file_uses_synthetic() {
        let synthetic = SyntheticSource::new(10, 1.0, start()).with_seed(Some(3));
        let source = build_source(None, synthetic, false);
        assert_eq!(source.name(), "fallback[synthetic]");
        assert_eq!(source.fetch("X").unwrap().len(), 10);
    }

    #[test]
    fn test_empty_fallback() {
        assert!(FallbackSource::default().fetch("X").is_err());
    }

    #[test]
    fn test_prepare_series_sorts_and_limits() {
        let bars = vec![bar(5, 5.0), bar(1, 1.0), bar(3, 3.0), bar(2, 2.0)];
        let prepared = prepare_series(bars, 3);

        let closes: Vec<f64> = prepared.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![2.0, 3.0, 5.0]);
    }

    #[test]
    fn test_prepare_series_zero_limit_keeps_all() {
        let bars = vec![bar(2, 2.0), bar(1, 1.0)];
        assert_eq!(prepare_series(bars, 0).len(), 2);
    }
}
