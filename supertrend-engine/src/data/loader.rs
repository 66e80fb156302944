use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use common::{PriceBar, Result, SupertrendError};
use csv::StringRecord;
use serde::Deserialize;

/// One CSV row, matched by (lowercased) header name
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "timestamp", alias = "datetime", alias = "日期")]
    date: String,
    #[serde(alias = "开盘")]
    open: String,
    #[serde(alias = "最高")]
    high: String,
    #[serde(alias = "最低")]
    low: String,
    #[serde(alias = "收盘")]
    close: String,
}

/// Load bars from CSV file
///
/// Columns are found by header name in any order and case, so both
/// `Date,Open,High,Low,Close` and the East Money `日期,开盘,收盘,最高,最低`
/// layouts load. Extra columns such as volume are ignored.
pub fn load_csv(path: &Path) -> Result<Vec<PriceBar>> {
    let file = File::open(path).map_err(|e| SupertrendError::DataLoadError(e.to_string()))?;
    let reader = BufReader::new(file);
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: StringRecord = csv_reader
        .headers()
        .map_err(|e| SupertrendError::CsvError(e.to_string()))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_lowercase())
        .collect();

    let mut bars = Vec::new();

    for (row, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| SupertrendError::CsvError(e.to_string()))?;

        if record.len() < 5 {
            continue;
        }

        let raw: CsvRow = record
            .deserialize(Some(&headers))
            .map_err(|e| SupertrendError::CsvError(e.to_string()))?;

        let date = parse_date(&raw.date)?;
        let open = parse_price(&raw.open, "open", row)?;
        let high = parse_price(&raw.high, "high", row)?;
        let low = parse_price(&raw.low, "low", row)?;
        let close = parse_price(&raw.close, "close", row)?;

        bars.push(PriceBar {
            date,
            open,
            high,
            low,
            close,
        });
    }

    Ok(bars)
}

/// Load bars from JSON file (an array of `PriceBar` objects)
pub fn load_json(path: &Path) -> Result<Vec<PriceBar>> {
    let file = File::open(path).map_err(|e| SupertrendError::DataLoadError(e.to_string()))?;
    let reader = BufReader::new(file);
    let bars: Vec<PriceBar> = serde_json::from_reader(reader)?;
    Ok(bars)
}

fn parse_price(s: &str, field: &str, row: usize) -> Result<f64> {
    s.parse().map_err(|_| {
        SupertrendError::CsvError(format!("Invalid {} price on row {}: {}", field, row + 1, s))
    })
}

/// Parse a session date from various formats; any time part is dropped
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    // Try ISO 8601 format first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];
    for fmt in &date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];
    for fmt in &datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    // Try Unix timestamp (seconds)
    if let Ok(ts) = s.parse::<i64>() {
        if let Some(dt) = DateTime::from_timestamp(ts, 0) {
            return Ok(dt.date_naive());
        }
    }

    Err(SupertrendError::CsvError(format!(
        "Unable to parse date: {}",
        s
    )))
}
