use std::fs;
use std::path::Path;

use common::{ChartConfig, IndicatorBar, Result};
use serde_json::{json, Value};
use tracing::info;

use super::TrendZones;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const INCREASING_COLOR: &str = "#26a69a";
const DECREASING_COLOR: &str = "#ef5350";
const BUY_ZONE_COLOR: &str = "#00c853";
const SELL_ZONE_COLOR: &str = "#ff5252";

fn traces(bars: &[IndicatorBar], zones: &TrendZones, config: &ChartConfig) -> Vec<Value> {
    let dates: Vec<String> = zones.dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect();

    let candles = json!({
        "type": "candlestick",
        "name": config.symbol,
        "x": dates,
        "open": bars.iter().map(|b| b.open).collect::<Vec<_>>(),
        "high": bars.iter().map(|b| b.high).collect::<Vec<_>>(),
        "low": bars.iter().map(|b| b.low).collect::<Vec<_>>(),
        "close": bars.iter().map(|b| b.close).collect::<Vec<_>>(),
        "increasing": { "line": { "color": INCREASING_COLOR } },
        "decreasing": { "line": { "color": DECREASING_COLOR } },
    });

    // None serializes as null, which breaks the line between regimes
    let line = |name: &str, values: &[Option<f64>], color: &str| {
        json!({
            "type": "scatter",
            "mode": "lines",
            "name": name,
            "x": dates,
            "y": values,
            "line": { "color": color, "width": 2 },
        })
    };

    vec![
        candles,
        line("Buy Zone", &zones.buy_zone, BUY_ZONE_COLOR),
        line("Sell Zone", &zones.sell_zone, SELL_ZONE_COLOR),
    ]
}

fn layout(config: &ChartConfig) -> Value {
    json!({
        "title": { "text": format!("<b>{}</b>", config.display_title()) },
        "yaxis": { "title": { "text": "Price" } },
        "xaxis": { "rangeslider": { "visible": false } },
        "template": "plotly_white",
        "height": config.height,
    })
}

/// Render a standalone HTML page with candles and the two-colour Supertrend line
pub fn render_html(bars: &[IndicatorBar], zones: &TrendZones, config: &ChartConfig) -> Result<String> {
    let data = serde_json::to_string(&traces(bars, zones, config))?;
    let layout = serde_json::to_string(&layout(config))?;
    let title = html_escape(&config.display_title());

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:{height}px;"></div>
<script>
Plotly.newPlot("chart", {data}, {layout});
</script>
</body>
</html>
"#,
        title = title,
        cdn = PLOTLY_CDN,
        height = config.height,
        data = data,
        layout = layout,
    ))
}

/// Render and write the chart to `path`
pub fn write_html(path: &Path, bars: &[IndicatorBar], config: &ChartConfig) -> Result<()> {
    let zones = TrendZones::from_bars(bars);
    let page = render_html(bars, &zones, config)?;
    fs::write(path, page)?;
    info!(path = %path.display(), bars = bars.len(), "chart written");
    Ok(())
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::{PriceBar, SupertrendParameters};

    use crate::data::generate_reversal_bars;
    use crate::indicators::calculate_supertrend;

    fn sample() -> Vec<IndicatorBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = generate_reversal_bars(15, 15, 50.0, start);
        calculate_supertrend(&bars, &SupertrendParameters::default()).unwrap()
    }

    #[test]
    fn test_traces_shape() {
        let bars = sample();
        let zones = TrendZones::from_bars(&bars);
        let traces = traces(&bars, &zones, &ChartConfig::default());

        assert_eq!(traces.len(), 3);
        assert_eq!(traces[0]["type"], "candlestick");
        assert_eq!(traces[0]["x"][0], "2024-01-01");
        assert_eq!(traces[1]["name"], "Buy Zone");
        assert_eq!(traces[1]["line"]["color"], BUY_ZONE_COLOR);
        assert_eq!(traces[2]["name"], "Sell Zone");
        // first bar is always UP, so the sell line starts with a gap
        assert!(traces[2]["y"][0].is_null());
        assert_eq!(traces[2]["y"].as_array().unwrap().len(), bars.len());
    }

    #[test]
    fn test_render_html() {
        let bars = sample();
        let zones = TrendZones::from_bars(&bars);
        let config = ChartConfig {
            title: Some("Satellite <ETF>".to_string()),
            ..Default::default()
        };

        let page = render_html(&bars, &zones, &config).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(PLOTLY_CDN));
        assert!(page.contains("<title>Satellite &lt;ETF&gt;</title>"));
        assert!(page.contains("\"Sell Zone\""));
        assert!(page.contains("\"plotly_white\""));
    }

    #[test]
    fn test_write_html() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.html");
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = calculate_supertrend(
            &[PriceBar::new(date, 1.0, 1.2, 0.9, 1.1)],
            &SupertrendParameters::default(),
        )
        .unwrap();

        write_html(&path, &bars, &ChartConfig::default()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("candlestick"));
    }
}
