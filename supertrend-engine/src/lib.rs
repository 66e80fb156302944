pub mod batch;
pub mod chart;
pub mod data;
pub mod engine;
pub mod indicators;

pub use batch::{evaluate_grid, ParameterGrid};
pub use chart::{render_html, write_html, TrendZones};
pub use data::{
    build_source, generate_synthetic_bars, load_file, prepare_series, BarSource, FallbackSource,
    FileSource, SyntheticSource,
};
pub use engine::SupertrendEngine;
pub use indicators::{calculate_supertrend, regime_changes};

// Re-export common types
pub use common::{
    AtrSeeding, ChartConfig, IndicatorBar, PriceBar, Regime, RegimeChange, Result, RunConfig,
    SupertrendError, SupertrendParameters, SupertrendResult, SweepReport,
};
