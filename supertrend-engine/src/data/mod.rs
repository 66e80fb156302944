pub mod loader;
pub mod source;
pub mod synthetic;

pub use loader::{load_csv, load_json};
pub use source::{
    build_source, prepare_series, BarSource, FallbackSource, FileSource, SyntheticSource,
};
pub use synthetic::{
    generate_reversal_bars, generate_seeded_bars, generate_synthetic_bars,
    generate_synthetic_bars_from,
};

use std::path::Path;

use common::{PriceBar, Result, SupertrendError};

/// Load bars from file, detecting format from extension
pub fn load_file(path: &Path) -> Result<Vec<PriceBar>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        _ => Err(SupertrendError::DataLoadError(format!(
            "Unsupported file format: {}",
            ext
        ))),
    }
}
