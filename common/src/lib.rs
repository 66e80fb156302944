pub mod config;
pub mod error;
pub mod types;

pub use config::{AtrSeeding, ChartConfig, RunConfig, SupertrendParameters};
pub use error::{Result, SupertrendError};
pub use types::*;
