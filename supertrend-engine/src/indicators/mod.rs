pub mod atr;
pub mod supertrend;

pub use atr::{
    calculate_atr, calculate_rma, calculate_rma_windowed, calculate_true_range,
    smooth_true_range, true_range,
};
pub use supertrend::{
    calculate_supertrend, next_final_lower, next_final_upper, next_regime, regime_changes,
    validate_input,
};
