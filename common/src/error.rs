use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupertrendError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Data loading error: {0}")]
    DataLoadError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    CsvError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SupertrendError {
    pub fn invalid_at(index: usize, reason: impl std::fmt::Display) -> Self {
        SupertrendError::InvalidInput(format!("bar {}: {}", index, reason))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, SupertrendError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, SupertrendError>;
