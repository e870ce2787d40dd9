use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Series too short for the requested history mode; the ticker is skipped.
    #[error("Insufficient history for {ticker}: {bars} bars, need {required}")]
    InsufficientHistory {
        ticker: String,
        bars: usize,
        required: usize,
    },

    #[error("Numeric fault: {0}")]
    Numeric(String),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Errors that only drop one instrument from a batch
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            AppError::InsufficientHistory { .. }
                | AppError::InvalidInput(_)
                | AppError::Parse(_)
                | AppError::Numeric(_)
                | AppError::NotFound(_)
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Io(format!("CSV error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

// Alias for convenience
pub type Error = AppError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_history_message() {
        let err = AppError::InsufficientHistory {
            ticker: "2330".to_string(),
            bars: 12,
            required: 22,
        };
        assert_eq!(err.to_string(), "Insufficient history for 2330: 12 bars, need 22");
        assert!(err.is_skippable());
    }

    #[test]
    fn test_io_is_not_skippable() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert!(!err.is_skippable());
    }
}
