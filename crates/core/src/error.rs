#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Data point not found: {0}")]
    DataPointNotFound(String),

    #[error("Invalid data point {code}: {reason}")]
    InvalidDataPoint { code: String, reason: String },
}
