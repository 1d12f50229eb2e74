use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Validation error for '{field}': {details}")]
    ValidationError { field: String, details: String },

    #[error("Invalid horizon {0}: months must be between 1 and 360")]
    InvalidHorizon(u32),

    #[error("Invalid currency code '{0}': expected three uppercase letters")]
    InvalidCurrency(String),

    #[error("Advisor response violates the schema: {0}")]
    AdvisorSchemaViolation(String),

    #[error("Malformed advisor response: {0}")]
    MalformedAdvisorResponse(String),

    #[error("Advisory provider failed: {0}")]
    ProviderFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ForecastError>;
