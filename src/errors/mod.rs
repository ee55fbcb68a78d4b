/// Unified error handling module
use thiserror::Error;

/// Every way a single ingestion run can fail.
///
/// None of these are retried: an unknown code means the input format is
/// unsupported or corrupted, so the whole file is rejected and nothing is
/// committed.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Unknown imaging mode (ECC): {0}")]
    UnknownMode(String),

    #[error("Unknown code {code} in table {table}")]
    UnknownCode { table: &'static str, code: String },

    #[error("Malformed identifier {value:?}: {reason}")]
    MalformedIdentifier { value: String, reason: String },

    #[error("Missing required field {field} in record {record}")]
    MissingRequiredField { record: String, field: String },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid number {value:?} for field {field}")]
    InvalidNumber { field: String, value: String },

    #[error("Malformed product name {0}")]
    MalformedProductName(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl IngestionError {
    pub fn unknown_code(table: &'static str, code: &str) -> Self {
        IngestionError::UnknownCode {
            table,
            code: code.to_string(),
        }
    }

    pub fn missing_field(record: &str, field: &str) -> Self {
        IngestionError::MissingRequiredField {
            record: record.to_string(),
            field: field.to_string(),
        }
    }

    pub fn malformed_identifier(value: &str, reason: impl Into<String>) -> Self {
        IngestionError::MalformedIdentifier {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable short code used when reporting a failed file
    pub fn code(&self) -> &'static str {
        match self {
            IngestionError::UnknownMode(_) => "UNKNOWN_MODE",
            IngestionError::UnknownCode { .. } => "UNKNOWN_CODE",
            IngestionError::MalformedIdentifier { .. } => "MALFORMED_IDENTIFIER",
            IngestionError::MissingRequiredField { .. } => "MISSING_REQUIRED_FIELD",
            IngestionError::InvalidTimestamp(_) => "INVALID_TIMESTAMP",
            IngestionError::InvalidNumber { .. } => "INVALID_NUMBER",
            IngestionError::MalformedProductName(_) => "MALFORMED_PRODUCT_NAME",
            IngestionError::Store(_) => "STORE_ERROR",
        }
    }
}

/// Type alias for ingestion results
pub type IngestionResult<T> = Result<T, IngestionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = IngestionError::missing_field("MPSARDT2", "DT_ID");
        assert_eq!(
            err.to_string(),
            "Missing required field DT_ID in record MPSARDT2"
        );
        assert_eq!(err.code(), "MISSING_REQUIRED_FIELD");
    }

    #[test]
    fn test_unknown_code_message() {
        let err = IngestionError::unknown_code("polarisation", "9");
        assert_eq!(err.to_string(), "Unknown code 9 in table polarisation");
    }
}
