//! Error types for veil-schema

use thiserror::Error;

/// Errors that can occur while encoding or decoding records
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Schema mismatch: expected {expected} fields, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("Field '{field}' exceeds its {bits}-bit width: {value}")]
    FieldOverflow { field: String, bits: u8, value: u64 },

    #[error("Delivered field '{field}' does not fit the schema")]
    DeliveryMismatch { field: String },
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
