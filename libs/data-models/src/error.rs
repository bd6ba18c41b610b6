use indivo_format::FormatError;
use indivo_models::{DataError, SchemaError, StoreError};
use indivo_validator::ValidationOutcome;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{} instance(s) failed validation", .0.len())]
    Validation(Vec<ValidationOutcome>),
}

impl From<indivo_models::Error> for IngestError {
    fn from(err: indivo_models::Error) -> Self {
        match err {
            indivo_models::Error::Schema(e) => IngestError::Schema(e),
            indivo_models::Error::Data(e) => IngestError::Data(e),
            indivo_models::Error::Store(e) => IngestError::Store(e),
        }
    }
}

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("data-model '{model}' has no {format} serializer")]
    Unsupported { model: String, format: &'static str },

    #[error("graph builder failed: {0}")]
    Graph(String),
}
