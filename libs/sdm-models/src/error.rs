//! Error types for SDM definitions, data and storage

use thiserror::Error;

/// A schema (SDML) definition is structurally invalid.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Invalid SDML model definition: All model definitions must specify a name, using the '{key}' key")]
    MissingName { key: &'static str },

    #[error("Invalid SDML model definition: Invalid SDM type: {0}")]
    InvalidFieldType(String),

    #[error("Invalid SDML model definition: OneToMany Relationships may only define one target relation model (field '{field}' defines {found})")]
    OneToManyCardinality { field: String, found: usize },

    #[error("Invalid SDML model definition: expected a JSON object, got {0}")]
    NotAnObject(String),

    #[error("Invalid SDML model definition: data-model '{0}' is already registered")]
    DuplicateModel(String),

    #[error("Invalid SDML model definition: '{target}' already exposes a collection named '{related_name}'")]
    DuplicateRelatedName {
        target: String,
        related_name: String,
    },

    #[error("Invalid SDML model definition: field '{field}' on '{model}' points at unknown data-model '{target}'")]
    UnresolvedTarget {
        model: String,
        field: String,
        target: String,
    },

    #[error("Invalid SDML model definition: JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// An instance document (SDMJ/SDMX) cannot be turned into model instances.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Invalid SDM data: All SDM data instances must specify the model they belong to.")]
    MissingModelName,

    #[error("Invalid SDM data: All SDM data fields must specify a fieldname.")]
    MissingFieldName,

    #[error("Invalid SDM data: SDM model specified a non-existent data-model: {0}")]
    UnknownModel(String),

    #[error("Invalid SDM data: Non-existent data field: {0}")]
    UnknownField(String),

    #[error("Invalid SDM data: field '{field}' on '{model}' is not a relation")]
    NotARelation { model: String, field: String },

    #[error("Invalid SDM data: SDM data for field {field} should have been an iso8601 datetime: got {value} instead")]
    ExpectedDateTime { field: String, value: String },

    #[error("Invalid SDM data: SDM data for field {field} should have been numeric: got {value} instead")]
    ExpectedNumber { field: String, value: String },

    #[error("Invalid SDM data: SDM data for field {field} should have been boolean: got {value} instead")]
    ExpectedBoolean { field: String, value: String },

    #[error("Invalid SDM data: {0}")]
    Malformed(String),

    #[error("Invalid SDM data: JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The fact store rejected a batch or a lookup.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("dangling reference from '{field}' to instance {target}")]
    DanglingReference { field: String, target: u64 },

    #[error("fact not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, Error>;
