//! Indivo clinical data-models
//!
//! The core and contrib model catalogue, the Data-Model Options registry
//! binding each model to its validators and serializer overrides, the
//! serializer pipeline and the ingestion pipeline.

pub mod codes;
pub mod contrib;
pub mod core;
pub mod error;
pub mod ingest;
pub mod options;
pub mod rename;
pub mod serializers;

pub use error::{IngestError, SerializeError};
pub use ingest::Ingestor;
pub use options::{DataModelOptions, OptionsRegistry};
pub use rename::{Condition, NameMatch, RenameRule, RenameRules, UnitRule};
pub use serializers::{GraphBuilder, RecordScope, ResultOrder, Serializer, DOCUMENT_ID_KEY};

use indivo_models::{ModelDefinition, ModelRegistry, SchemaError};

/// Definitions of every core and contrib model.
pub fn catalogue() -> Vec<ModelDefinition> {
    core::definitions()
        .into_iter()
        .chain(contrib::definitions())
        .collect()
}

/// Register the whole catalogue as one batch.
pub fn register_catalogue(registry: &ModelRegistry) -> Result<(), SchemaError> {
    registry.register_batch(catalogue())
}

/// A fresh registry holding the catalogue.
pub fn catalogue_registry() -> Result<ModelRegistry, SchemaError> {
    let registry = ModelRegistry::new();
    register_catalogue(&registry)?;
    Ok(registry)
}
