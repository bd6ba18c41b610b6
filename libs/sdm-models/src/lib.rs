//! Simple Data Model core types
//!
//! Field taxonomy, model definitions and their registry, parsed model
//! instances, persisted facts and the fact-store seam shared by the SDM
//! parsers, validators and serializers.

pub mod definition;
pub mod error;
pub mod fact;
pub mod fields;
pub mod instance;
pub mod registry;
pub mod store;
pub mod types;
pub mod value;

pub use definition::{FieldDescriptor, ModelDefinition, ModelDefinitionBuilder, Relation};
pub use error::{DataError, Error, Result, SchemaError, StoreError};
pub use fact::Fact;
pub use fields::{expand, sub_fields, StoredColumn, SubField};
pub use instance::{InstanceBatch, InstanceId, ModelInstance};
pub use registry::{Collection, ModelRegistry};
pub use store::{FactQuery, FactStore, MemoryFactStore, QueryResults};
pub use types::{SdmType, StorageType};
pub use value::{format_number, FieldValue};
