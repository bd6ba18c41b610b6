//! Simple Data Modeling parsers
//!
//! - [`sdml`] turns schema documents into model definitions and registers them.
//! - [`SdmjData`] and [`SdmxData`] turn JSON and XML instance documents into
//!   linked model instances against an already populated registry.

pub mod instance;
pub mod iso8601;
pub mod sdml;
pub mod sdmj;
pub mod sdmx;

/// Key naming the model of a JSON definition or instance.
pub const MODEL_NAME_KEY: &str = "__modelname__";

pub use instance::{coerce, parse_instances, InstanceParser, RawEntry, RawModel, RawScalar};
pub use sdml::{load_schema, parse_schema};
pub use sdmj::SdmjData;
pub use sdmx::{format_error, SdmxData};
