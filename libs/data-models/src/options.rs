//! Data-Model Options
//!
//! Static binding from a clinical model name to its field validators and
//! serializer overrides. The table is built once and never mutated.

use crate::rename::RenameRules;
use indexmap::IndexMap;
use indivo_format::ModelElement;
use indivo_models::{DataError, FieldValue};
use indivo_validator::FieldValidators;
use once_cell::sync::Lazy;

#[derive(Debug)]
pub struct DataModelOptions {
    model_name: String,
    field_validators: FieldValidators,
    renames: RenameRules,
    rdf: bool,
}

impl DataModelOptions {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            field_validators: FieldValidators::new(),
            renames: RenameRules::default(),
            rdf: false,
        }
    }

    pub fn with_validators(mut self, validators: FieldValidators) -> Self {
        self.field_validators = validators;
        self
    }

    pub fn with_renames(mut self, renames: RenameRules) -> Self {
        self.renames = renames;
        self
    }

    /// Mark the model as having a graph serializer.
    pub fn with_rdf(mut self) -> Self {
        self.rdf = true;
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn field_validators(&self) -> &FieldValidators {
        &self.field_validators
    }

    pub fn supports_rdf(&self) -> bool {
        self.rdf
    }

    /// Canonical fields plus the legacy duplicates consumers expect.
    pub fn outbound(&self, fields: &IndexMap<String, FieldValue>) -> IndexMap<String, FieldValue> {
        self.renames.outbound(fields)
    }

    /// Turn one legacy-dialect model element back into canonical form.
    pub fn to_sdmx(&self, model: &mut ModelElement) -> Result<(), DataError> {
        self.renames.inbound(model)
    }
}

/// Read-only table of [`DataModelOptions`] keyed by model name.
#[derive(Debug, Default)]
pub struct OptionsRegistry {
    options: IndexMap<String, DataModelOptions>,
}

static BUILTIN: Lazy<OptionsRegistry> = Lazy::new(|| {
    OptionsRegistry::from_options(
        crate::core::options()
            .into_iter()
            .chain(crate::contrib::options()),
    )
});

impl OptionsRegistry {
    pub fn from_options(options: impl IntoIterator<Item = DataModelOptions>) -> Self {
        Self {
            options: options
                .into_iter()
                .map(|o| (o.model_name.clone(), o))
                .collect(),
        }
    }

    /// Options of the core and contrib clinical models.
    pub fn builtin() -> &'static OptionsRegistry {
        &BUILTIN
    }

    pub fn get(&self, model: &str) -> Option<&DataModelOptions> {
        self.options.get(model)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
