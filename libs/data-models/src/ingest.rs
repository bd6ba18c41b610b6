//! Ingestion pipeline: parse, validate, commit
//!
//! A document is parsed completely in memory, every instance is checked
//! against its model's validators, and only then is the batch handed to the
//! fact store. Any failure leaves the store untouched.

use crate::error::IngestError;
use crate::options::OptionsRegistry;
use indivo_format::{parse_models, FieldContent, ModelElement};
use indivo_models::{DataError, Fact, FactStore, InstanceBatch, ModelRegistry};
use indivo_sdm::{format_error, InstanceParser, RawModel, SdmjData, SdmxData};
use indivo_validator::{ValidationOutcome, ValidationPlan, Validator};
use tracing::{debug, info, warn};

pub struct Ingestor<'a> {
    registry: &'a ModelRegistry,
    options: &'a OptionsRegistry,
    validator: Validator,
    validate_legacy: bool,
}

impl<'a> Ingestor<'a> {
    pub fn new(registry: &'a ModelRegistry, options: &'a OptionsRegistry) -> Self {
        Self {
            registry,
            options,
            validator: Validator::default(),
            validate_legacy: true,
        }
    }

    pub fn with_plan(mut self, plan: ValidationPlan) -> Self {
        self.validator = Validator::new(plan);
        self
    }

    /// Whether legacy-dialect documents are validated like canonical ones.
    pub fn with_legacy_validation(mut self, enabled: bool) -> Self {
        self.validate_legacy = enabled;
        self
    }

    pub fn ingest_sdmj(
        &self,
        input: &str,
        store: &mut dyn FactStore,
    ) -> Result<Vec<Fact>, IngestError> {
        let data = SdmjData::new(self.registry, input)?;
        self.finish(&data, store, true)
    }

    pub fn ingest_sdmx(
        &self,
        input: &str,
        store: &mut dyn FactStore,
    ) -> Result<Vec<Fact>, IngestError> {
        let data = SdmxData::new(self.registry, input)?;
        self.finish(&data, store, true)
    }

    /// Ingest the legacy SDMX dialect: legacy field names are mapped back to
    /// canonical ones on every model element before parsing.
    pub fn ingest_legacy_sdmx(
        &self,
        input: &str,
        store: &mut dyn FactStore,
    ) -> Result<Vec<Fact>, IngestError> {
        let mut documents = parse_models(input).map_err(format_error)?;
        self.to_canonical(&mut documents)?;
        let data = SdmxData::from_documents(self.registry, documents);
        self.finish(&data, store, self.validate_legacy)
    }

    /// Apply each model's inbound rules to every element, nested ones included.
    pub fn to_canonical(&self, documents: &mut [ModelElement]) -> Result<(), DataError> {
        let mut stack: Vec<&mut ModelElement> = documents.iter_mut().collect();
        while let Some(model) = stack.pop() {
            if let Some(options) = self.options.get(&model.name) {
                options.to_sdmx(model)?;
            }
            for field in model.fields.iter_mut() {
                match &mut field.content {
                    FieldContent::Model(nested) => stack.push(nested),
                    FieldContent::Models(list) => stack.extend(list.iter_mut()),
                    FieldContent::Text(_) => {}
                }
            }
        }
        Ok(())
    }

    /// Validate every instance that has options. Returns the failing outcomes.
    pub fn validate(&self, batch: &InstanceBatch) -> Vec<ValidationOutcome> {
        batch
            .instances()
            .iter()
            .filter_map(|instance| {
                let options = self.options.get(&instance.model)?;
                let outcome = self.validator.validate(
                    &instance.model,
                    options.field_validators(),
                    &instance.fields,
                );
                (!outcome.valid).then_some(outcome)
            })
            .collect()
    }

    fn finish<M: RawModel + Clone>(
        &self,
        data: &InstanceParser<'_, M>,
        store: &mut dyn FactStore,
        validate: bool,
    ) -> Result<Vec<Fact>, IngestError> {
        let batch = data.batch()?;
        debug!(count = batch.len(), "parsed instance document");

        if validate {
            let failures = self.validate(batch);
            if !failures.is_empty() {
                warn!(failed = failures.len(), "rejecting instance document");
                return Err(IngestError::Validation(failures));
            }
        }

        let facts = store.commit(batch)?;
        info!(count = facts.len(), "ingested instance document");
        Ok(facts)
    }
}
