//! Serializer pipeline
//!
//! Generic serialization emits every stored column of a fact under its
//! canonical name, in definition order. The model's options then append the
//! legacy duplicates. Graph output is delegated to a [`GraphBuilder`].

use crate::error::SerializeError;
use crate::options::OptionsRegistry;
use indexmap::IndexMap;
use indivo_format::{write_models, ModelElement};
use indivo_models::{Fact, FactQuery, FieldValue, ModelRegistry, QueryResults};
use indivo_sdm::MODEL_NAME_KEY;
use serde_json::{Map, Value};
use tracing::debug;

/// Key carrying the document id of a serialized fact.
pub const DOCUMENT_ID_KEY: &str = "__documentid__";

/// Addressing context of a serialization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordScope {
    Record(String),
    /// A sharing context restricted to part of a record.
    Carenet { carenet_id: String, record_id: String },
}

impl RecordScope {
    pub fn record_id(&self) -> &str {
        match self {
            RecordScope::Record(id) | RecordScope::Carenet { record_id: id, .. } => id,
        }
    }
}

/// Document ids in the order the graph builder placed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultOrder(pub Vec<String>);

/// Graph-building collaborator used for RDF output.
pub trait GraphBuilder: Sized {
    fn for_record(record_id: &str) -> Self;

    fn add_fact_list<'a, I>(&mut self, model: &str, facts: I, limited: bool) -> ResultOrder
    where
        I: Iterator<Item = &'a Fact>;

    fn add_response_summary(&mut self, query: &FactQuery, total: usize, order: &ResultOrder);

    fn to_rdf(self) -> Result<String, SerializeError>;
}

pub struct Serializer<'a> {
    registry: &'a ModelRegistry,
    options: &'a OptionsRegistry,
}

impl<'a> Serializer<'a> {
    pub fn new(registry: &'a ModelRegistry, options: &'a OptionsRegistry) -> Self {
        Self { registry, options }
    }

    /// Stored columns of the fact under canonical names. Columns of the
    /// model definition come first (null when unset), followed by any
    /// other stored value.
    pub fn canonical_fields(&self, fact: &Fact) -> IndexMap<String, FieldValue> {
        let Some(def) = self.registry.get(&fact.model) else {
            return fact.fields.clone();
        };

        let mut fields: IndexMap<String, FieldValue> = def
            .fields()
            .map(|f| (f.name.clone(), fact.value(&f.name).clone()))
            .collect();
        for (name, value) in &fact.fields {
            if !fields.contains_key(name) {
                fields.insert(name.clone(), value.clone());
            }
        }
        fields
    }

    /// Canonical fields with the model's legacy duplicates appended.
    pub fn fields(&self, fact: &Fact) -> IndexMap<String, FieldValue> {
        let canonical = self.canonical_fields(fact);
        match self.options.get(&fact.model) {
            Some(options) => options.outbound(&canonical),
            None => canonical,
        }
    }

    pub fn to_model_element(&self, fact: &Fact) -> ModelElement {
        let mut model = ModelElement::new(fact.model.as_str()).with_document_id(fact.id.as_str());
        for (name, value) in self.fields(fact) {
            model.push_text(&name, value.to_text());
        }
        model
    }

    pub fn to_xml(&self, facts: &[Fact]) -> Result<String, SerializeError> {
        let models: Vec<ModelElement> = facts.iter().map(|f| self.to_model_element(f)).collect();
        debug!(count = models.len(), "serializing facts as XML");
        Ok(write_models(&models)?)
    }

    pub fn to_json_value(&self, facts: &[Fact]) -> Value {
        let objects = facts
            .iter()
            .map(|fact| {
                let mut object = Map::new();
                object.insert(MODEL_NAME_KEY.to_string(), Value::String(fact.model.clone()));
                object.insert(DOCUMENT_ID_KEY.to_string(), Value::String(fact.id.clone()));
                for (name, value) in self.fields(fact) {
                    object.insert(name, value.to_json());
                }
                Value::Object(object)
            })
            .collect();
        Value::Array(objects)
    }

    pub fn to_json(&self, facts: &[Fact]) -> Result<String, SerializeError> {
        debug!(count = facts.len(), "serializing facts as JSON");
        Ok(serde_json::to_string(&self.to_json_value(facts))?)
    }

    /// Drive `G` over the results of a query for one model.
    pub fn to_rdf<G: GraphBuilder>(
        &self,
        model: &str,
        query: &FactQuery,
        results: &QueryResults,
        scope: &RecordScope,
    ) -> Result<String, SerializeError> {
        if !self
            .options
            .get(model)
            .is_some_and(|options| options.supports_rdf())
        {
            return Err(SerializeError::Unsupported {
                model: model.to_string(),
                format: "RDF",
            });
        }

        let mut graph = G::for_record(scope.record_id());
        let order = graph.add_fact_list(
            model,
            results.facts.iter().filter(|f| f.model == model),
            results.limited,
        );
        graph.add_response_summary(query, results.total, &order);
        debug!(model, record = scope.record_id(), "built fact graph");
        graph.to_rdf()
    }
}
