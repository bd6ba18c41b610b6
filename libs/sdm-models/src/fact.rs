//! Persisted facts

use crate::value::FieldValue;
use indexmap::IndexMap;
use serde::Serialize;

/// A persisted clinical record. References point at other facts by document id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fact {
    pub id: String,
    pub model: String,
    pub fields: IndexMap<String, FieldValue>,
    pub references: IndexMap<String, String>,
    pub collections: IndexMap<String, Vec<String>>,
}

impl Fact {
    pub fn new(id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            fields: IndexMap::new(),
            references: IndexMap::new(),
            collections: IndexMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn value(&self, field: &str) -> &FieldValue {
        static NULL: FieldValue = FieldValue::Null;
        self.fields.get(field).unwrap_or(&NULL)
    }
}
