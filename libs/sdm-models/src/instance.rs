//! Parsed model instances
//!
//! Instances are built in memory by the instance parsers and identified by a
//! batch-local [`InstanceId`]. Links between instances are expressed as ids
//! until the whole batch is handed to a fact store.

use crate::value::FieldValue;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Identity of an instance within one parse batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInstance {
    pub id: InstanceId,
    pub model: String,
    /// Coerced scalar columns, in document order.
    pub fields: IndexMap<String, FieldValue>,
    /// Single-valued relations (OneToOne and foreign keys).
    pub references: IndexMap<String, InstanceId>,
    /// Collection-side relations (OneToMany related names and ManyToMany).
    pub collections: IndexMap<String, Vec<InstanceId>>,
}

impl ModelInstance {
    pub fn new(id: InstanceId, model: impl Into<String>) -> Self {
        Self {
            id,
            model: model.into(),
            fields: IndexMap::new(),
            references: IndexMap::new(),
            collections: IndexMap::new(),
        }
    }

    /// Stored value of a column; absent columns read as null.
    pub fn value(&self, field: &str) -> &FieldValue {
        static NULL: FieldValue = FieldValue::Null;
        self.fields.get(field).unwrap_or(&NULL)
    }

    pub fn reference(&self, field: &str) -> Option<InstanceId> {
        self.references.get(field).copied()
    }

    pub fn collection(&self, field: &str) -> &[InstanceId] {
        self.collections
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// All instances produced by one document, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InstanceBatch {
    instances: Vec<ModelInstance>,
}

impl InstanceBatch {
    pub fn new(instances: Vec<ModelInstance>) -> Self {
        Self { instances }
    }

    pub fn instances(&self) -> &[ModelInstance] {
        &self.instances
    }

    pub fn get(&self, id: InstanceId) -> Option<&ModelInstance> {
        self.instances.iter().find(|i| i.id == id)
    }

    pub fn of_model<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a ModelInstance> {
        self.instances.iter().filter(move |i| i.model == model)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl From<Vec<ModelInstance>> for InstanceBatch {
    fn from(instances: Vec<ModelInstance>) -> Self {
        Self::new(instances)
    }
}
