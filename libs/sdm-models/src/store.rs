//! Fact persistence
//!
//! The [`FactStore`] trait is the seam to the persistence layer. A commit is
//! all-or-nothing: the batch is checked for dangling links before any fact
//! is written.

use crate::error::StoreError;
use crate::fact::Fact;
use crate::instance::{InstanceBatch, InstanceId};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactQuery {
    pub model: Option<String>,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl FactQuery {
    pub fn model(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResults {
    pub facts: Vec<Fact>,
    /// Matching facts before offset/limit were applied.
    pub total: usize,
    /// Whether the limit cut the result short.
    pub limited: bool,
}

pub trait FactStore {
    /// Persist every instance of the batch, returning the stored facts in
    /// batch order.
    fn commit(&mut self, batch: &InstanceBatch) -> Result<Vec<Fact>, StoreError>;

    fn query(&self, query: &FactQuery) -> Result<QueryResults, StoreError>;

    fn get(&self, id: &str) -> Result<Fact, StoreError>;
}

/// In-process fact store keeping insertion order.
#[derive(Debug, Default)]
pub struct MemoryFactStore {
    facts: IndexMap<String, Fact>,
}

impl MemoryFactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

fn resolve(
    ids: &HashMap<InstanceId, String>,
    field: &str,
    target: InstanceId,
) -> Result<String, StoreError> {
    ids.get(&target)
        .cloned()
        .ok_or_else(|| StoreError::DanglingReference {
            field: field.to_string(),
            target: target.0,
        })
}

impl FactStore for MemoryFactStore {
    fn commit(&mut self, batch: &InstanceBatch) -> Result<Vec<Fact>, StoreError> {
        let ids: HashMap<InstanceId, String> = batch
            .instances()
            .iter()
            .map(|i| (i.id, Uuid::new_v4().to_string()))
            .collect();

        let mut facts = Vec::with_capacity(batch.len());
        for instance in batch.instances() {
            let mut fact = Fact::new(resolve(&ids, "id", instance.id)?, instance.model.clone());
            fact.fields = instance.fields.clone();
            for (field, target) in &instance.references {
                fact.references
                    .insert(field.clone(), resolve(&ids, field, *target)?);
            }
            for (field, targets) in &instance.collections {
                let resolved = targets
                    .iter()
                    .map(|t| resolve(&ids, field, *t))
                    .collect::<Result<Vec<_>, _>>()?;
                fact.collections.insert(field.clone(), resolved);
            }
            facts.push(fact);
        }

        for fact in &facts {
            self.facts.insert(fact.id.clone(), fact.clone());
        }
        info!(count = facts.len(), "committed facts");
        Ok(facts)
    }

    fn query(&self, query: &FactQuery) -> Result<QueryResults, StoreError> {
        let matching: Vec<&Fact> = self
            .facts
            .values()
            .filter(|f| query.model.as_deref().map_or(true, |m| f.model == m))
            .collect();
        let total = matching.len();
        let available = total.saturating_sub(query.offset);
        let take = query.limit.unwrap_or(available).min(available);

        Ok(QueryResults {
            facts: matching
                .into_iter()
                .skip(query.offset)
                .take(take)
                .cloned()
                .collect(),
            total,
            limited: take < available,
        })
    }

    fn get(&self, id: &str) -> Result<Fact, StoreError> {
        self.facts
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::ModelInstance;
    use crate::value::FieldValue;

    fn med_with_fill() -> InstanceBatch {
        let mut med = ModelInstance::new(InstanceId(0), "Med");
        let mut fill = ModelInstance::new(InstanceId(1), "Fill");
        fill.fields.insert("days".into(), FieldValue::Number(15.0));
        fill.references.insert("med".into(), InstanceId(0));
        med.collections.insert("fills".into(), vec![InstanceId(1)]);
        InstanceBatch::new(vec![med, fill])
    }

    #[test]
    fn commit_rewrites_links_to_document_ids() {
        let mut store = MemoryFactStore::new();
        let facts = store.commit(&med_with_fill()).unwrap();

        assert_eq!(facts.len(), 2);
        let (med, fill) = (&facts[0], &facts[1]);
        assert_eq!(fill.references["med"], med.id);
        assert_eq!(med.collections["fills"], vec![fill.id.clone()]);
        assert_eq!(store.get(&fill.id).unwrap().value("days"), &FieldValue::Number(15.0));
    }

    #[test]
    fn dangling_reference_commits_nothing() {
        let mut fill = ModelInstance::new(InstanceId(1), "Fill");
        fill.references.insert("med".into(), InstanceId(7));
        let mut store = MemoryFactStore::new();

        let err = store.commit(&InstanceBatch::new(vec![fill])).unwrap_err();
        assert!(matches!(err, StoreError::DanglingReference { target: 7, .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn query_reports_limit() {
        let mut store = MemoryFactStore::new();
        store.commit(&med_with_fill()).unwrap();
        store.commit(&med_with_fill()).unwrap();

        let all = store.query(&FactQuery::model("Fill")).unwrap();
        assert_eq!(all.total, 2);
        assert!(!all.limited);

        let page = store.query(&FactQuery::default().with_limit(3)).unwrap();
        assert_eq!(page.facts.len(), 3);
        assert_eq!(page.total, 4);
        assert!(page.limited);

        let tail = store
            .query(&FactQuery::default().with_offset(3).with_limit(5))
            .unwrap();
        assert_eq!(tail.facts.len(), 1);
        assert!(!tail.limited);
    }
}
