//! Model definition registry
//!
//! An explicitly constructed context object mapping model names to their
//! definitions. Schema batches are registered atomically under a single
//! write lock; readers never observe a partially registered batch.

use crate::definition::{ModelDefinition, Relation};
use crate::error::SchemaError;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Collection-side view of a relation, as seen from the model holding the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection {
    /// Children of `child_model` point back through their `foreign_key` relation.
    OneToMany {
        child_model: String,
        foreign_key: String,
    },
    /// The holder keeps a collection of `target` instances.
    ManyToMany { target: String },
}

#[derive(Debug, Default)]
struct RegistryState {
    models: IndexMap<String, Arc<ModelDefinition>>,
    // (target model, related name) -> (child model, foreign key field)
    reverse: HashMap<(String, String), (String, String)>,
}

#[derive(Debug, Default)]
pub struct ModelRegistry {
    state: RwLock<RegistryState>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, definition: ModelDefinition) -> Result<(), SchemaError> {
        self.register_batch(vec![definition])
    }

    /// Register a batch of definitions, all or nothing.
    ///
    /// Fails if a name is already registered (or repeated within the batch),
    /// if a relation targets a model that is neither registered nor part
    /// of the batch, or if a foreign key reuses a collection name its target
    /// already exposes.
    pub fn register_batch(&self, batch: Vec<ModelDefinition>) -> Result<(), SchemaError> {
        let mut state = self.write();

        let mut names: Vec<&str> = Vec::with_capacity(batch.len());
        let mut related: Vec<(&str, &str)> = Vec::new();
        for def in &batch {
            if state.models.contains_key(def.name()) || names.contains(&def.name()) {
                return Err(SchemaError::DuplicateModel(def.name().to_string()));
            }
            names.push(def.name());
        }

        for def in &batch {
            for (field, relation) in def.relations() {
                let target = relation.target();
                if !state.models.contains_key(target) && !names.contains(&target) {
                    return Err(SchemaError::UnresolvedTarget {
                        model: def.name().to_string(),
                        field: field.to_string(),
                        target: target.to_string(),
                    });
                }
                if let Relation::ForeignKey {
                    target,
                    related_name,
                } = relation
                {
                    let key = (target.clone(), related_name.clone());
                    if state.reverse.contains_key(&key)
                        || related.contains(&(target.as_str(), related_name.as_str()))
                    {
                        return Err(SchemaError::DuplicateRelatedName {
                            target: key.0,
                            related_name: key.1,
                        });
                    }
                    related.push((target.as_str(), related_name.as_str()));
                }
            }
        }

        let count = batch.len();
        for def in batch {
            for (field, relation) in def.relations() {
                if let Relation::ForeignKey {
                    target,
                    related_name,
                } = relation
                {
                    state.reverse.insert(
                        (target.clone(), related_name.clone()),
                        (def.name().to_string(), field.to_string()),
                    );
                }
            }
            debug!(model = def.name(), "registered data-model");
            state.models.insert(def.name().to_string(), Arc::new(def));
        }
        info!(count, total = state.models.len(), "registered data-model batch");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<ModelDefinition>> {
        self.read().models.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().models.contains_key(name)
    }

    /// Registered model names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.read().models.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().models.is_empty()
    }

    /// Classify a list-valued field on `model` by the relation already
    /// declared for it: a ManyToMany relation on the model itself, or the
    /// related name of a foreign key declared on some child model.
    pub fn collection(&self, model: &str, field: &str) -> Option<Collection> {
        let state = self.read();
        if let Some(Relation::ManyToMany { target }) = state
            .models
            .get(model)
            .and_then(|def| def.relation(field))
        {
            return Some(Collection::ManyToMany {
                target: target.clone(),
            });
        }
        state
            .reverse
            .get(&(model.to_string(), field.to_string()))
            .map(|(child_model, foreign_key)| Collection::OneToMany {
                child_model: child_model.clone(),
                foreign_key: foreign_key.clone(),
            })
    }

    /// Collection names that other models expose on `model` via foreign keys.
    pub fn related_names(&self, model: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .read()
            .reverse
            .keys()
            .filter(|(target, _)| target == model)
            .map(|(_, related)| related.clone())
            .collect();
        names.sort();
        names
    }
}
