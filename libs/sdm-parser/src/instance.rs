//! Instance parsing engine shared by SDMJ and SDMX
//!
//! Documents are walked with an explicit LIFO stack. Every node is built
//! into a [`ModelInstance`] and linked to its parent in memory; nothing is
//! persisted until the whole document has parsed, at which point the batch
//! can be committed to a [`FactStore`].

use crate::iso8601;
use indivo_models::{
    Collection, DataError, Error, Fact, FactStore, FieldValue, InstanceBatch, InstanceId,
    ModelInstance, ModelRegistry, Relation, StorageType,
};
use once_cell::unsync::OnceCell;
use tracing::{debug, info};

/// A scalar leaf as it appears in a document.
#[derive(Debug, Clone, PartialEq)]
pub enum RawScalar {
    Null,
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl RawScalar {
    fn describe(&self) -> String {
        match self {
            RawScalar::Null => "null".to_string(),
            RawScalar::Text(t) => t.clone(),
            RawScalar::Number(n) => n.to_string(),
            RawScalar::Bool(b) => b.to_string(),
        }
    }
}

pub enum RawEntry<M> {
    List(Vec<M>),
    Nested(M),
    Scalar(RawScalar),
}

/// One model node of an instance document.
pub trait RawModel: Sized {
    fn model_name(&self) -> Result<&str, DataError>;

    /// Attributes of the node in document order, the model name excluded.
    fn into_entries(self) -> Result<Vec<(String, RawEntry<Self>)>, DataError>;
}

#[derive(Debug, Clone)]
enum LinkKind {
    /// Parent references the child through `field`.
    OneToOne { field: String },
    /// Child references the parent through `foreign_key`; the parent lists
    /// the child under `collection`.
    OneToMany {
        foreign_key: String,
        collection: String,
    },
    /// Parent lists the child under `collection`.
    ManyToMany { collection: String },
}

#[derive(Debug, Clone)]
struct Link {
    parent: InstanceId,
    expected_model: String,
    kind: LinkKind,
}

struct Pending<M> {
    raw: M,
    link: Option<Link>,
}

/// Parse documents into linked instances, returned in creation order.
pub fn parse_instances<M: RawModel>(
    registry: &ModelRegistry,
    documents: Vec<M>,
) -> Result<Vec<ModelInstance>, DataError> {
    let mut stack: Vec<Pending<M>> = documents
        .into_iter()
        .map(|raw| Pending { raw, link: None })
        .collect();
    let mut instances: Vec<ModelInstance> = Vec::new();

    while let Some(Pending { raw, link }) = stack.pop() {
        let id = InstanceId(instances.len() as u64);
        let (mut instance, children) = build_one(registry, raw, id, link.as_ref())?;

        if let Some(link) = link {
            let parent = instances
                .get_mut(link.parent.0 as usize)
                .ok_or_else(|| DataError::Malformed(format!("dangling parent {}", link.parent)))?;
            match link.kind {
                LinkKind::OneToOne { field } => {
                    parent.references.insert(field, id);
                }
                LinkKind::OneToMany {
                    foreign_key,
                    collection,
                } => {
                    instance.references.insert(foreign_key, parent.id);
                    parent.collections.entry(collection).or_default().push(id);
                }
                LinkKind::ManyToMany { collection } => {
                    parent.collections.entry(collection).or_default().push(id);
                }
            }
        }

        debug!(model = %instance.model, id = id.0, "parsed SDM instance");
        instances.push(instance);
        stack.extend(children);
    }

    Ok(instances)
}

fn build_one<M: RawModel>(
    registry: &ModelRegistry,
    raw: M,
    id: InstanceId,
    link: Option<&Link>,
) -> Result<(ModelInstance, Vec<Pending<M>>), DataError> {
    let name = raw.model_name()?.to_string();
    let def = registry
        .get(&name)
        .ok_or_else(|| DataError::UnknownModel(name.clone()))?;
    if let Some(link) = link {
        if link.expected_model != name {
            return Err(DataError::Malformed(format!(
                "expected a {} instance, got {}",
                link.expected_model, name
            )));
        }
    }

    let mut instance = ModelInstance::new(id, name.as_str());
    let mut children = Vec::new();

    for (field, entry) in raw.into_entries()? {
        match entry {
            RawEntry::List(items) => {
                let (expected_model, kind) = match registry.collection(&name, &field) {
                    Some(Collection::OneToMany {
                        child_model,
                        foreign_key,
                    }) => (
                        child_model,
                        LinkKind::OneToMany {
                            foreign_key,
                            collection: field.clone(),
                        },
                    ),
                    Some(Collection::ManyToMany { target }) => (
                        target,
                        LinkKind::ManyToMany {
                            collection: field.clone(),
                        },
                    ),
                    None if def.field(&field).is_some() || def.relation(&field).is_some() => {
                        return Err(DataError::NotARelation {
                            model: name,
                            field,
                        })
                    }
                    None => return Err(DataError::UnknownField(field)),
                };
                for item in items {
                    children.push(Pending {
                        raw: item,
                        link: Some(Link {
                            parent: id,
                            expected_model: expected_model.clone(),
                            kind: kind.clone(),
                        }),
                    });
                }
            }
            RawEntry::Nested(item) => {
                let target = match def.relation(&field) {
                    Some(Relation::OneToOne { target })
                    | Some(Relation::ForeignKey { target, .. }) => target.clone(),
                    Some(Relation::ManyToMany { .. }) => {
                        return Err(DataError::Malformed(format!(
                            "field '{field}' on '{name}' expects a list"
                        )))
                    }
                    None => return Err(DataError::UnknownField(field)),
                };
                children.push(Pending {
                    raw: item,
                    link: Some(Link {
                        parent: id,
                        expected_model: target,
                        kind: LinkKind::OneToOne { field },
                    }),
                });
            }
            RawEntry::Scalar(scalar) => {
                let storage = def
                    .field(&field)
                    .map(|f| f.storage)
                    .ok_or_else(|| DataError::UnknownField(field.clone()))?;
                let value = coerce(&field, storage, scalar)?;
                instance.fields.insert(field, value);
            }
        }
    }

    Ok((instance, children))
}

/// Coerce a raw scalar by the column's storage type. Null and empty text
/// become an explicit null.
pub fn coerce(field: &str, storage: StorageType, raw: RawScalar) -> Result<FieldValue, DataError> {
    let raw = match raw {
        RawScalar::Null => return Ok(FieldValue::Null),
        RawScalar::Text(t) if t.is_empty() => return Ok(FieldValue::Null),
        other => other,
    };

    match storage {
        StorageType::DateTime => match &raw {
            RawScalar::Text(t) => iso8601::parse_datetime(t).map(FieldValue::DateTime),
            _ => None,
        }
        .ok_or_else(|| DataError::ExpectedDateTime {
            field: field.to_string(),
            value: raw.describe(),
        }),
        StorageType::Date => match &raw {
            RawScalar::Text(t) => iso8601::parse_date(t).map(FieldValue::Date),
            _ => None,
        }
        .ok_or_else(|| DataError::ExpectedDateTime {
            field: field.to_string(),
            value: raw.describe(),
        }),
        StorageType::Number => match &raw {
            RawScalar::Text(t) => t.trim().parse::<f64>().ok(),
            RawScalar::Number(n) => n.as_f64(),
            _ => None,
        }
        .filter(|n| n.is_finite())
        .map(FieldValue::Number)
        .ok_or_else(|| DataError::ExpectedNumber {
            field: field.to_string(),
            value: raw.describe(),
        }),
        StorageType::Boolean => match &raw {
            RawScalar::Text(t) if t.eq_ignore_ascii_case("true") => Some(true),
            RawScalar::Text(t) if t.eq_ignore_ascii_case("false") => Some(false),
            RawScalar::Bool(b) => Some(*b),
            _ => None,
        }
        .map(FieldValue::Boolean)
        .ok_or_else(|| DataError::ExpectedBoolean {
            field: field.to_string(),
            value: raw.describe(),
        }),
        StorageType::String { .. } | StorageType::Text => Ok(FieldValue::String(raw.describe())),
    }
}

/// Parsed instance document with a lazily built, cached batch.
///
/// The first call to [`InstanceParser::output`] walks the documents; later
/// calls return the same instances without parsing again. Likewise only the
/// first successful [`InstanceParser::commit`] reaches the store.
pub struct InstanceParser<'r, M> {
    registry: &'r ModelRegistry,
    documents: Vec<M>,
    output: OnceCell<InstanceBatch>,
    committed: OnceCell<Vec<Fact>>,
}

impl<'r, M: RawModel + Clone> InstanceParser<'r, M> {
    pub fn from_documents(registry: &'r ModelRegistry, documents: Vec<M>) -> Self {
        Self {
            registry,
            documents,
            output: OnceCell::new(),
            committed: OnceCell::new(),
        }
    }

    pub fn batch(&self) -> Result<&InstanceBatch, DataError> {
        self.output.get_or_try_init(|| {
            parse_instances(self.registry, self.documents.clone()).map(InstanceBatch::new)
        })
    }

    pub fn output(&self) -> Result<&[ModelInstance], DataError> {
        self.batch().map(InstanceBatch::instances)
    }

    /// Persist the parsed batch once. Parse failures reach the store as
    /// nothing; later calls return the facts of the first commit.
    pub fn commit(&self, store: &mut dyn FactStore) -> Result<Vec<Fact>, Error> {
        let facts = self.committed.get_or_try_init(|| {
            let batch = self.batch()?;
            let facts = store.commit(batch)?;
            info!(count = facts.len(), "committed SDM instances");
            Ok::<_, Error>(facts)
        })?;
        Ok(facts.clone())
    }
}
