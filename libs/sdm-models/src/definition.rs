//! Model definitions
//!
//! A [`ModelDefinition`] is the data-driven description of one Fact type: its
//! stored columns (composite fields already expanded) and its relation
//! descriptors. Definitions are immutable once built; reverse relations
//! (the collection side of a foreign key) are indexed by the registry.

use crate::fields::expand;
use crate::types::{SdmType, StorageType};
use indexmap::IndexMap;
use serde::Serialize;

/// A stored column of a model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub storage: StorageType,
    pub nullable: bool,
    /// Declared field this column was expanded from, with its SDM type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared: Option<(String, SdmType)>,
}

/// Forward relation descriptor declared on a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Relation {
    /// This model references exactly one `target`.
    OneToOne { target: String },
    /// This model references one `target`, which sees all referencing
    /// instances through its `related_name` collection.
    ForeignKey { target: String, related_name: String },
    /// This model holds a collection of `target` instances.
    ManyToMany { target: String },
}

impl Relation {
    pub fn target(&self) -> &str {
        match self {
            Relation::OneToOne { target }
            | Relation::ForeignKey { target, .. }
            | Relation::ManyToMany { target } => target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDefinition {
    name: String,
    fields: IndexMap<String, FieldDescriptor>,
    relations: IndexMap<String, Relation>,
}

impl ModelDefinition {
    pub fn builder(name: impl Into<String>) -> ModelDefinitionBuilder {
        ModelDefinitionBuilder {
            name: name.into(),
            fields: IndexMap::new(),
            relations: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    pub fn relations(&self) -> impl Iterator<Item = (&str, &Relation)> {
        self.relations.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names of the declared (pre-expansion) fields, in declaration order.
    pub fn declared_fields(&self) -> Vec<(&str, SdmType)> {
        let mut out: Vec<(&str, SdmType)> = Vec::new();
        for field in self.fields.values() {
            if let Some((name, ty)) = &field.declared {
                if out.last().map(|(n, _)| *n) != Some(name.as_str()) {
                    out.push((name.as_str(), *ty));
                }
            }
        }
        out
    }
}

pub struct ModelDefinitionBuilder {
    name: String,
    fields: IndexMap<String, FieldDescriptor>,
    relations: IndexMap<String, Relation>,
}

impl ModelDefinitionBuilder {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a field by SDM type, expanding composites into their columns.
    pub fn field(mut self, name: &str, ty: SdmType) -> Self {
        self.add_field(name, ty);
        self
    }

    pub fn add_field(&mut self, name: &str, ty: SdmType) {
        for column in expand(name, ty) {
            self.fields.insert(
                column.name.clone(),
                FieldDescriptor {
                    name: column.name,
                    storage: column.storage,
                    nullable: true,
                    declared: Some((name.to_string(), ty)),
                },
            );
        }
    }

    /// Declare a single column with an explicit storage type.
    pub fn column(mut self, name: &str, storage: StorageType) -> Self {
        self.fields.insert(
            name.to_string(),
            FieldDescriptor {
                name: name.to_string(),
                storage,
                nullable: true,
                declared: None,
            },
        );
        self
    }

    pub fn one_to_one(mut self, name: &str, target: &str) -> Self {
        self.add_relation(
            name,
            Relation::OneToOne {
                target: target.to_string(),
            },
        );
        self
    }

    pub fn foreign_key(mut self, name: &str, target: &str, related_name: &str) -> Self {
        self.add_relation(
            name,
            Relation::ForeignKey {
                target: target.to_string(),
                related_name: related_name.to_string(),
            },
        );
        self
    }

    pub fn many_to_many(mut self, name: &str, target: &str) -> Self {
        self.add_relation(
            name,
            Relation::ManyToMany {
                target: target.to_string(),
            },
        );
        self
    }

    pub fn add_relation(&mut self, name: &str, relation: Relation) {
        self.relations.insert(name.to_string(), relation);
    }

    pub fn build(self) -> ModelDefinition {
        ModelDefinition {
            name: self.name,
            fields: self.fields,
            relations: self.relations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_expands_composites_and_keeps_order() {
        let def = ModelDefinition::builder("Encounter")
            .field("encounter_type", SdmType::CodedValue)
            .field("start_date", SdmType::Date)
            .column("notes", StorageType::Text)
            .build();

        let names: Vec<_> = def.fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names[0], "encounter_type_title");
        assert_eq!(names[4], "start_date");
        assert_eq!(names[5], "notes");
        assert_eq!(
            def.declared_fields(),
            vec![
                ("encounter_type", SdmType::CodedValue),
                ("start_date", SdmType::Date)
            ]
        );
    }

    #[test]
    fn relations_are_not_fields() {
        let def = ModelDefinition::builder("Fill")
            .field("days", SdmType::Number)
            .foreign_key("med", "Med", "fills")
            .build();

        assert!(def.field("med").is_none());
        assert_eq!(
            def.relation("med"),
            Some(&Relation::ForeignKey {
                target: "Med".into(),
                related_name: "fills".into()
            })
        );
        assert_eq!(def.relation("med").unwrap().target(), "Med");
    }
}
