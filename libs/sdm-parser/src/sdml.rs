//! SDML schema parser
//!
//! Turns a JSON schema document into model definitions. Relationships are
//! inferred from shape: a nested object is a OneToOne reference from the
//! parent, and a single-element list is a OneToMany whose child gets a
//! foreign key named after the lowercased parent.

use crate::MODEL_NAME_KEY;
use indivo_models::{ModelDefinition, ModelRegistry, Relation, SchemaError, SdmType};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Foreign key a child definition must add, pointing at its parent.
struct PendingForeignKey {
    target: String,
    related_name: String,
}

/// Parse an SDML document (one definition or a list of them) into model
/// definitions, sub-definitions included. Nothing is registered.
pub fn parse_schema(input: &str) -> Result<Vec<ModelDefinition>, SchemaError> {
    let parsed: Value = serde_json::from_str(input)?;
    let toplevel = match parsed {
        Value::Array(defs) => defs,
        other => vec![other],
    };

    let mut stack: Vec<(Value, Option<PendingForeignKey>)> =
        toplevel.into_iter().map(|def| (def, None)).collect();
    let mut definitions = Vec::new();

    while let Some((def, foreign_key)) = stack.pop() {
        let def = match def {
            Value::Object(def) => def,
            other => return Err(SchemaError::NotAnObject(kind_of(&other).to_string())),
        };
        let (definition, subdefs) = parse_one(def, foreign_key)?;
        debug!(model = definition.name(), "parsed SDML definition");
        definitions.push(definition);
        stack.extend(subdefs);
    }

    Ok(definitions)
}

/// Parse an SDML document and register every definition it yields as one
/// atomic batch. Returns the registered model names.
pub fn load_schema(registry: &ModelRegistry, input: &str) -> Result<Vec<String>, SchemaError> {
    let definitions = parse_schema(input)?;
    let names: Vec<String> = definitions.iter().map(|d| d.name().to_string()).collect();
    registry.register_batch(definitions)?;
    info!(models = ?names, "loaded SDML schema");
    Ok(names)
}

fn model_name(def: &Map<String, Value>) -> Result<String, SchemaError> {
    def.get(MODEL_NAME_KEY)
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or(SchemaError::MissingName {
            key: MODEL_NAME_KEY,
        })
}

fn parse_one(
    def: Map<String, Value>,
    foreign_key: Option<PendingForeignKey>,
) -> Result<(ModelDefinition, Vec<(Value, Option<PendingForeignKey>)>), SchemaError> {
    let name = model_name(&def)?;
    let mut builder = ModelDefinition::builder(name.as_str());
    let mut subdefs = Vec::new();

    for (attr, value) in def {
        if attr == MODEL_NAME_KEY {
            continue;
        }
        match value {
            Value::Array(mut items) => {
                if items.len() != 1 {
                    return Err(SchemaError::OneToManyCardinality {
                        field: attr,
                        found: items.len(),
                    });
                }
                let child = items.remove(0);
                subdefs.push((
                    child,
                    Some(PendingForeignKey {
                        target: name.clone(),
                        related_name: attr,
                    }),
                ));
            }
            Value::Object(child) => {
                let target = model_name(&child)?;
                builder.add_relation(&attr, Relation::OneToOne { target });
                subdefs.push((Value::Object(child), None));
            }
            Value::String(type_name) => {
                let ty: SdmType = type_name.parse()?;
                builder.add_field(&attr, ty);
            }
            other => return Err(SchemaError::InvalidFieldType(other.to_string())),
        }
    }

    if let Some(fk) = foreign_key {
        builder.add_relation(
            &fk.target.to_lowercase(),
            Relation::ForeignKey {
                target: fk.target,
                related_name: fk.related_name,
            },
        );
    }

    Ok((builder.build(), subdefs))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_object_is_one_to_one_from_parent() {
        let defs = parse_schema(
            r#"{
                "__modelname__": "Medication",
                "name": "String",
                "prescription": {"__modelname__": "Prescription", "prescribed_on": "Date"}
            }"#,
        )
        .unwrap();

        let names: Vec<_> = defs.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["Medication", "Prescription"]);
        assert_eq!(
            defs[0].relation("prescription"),
            Some(&Relation::OneToOne {
                target: "Prescription".into()
            })
        );
        assert!(defs[1].relations().next().is_none());
    }

    #[test]
    fn empty_or_wide_lists_are_rejected() {
        let err = parse_schema(r#"{"__modelname__": "Med", "fills": []}"#).unwrap_err();
        assert!(matches!(err, SchemaError::OneToManyCardinality { found: 0, .. }));

        let err = parse_schema(
            r#"{"__modelname__": "Med", "fills": [{"__modelname__": "A"}, {"__modelname__": "B"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::OneToManyCardinality { found: 2, .. }));
        assert!(err
            .to_string()
            .contains("OneToMany Relationships may only define one target relation model"));
    }

    #[test]
    fn missing_name_is_reported_for_nested_definitions() {
        let err = parse_schema(r#"{"__modelname__": "Med", "rx": {"date": "Date"}}"#).unwrap_err();
        assert!(matches!(err, SchemaError::MissingName { key: "__modelname__" }));

        let err = parse_schema(r#"[{"date": "Date"}]"#).unwrap_err();
        assert!(matches!(err, SchemaError::MissingName { .. }));
    }

    #[test]
    fn unknown_and_non_string_types_are_invalid() {
        let err = parse_schema(r#"{"__modelname__": "Med", "dose": "Integer"}"#).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidFieldType(ref t) if t == "Integer"));

        let err = parse_schema(r#"{"__modelname__": "Med", "dose": 5}"#).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidFieldType(_)));

        let err = parse_schema(r#"["Med"]"#).unwrap_err();
        assert!(matches!(err, SchemaError::NotAnObject(_)));
    }

    #[test]
    fn failed_load_leaves_registry_untouched() {
        let registry = ModelRegistry::new();
        let err = load_schema(
            &registry,
            r#"[{"__modelname__": "Good", "a": "String"}, {"__modelname__": "Bad", "b": "Nope"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidFieldType(_)));
        assert!(registry.is_empty());
    }
}
