//! SDMJ: JSON instance documents

use crate::instance::{InstanceParser, RawEntry, RawModel, RawScalar};
use crate::MODEL_NAME_KEY;
use indivo_models::{DataError, ModelRegistry};
use serde_json::Value;

pub type SdmjData<'r> = InstanceParser<'r, Value>;

impl<'r> InstanceParser<'r, Value> {
    /// Parse SDMJ text: one instance object or a list of them.
    pub fn new(registry: &'r ModelRegistry, input: &str) -> Result<Self, DataError> {
        let parsed: Value = serde_json::from_str(input)?;
        let documents = match parsed {
            Value::Array(docs) => docs,
            other => vec![other],
        };
        Ok(Self::from_documents(registry, documents))
    }
}

impl RawModel for Value {
    fn model_name(&self) -> Result<&str, DataError> {
        self.get(MODEL_NAME_KEY)
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or(DataError::MissingModelName)
    }

    fn into_entries(self) -> Result<Vec<(String, RawEntry<Self>)>, DataError> {
        let Value::Object(map) = self else {
            return Err(DataError::Malformed(
                "SDM data instances must be JSON objects".to_string(),
            ));
        };

        let mut entries = Vec::with_capacity(map.len());
        for (field, value) in map {
            if field == MODEL_NAME_KEY {
                continue;
            }
            let entry = match value {
                Value::Array(items) => {
                    if items.iter().any(|item| !item.is_object()) {
                        return Err(DataError::Malformed(format!(
                            "list field '{field}' may only contain SDM data instances"
                        )));
                    }
                    RawEntry::List(items)
                }
                Value::Object(_) => RawEntry::Nested(value),
                Value::String(text) => RawEntry::Scalar(RawScalar::Text(text)),
                Value::Number(n) => RawEntry::Scalar(RawScalar::Number(n)),
                Value::Bool(b) => RawEntry::Scalar(RawScalar::Bool(b)),
                Value::Null => RawEntry::Scalar(RawScalar::Null),
            };
            entries.push((field, entry));
        }
        Ok(entries)
    }
}
