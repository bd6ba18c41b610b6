//! SDMX: XML instance documents

use crate::instance::{InstanceParser, RawEntry, RawModel, RawScalar};
use indivo_format::{parse_models, FieldContent, FormatError, ModelElement, FIELD, MODEL};
use indivo_models::{DataError, ModelRegistry};

pub type SdmxData<'r> = InstanceParser<'r, ModelElement>;

impl<'r> InstanceParser<'r, ModelElement> {
    /// Parse SDMX text with a `<Models>` (or single `<Model>`) root.
    pub fn new(registry: &'r ModelRegistry, input: &str) -> Result<Self, DataError> {
        let documents = parse_models(input).map_err(format_error)?;
        Ok(Self::from_documents(registry, documents))
    }
}

/// Map codec failures onto the data error taxonomy.
pub fn format_error(err: FormatError) -> DataError {
    match err {
        FormatError::MissingName { element } if element == MODEL => DataError::MissingModelName,
        FormatError::MissingName { element } if element == FIELD => DataError::MissingFieldName,
        other => DataError::Malformed(other.to_string()),
    }
}

impl RawModel for ModelElement {
    fn model_name(&self) -> Result<&str, DataError> {
        if self.name.is_empty() {
            return Err(DataError::MissingModelName);
        }
        Ok(&self.name)
    }

    fn into_entries(self) -> Result<Vec<(String, RawEntry<Self>)>, DataError> {
        self.fields
            .into_iter()
            .map(|field| {
                if field.name.is_empty() {
                    return Err(DataError::MissingFieldName);
                }
                let entry = match field.content {
                    FieldContent::Models(models) => RawEntry::List(models),
                    FieldContent::Model(model) => RawEntry::Nested(model),
                    FieldContent::Text(Some(text)) => RawEntry::Scalar(RawScalar::Text(text)),
                    FieldContent::Text(None) => RawEntry::Scalar(RawScalar::Null),
                };
                Ok((field.name, entry))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdml::load_schema;
    use indivo_models::FieldValue;

    #[test]
    fn missing_names_map_to_data_errors() {
        let registry = ModelRegistry::new();
        let err = SdmxData::new(&registry, "<Models><Model><Field name=\"a\"/></Model></Models>")
            .err()
            .unwrap();
        assert!(matches!(err, DataError::MissingModelName));

        let err = SdmxData::new(&registry, "<Models><Model name=\"A\"><Field/></Model></Models>")
            .err()
            .unwrap();
        assert!(matches!(err, DataError::MissingFieldName));
    }

    #[test]
    fn empty_field_is_null_and_booleans_coerce() {
        let registry = ModelRegistry::new();
        load_schema(
            &registry,
            r#"{"__modelname__": "Pharmacy", "phone": "Telephone", "name": "String"}"#,
        )
        .unwrap();

        let data = SdmxData::new(
            &registry,
            r#"<Models><Model name="Pharmacy">
                 <Field name="name"/>
                 <Field name="phone_preferred_p">True</Field>
               </Model></Models>"#,
        )
        .unwrap();
        let out = data.output().unwrap();
        assert_eq!(out[0].value("name"), &FieldValue::Null);
        assert_eq!(out[0].value("phone_preferred_p"), &FieldValue::Boolean(true));
    }
}
