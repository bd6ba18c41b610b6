//! Lab panels and the results they group

use crate::codes::{LAB_INTERPRETATION, LAB_STATUS, LOINC};
use crate::options::DataModelOptions;
use indivo_models::{ModelDefinition, SdmType, StorageType};
use indivo_validator::{ExactValueValidator, FieldValidators, NonNullValidator, ValueInSetValidator};

const VALID_STATUSES: [&str; 3] = ["correction", "preliminary", "final"];
const VALID_INTERPRETATIONS: [&str; 3] = ["normal", "critical", "abnormal"];

pub fn definitions() -> Vec<ModelDefinition> {
    vec![
        ModelDefinition::builder("LabPanel").build(),
        ModelDefinition::builder("LabResult")
            .column("date", StorageType::DateTime)
            .field("name", SdmType::CodedValue)
            .field("status", SdmType::CodedValue)
            .field("quantitative_result", SdmType::QuantitativeResult)
            .column("narrative_result", StorageType::SHORT_STRING)
            .field("abnormal_interpretation", SdmType::CodedValue)
            .column("accession_number", StorageType::SHORT_STRING)
            .column("notes", StorageType::NOTES)
            .foreign_key("lab_panel", "LabPanel", "lab_results")
            .build(),
    ]
}

pub fn options() -> Vec<DataModelOptions> {
    vec![
        DataModelOptions::new("LabPanel"),
        DataModelOptions::new("LabResult")
            .with_validators(
                FieldValidators::new()
                    .with("date", NonNullValidator)
                    .with("name_title", NonNullValidator)
                    .with("name_code_system", ExactValueValidator::new(LOINC))
                    .with("name_code_identifier", NonNullValidator)
                    .with("name_code_title", NonNullValidator)
                    .with("status_code_system", ExactValueValidator::nullable(LAB_STATUS))
                    .with(
                        "status_code_identifier",
                        ValueInSetValidator::nullable(VALID_STATUSES),
                    )
                    .with(
                        "abnormal_interpretation_code_system",
                        ExactValueValidator::nullable(LAB_INTERPRETATION),
                    )
                    .with(
                        "abnormal_interpretation_code_identifier",
                        ValueInSetValidator::nullable(VALID_INTERPRETATIONS),
                    ),
            )
            .with_rdf(),
    ]
}
