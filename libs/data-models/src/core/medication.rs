//! Medications and their fills

use crate::codes::RXNORM;
use crate::options::DataModelOptions;
use crate::rename::{RenameRule, RenameRules};
use indivo_models::{ModelDefinition, SdmType, StorageType};
use indivo_validator::{ExactValueValidator, FieldValidators, NonNullValidator};

pub fn definitions() -> Vec<ModelDefinition> {
    vec![
        ModelDefinition::builder("Medication")
            .field("name", SdmType::CodedValue)
            .column("start_date", StorageType::Date)
            .column("end_date", StorageType::Date)
            .field("frequency", SdmType::ValueAndUnit)
            .field("quantity", SdmType::ValueAndUnit)
            .column("instructions", StorageType::SHORT_STRING)
            .column("notes", StorageType::NOTES)
            .field("provenance", SdmType::Code)
            .build(),
        ModelDefinition::builder("Fill")
            .column("date", StorageType::DateTime)
            .column("dispenseDaysSupply", StorageType::Number)
            .column("pbm", StorageType::SHORT_STRING)
            .field("pharmacy", SdmType::Pharmacy)
            .field("provider", SdmType::Provider)
            .field("quantityDispensed", SdmType::ValueAndUnit)
            .foreign_key("medication", "Medication", "fulfillments")
            .build(),
    ]
}

pub fn options() -> Vec<DataModelOptions> {
    vec![
        DataModelOptions::new("Medication")
            .with_validators(
                FieldValidators::new()
                    .with("name_title", NonNullValidator)
                    .with("name_code_system", ExactValueValidator::new(RXNORM))
                    .with("name_code_identifier", NonNullValidator)
                    .with("name_code_title", NonNullValidator)
                    .with("start_date", NonNullValidator),
            )
            .with_renames(RenameRules::new(vec![
                RenameRule::exact("start_date", "startDate"),
                RenameRule::exact("end_date", "endDate"),
            ]))
            .with_rdf(),
        DataModelOptions::new("Fill")
            .with_validators(
                FieldValidators::new()
                    .with("date", NonNullValidator)
                    .with("dispenseDaysSupply", NonNullValidator),
            )
            .with_rdf(),
    ]
}
