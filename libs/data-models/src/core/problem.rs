use crate::codes::SNOMED;
use crate::options::DataModelOptions;
use crate::rename::{RenameRule, RenameRules};
use indivo_models::{ModelDefinition, SdmType, StorageType};
use indivo_validator::{ExactValueValidator, FieldValidators, NonNullValidator, ValueInSetValidator};

const VALID_STATUS_IDS: [&str; 4] = [
    "55561003",  // active
    "73425007",  // inactive
    "7087005",   // intermittent
    "413322009", // resolved
];

pub fn definitions() -> Vec<ModelDefinition> {
    vec![ModelDefinition::builder("Problem")
        .field("name", SdmType::CodedValue)
        .field("status", SdmType::CodedValue)
        .column("start_date", StorageType::DateTime)
        .column("end_date", StorageType::DateTime)
        .column("stop_reason", StorageType::Text)
        .column("notes", StorageType::NOTES)
        .many_to_many("encounters", "Encounter")
        .build()]
}

pub fn options() -> Vec<DataModelOptions> {
    vec![DataModelOptions::new("Problem")
        .with_validators(
            FieldValidators::new()
                .with("name_title", NonNullValidator)
                .with("name_code_system", ExactValueValidator::new(SNOMED))
                .with("name_code_identifier", NonNullValidator)
                .with("name_code_title", NonNullValidator)
                .with("status_code_system", ExactValueValidator::nullable(SNOMED))
                .with(
                    "status_code_identifier",
                    ValueInSetValidator::nullable(VALID_STATUS_IDS),
                )
                .with("start_date", NonNullValidator),
        )
        .with_renames(RenameRules::new(vec![
            RenameRule::exact("start_date", "startDate"),
            RenameRule::exact("end_date", "endDate"),
        ]))
        .with_rdf()]
}
