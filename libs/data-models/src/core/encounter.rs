use crate::codes::{ENCOUNTER_TYPE, ENCOUNTER_TYPES};
use crate::options::DataModelOptions;
use crate::rename::{RenameRule, RenameRules};
use indivo_models::{ModelDefinition, SdmType, StorageType};
use indivo_validator::{ExactValueValidator, FieldValidators, NonNullValidator, ValueInSetValidator};

pub fn definitions() -> Vec<ModelDefinition> {
    vec![ModelDefinition::builder("Encounter")
        .field("encounter_type", SdmType::CodedValue)
        .column("start_date", StorageType::DateTime)
        .column("end_date", StorageType::DateTime)
        .field("facility", SdmType::Organization)
        .field("provider", SdmType::Provider)
        .column("notes", StorageType::Text)
        .build()]
}

pub fn options() -> Vec<DataModelOptions> {
    vec![DataModelOptions::new("Encounter")
        .with_validators(
            FieldValidators::new()
                .with("encounter_type_title", NonNullValidator)
                .with("encounter_type_code_system", ExactValueValidator::new(ENCOUNTER_TYPE))
                .with(
                    "encounter_type_code_identifier",
                    ValueInSetValidator::new(ENCOUNTER_TYPES),
                )
                .with("encounter_type_code_title", NonNullValidator)
                .with("start_date", NonNullValidator),
        )
        .with_renames(RenameRules::new(vec![
            RenameRule::exact("start_date", "startDate"),
            RenameRule::exact("end_date", "endDate"),
            RenameRule::prefix("encounter_type_", "type_"),
        ]))
        .with_rdf()]
}
