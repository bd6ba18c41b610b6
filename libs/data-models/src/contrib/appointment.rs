use crate::codes::{APPOINTMENT_STATUS, ENCOUNTER_TYPES, SPECIALTY};
use crate::options::DataModelOptions;
use indivo_models::{ModelDefinition, SdmType, StorageType};
use indivo_validator::{ExactValueValidator, FieldValidators, NonNullValidator, ValueInSetValidator};

const APPOINTMENT_STATUSES: [&str; 5] = [
    "Abs", // missed
    "Can", // cancelled
    "Cmp", // completed
    "Sch", // scheduled
    "Tbs", // to be scheduled
];

pub fn definitions() -> Vec<ModelDefinition> {
    vec![ModelDefinition::builder("Appointment")
        .column("start_date", StorageType::DateTime)
        .column("end_date", StorageType::DateTime)
        .field("facility", SdmType::Organization)
        .field("provider", SdmType::Provider)
        .field("specialty", SdmType::CodedValue)
        .field("appointment_type", SdmType::CodedValue)
        .field("status", SdmType::CodedValue)
        .column("notes", StorageType::NOTES)
        .build()]
}

pub fn options() -> Vec<DataModelOptions> {
    vec![DataModelOptions::new("Appointment").with_validators(
        FieldValidators::new()
            .with("start_date", NonNullValidator)
            .with("specialty_code_system", ExactValueValidator::nullable(SPECIALTY))
            .with(
                "appointment_type_code_identifier",
                ValueInSetValidator::nullable(ENCOUNTER_TYPES),
            )
            .with("status_code_system", ExactValueValidator::nullable(APPOINTMENT_STATUS))
            .with(
                "status_code_identifier",
                ValueInSetValidator::nullable(APPOINTMENT_STATUSES),
            ),
    )]
}
