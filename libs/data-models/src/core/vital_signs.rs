//! Vital signs
//!
//! Every vital-sign measurement is validated the same way: a nullable unit
//! from the measurement's unit set, and a nullable LOINC name code from its
//! identifier set. The validator map is built from the tables below.

use crate::codes::{BG_CONTEXT, BP_METHOD, LOINC, SNOMED};
use crate::options::DataModelOptions;
use crate::rename::{RenameRule, RenameRules, UnitRule};
use indivo_models::{ModelDefinition, SdmType, StorageType};
use indivo_validator::{ExactValueValidator, FieldValidators, NonNullValidator, ValueInSetValidator};

const BP_POSITION_IDS: [&str; 3] = [
    "40199007", // supine
    "33586001", // sitting
    "10904000", // standing
];

const BP_SITE_IDS: [&str; 4] = [
    "61396006",  // left thigh
    "11207009",  // right thigh
    "368208006", // left arm
    "368209003", // right arm
];

const BP_METHODS: [&str; 4] = ["invasive", "palpation", "machine", "auscultation"];

const BG_CONTEXTS: [&str; 14] = [
    "AfterBreakfast",
    "AfterDinner",
    "AfterExercise",
    "AfterLunch",
    "AfterMeal",
    "BeforeBedtime",
    "BeforeBreakfast",
    "BeforeDinner",
    "BeforeExercise",
    "BeforeLunch",
    "BeforeMeal",
    "fasting",
    "Ignore",
    "non-fasting",
];

/// (measurement prefix, allowed units, allowed LOINC identifiers)
const MEASUREMENTS: [(&str, &[&str], &[&str]); 15] = [
    ("height", &["cm", "m"], &["8306-3", "8302-2"]),
    ("weight", &["kg"], &["3141-9"]),
    ("bmi", &["kg/m2"], &["39156-5"]),
    ("head_circumference", &["cm"], &["8287-5"]),
    ("temperature", &["Cel"], &["8310-5"]),
    ("oxygen_saturation", &["%{HemoglobinSaturation}"], &["2710-2"]),
    ("blood_pressure_diastolic", &["mm[Hg]"], &["8462-4"]),
    ("blood_pressure_systolic", &["mm[Hg]"], &["8480-6"]),
    ("heart_rate", &["{beats}/min"], &["8867-4"]),
    ("respiratory_rate", &["{breaths}/min"], &["9279-1"]),
    ("blood_glucose_level", &["mg/dL"], &["2339-0", "2345-7"]),
    ("cholesterol_ldl", &["mg/dL"], &["2089-1"]),
    ("cholesterol_hdl", &["mg/dL"], &["2085-9"]),
    ("cholesterol_triglyceride", &["mg/dL"], &["2571-8"]),
    ("cholesterol_total", &["mg/dL"], &["2093-3"]),
];

/// Legacy dialect heights may arrive in metres; stored heights are centimetres.
pub const HEIGHT_IN_CM: UnitRule = UnitRule {
    unit_field: "height_unit",
    value_field: "height_value",
    from: "m",
    to: "cm",
    factor: 100.0,
};

pub fn definitions() -> Vec<ModelDefinition> {
    vec![ModelDefinition::builder("VitalSigns")
        .column("date", StorageType::DateTime)
        .foreign_key("encounter", "Encounter", "vitalsigns_set")
        .field("height", SdmType::VitalSign)
        .field("weight", SdmType::VitalSign)
        .field("bmi", SdmType::VitalSign)
        .field("head_circumference", SdmType::VitalSign)
        .field("temperature", SdmType::VitalSign)
        .field("oxygen_saturation", SdmType::VitalSign)
        .field("blood_pressure", SdmType::BloodPressure)
        .field("heart_rate", SdmType::VitalSign)
        .field("respiratory_rate", SdmType::VitalSign)
        .field("blood_glucose", SdmType::BloodGlucose)
        .field("cholesterol", SdmType::Cholesterol)
        .column("notes", StorageType::NOTES)
        .build()]
}

fn validators() -> FieldValidators {
    let mut validators = FieldValidators::new().with("date", NonNullValidator);

    for (prefix, units, ids) in MEASUREMENTS {
        validators.add(
            &format!("{prefix}_unit"),
            ValueInSetValidator::nullable(units.iter().copied()),
        );
        validators.add(
            &format!("{prefix}_name_code_system"),
            ExactValueValidator::nullable(LOINC),
        );
        validators.add(
            &format!("{prefix}_name_code_identifier"),
            ValueInSetValidator::nullable(ids.iter().copied()),
        );
    }

    validators
        .with("blood_pressure_position_code_system", ExactValueValidator::nullable(SNOMED))
        .with(
            "blood_pressure_position_code_identifier",
            ValueInSetValidator::nullable(BP_POSITION_IDS),
        )
        .with("blood_pressure_site_code_system", ExactValueValidator::nullable(SNOMED))
        .with(
            "blood_pressure_site_code_identifier",
            ValueInSetValidator::nullable(BP_SITE_IDS),
        )
        .with("blood_pressure_method_code_system", ExactValueValidator::nullable(BP_METHOD))
        .with(
            "blood_pressure_method_code_identifier",
            ValueInSetValidator::nullable(BP_METHODS),
        )
        .with("blood_glucose_context_code_system", ExactValueValidator::nullable(BG_CONTEXT))
        .with(
            "blood_glucose_context_code_identifier",
            ValueInSetValidator::nullable(BG_CONTEXTS),
        )
}

pub fn options() -> Vec<DataModelOptions> {
    vec![DataModelOptions::new("VitalSigns")
        .with_validators(validators())
        .with_renames(
            RenameRules::new(vec![
                RenameRule::prefix("head_circumference_", "head_circ_"),
                RenameRule::prefix("blood_pressure_", "bp_"),
            ])
            .with_unit(HEIGHT_IN_CM),
        )
        .with_rdf()]
}
