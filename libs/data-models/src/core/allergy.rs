//! Allergies and allergy exclusions

use crate::codes::{NUI, RXNORM, SNOMED, UNII};
use crate::options::DataModelOptions;
use crate::rename::{RenameRule, RenameRules};
use indivo_models::{ModelDefinition, SdmType, StorageType};
use indivo_validator::{ExactValueValidator, FieldValidators, NonNullValidator, ValueInSetValidator};

const CATEGORY_IDS: [&str; 5] = [
    "414285001", // food
    "426232007", // environmental
    "416098002", // drug
    "59037007",  // drug intolerance
    "235719002", // food intolerance
];

const SEVERITY_IDS: [&str; 5] = [
    "255604002", // mild
    "442452003", // life threatening
    "6736007",   // moderate
    "399166001", // fatal
    "24484000",  // severe
];

const EXCLUSION_IDS: [&str; 4] = [
    "160244002", // no known allergies
    "428607008", // no known environmental allergy
    "429625007", // no known food allergies
    "409137002", // no known history of drug allergy
];

/// Legacy prefixes of the allergen fields, keyed by allergen code system.
pub const LEGACY_ALLERGEN_PREFIXES: [(&str, &str); 3] = [
    (RXNORM, "drug_allergen_"),
    (NUI, "drug_class_allergen_"),
    (UNII, "other_allergen_"),
];

pub fn definitions() -> Vec<ModelDefinition> {
    vec![
        ModelDefinition::builder("Allergy")
            .field("allergic_reaction", SdmType::CodedValue)
            .field("category", SdmType::CodedValue)
            .field("allergen", SdmType::CodedValue)
            .field("severity", SdmType::CodedValue)
            .column("start_date", StorageType::DateTime)
            .column("end_date", StorageType::DateTime)
            .column("notes", StorageType::NOTES)
            .build(),
        ModelDefinition::builder("AllergyExclusion")
            .field("name", SdmType::CodedValue)
            .column("date", StorageType::DateTime)
            .build(),
    ]
}

fn allergy_validators() -> FieldValidators {
    FieldValidators::new()
        .with("allergic_reaction_title", NonNullValidator)
        .with("allergic_reaction_code_system", ExactValueValidator::new(SNOMED))
        .with("allergic_reaction_code_identifier", NonNullValidator)
        .with("allergic_reaction_code_title", NonNullValidator)
        .with("category_title", NonNullValidator)
        .with("category_code_system", ExactValueValidator::new(SNOMED))
        .with("category_code_identifier", ValueInSetValidator::new(CATEGORY_IDS))
        .with("category_code_title", NonNullValidator)
        .with("allergen_title", NonNullValidator)
        .with("allergen_code_system", ValueInSetValidator::new([RXNORM, NUI, UNII]))
        .with("allergen_code_identifier", NonNullValidator)
        .with("allergen_code_title", NonNullValidator)
        .with("severity_title", NonNullValidator)
        .with("severity_code_system", ExactValueValidator::new(SNOMED))
        .with("severity_code_identifier", ValueInSetValidator::new(SEVERITY_IDS))
        .with("severity_code_title", NonNullValidator)
}

fn allergy_renames() -> RenameRules {
    RenameRules::new(
        LEGACY_ALLERGEN_PREFIXES
            .into_iter()
            .map(|(system, legacy)| {
                RenameRule::prefix("allergen_", legacy).when("allergen_code_system", system)
            })
            .collect(),
    )
}

pub fn options() -> Vec<DataModelOptions> {
    vec![
        DataModelOptions::new("Allergy")
            .with_validators(allergy_validators())
            .with_renames(allergy_renames())
            .with_rdf(),
        DataModelOptions::new("AllergyExclusion")
            .with_validators(
                FieldValidators::new()
                    .with("name_code_system", ExactValueValidator::new(SNOMED))
                    .with("name_code_identifier", ValueInSetValidator::new(EXCLUSION_IDS))
                    .with("name_code_title", NonNullValidator)
                    .with("name_title", NonNullValidator),
            )
            .with_rdf(),
    ]
}
