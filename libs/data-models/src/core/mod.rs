//! Core clinical data-models

pub mod allergy;
pub mod encounter;
pub mod immunization;
pub mod lab_result;
pub mod medication;
pub mod problem;
pub mod procedure;
pub mod vital_signs;

use crate::options::DataModelOptions;
use indivo_models::ModelDefinition;

/// Core definitions, relation targets ahead of the models pointing at them.
pub fn definitions() -> Vec<ModelDefinition> {
    [
        allergy::definitions(),
        encounter::definitions(),
        immunization::definitions(),
        lab_result::definitions(),
        medication::definitions(),
        problem::definitions(),
        procedure::definitions(),
        vital_signs::definitions(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn options() -> Vec<DataModelOptions> {
    [
        allergy::options(),
        encounter::options(),
        immunization::options(),
        lab_result::options(),
        medication::options(),
        problem::options(),
        procedure::options(),
        vital_signs::options(),
    ]
    .into_iter()
    .flatten()
    .collect()
}
