//! Contributed data-models shipped alongside the core catalogue

pub mod appointment;

use crate::options::DataModelOptions;
use indivo_models::ModelDefinition;

pub fn definitions() -> Vec<ModelDefinition> {
    appointment::definitions()
}

pub fn options() -> Vec<DataModelOptions> {
    appointment::options()
}
