use crate::options::DataModelOptions;
use indivo_models::{ModelDefinition, SdmType, StorageType};

pub fn definitions() -> Vec<ModelDefinition> {
    vec![ModelDefinition::builder("Procedure")
        .column("date", StorageType::DateTime)
        .field("name", SdmType::CodedValue)
        .field("status", SdmType::CodedValue)
        .field("provider", SdmType::Provider)
        .column("notes", StorageType::NOTES)
        .build()]
}

pub fn options() -> Vec<DataModelOptions> {
    vec![DataModelOptions::new("Procedure")]
}
