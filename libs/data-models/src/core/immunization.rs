use crate::options::DataModelOptions;
use indivo_models::{ModelDefinition, SdmType, StorageType};

pub fn definitions() -> Vec<ModelDefinition> {
    vec![ModelDefinition::builder("Immunization")
        .column("date", StorageType::DateTime)
        .field("product_name", SdmType::CodedValue)
        .field("product_class", SdmType::CodedValue)
        .field("product_class_2", SdmType::CodedValue)
        .field("administration_status", SdmType::CodedValue)
        .field("refusal_reason", SdmType::CodedValue)
        .column("notes", StorageType::NOTES)
        .build()]
}

pub fn options() -> Vec<DataModelOptions> {
    vec![DataModelOptions::new("Immunization")]
}
