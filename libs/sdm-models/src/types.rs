//! SDM type names and storage column types

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Field type names accepted by SDML definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SdmType {
    Date,
    String,
    Number,
    Code,
    CodedValue,
    ValueAndUnit,
    Address,
    Name,
    Telephone,
    Pharmacy,
    Organization,
    Provider,
    VitalSign,
    BloodPressure,
    BloodGlucose,
    Cholesterol,
    QuantitativeResult,
    ValueRange,
}

impl SdmType {
    pub const ALL: [SdmType; 18] = [
        SdmType::Date,
        SdmType::String,
        SdmType::Number,
        SdmType::Code,
        SdmType::CodedValue,
        SdmType::ValueAndUnit,
        SdmType::Address,
        SdmType::Name,
        SdmType::Telephone,
        SdmType::Pharmacy,
        SdmType::Organization,
        SdmType::Provider,
        SdmType::VitalSign,
        SdmType::BloodPressure,
        SdmType::BloodGlucose,
        SdmType::Cholesterol,
        SdmType::QuantitativeResult,
        SdmType::ValueRange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SdmType::Date => "Date",
            SdmType::String => "String",
            SdmType::Number => "Number",
            SdmType::Code => "Code",
            SdmType::CodedValue => "CodedValue",
            SdmType::ValueAndUnit => "ValueAndUnit",
            SdmType::Address => "Address",
            SdmType::Name => "Name",
            SdmType::Telephone => "Telephone",
            SdmType::Pharmacy => "Pharmacy",
            SdmType::Organization => "Organization",
            SdmType::Provider => "Provider",
            SdmType::VitalSign => "VitalSign",
            SdmType::BloodPressure => "BloodPressure",
            SdmType::BloodGlucose => "BloodGlucose",
            SdmType::Cholesterol => "Cholesterol",
            SdmType::QuantitativeResult => "QuantitativeResult",
            SdmType::ValueRange => "ValueRange",
        }
    }
}

impl fmt::Display for SdmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SdmType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SdmType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SchemaError::InvalidFieldType(s.to_string()))
    }
}

/// Type of a single stored column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    DateTime,
    Date,
    String { max_length: usize },
    Text,
    Number,
    Boolean,
}

impl StorageType {
    pub const SHORT_STRING: StorageType = StorageType::String { max_length: 255 };
    pub const NOTES: StorageType = StorageType::String { max_length: 600 };
}
