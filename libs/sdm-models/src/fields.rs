//! Composite clinical field taxonomy
//!
//! Every composite SDM type is stored as a fixed set of primitive columns that
//! share the field name as prefix: a `CodedValue` field called `allergen` is
//! stored as `allergen_title`, `allergen_code_identifier`,
//! `allergen_code_title` and `allergen_code_system`. Composites nest, so the
//! suffix tables below reference other composite types.

use crate::types::{SdmType, StorageType};

/// One entry in a composite type's suffix table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubField {
    /// A stored column `{prefix}_{suffix}`.
    Column(&'static str, StorageType),
    /// A nested composite stored under `{prefix}_{suffix}_...`.
    Nested(&'static str, SdmType),
}

use StorageType::{Boolean, Date, Number};
use SubField::{Column, Nested};

const S: StorageType = StorageType::SHORT_STRING;

const CODE: &[SubField] = &[
    Column("identifier", S),
    Column("title", S),
    Column("system", S),
];

const CODED_VALUE: &[SubField] = &[Column("title", S), Nested("code", SdmType::Code)];

const VALUE_AND_UNIT: &[SubField] = &[Column("value", Number), Column("unit", S)];

const ADDRESS: &[SubField] = &[
    Column("country", S),
    Column("city", S),
    Column("postalcode", S),
    Column("region", S),
    Column("street", S),
];

const NAME: &[SubField] = &[
    Column("family", S),
    Column("given", S),
    Column("middle", S),
    Column("prefix", S),
    Column("suffix", S),
];

const TELEPHONE: &[SubField] = &[
    Column("type", S),
    Column("number", S),
    Column("preferred_p", Boolean),
];

const ORGANIZATION: &[SubField] = &[Column("name", S), Nested("adr", SdmType::Address)];

const PHARMACY: &[SubField] = &[
    Column("ncpdpid", S),
    Column("org", S),
    Nested("adr", SdmType::Address),
];

const PROVIDER: &[SubField] = &[
    Column("dea_number", S),
    Column("email", S),
    Column("ethnicity", S),
    Column("npi_number", S),
    Column("preferred_language", S),
    Column("race", S),
    Column("bday", Date),
    Column("gender", S),
    Nested("adr", SdmType::Address),
    Nested("name", SdmType::Name),
    Nested("tel_1", SdmType::Telephone),
    Nested("tel_2", SdmType::Telephone),
];

const VITAL_SIGN: &[SubField] = &[
    Column("unit", S),
    Column("value", Number),
    Nested("name", SdmType::CodedValue),
];

const BLOOD_PRESSURE: &[SubField] = &[
    Nested("systolic", SdmType::VitalSign),
    Nested("diastolic", SdmType::VitalSign),
    Nested("position", SdmType::CodedValue),
    Nested("site", SdmType::CodedValue),
    Nested("method", SdmType::CodedValue),
];

const BLOOD_GLUCOSE: &[SubField] = &[
    Nested("level", SdmType::VitalSign),
    Nested("context", SdmType::CodedValue),
];

const CHOLESTEROL: &[SubField] = &[
    Nested("ldl", SdmType::VitalSign),
    Nested("hdl", SdmType::VitalSign),
    Nested("triglyceride", SdmType::VitalSign),
    Nested("total", SdmType::VitalSign),
];

const VALUE_RANGE: &[SubField] = &[
    Nested("min", SdmType::ValueAndUnit),
    Nested("max", SdmType::ValueAndUnit),
];

const QUANTITATIVE_RESULT: &[SubField] = &[
    Nested("value", SdmType::ValueAndUnit),
    Nested("normal_range", SdmType::ValueRange),
    Nested("non_critical_range", SdmType::ValueRange),
];

/// Suffix table of a composite type. Empty for the single-column types.
pub fn sub_fields(ty: SdmType) -> &'static [SubField] {
    match ty {
        SdmType::Date | SdmType::String | SdmType::Number => &[],
        SdmType::Code => CODE,
        SdmType::CodedValue => CODED_VALUE,
        SdmType::ValueAndUnit => VALUE_AND_UNIT,
        SdmType::Address => ADDRESS,
        SdmType::Name => NAME,
        SdmType::Telephone => TELEPHONE,
        SdmType::Pharmacy => PHARMACY,
        SdmType::Organization => ORGANIZATION,
        SdmType::Provider => PROVIDER,
        SdmType::VitalSign => VITAL_SIGN,
        SdmType::BloodPressure => BLOOD_PRESSURE,
        SdmType::BloodGlucose => BLOOD_GLUCOSE,
        SdmType::Cholesterol => CHOLESTEROL,
        SdmType::QuantitativeResult => QUANTITATIVE_RESULT,
        SdmType::ValueRange => VALUE_RANGE,
    }
}

/// A stored column produced by expanding a declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredColumn {
    pub name: String,
    pub storage: StorageType,
}

/// Expand a declared field into its stored columns, in declaration order.
pub fn expand(name: &str, ty: SdmType) -> Vec<StoredColumn> {
    match ty {
        SdmType::Date => {
            return vec![StoredColumn {
                name: name.to_string(),
                storage: StorageType::DateTime,
            }]
        }
        SdmType::String => {
            return vec![StoredColumn {
                name: name.to_string(),
                storage: StorageType::SHORT_STRING,
            }]
        }
        SdmType::Number => {
            return vec![StoredColumn {
                name: name.to_string(),
                storage: StorageType::Number,
            }]
        }
        _ => {}
    }

    let mut columns = Vec::new();
    for sub in sub_fields(ty) {
        match *sub {
            SubField::Column(suffix, storage) => columns.push(StoredColumn {
                name: format!("{name}_{suffix}"),
                storage,
            }),
            SubField::Nested(suffix, nested) => {
                columns.extend(expand(&format!("{name}_{suffix}"), nested));
            }
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(columns: &[StoredColumn]) -> Vec<&str> {
        columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn coded_value_expands_with_code_suffixes() {
        let cols = expand("allergen", SdmType::CodedValue);
        assert_eq!(
            names(&cols),
            vec![
                "allergen_title",
                "allergen_code_identifier",
                "allergen_code_title",
                "allergen_code_system",
            ]
        );
    }

    #[test]
    fn primitive_types_are_single_columns() {
        let cols = expand("date", SdmType::Date);
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].storage, StorageType::DateTime);

        let cols = expand("supply_days", SdmType::Number);
        assert_eq!(cols[0].name, "supply_days");
        assert_eq!(cols[0].storage, StorageType::Number);
    }

    #[test]
    fn blood_pressure_nests_vital_signs() {
        let cols = expand("blood_pressure", SdmType::BloodPressure);
        let n = names(&cols);
        assert!(n.contains(&"blood_pressure_systolic_value"));
        assert!(n.contains(&"blood_pressure_diastolic_name_code_system"));
        assert!(n.contains(&"blood_pressure_method_code_identifier"));
        let value = cols
            .iter()
            .find(|c| c.name == "blood_pressure_systolic_value")
            .unwrap();
        assert_eq!(value.storage, StorageType::Number);
    }

    #[test]
    fn quantitative_result_covers_ranges() {
        let n = expand("quantitative_result", SdmType::QuantitativeResult);
        let n = names(&n);
        assert!(n.contains(&"quantitative_result_value_value"));
        assert!(n.contains(&"quantitative_result_normal_range_min_unit"));
        assert!(n.contains(&"quantitative_result_non_critical_range_max_value"));
        assert_eq!(n.len(), 10);
    }

    #[test]
    fn every_sub_field_shares_the_prefix() {
        for ty in SdmType::ALL {
            for col in expand("f", ty) {
                assert!(col.name == "f" || col.name.starts_with("f_"), "{}", col.name);
            }
        }
    }

    #[test]
    fn provider_telephones_carry_boolean_preference() {
        let cols = expand("provider", SdmType::Provider);
        let pref = cols
            .iter()
            .find(|c| c.name == "provider_tel_1_preferred_p")
            .unwrap();
        assert_eq!(pref.storage, StorageType::Boolean);
        assert!(cols.iter().any(|c| c.name == "provider_name_given"));
        assert!(cols.iter().any(|c| c.name == "provider_adr_postalcode"));
    }
}
