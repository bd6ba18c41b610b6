//! Code-system URIs used by the clinical data-models.

pub const SNOMED: &str = "http://purl.bioontology.org/ontology/SNOMEDCT/";
pub const RXNORM: &str = "http://purl.bioontology.org/ontology/RXNORM/";
/// NDF-RT drug classes.
pub const NUI: &str = "http://purl.bioontology.org/ontology/NDFRT/";
pub const UNII: &str = "http://fda.gov/UNII/";
pub const LOINC: &str = "http://purl.bioontology.org/ontology/LNC/";

pub const ENCOUNTER_TYPE: &str = "http://smartplatforms.org/terms/codes/EncounterType#";
pub const BP_METHOD: &str = "http://smartplatforms.org/terms/codes/BloodPressureMethod#";
pub const BG_CONTEXT: &str = "https://code.cophr.org/blood-glucose-context/";
pub const LAB_INTERPRETATION: &str =
    "http://smartplatforms.org/terms/codes/LabResultInterpretation#";
pub const LAB_STATUS: &str = "http://smartplatforms.org/terms/codes/LabStatus#";
pub const SPECIALTY: &str = "http://code.cophr.org/medical-specialty/";
pub const APPOINTMENT_STATUS: &str = "http://code.cophr.org/appointment-status/";

pub const ENCOUNTER_TYPES: [&str; 6] = [
    "home",
    "emergency",
    "ambulatory",
    "inpatient",
    "field",
    "virtual",
];
