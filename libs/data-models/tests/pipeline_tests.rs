use indivo_data_models::codes::{ENCOUNTER_TYPE, NUI, RXNORM, SNOMED, UNII};
use indivo_data_models::{
    catalogue_registry, GraphBuilder, IngestError, Ingestor, OptionsRegistry, RecordScope,
    ResultOrder, SerializeError, Serializer,
};
use indivo_format::{parse_models, ModelElement};
use indivo_models::{Fact, FactQuery, FactStore, FieldValue, MemoryFactStore, ModelRegistry};
use indivo_validator::IssueCode;

const MEDICATION: &str = r#"
{
    "__modelname__": "Medication",
    "name_title": "Amoxicillin 250mg",
    "name_code_title": "Amoxicillin 250 MG Oral Capsule",
    "name_code_system": "http://purl.bioontology.org/ontology/RXNORM/",
    "name_code_identifier": "308182",
    "start_date": "2009-02-05",
    "fulfillments": [
        {"__modelname__": "Fill", "date": "2009-02-05T14:00:00Z", "dispenseDaysSupply": 30},
        {"__modelname__": "Fill", "date": "2009-03-07T14:00:00Z", "dispenseDaysSupply": "30"}
    ]
}
"#;

fn setup() -> (ModelRegistry, &'static OptionsRegistry) {
    (catalogue_registry().unwrap(), OptionsRegistry::builtin())
}

fn allergy(system: &str) -> Fact {
    Fact::new("allergy-1", "Allergy")
        .with_field("allergen_title", "Penicillin")
        .with_field("allergen_code_system", system)
        .with_field("allergen_code_identifier", "7980")
}

#[test]
fn allergen_duplicates_follow_the_code_system() {
    let (registry, options) = setup();
    let serializer = Serializer::new(&registry, options);

    for (system, prefix) in [
        (RXNORM, "drug_allergen_"),
        (NUI, "drug_class_allergen_"),
        (UNII, "other_allergen_"),
    ] {
        let fields = serializer.fields(&allergy(system));
        assert_eq!(fields[&format!("{prefix}title")], FieldValue::from("Penicillin"));
        assert_eq!(fields[&format!("{prefix}code_system")], FieldValue::from(system));
    }

    let fields = serializer.fields(&allergy("http://example.org/allergens/"));
    assert_eq!(fields, serializer.canonical_fields(&allergy("http://example.org/allergens/")));
    assert!(!fields.keys().any(|k| k.starts_with("drug_") || k.starts_with("other_")));
}

#[test]
fn legacy_duplicates_come_after_canonical_fields() {
    let (registry, options) = setup();
    let serializer = Serializer::new(&registry, options);
    let fact = Fact::new("enc-1", "Encounter")
        .with_field("encounter_type_code_system", ENCOUNTER_TYPE)
        .with_field("encounter_type_code_identifier", "ambulatory");

    let json = serializer.to_json_value(&[fact]);
    let keys: Vec<&String> = json[0].as_object().unwrap().keys().collect();
    let start = keys.iter().position(|k| *k == "start_date").unwrap();
    let legacy = keys.iter().position(|k| *k == "startDate").unwrap();
    assert!(legacy > start);
    assert!(keys.iter().position(|k| *k == "notes").unwrap() < legacy);
    assert_eq!(json[0]["type_code_identifier"], "ambulatory");
    assert_eq!(json[0]["encounter_type_code_identifier"], "ambulatory");
}

#[test]
fn head_circumference_survives_the_legacy_round_trip() {
    let (registry, options) = setup();
    let ingestor = Ingestor::new(&registry, options);
    let serializer = Serializer::new(&registry, options);

    let mut store = MemoryFactStore::new();
    let facts = ingestor
        .ingest_sdmj(
            r#"{"__modelname__": "VitalSigns", "date": "2009-05-16T12:00:00Z",
                "head_circumference_unit": "cm", "head_circumference_value": 45.2,
                "blood_pressure_systolic_value": 120, "blood_pressure_systolic_unit": "mm[Hg]"}"#,
            &mut store,
        )
        .unwrap();

    let legacy = serializer.to_xml(&facts).unwrap();
    let written = parse_models(&legacy).unwrap();
    assert_eq!(written[0].text("head_circ_unit"), Some("cm"));
    assert_eq!(written[0].text("head_circumference_unit"), Some("cm"));
    assert_eq!(written[0].text("bp_systolic_value"), Some("120.0"));

    let mut second = MemoryFactStore::new();
    let restored = ingestor.ingest_legacy_sdmx(&legacy, &mut second).unwrap();
    assert_eq!(restored.len(), 1);
    assert_eq!(
        restored[0].value("head_circumference_unit"),
        &FieldValue::from("cm")
    );
    assert!(!restored[0].fields.contains_key("head_circ_unit"));
    assert_eq!(
        serializer.canonical_fields(&restored[0]),
        serializer.canonical_fields(&facts[0])
    );
}

#[test]
fn metre_heights_are_stored_in_centimetres() {
    let options = OptionsRegistry::builtin().get("VitalSigns").unwrap();
    let mut model = ModelElement::new("VitalSigns")
        .with_text("height_unit", Some("m"))
        .with_text("height_value", Some("1.8"));
    options.to_sdmx(&mut model).unwrap();
    assert_eq!(model.text("height_unit"), Some("cm"));
    assert_eq!(model.text("height_value"), Some("180.0"));

    let (registry, options) = setup();
    let mut store = MemoryFactStore::new();
    let facts = Ingestor::new(&registry, options)
        .ingest_legacy_sdmx(
            r#"<Models><Model name="VitalSigns">
                 <Field name="date">2009-05-16T12:00:00Z</Field>
                 <Field name="height_unit">m</Field>
                 <Field name="height_value">1.8</Field>
               </Model></Models>"#,
            &mut store,
        )
        .unwrap();
    assert_eq!(facts[0].value("height_unit"), &FieldValue::from("cm"));
    assert_eq!(facts[0].value("height_value"), &FieldValue::Number(180.0));
}

#[test]
fn medication_fills_link_back_to_their_medication() {
    let (registry, options) = setup();
    let mut store = MemoryFactStore::new();
    let facts = Ingestor::new(&registry, options)
        .ingest_sdmj(MEDICATION, &mut store)
        .unwrap();

    assert_eq!(facts.len(), 3);
    let med = facts.iter().find(|f| f.model == "Medication").unwrap();
    let fills: Vec<&Fact> = facts.iter().filter(|f| f.model == "Fill").collect();
    assert_eq!(fills.len(), 2);
    for fill in &fills {
        assert_eq!(fill.references["medication"], med.id);
        assert_eq!(fill.value("dispenseDaysSupply"), &FieldValue::Number(30.0));
    }
    assert_eq!(med.collections["fulfillments"].len(), 2);
    assert_eq!(store.query(&FactQuery::model("Fill")).unwrap().total, 2);
}

#[test]
fn invalid_instances_abort_the_whole_document() {
    let (registry, options) = setup();
    let mut store = MemoryFactStore::new();
    let doc = MEDICATION.replace(RXNORM, SNOMED);

    let err = Ingestor::new(&registry, options)
        .ingest_sdmj(&doc, &mut store)
        .unwrap_err();
    let outcomes = match err {
        IngestError::Validation(outcomes) => outcomes,
        other => panic!("expected a validation failure, got {other}"),
    };
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].model, "Medication");
    let issue = outcomes[0].issues_for("name_code_system").next().unwrap();
    assert_eq!(issue.code, IssueCode::Value);
    assert!(store.is_empty());
}

#[test]
fn legacy_validation_can_be_switched_off() {
    let (registry, options) = setup();
    let doc = r#"<Models><Model name="Problem">
                   <Field name="name_title">Asthma</Field>
                   <Field name="startDate">2009-05-16T12:00:00Z</Field>
                 </Model></Models>"#;

    let mut store = MemoryFactStore::new();
    let strict = Ingestor::new(&registry, options).ingest_legacy_sdmx(doc, &mut store);
    assert!(matches!(strict, Err(IngestError::Validation(_))));
    assert!(store.is_empty());

    let facts = Ingestor::new(&registry, options)
        .with_legacy_validation(false)
        .ingest_legacy_sdmx(doc, &mut store)
        .unwrap();
    assert!(matches!(facts[0].value("start_date"), FieldValue::DateTime(_)));
    assert!(!facts[0].fields.contains_key("startDate"));
}

#[test]
fn legacy_encounter_names_map_back() {
    let (registry, options) = setup();
    let mut store = MemoryFactStore::new();
    let facts = Ingestor::new(&registry, options)
        .ingest_legacy_sdmx(
            r#"<Models><Model name="Encounter">
                 <Field name="type_title">Ambulatory encounter</Field>
                 <Field name="type_code_title">Ambulatory encounter</Field>
                 <Field name="type_code_system">http://smartplatforms.org/terms/codes/EncounterType#</Field>
                 <Field name="type_code_identifier">ambulatory</Field>
                 <Field name="startDate">2009-05-16T12:00:00Z</Field>
                 <Field name="endDate">2009-05-16T14:00:00Z</Field>
               </Model></Models>"#,
            &mut store,
        )
        .unwrap();

    let encounter = &facts[0];
    assert_eq!(
        encounter.value("encounter_type_code_identifier"),
        &FieldValue::from("ambulatory")
    );
    assert!(!encounter.value("end_date").is_null());
}

#[derive(Default)]
struct RecordingGraph {
    record: String,
    facts: Vec<String>,
    limited: bool,
    total: usize,
}

impl GraphBuilder for RecordingGraph {
    fn for_record(record_id: &str) -> Self {
        Self {
            record: record_id.to_string(),
            ..Self::default()
        }
    }

    fn add_fact_list<'a, I>(&mut self, _model: &str, facts: I, limited: bool) -> ResultOrder
    where
        I: Iterator<Item = &'a Fact>,
    {
        self.facts = facts.map(|f| f.id.clone()).collect();
        self.limited = limited;
        ResultOrder(self.facts.clone())
    }

    fn add_response_summary(&mut self, _query: &FactQuery, total: usize, order: &ResultOrder) {
        self.total = total;
        assert_eq!(order.0, self.facts);
    }

    fn to_rdf(self) -> Result<String, SerializeError> {
        Ok(format!(
            "{} {} {}/{}",
            self.record,
            self.facts.join(","),
            self.limited,
            self.total
        ))
    }
}

#[test]
fn graph_builder_receives_results_and_limit() {
    let (registry, options) = setup();
    let mut store = MemoryFactStore::new();
    Ingestor::new(&registry, options)
        .ingest_sdmj(MEDICATION, &mut store)
        .unwrap();

    let serializer = Serializer::new(&registry, options);
    let query = FactQuery::model("Fill").with_limit(1);
    let results = store.query(&query).unwrap();
    let rdf = serializer
        .to_rdf::<RecordingGraph>(
            "Fill",
            &query,
            &results,
            &RecordScope::Carenet {
                carenet_id: "c1".into(),
                record_id: "r1".into(),
            },
        )
        .unwrap();
    assert_eq!(rdf, format!("r1 {} true/2", results.facts[0].id));

    let err = serializer
        .to_rdf::<RecordingGraph>(
            "Immunization",
            &FactQuery::model("Immunization"),
            &Default::default(),
            &RecordScope::Record("r1".into()),
        )
        .unwrap_err();
    assert!(matches!(err, SerializeError::Unsupported { format: "RDF", .. }));
}
