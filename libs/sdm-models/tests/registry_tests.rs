use indivo_models::{
    Collection, FactQuery, FactStore, FieldValue, InstanceBatch, InstanceId, MemoryFactStore,
    ModelDefinition, ModelInstance, ModelRegistry, Relation, SdmType, StorageType,
};
use std::sync::Arc;
use std::thread;

fn vitals_schema() -> Vec<ModelDefinition> {
    vec![
        ModelDefinition::builder("Encounter")
            .field("start_date", SdmType::Date)
            .field("encounter_type", SdmType::CodedValue)
            .build(),
        ModelDefinition::builder("VitalSigns")
            .field("date", SdmType::Date)
            .field("height", SdmType::VitalSign)
            .field("blood_pressure", SdmType::BloodPressure)
            .foreign_key("encounter", "Encounter", "vitals")
            .build(),
    ]
}

#[test]
fn registered_definitions_expose_expanded_columns() {
    let registry = ModelRegistry::new();
    registry.register_batch(vitals_schema()).unwrap();

    let vitals = registry.get("VitalSigns").unwrap();
    let height_value = vitals.field("height_value").unwrap();
    assert_eq!(height_value.storage, StorageType::Number);
    assert!(vitals.field("height_name_code_system").is_some());
    assert!(vitals.field("blood_pressure_systolic_unit").is_some());
    assert!(vitals.field("height").is_none());
    assert!(matches!(
        vitals.relation("encounter"),
        Some(Relation::ForeignKey { target, .. }) if target == "Encounter"
    ));
    assert_eq!(registry.names(), vec!["Encounter", "VitalSigns"]);
}

#[test]
fn concurrent_readers_see_whole_batches() {
    let registry = Arc::new(ModelRegistry::new());
    let writer = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || registry.register_batch(vitals_schema()).unwrap())
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..100 {
                    let len = registry.len();
                    assert!(len == 0 || len == 2, "observed partial batch of {len}");
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(
        registry.collection("Encounter", "vitals"),
        Some(Collection::OneToMany {
            child_model: "VitalSigns".into(),
            foreign_key: "encounter".into()
        })
    );
}

#[test]
fn committed_facts_are_queryable_by_model() {
    let mut encounter = ModelInstance::new(InstanceId(0), "Encounter");
    encounter
        .fields
        .insert("encounter_type_title".into(), FieldValue::from("Ambulatory"));
    let mut vitals = ModelInstance::new(InstanceId(1), "VitalSigns");
    vitals.fields.insert("height_value".into(), FieldValue::Number(1.8));
    vitals.references.insert("encounter".into(), InstanceId(0));
    encounter.collections.insert("vitals".into(), vec![InstanceId(1)]);

    let mut store = MemoryFactStore::new();
    store
        .commit(&InstanceBatch::new(vec![encounter, vitals]))
        .unwrap();

    let results = store.query(&FactQuery::model("VitalSigns")).unwrap();
    assert_eq!(results.total, 1);
    let fact = &results.facts[0];
    let parent = store.get(&fact.references["encounter"]).unwrap();
    assert_eq!(parent.model, "Encounter");
    assert_eq!(parent.collections["vitals"], vec![fact.id.clone()]);
}
