mod common;

use jsonschema::JSONSchema;
use serde_json::Value;
use wbupload_bind::{
    BoundUploadTable, BoundUploadable, Collection, ColumnMapping, MemoryStore, Picklist,
    ScopedUploadable, UploadMode, UploadOptions, UploadTable, Uploadable,
    upload_plan_json_schema, upload_row,
};
use wbupload_core::{CellIssue, RecordResult};

use common::{collection, collection_object_plan, full_row, memory_store, scoped};

#[test]
fn bind_collects_every_cell_issue() {
    let collection = collection(memory_store());
    let mut row = full_row(&[("Count", "two")]);
    row.shift_remove("Species");

    let failures = scoped(&collection)
        .bind(&collection, &row)
        .expect_err("row should not bind");
    assert_eq!(
        failures.failures,
        vec![
            CellIssue::new("Species", "column is missing from the row"),
            CellIssue::new("Count", "value 'two' must be an integer"),
        ]
    );
}

#[test]
fn parse_failures_become_a_leaf_result() {
    let store = memory_store();
    let collection = collection(store.clone());
    let row = full_row(&[("Count", "2.5")]);

    let result = upload_row(&scoped(&collection), &collection, &row, UploadMode::Process)
        .expect("upload row");
    assert!(matches!(result.record_result, RecordResult::ParseFailures(_)));
    assert!(result.to_one.is_empty());
    assert!(result.to_many.is_empty());
    assert!(result.contains_failure());
    assert_eq!(result.validation_info().cell_issues.len(), 1);
    assert!(store.records("collectionobject").is_empty());
}

#[test]
fn read_only_picklist_rejects_unknown_values() {
    let collection = Collection::new(4, "Mammals", memory_store())
        .with_picklist(Picklist::new("PrepType", ["Skeleton"]).read_only());
    let row = full_row(&[("Prep Type", "Slide")]);

    let failures = scoped(&collection)
        .bind(&collection, &row)
        .expect_err("read-only picklist");
    assert_eq!(
        failures.failures,
        vec![CellIssue::new(
            "Prep Type",
            "value 'Slide' is not in picklist PrepType"
        )]
    );
}

#[test]
fn disabled_picklist_additions_reject_unknown_values() {
    let options = UploadOptions {
        add_picklist_items: false,
        ..UploadOptions::default()
    };
    let collection = collection(memory_store()).with_options(options);
    let row = full_row(&[("Prep Type", "Slide")]);

    assert!(scoped(&collection).bind(&collection, &row).is_err());
}

#[test]
fn untrimmed_cells_fail_to_parse() {
    let options = UploadOptions {
        trim_cells: false,
        ..UploadOptions::default()
    };
    let trimmed = collection(memory_store());
    let untrimmed = collection(memory_store()).with_options(options);
    let row = full_row(&[("Count", " 3 ")]);

    let bound = scoped(&trimmed).bind(&trimmed, &row).expect("trimmed row binds");
    assert_eq!(bound.table(), "collectionobject");
    assert!(scoped(&untrimmed).bind(&untrimmed, &row).is_err());
}

#[test]
fn bound_root_reports_plan_flags() {
    let collection = collection(memory_store());
    let plan = UploadTable::new("taxon")
        .column("name", ColumnMapping::text("Species"))
        .must_match();
    let row = common::row(&[("Species", "Canis lupus")]);

    let bound = plan
        .apply_scoping(&collection)
        .bind(&collection, &row)
        .expect("bind");
    assert!(!bound.is_one_to_one());
    assert!(bound.must_match());
    assert_eq!(bound.values()["name"], Value::from("Canis lupus"));
    assert_eq!(bound.info().columns, ["Species"]);
}

#[test]
fn blank_cells_bind_as_null() {
    let collection = collection(memory_store());
    let row = full_row(&[("Det Remarks", "")]);

    let bound = scoped(&collection).bind(&collection, &row).expect("bind");
    assert!(!bound.is_blank());
    let bound = scoped(&collection)
        .bind(&collection, &common::blank_row())
        .expect("bind blank row");
    assert!(bound.is_blank());
    assert!(bound.values()["catalognumber"].is_null());
}

#[test]
fn plan_json_round_trips_and_matches_schema() {
    let plan = collection_object_plan();
    let encoded = plan.to_json().expect("encode plan");
    let decoded: UploadTable = serde_json::from_value(encoded.clone()).expect("decode plan");
    assert_eq!(decoded, plan);

    let schema = serde_json::to_value(upload_plan_json_schema()).expect("serialize schema");
    let compiled = JSONSchema::compile(&schema).expect("compile plan schema");
    assert!(compiled.is_valid(&encoded));
}

#[test]
fn unparsed_plan_parses_back() {
    let plan = collection_object_plan();
    let document = plan.unparse().expect("unparse plan");
    assert_eq!(document["baseTableName"], "collectionobject");
    assert_eq!(UploadTable::parse_plan(&document).expect("parse plan"), plan);
}

#[test]
fn bound_rows_can_cross_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BoundUploadTable>();
    assert_send_sync::<Collection>();
    assert_send_sync::<MemoryStore>();
}
