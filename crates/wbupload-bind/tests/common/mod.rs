#![allow(dead_code)]

use std::sync::Arc;

use serde_json::json;
use wbupload_bind::{
    Collection, ColumnMapping, MemoryStore, Picklist, Row, ScopedUploadTable, Store, UploadTable,
    Uploadable,
};

pub const COLLECTION_ID: i64 = 4;

/// Collection object with its cataloger, determinations and preparations.
pub fn collection_object_plan() -> UploadTable {
    let taxon = UploadTable::new("taxon")
        .column("name", ColumnMapping::text("Species"))
        .must_match();
    let determination = UploadTable::new("determination")
        .column("remarks", ColumnMapping::text("Det Remarks"))
        .to_one("taxon", taxon);
    let preparation = UploadTable::new("preparation")
        .column(
            "preptype",
            ColumnMapping::text("Prep Type").with_picklist("PrepType"),
        )
        .column("countamt", ColumnMapping::integer("Count"));
    let cataloger = UploadTable::new("agent")
        .column("lastname", ColumnMapping::text("Cataloger Last"))
        .column("firstname", ColumnMapping::text("Cataloger First"));

    UploadTable::new("collectionobject")
        .scoped_by("collectionmemberid")
        .column("catalognumber", ColumnMapping::text("Catalog Number"))
        .to_one("cataloger", cataloger)
        .to_many("determinations", "collectionobject", vec![determination])
        .to_many("preparations", "collectionobject", vec![preparation])
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(
        MemoryStore::new()
            .with_to_one("collectionobject", "cataloger", "agent")
            .with_to_many(
                "collectionobject",
                "determinations",
                "determination",
                "collectionobject",
            )
            .with_to_many(
                "collectionobject",
                "preparations",
                "preparation",
                "collectionobject",
            )
            .with_to_one("determination", "taxon", "taxon")
            .with_unique("collectionobject", "catalognumber"),
    )
}

/// Store the given taxon names and return their ids.
pub fn seed_taxa(store: &MemoryStore, names: &[&str]) -> Vec<i64> {
    names
        .iter()
        .map(|name| {
            let values = serde_json::from_value(json!({"name": name})).expect("taxon values");
            store.create("taxon", &values).expect("create taxon")
        })
        .collect()
}

pub fn collection(store: Arc<MemoryStore>) -> Collection {
    Collection::new(COLLECTION_ID, "Mammals", store)
        .with_picklist(Picklist::new("PrepType", ["Skeleton", "Skin"]))
}

pub fn scoped(collection: &Collection) -> ScopedUploadTable {
    collection_object_plan().apply_scoping(collection)
}

pub fn row(cells: &[(&str, &str)]) -> Row {
    cells
        .iter()
        .map(|(caption, cell)| (caption.to_string(), cell.to_string()))
        .collect()
}

/// A complete row; `overrides` replace individual cells.
pub fn full_row(overrides: &[(&str, &str)]) -> Row {
    let mut row = row(&[
        ("Catalog Number", "100"),
        ("Cataloger Last", "Smith"),
        ("Cataloger First", "Jane"),
        ("Species", "Canis lupus"),
        ("Det Remarks", "skull"),
        ("Prep Type", "Skeleton"),
        ("Count", "2"),
    ]);
    for (caption, cell) in overrides {
        row.insert(caption.to_string(), cell.to_string());
    }
    row
}

pub fn blank_row() -> Row {
    row(&[
        ("Catalog Number", ""),
        ("Cataloger Last", ""),
        ("Cataloger First", ""),
        ("Species", ""),
        ("Det Remarks", ""),
        ("Prep Type", ""),
        ("Count", ""),
    ])
}
