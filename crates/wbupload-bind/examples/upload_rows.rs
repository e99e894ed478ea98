use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use tracing_subscriber::EnvFilter;
use wbupload_bind::{
    Collection, ColumnMapping, MemoryStore, Picklist, Row, Store, UploadMode, UploadOptions,
    UploadTable, Uploadable, upload_rows,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let mut options_path: Option<PathBuf> = None;
    let mut mode = UploadMode::Process;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--options" => options_path = args.next().map(PathBuf::from),
            "--match" => mode = UploadMode::Match,
            "--force" => mode = UploadMode::ForceUpload,
            _ => return Err(format!("unexpected argument {arg}").into()),
        }
    }

    let options = match options_path {
        Some(path) => UploadOptions::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => UploadOptions::default(),
    };

    let store = Arc::new(
        MemoryStore::new()
            .with_to_one("collectionobject", "cataloger", "agent")
            .with_to_many(
                "collectionobject",
                "preparations",
                "preparation",
                "collectionobject",
            ),
    );
    store.create("agent", &serde_json::from_value(json!({"lastname": "Smith"}))?)?;

    let collection = Collection::new(4, "Mammals", store.clone())
        .with_picklist(Picklist::new("PrepType", ["Skeleton", "Skin"]))
        .with_options(options);

    let plan = UploadTable::new("collectionobject")
        .scoped_by("collectionmemberid")
        .column("catalognumber", ColumnMapping::text("Catalog Number"))
        .to_one(
            "cataloger",
            UploadTable::new("agent")
                .column("lastname", ColumnMapping::text("Cataloger"))
                .must_match(),
        )
        .to_many(
            "preparations",
            "collectionobject",
            vec![
                UploadTable::new("preparation")
                    .column(
                        "preptype",
                        ColumnMapping::text("Prep Type").with_picklist("PrepType"),
                    )
                    .column("countamt", ColumnMapping::integer("Count")),
            ],
        );

    let rows: Vec<Row> = [
        [("Catalog Number", "1"), ("Cataloger", "Smith"), ("Prep Type", "Skin"), ("Count", "1")],
        [("Catalog Number", "2"), ("Cataloger", "Jones"), ("Prep Type", "Skin"), ("Count", "1")],
        [("Catalog Number", "3"), ("Cataloger", "Smith"), ("Prep Type", "Slide"), ("Count", "x")],
    ]
    .iter()
    .map(|cells| {
        cells
            .iter()
            .map(|(caption, cell)| (caption.to_string(), cell.to_string()))
            .collect()
    })
    .collect();

    let scoped = plan.apply_scoping(&collection);
    for result in upload_rows(&scoped, &collection, &rows, mode)? {
        let report = result.validation_info();
        println!("{}", serde_json::to_string(&report)?);
    }
    Ok(())
}
