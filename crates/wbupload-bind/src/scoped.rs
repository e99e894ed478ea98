use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use wbupload_core::{CellIssue, Filter, ParseFailures, ReportInfo};

use crate::bound::{BoundToMany, BoundUploadTable, PendingPicklistItem};
use crate::collection::{Collection, Picklist};
use crate::plan::{ColumnMapping, UploadPlan, UploadTable};
use crate::protocol::{Row, ScopedUploadable, Uploadable};

/// A column with its picklist resolved for the collection.
#[derive(Debug, Clone)]
struct ScopedColumn {
    mapping: ColumnMapping,
    picklist: Option<Picklist>,
}

#[derive(Debug, Clone)]
struct ScopedToMany {
    link_field: String,
    records: Vec<ScopedUploadTable>,
}

/// An upload plan resolved against a collection.
#[derive(Debug, Clone)]
pub struct ScopedUploadTable {
    table: String,
    columns: IndexMap<String, ScopedColumn>,
    static_values: Filter,
    must_match: bool,
    one_to_one: bool,
    to_one: IndexMap<String, ScopedUploadTable>,
    to_many: IndexMap<String, ScopedToMany>,
}

impl Uploadable for UploadTable {
    type Scoped = ScopedUploadTable;

    fn apply_scoping(&self, collection: &Collection) -> ScopedUploadTable {
        self.scope(collection, false)
    }

    fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn unparse(&self) -> serde_json::Result<Value> {
        serde_json::to_value(UploadPlan {
            base_table_name: self.table.clone(),
            uploadable: self.clone(),
        })
    }
}

impl UploadTable {
    /// `one_to_one` records whether the parent holds this plan as a to-one
    /// relation.
    fn scope(&self, collection: &Collection, one_to_one: bool) -> ScopedUploadTable {
        let mut static_values = self.static_values.clone();
        if let Some(field) = &self.scope_field {
            static_values.insert(field.clone(), Value::from(collection.id));
        }

        let columns = self
            .columns
            .iter()
            .map(|(field, mapping)| {
                let picklist = mapping.picklist.as_ref().and_then(|name| {
                    let resolved = collection.picklists.get(name).cloned();
                    if resolved.is_none() {
                        warn!(
                            table = %self.table,
                            picklist = %name,
                            collection = %collection.name,
                            "picklist not defined for collection; column is unrestricted"
                        );
                    }
                    resolved
                });
                let column = ScopedColumn {
                    mapping: mapping.clone(),
                    picklist,
                };
                (field.clone(), column)
            })
            .collect();

        ScopedUploadTable {
            table: self.table.clone(),
            columns,
            static_values,
            must_match: self.must_match,
            one_to_one,
            to_one: self
                .to_one
                .iter()
                .map(|(relation, plan)| (relation.clone(), plan.scope(collection, true)))
                .collect(),
            to_many: self
                .to_many
                .iter()
                .map(|(relation, many)| {
                    let scoped = ScopedToMany {
                        link_field: many.link_field.clone(),
                        records: many
                            .records
                            .iter()
                            .map(|plan| plan.scope(collection, false))
                            .collect(),
                    };
                    (relation.clone(), scoped)
                })
                .collect(),
        }
    }
}

impl ScopedUploadTable {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn static_values(&self) -> &Filter {
        &self.static_values
    }

    fn report_info(&self) -> ReportInfo {
        ReportInfo::new(
            self.table.clone(),
            self.columns.values().map(|column| column.mapping.column.clone()),
        )
    }

    fn bind_collecting(
        &self,
        collection: &Collection,
        row: &Row,
        failures: &mut Vec<CellIssue>,
    ) -> BoundUploadTable {
        let options = &collection.options;
        let mut values = Filter::new();
        let mut picklist_items = Vec::new();

        for (field, column) in &self.columns {
            let caption = &column.mapping.column;
            let Some(raw) = row.get(caption) else {
                failures.push(CellIssue::new(caption.clone(), "column is missing from the row"));
                continue;
            };
            let cell = if options.trim_cells {
                raw.trim()
            } else {
                raw.as_str()
            };
            if options.is_null(cell) {
                values.insert(field.clone(), Value::Null);
                continue;
            }

            let value = match collection.parser().parse(&column.mapping, cell) {
                Ok(value) => value,
                Err(issue) => {
                    failures.push(CellIssue::new(caption.clone(), issue));
                    continue;
                }
            };

            if let Some(picklist) = column.picklist.as_ref().filter(|list| !list.contains(cell)) {
                if picklist.read_only || !options.add_picklist_items {
                    failures.push(CellIssue::new(
                        caption.clone(),
                        format!("value '{cell}' is not in picklist {}", picklist.name),
                    ));
                    continue;
                }
                picklist_items.push(PendingPicklistItem {
                    picklist: picklist.name.clone(),
                    value: cell.to_string(),
                    caption: caption.clone(),
                });
            }

            values.insert(field.clone(), value);
        }

        let to_one = self
            .to_one
            .iter()
            .map(|(relation, child)| {
                (
                    relation.clone(),
                    child.bind_collecting(collection, row, failures),
                )
            })
            .collect();

        let to_many = self
            .to_many
            .iter()
            .map(|(relation, many)| {
                let records = many
                    .records
                    .iter()
                    .map(|child| child.bind_collecting(collection, row, failures))
                    .collect();
                let bound = BoundToMany {
                    link_field: many.link_field.clone(),
                    records,
                };
                (relation.clone(), bound)
            })
            .collect();

        BoundUploadTable {
            table: self.table.clone(),
            info: self.report_info(),
            values,
            static_values: self.static_values.clone(),
            must_match: self.must_match,
            one_to_one: self.one_to_one,
            picklist_items,
            to_one,
            to_many,
            store: Arc::clone(collection.store()),
        }
    }
}

impl ScopedUploadable for ScopedUploadTable {
    type Bound = BoundUploadTable;

    fn bind(&self, collection: &Collection, row: &Row) -> Result<BoundUploadTable, ParseFailures> {
        let mut failures = Vec::new();
        let bound = self.bind_collecting(collection, row, &mut failures);

        if failures.is_empty() {
            Ok(bound)
        } else {
            debug!(
                table = %self.table,
                issues = failures.len(),
                "row failed to bind"
            );
            Err(ParseFailures { failures })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::BoundUploadable;
    use crate::store::MemoryStore;

    fn collection() -> Collection {
        Collection::new(4, "Fish", Arc::new(MemoryStore::new()))
            .with_picklist(Picklist::new("PrepType", ["Skeleton", "EtOH"]))
    }

    #[test]
    fn scoping_sets_the_scope_field() {
        let plan = UploadTable::new("collectionobject")
            .scoped_by("collectionmemberid")
            .static_value("deaccessioned", false);
        let scoped = plan.apply_scoping(&collection());
        assert_eq!(scoped.static_values()["collectionmemberid"], Value::from(4));
        assert_eq!(scoped.static_values()["deaccessioned"], Value::Bool(false));
    }

    #[test]
    fn scoping_resolves_known_picklists_only() {
        let plan = UploadTable::new("preparation")
            .column("preptype", ColumnMapping::text("Prep Type").with_picklist("PrepType"))
            .column("storage", ColumnMapping::text("Storage").with_picklist("Missing"));
        let scoped = plan.apply_scoping(&collection());
        assert!(scoped.columns["preptype"].picklist.is_some());
        assert!(scoped.columns["storage"].picklist.is_none());
    }

    #[test]
    fn one_to_one_follows_relation_placement() {
        let plan = UploadTable::new("collectionobject")
            .column("catalognumber", ColumnMapping::text("Catalog Number"))
            .to_one(
                "cataloger",
                UploadTable::new("agent").column("lastname", ColumnMapping::text("Last Name")),
            )
            .to_many(
                "preparations",
                "collectionobject",
                vec![
                    UploadTable::new("preparation")
                        .column("countamt", ColumnMapping::integer("Count")),
                ],
            );
        let collection = collection();
        let row: Row = [("Catalog Number", "7"), ("Last Name", "Smith"), ("Count", "1")]
            .into_iter()
            .map(|(caption, cell)| (caption.to_string(), cell.to_string()))
            .collect();

        let bound = plan
            .apply_scoping(&collection)
            .bind(&collection, &row)
            .expect("bind");
        assert!(!bound.is_one_to_one());
        assert!(bound.to_one["cataloger"].is_one_to_one());
        assert!(!bound.to_many["preparations"].records[0].is_one_to_one());
    }

    #[test]
    fn report_info_lists_captions_in_mapping_order() {
        let plan = UploadTable::new("agent")
            .column("lastname", ColumnMapping::text("Last Name"))
            .column("firstname", ColumnMapping::text("First Name"));
        let info = plan.apply_scoping(&collection()).report_info();
        assert_eq!(info.table_name, "agent");
        assert_eq!(info.columns, ["Last Name", "First Name"]);
    }
}
