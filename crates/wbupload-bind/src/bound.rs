use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use wbupload_core::{
    Exclude, FailedBusinessRule, Filter, FilterPack, Matched, MatchedMultiple, NoMatch,
    NullRecord, PicklistAddition, RecordResult, ReportInfo, UploadResult, Uploaded,
};

use crate::errors::{Result, StoreError, UploadError};
use crate::protocol::BoundUploadable;
use crate::store::Store;

/// Picklist value found in the row but not yet in the picklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingPicklistItem {
    pub(crate) picklist: String,
    pub(crate) value: String,
    pub(crate) caption: String,
}

#[derive(Debug, Clone)]
pub(crate) struct BoundToMany {
    pub(crate) link_field: String,
    pub(crate) records: Vec<BoundUploadTable>,
}

/// An upload plan bound to one row.
#[derive(Debug, Clone)]
pub struct BoundUploadTable {
    pub(crate) table: String,
    pub(crate) info: ReportInfo,
    /// Parsed cells by field; blank cells are null.
    pub(crate) values: Filter,
    pub(crate) static_values: Filter,
    pub(crate) must_match: bool,
    pub(crate) one_to_one: bool,
    pub(crate) picklist_items: Vec<PendingPicklistItem>,
    pub(crate) to_one: IndexMap<String, BoundUploadTable>,
    pub(crate) to_many: IndexMap<String, BoundToMany>,
    pub(crate) store: Arc<dyn Store>,
}

type ToOneResults = IndexMap<String, UploadResult>;

impl BoundUploadTable {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn info(&self) -> &ReportInfo {
        &self.info
    }

    pub fn values(&self) -> &Filter {
        &self.values
    }

    /// True when no cell of this record or any related record has a value.
    pub fn is_blank(&self) -> bool {
        self.values.values().all(Value::is_null)
            && self.to_one.values().all(BoundUploadTable::is_blank)
            && self
                .to_many
                .values()
                .flat_map(|many| &many.records)
                .all(BoundUploadTable::is_blank)
    }

    fn null_result(&self) -> UploadResult {
        UploadResult {
            record_result: NullRecord {
                info: self.info.clone(),
            }
            .into(),
            to_one: self
                .to_one
                .iter()
                .map(|(relation, child)| (relation.clone(), child.null_result()))
                .collect(),
            to_many: self
                .to_many
                .iter()
                .map(|(relation, many)| {
                    let results = many.records.iter().map(BoundUploadTable::null_result);
                    (relation.clone(), results.collect::<Vec<_>>())
                })
                .collect(),
        }
    }

    fn with_link(&self, link_field: &str, parent_id: i64) -> BoundUploadTable {
        let mut linked = self.clone();
        linked
            .static_values
            .insert(link_field.to_string(), Value::from(parent_id));
        linked
    }

    /// Field values for lookups and inserts: static values, parsed cells,
    /// then to-one relation ids.
    fn record_values(&self, to_one: &ToOneResults) -> Filter {
        let mut values = self.static_values.clone();
        values.extend(self.values.iter().map(|(field, value)| (field.clone(), value.clone())));
        for (relation, result) in to_one {
            let id = result.get_id().map(Value::from).unwrap_or(Value::Null);
            values.insert(relation.clone(), id);
        }
        values
    }

    /// Packs of the to-many records, keyed under `prefix`.
    ///
    /// A relation whose records are all blank excludes candidates that have
    /// any such record; otherwise only the non-blank records constrain.
    fn to_many_pack(&self, prefix: Option<&str>) -> FilterPack {
        let mut pack = FilterPack::default();
        for (relation, many) in &self.to_many {
            let path = match prefix {
                Some(prefix) => format!("{prefix}__{relation}"),
                None => relation.clone(),
            };
            let mut filled = many.records.iter().filter(|record| !record.is_blank()).peekable();
            if filled.peek().is_none() {
                if let Some(first) = many.records.first() {
                    pack.merge(first.filter_on(&path));
                }
                continue;
            }
            for record in filled {
                pack.merge(record.filter_on(&path));
            }
        }
        pack
    }

    fn lookup(&self, to_one: &ToOneResults) -> Result<Vec<i64>> {
        let mut pack = FilterPack {
            filters: vec![self.record_values(to_one)],
            excludes: Vec::new(),
        };
        pack.merge(self.to_many_pack(None));

        let ids = self.store.find(&self.table, &pack)?;
        debug!(table = %self.table, candidates = ids.len(), "looked up candidates");
        Ok(ids)
    }

    fn match_to_one(&self) -> Result<ToOneResults> {
        self.to_one
            .iter()
            .map(|(relation, child)| Ok((relation.clone(), child.match_row()?)))
            .collect()
    }

    fn process_to_one(&self) -> Result<ToOneResults> {
        self.to_one
            .iter()
            .map(|(relation, child)| Ok((relation.clone(), child.process_row()?)))
            .collect()
    }

    /// Results of the to-many records of an existing parent, matched read-only.
    fn match_to_many(&self, parent_id: i64) -> Result<IndexMap<String, Vec<UploadResult>>> {
        self.to_many
            .iter()
            .map(|(relation, many)| {
                let results = many
                    .records
                    .iter()
                    .map(|record| record.with_link(&many.link_field, parent_id).match_row())
                    .collect::<Result<Vec<_>>>()?;
                Ok((relation.clone(), results))
            })
            .collect()
    }

    /// Results of the to-many records of a newly created parent.
    fn upload_to_many(&self, parent_id: i64) -> Result<IndexMap<String, Vec<UploadResult>>> {
        self.to_many
            .iter()
            .map(|(relation, many)| {
                let results = many
                    .records
                    .iter()
                    .map(|record| {
                        let linked = record.with_link(&many.link_field, parent_id);
                        if linked.must_match {
                            linked.match_row()
                        } else {
                            linked.force_upload_row()
                        }
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok((relation.clone(), results))
            })
            .collect()
    }

    fn outcome(&self, record_result: impl Into<RecordResult>, to_one: ToOneResults) -> UploadResult {
        UploadResult {
            record_result: record_result.into(),
            to_one,
            to_many: IndexMap::new(),
        }
    }

    fn matched(&self, id: i64, to_one: ToOneResults) -> Result<UploadResult> {
        Ok(UploadResult {
            record_result: Matched {
                id,
                info: self.info.clone(),
            }
            .into(),
            to_one,
            to_many: self.match_to_many(id)?,
        })
    }

    fn matched_multiple(&self, ids: Vec<i64>, to_one: ToOneResults) -> UploadResult {
        match MatchedMultiple::new(ids, self.info.clone()) {
            Some(multiple) => self.outcome(multiple, to_one),
            None => unreachable!("multiple match built from fewer than two candidates"),
        }
    }

    /// The first to-one relation whose own record failed; the parent can
    /// neither be looked up by it nor point at it.
    fn failed_relation(to_one: &ToOneResults) -> Option<&str> {
        to_one
            .iter()
            .find(|(_, result)| result.record_result.is_failure())
            .map(|(relation, _)| relation.as_str())
    }

    fn create(&self, to_one: ToOneResults) -> Result<UploadResult> {
        if let Some(relation) = Self::failed_relation(&to_one) {
            warn!(
                table = %self.table,
                relation = %relation,
                "skipping record: related record failed"
            );
            return Ok(self.outcome(NullRecord { info: self.info.clone() }, to_one));
        }

        let values = self.record_values(&to_one);
        let id = match self.store.create(&self.table, &values) {
            Ok(id) => id,
            Err(StoreError::BusinessRule(message)) => {
                warn!(table = %self.table, message = %message, "business rule rejected record");
                let rejected = FailedBusinessRule {
                    message,
                    info: self.info.clone(),
                };
                return Ok(self.outcome(rejected, to_one));
            }
            Err(err) => return Err(err.into()),
        };
        debug!(table = %self.table, id, "created record");

        let picklist_additions = self
            .picklist_items
            .iter()
            .map(|item| {
                let item_id = self.store.add_picklist_item(&item.picklist, &item.value)?;
                Ok(PicklistAddition {
                    name: item.picklist.clone(),
                    value: item.value.clone(),
                    caption: item.caption.clone(),
                    id: item_id,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(UploadResult {
            record_result: Uploaded {
                id,
                info: self.info.clone(),
                picklist_additions,
            }
            .into(),
            to_one,
            to_many: self.upload_to_many(id)?,
        })
    }
}

impl BoundUploadable for BoundUploadTable {
    fn is_one_to_one(&self) -> bool {
        self.one_to_one
    }

    fn must_match(&self) -> bool {
        self.must_match
    }

    fn filter_on(&self, path: &str) -> FilterPack {
        if self.is_blank() {
            return FilterPack {
                filters: Vec::new(),
                excludes: vec![Exclude {
                    lookup: path.to_string(),
                    table: self.table.clone(),
                    filter: self.static_values.clone(),
                }],
            };
        }

        let mut own: Filter = self
            .static_values
            .iter()
            .chain(&self.values)
            .map(|(field, value)| (format!("{path}__{field}"), value.clone()))
            .collect();
        let mut pack = FilterPack::default();

        for (relation, child) in &self.to_one {
            let child_path = format!("{path}__{relation}");
            if child.is_blank() {
                own.insert(child_path, Value::Null);
                continue;
            }
            let mut child_pack = child.filter_on(&child_path);
            if !child_pack.filters.is_empty() {
                own.extend(child_pack.filters.remove(0));
            }
            pack.merge(child_pack);
        }

        pack.merge(self.to_many_pack(Some(path)));
        pack.filters.insert(0, own);
        pack
    }

    fn match_row(&self) -> Result<UploadResult> {
        if self.is_blank() {
            return Ok(self.null_result());
        }

        let to_one = self.match_to_one()?;
        if let Some(relation) = Self::failed_relation(&to_one) {
            debug!(
                table = %self.table,
                relation = %relation,
                "skipping lookup: related record failed"
            );
            return Ok(self.outcome(NullRecord { info: self.info.clone() }, to_one));
        }

        let ids = self.lookup(&to_one)?;
        match ids.as_slice() {
            [] if self.must_match => Ok(self.outcome(NoMatch { info: self.info.clone() }, to_one)),
            [] => Ok(self.outcome(NullRecord { info: self.info.clone() }, to_one)),
            [id] => self.matched(*id, to_one),
            _ => Ok(self.matched_multiple(ids, to_one)),
        }
    }

    fn process_row(&self) -> Result<UploadResult> {
        if self.must_match {
            return self.match_row();
        }
        if self.is_blank() {
            return Ok(self.null_result());
        }

        let to_one = self.process_to_one()?;
        if Self::failed_relation(&to_one).is_some() {
            return self.create(to_one);
        }

        let ids = self.lookup(&to_one)?;
        match ids.as_slice() {
            [] => self.create(to_one),
            [id] => self.matched(*id, to_one),
            _ => Ok(self.matched_multiple(ids, to_one)),
        }
    }

    fn force_upload_row(&self) -> Result<UploadResult> {
        if self.must_match {
            return Err(UploadError::ForceUploadMustMatch(self.table.clone()));
        }
        if self.is_blank() {
            return Ok(self.null_result());
        }

        let to_one = self.process_to_one()?;
        self.create(to_one)
    }
}
