use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use serde_json::Value;

use wbupload_core::{Exclude, Filter, FilterPack};

use crate::errors::StoreError;

/// Backing store the bound rows query and write.
///
/// Filter keys are field names; `relation__field` keys reach through
/// relations of the queried table, one `__` separated segment per hop.
pub trait Store: fmt::Debug + Send + Sync {
    /// Ids of `table` records satisfying every filter and no exclude.
    fn find(&self, table: &str, pack: &FilterPack) -> Result<Vec<i64>, StoreError>;

    /// Create a record and return its id.
    fn create(&self, table: &str, values: &Filter) -> Result<i64, StoreError>;

    /// Add a value to a picklist and return the new item id.
    fn add_picklist_item(&self, picklist: &str, value: &str) -> Result<i64, StoreError>;
}

/// A stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: i64,
    pub values: Filter,
}

#[derive(Debug, Clone)]
enum Relation {
    ToOne { table: String },
    ToMany { table: String, link_field: String },
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    records: IndexMap<String, Vec<StoredRecord>>,
    picklist_items: Vec<(i64, String, String)>,
}

impl MemoryState {
    fn table(&self, table: &str) -> &[StoredRecord] {
        self.records.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    fn record(&self, table: &str, id: i64) -> Option<&StoredRecord> {
        self.table(table).iter().find(|record| record.id == id)
    }

    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory store with declared relations and unique-field rules.
///
/// Ids are allocated from one sequence shared by all tables. Lookups return
/// ids in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    relations: IndexMap<(String, String), Relation>,
    unique_fields: Vec<(String, String)>,
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `table.relation` as a foreign key to `target`.
    pub fn with_to_one(
        mut self,
        table: impl Into<String>,
        relation: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.relations.insert(
            (table.into(), relation.into()),
            Relation::ToOne {
                table: target.into(),
            },
        );
        self
    }

    /// Declare `table.relation` as the `target` records whose `link_field`
    /// holds the id of a `table` record.
    pub fn with_to_many(
        mut self,
        table: impl Into<String>,
        relation: impl Into<String>,
        target: impl Into<String>,
        link_field: impl Into<String>,
    ) -> Self {
        self.relations.insert(
            (table.into(), relation.into()),
            Relation::ToMany {
                table: target.into(),
                link_field: link_field.into(),
            },
        );
        self
    }

    /// Reject creating a `table` record whose non-null `field` value is taken.
    pub fn with_unique(mut self, table: impl Into<String>, field: impl Into<String>) -> Self {
        self.unique_fields.push((table.into(), field.into()));
        self
    }

    pub fn records(&self, table: &str) -> Vec<StoredRecord> {
        self.lock().table(table).to_vec()
    }

    pub fn picklist_items(&self, picklist: &str) -> Vec<String> {
        self.lock()
            .picklist_items
            .iter()
            .filter(|(_, name, _)| name == picklist)
            .map(|(_, _, value)| value.clone())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records reached from `record` through one relation.
    fn hop<'s>(
        &self,
        state: &'s MemoryState,
        table: &str,
        record: &'s StoredRecord,
        relation: &str,
    ) -> Result<Vec<(String, &'s StoredRecord)>, StoreError> {
        let key = (table.to_string(), relation.to_string());
        match self.relations.get(&key) {
            Some(Relation::ToOne { table: target }) => Ok(record
                .values
                .get(relation)
                .and_then(Value::as_i64)
                .and_then(|id| state.record(target, id))
                .map(|found| (target.clone(), found))
                .into_iter()
                .collect()),
            Some(Relation::ToMany {
                table: target,
                link_field,
            }) => Ok(state
                .table(target)
                .iter()
                .filter(|child| child.values.get(link_field).and_then(Value::as_i64) == Some(record.id))
                .map(|child| (target.clone(), child))
                .collect()),
            None => Err(StoreError::Backend(format!(
                "unknown relation {table}.{relation}"
            ))),
        }
    }

    fn related<'s>(
        &self,
        state: &'s MemoryState,
        table: &str,
        record: &'s StoredRecord,
        path: &str,
    ) -> Result<Vec<(String, &'s StoredRecord)>, StoreError> {
        let mut current = vec![(table.to_string(), record)];
        for segment in path.split("__") {
            let mut next = Vec::new();
            for (table, record) in &current {
                next.extend(self.hop(state, table, record, segment)?);
            }
            current = next;
        }
        Ok(current)
    }

    fn matches(
        &self,
        state: &MemoryState,
        table: &str,
        record: &StoredRecord,
        filter: &Filter,
    ) -> Result<bool, StoreError> {
        let fields: Vec<(&str, &Value)> = filter
            .iter()
            .map(|(key, value)| (key.as_str(), value))
            .collect();
        self.satisfies(state, table, record, &fields)
    }

    /// Every key of one filter map holds for `record`.
    ///
    /// Keys sharing a first relation segment are joined once: a single related
    /// record has to satisfy all of them together.
    fn satisfies(
        &self,
        state: &MemoryState,
        table: &str,
        record: &StoredRecord,
        filter: &[(&str, &Value)],
    ) -> Result<bool, StoreError> {
        let mut joins: IndexMap<&str, Vec<(&str, &Value)>> = IndexMap::new();
        for &(key, expected) in filter {
            match key.split_once("__") {
                Some((relation, rest)) => joins.entry(relation).or_default().push((rest, expected)),
                None => {
                    if record.values.get(key).unwrap_or(&Value::Null) != expected {
                        return Ok(false);
                    }
                }
            }
        }

        for (relation, nested) in joins {
            let mut satisfied = false;
            for (target, related) in self.hop(state, table, record, relation)? {
                if self.satisfies(state, &target, related, &nested)? {
                    satisfied = true;
                    break;
                }
            }
            if !satisfied {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn excluded(
        &self,
        state: &MemoryState,
        table: &str,
        record: &StoredRecord,
        exclude: &Exclude,
    ) -> Result<bool, StoreError> {
        for (related_table, related) in self.related(state, table, record, &exclude.lookup)? {
            if related_table == exclude.table
                && self.matches(state, &related_table, related, &exclude.filter)?
            {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Store for MemoryStore {
    fn find(&self, table: &str, pack: &FilterPack) -> Result<Vec<i64>, StoreError> {
        let state = self.lock();
        let mut ids = Vec::new();

        'records: for record in state.table(table) {
            for filter in &pack.filters {
                if !self.matches(&state, table, record, filter)? {
                    continue 'records;
                }
            }
            for exclude in &pack.excludes {
                if self.excluded(&state, table, record, exclude)? {
                    continue 'records;
                }
            }
            ids.push(record.id);
        }

        Ok(ids)
    }

    fn create(&self, table: &str, values: &Filter) -> Result<i64, StoreError> {
        let mut state = self.lock();

        for (unique_table, field) in &self.unique_fields {
            if unique_table != table {
                continue;
            }
            let Some(value) = values.get(field).filter(|value| !value.is_null()) else {
                continue;
            };
            if state
                .table(table)
                .iter()
                .any(|record| record.values.get(field) == Some(value))
            {
                return Err(StoreError::BusinessRule(format!(
                    "{table} must have unique {field}"
                )));
            }
        }

        let id = state.allocate_id();
        state
            .records
            .entry(table.to_string())
            .or_default()
            .push(StoredRecord {
                id,
                values: values.clone(),
            });
        Ok(id)
    }

    fn add_picklist_item(&self, picklist: &str, value: &str) -> Result<i64, StoreError> {
        let mut state = self.lock();
        let id = state.allocate_id();
        state
            .picklist_items
            .push((id, picklist.to_string(), value.to_string()));
        Ok(id)
    }
}
