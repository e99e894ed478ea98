use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Field name to value mapping used by lookups and inserts.
pub type Filter = IndexMap<String, serde_json::Value>;

/// Records the table and dataset columns an upload result refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportInfo {
    pub table_name: String,
    pub columns: Vec<String>,
}

impl ReportInfo {
    pub fn new<I, S>(table_name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table_name: table_name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// A new picklist item created as a side effect of uploading a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PicklistAddition {
    /// Name of the picklist receiving the new item.
    pub name: String,
    /// Value of the new item.
    pub value: String,
    /// Caption of the dataset column that produced the addition.
    pub caption: String,
    /// Id of the new picklist item.
    pub id: i64,
}

/// Secondary lookup clause: candidates related through `lookup` to a
/// `table` record matching `filter` are excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Exclude {
    pub lookup: String,
    pub table: String,
    pub filter: Filter,
}

/// Filters and excludes a related lookup applies against a bound table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FilterPack {
    pub filters: Vec<Filter>,
    pub excludes: Vec<Exclude>,
}

impl FilterPack {
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.excludes.is_empty()
    }

    /// Append the filters and excludes of another pack.
    pub fn merge(&mut self, other: FilterPack) {
        self.filters.extend(other.filters);
        self.excludes.extend(other.excludes);
    }
}
