use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Problem with a single dataset cell, produced by the cell parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CellIssue {
    pub column: String,
    pub issue: String,
}

impl CellIssue {
    pub fn new(column: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            issue: issue.into(),
        }
    }
}

/// Problem attributed to a whole table record rather than one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableIssue {
    pub table_name: String,
    pub columns: Vec<String>,
    pub issue: String,
}

/// A record created by the upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewRow {
    pub table_name: String,
    pub columns: Vec<String>,
    pub id: i64,
}

/// A picklist item created by the upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NewPicklistItem {
    pub name: String,
    pub value: String,
    pub column: String,
    pub id: i64,
}

/// Flat validation report for one row.
///
/// Only aggregation of an upload result tree fills it; standalone it is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RowValidation {
    pub cell_issues: Vec<CellIssue>,
    pub table_issues: Vec<TableIssue>,
    pub new_rows: Vec<NewRow>,
    pub picklist_additions: Vec<NewPicklistItem>,
}

impl RowValidation {
    /// Returns true when the report carries neither cell nor table issues.
    pub fn is_ok(&self) -> bool {
        self.cell_issues.is_empty() && self.table_issues.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.is_ok() && self.new_rows.is_empty() && self.picklist_additions.is_empty()
    }

    /// Append every field of another report after this one's entries.
    pub fn merge(&mut self, other: RowValidation) {
        self.cell_issues.extend(other.cell_issues);
        self.table_issues.extend(other.table_issues);
        self.new_rows.extend(other.new_rows);
        self.picklist_additions.extend(other.picklist_additions);
    }
}
