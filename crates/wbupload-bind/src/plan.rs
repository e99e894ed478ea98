use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use wbupload_core::Filter;

use crate::errors::{Result, UploadError};

/// Value type a mapped column is parsed into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Integer,
    Decimal,
    Boolean,
}

/// How one table field is read from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnMapping {
    /// Caption of the dataset column holding the value.
    pub column: String,
    #[serde(default)]
    pub kind: FieldKind,
    /// Picklist restricting the values of this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picklist: Option<String>,
}

impl ColumnMapping {
    pub fn new(column: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            column: column.into(),
            kind,
            picklist: None,
        }
    }

    pub fn text(column: impl Into<String>) -> Self {
        Self::new(column, FieldKind::Text)
    }

    pub fn integer(column: impl Into<String>) -> Self {
        Self::new(column, FieldKind::Integer)
    }

    pub fn decimal(column: impl Into<String>) -> Self {
        Self::new(column, FieldKind::Decimal)
    }

    pub fn boolean(column: impl Into<String>) -> Self {
        Self::new(column, FieldKind::Boolean)
    }

    pub fn with_picklist(mut self, picklist: impl Into<String>) -> Self {
        self.picklist = Some(picklist.into());
        self
    }
}

/// Records of a to-many relation and the field linking them to the parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToManyRelation {
    /// Field on each related record holding the parent id.
    pub link_field: String,
    pub records: Vec<UploadTable>,
}

/// Upload plan for one table and the related tables a row maps onto.
///
/// To-one relation names double as the foreign-key field on this table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UploadTable {
    pub table: String,
    /// Field name to dataset column mapping, in report order.
    #[serde(default)]
    pub columns: IndexMap<String, ColumnMapping>,
    /// Values set on every record regardless of the row.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub static_values: Filter,
    /// Field set to the collection id when the plan is scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_field: Option<String>,
    /// Existing records only; finding none is a failure.
    #[serde(default)]
    pub must_match: bool,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub to_one: IndexMap<String, UploadTable>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub to_many: IndexMap<String, ToManyRelation>,
}

impl UploadTable {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: IndexMap::new(),
            static_values: Filter::new(),
            scope_field: None,
            must_match: false,
            to_one: IndexMap::new(),
            to_many: IndexMap::new(),
        }
    }

    pub fn column(mut self, field: impl Into<String>, mapping: ColumnMapping) -> Self {
        self.columns.insert(field.into(), mapping);
        self
    }

    pub fn static_value(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.static_values.insert(field.into(), value.into());
        self
    }

    pub fn scoped_by(mut self, field: impl Into<String>) -> Self {
        self.scope_field = Some(field.into());
        self
    }

    pub fn must_match(mut self) -> Self {
        self.must_match = true;
        self
    }

    pub fn to_one(mut self, relation: impl Into<String>, table: UploadTable) -> Self {
        self.to_one.insert(relation.into(), table);
        self
    }

    pub fn to_many(
        mut self,
        relation: impl Into<String>,
        link_field: impl Into<String>,
        records: Vec<UploadTable>,
    ) -> Self {
        self.to_many.insert(
            relation.into(),
            ToManyRelation {
                link_field: link_field.into(),
                records,
            },
        );
        self
    }
}

/// Upload plan document: the base table and the plan rooted at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadPlan {
    pub base_table_name: String,
    pub uploadable: UploadTable,
}

impl UploadTable {
    /// Read a plan document, the inverse of `Uploadable::unparse`.
    pub fn parse_plan(document: &Value) -> Result<UploadTable> {
        let plan = UploadPlan::deserialize(document)
            .map_err(|err| UploadError::InvalidPlan(err.to_string()))?;
        if plan.base_table_name != plan.uploadable.table {
            return Err(UploadError::InvalidPlan(format!(
                "base table {} does not match uploadable table {}",
                plan.base_table_name, plan.uploadable.table
            )));
        }
        Ok(plan.uploadable)
    }
}
