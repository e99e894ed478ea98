use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::Serialize;

use crate::record::RecordResult;
use crate::validation::RowValidation;

/// Outcome of one row: its own record result plus the results of every
/// related record, keyed by relation name in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct UploadResult {
    pub record_result: RecordResult,
    #[serde(rename = "toOne")]
    pub to_one: IndexMap<String, UploadResult>,
    #[serde(rename = "toMany")]
    pub to_many: IndexMap<String, Vec<UploadResult>>,
}

impl UploadResult {
    /// A result with no related records.
    pub fn leaf(record_result: impl Into<RecordResult>) -> Self {
        Self {
            record_result: record_result.into(),
            to_one: IndexMap::new(),
            to_many: IndexMap::new(),
        }
    }

    pub fn with_to_one(mut self, relation: impl Into<String>, result: UploadResult) -> Self {
        self.to_one.insert(relation.into(), result);
        self
    }

    pub fn with_to_many(mut self, relation: impl Into<String>, results: Vec<UploadResult>) -> Self {
        self.to_many.insert(relation.into(), results);
        self
    }

    pub fn get_id(&self) -> Option<i64> {
        self.record_result.get_id()
    }

    /// True when this record or any related record at any depth failed.
    pub fn contains_failure(&self) -> bool {
        self.record_result.is_failure()
            || self.to_one.values().any(UploadResult::contains_failure)
            || self
                .to_many
                .values()
                .flatten()
                .any(UploadResult::contains_failure)
    }

    /// Flatten the tree into one report.
    ///
    /// Each field lists this record's entries, then each to-one child's full
    /// report in insertion order, then each to-many child's in insertion order
    /// and element order.
    pub fn validation_info(&self) -> RowValidation {
        let mut report = self.record_result.validation_info();
        for child in self.to_one.values() {
            report.merge(child.validation_info());
        }
        for child in self.to_many.values().flatten() {
            report.merge(child.validation_info());
        }
        report
    }

}
