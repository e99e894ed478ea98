use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::report::{PicklistAddition, ReportInfo};
use crate::validation::{CellIssue, NewPicklistItem, NewRow, RowValidation, TableIssue};

/// Table issue reported when a lookup finds more than one candidate.
pub const MULTIPLE_MATCH_ISSUE: &str = "Multiple records matched.";
/// Table issue reported when a must-match table finds no candidate.
pub const NO_MATCH_ISSUE: &str = "No matching record for must-match table.";

/// Canonical variant names used as wire tags, in declaration order.
pub const VARIANT_NAMES: [&str; 7] = [
    "Uploaded",
    "Matched",
    "MatchedMultiple",
    "NullRecord",
    "FailedBusinessRule",
    "NoMatch",
    "ParseFailures",
];

/// A new record was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Uploaded {
    pub id: i64,
    pub info: ReportInfo,
    pub picklist_additions: Vec<PicklistAddition>,
}

/// Exactly one existing record matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Matched {
    pub id: i64,
    pub info: ReportInfo,
}

/// Several existing records matched; the row cannot pick one.
///
/// Always holds at least two ids, kept in the order the store returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct MatchedMultiple {
    ids: Vec<i64>,
    info: ReportInfo,
}

impl MatchedMultiple {
    /// Returns `None` when fewer than two ids are given.
    pub fn new(ids: Vec<i64>, info: ReportInfo) -> Option<Self> {
        if ids.len() < 2 {
            return None;
        }
        Some(Self { ids, info })
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn info(&self) -> &ReportInfo {
        &self.info
    }
}

impl<'de> Deserialize<'de> for MatchedMultiple {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr {
            ids: Vec<i64>,
            info: ReportInfo,
        }

        let repr = Repr::deserialize(deserializer)?;
        let count = repr.ids.len();
        MatchedMultiple::new(repr.ids, repr.info).ok_or_else(|| {
            D::Error::custom(format!(
                "MatchedMultiple requires at least two ids, found {count}"
            ))
        })
    }
}

/// Nothing to upload for this record: every mapped cell was blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NullRecord {
    pub info: ReportInfo,
}

/// Record creation was rejected by a business rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FailedBusinessRule {
    pub message: String,
    pub info: ReportInfo,
}

/// A must-match table found no existing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NoMatch {
    pub info: ReportInfo,
}

/// One or more cells could not be parsed; the row never got bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ParseFailures {
    pub failures: Vec<CellIssue>,
}

/// Outcome of uploading a single record.
///
/// Encoded as a single-entry object keyed by the variant name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub enum RecordResult {
    Uploaded(Uploaded),
    Matched(Matched),
    MatchedMultiple(MatchedMultiple),
    NullRecord(NullRecord),
    FailedBusinessRule(FailedBusinessRule),
    NoMatch(NoMatch),
    ParseFailures(ParseFailures),
}

impl RecordResult {
    /// Wire tag of this variant.
    pub fn variant_name(&self) -> &'static str {
        match self {
            RecordResult::Uploaded(_) => "Uploaded",
            RecordResult::Matched(_) => "Matched",
            RecordResult::MatchedMultiple(_) => "MatchedMultiple",
            RecordResult::NullRecord(_) => "NullRecord",
            RecordResult::FailedBusinessRule(_) => "FailedBusinessRule",
            RecordResult::NoMatch(_) => "NoMatch",
            RecordResult::ParseFailures(_) => "ParseFailures",
        }
    }

    /// Id of the record this outcome refers to, if any.
    ///
    /// For multiple matches this is the first candidate id as returned by the
    /// store.
    pub fn get_id(&self) -> Option<i64> {
        match self {
            RecordResult::Uploaded(r) => Some(r.id),
            RecordResult::Matched(r) => Some(r.id),
            RecordResult::MatchedMultiple(r) => r.ids.first().copied(),
            RecordResult::NullRecord(_)
            | RecordResult::FailedBusinessRule(_)
            | RecordResult::NoMatch(_)
            | RecordResult::ParseFailures(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        match self {
            RecordResult::Uploaded(_) | RecordResult::Matched(_) | RecordResult::NullRecord(_) => {
                false
            }
            RecordResult::MatchedMultiple(_)
            | RecordResult::FailedBusinessRule(_)
            | RecordResult::NoMatch(_)
            | RecordResult::ParseFailures(_) => true,
        }
    }

    /// This record's own contribution to the row validation report.
    pub fn validation_info(&self) -> RowValidation {
        match self {
            RecordResult::Uploaded(r) => RowValidation {
                new_rows: vec![NewRow {
                    table_name: r.info.table_name.clone(),
                    columns: r.info.columns.clone(),
                    id: r.id,
                }],
                picklist_additions: r
                    .picklist_additions
                    .iter()
                    .map(|addition| NewPicklistItem {
                        name: addition.name.clone(),
                        value: addition.value.clone(),
                        column: addition.caption.clone(),
                        id: addition.id,
                    })
                    .collect(),
                ..RowValidation::default()
            },
            RecordResult::Matched(_) | RecordResult::NullRecord(_) => RowValidation::default(),
            RecordResult::MatchedMultiple(r) => table_issue(&r.info, MULTIPLE_MATCH_ISSUE),
            RecordResult::FailedBusinessRule(r) => table_issue(&r.info, &r.message),
            RecordResult::NoMatch(r) => table_issue(&r.info, NO_MATCH_ISSUE),
            RecordResult::ParseFailures(r) => RowValidation {
                cell_issues: r.failures.clone(),
                ..RowValidation::default()
            },
        }
    }
}

fn table_issue(info: &ReportInfo, issue: &str) -> RowValidation {
    RowValidation {
        table_issues: vec![TableIssue {
            table_name: info.table_name.clone(),
            columns: info.columns.clone(),
            issue: issue.to_string(),
        }],
        ..RowValidation::default()
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for RecordResult {
                fn from(value: $variant) -> Self {
                    RecordResult::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant!(
    Uploaded,
    Matched,
    MatchedMultiple,
    NullRecord,
    FailedBusinessRule,
    NoMatch,
    ParseFailures,
);
