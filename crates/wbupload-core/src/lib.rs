//! Row upload outcome model.
//!
//! This crate defines the per-record outcome taxonomy, the upload result tree
//! that mirrors a row's related records, the flattening of that tree into a
//! row validation report, and the tagged wire codec for both.

pub mod codec;
pub mod error;
pub mod record;
pub mod report;
pub mod schema;
pub mod upload;
pub mod validation;

pub use error::{CodecError, Result};
pub use record::{
    FailedBusinessRule, MULTIPLE_MATCH_ISSUE, Matched, MatchedMultiple, NO_MATCH_ISSUE, NoMatch,
    NullRecord, ParseFailures, RecordResult, Uploaded, VARIANT_NAMES,
};
pub use report::{Exclude, Filter, FilterPack, PicklistAddition, ReportInfo};
pub use schema::{row_validation_json_schema, upload_result_json_schema};
pub use upload::UploadResult;
pub use validation::{CellIssue, NewPicklistItem, NewRow, RowValidation, TableIssue};
