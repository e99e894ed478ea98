//! The three upload phases.
//!
//! A plan is scoped to a collection, the scoped plan is bound to one row, and
//! only a bound row can be matched or uploaded. Each phase is its own type, so
//! skipping a phase does not compile.

use indexmap::IndexMap;
use serde_json::Value;

use wbupload_core::{FilterPack, ParseFailures, UploadResult};

use crate::collection::Collection;
use crate::errors::Result;

/// One dataset row: column caption to cell text.
pub type Row = IndexMap<String, String>;

/// An unscoped upload plan.
pub trait Uploadable {
    type Scoped: ScopedUploadable;

    /// Resolve the plan against a collection. Never fails.
    fn apply_scoping(&self, collection: &Collection) -> Self::Scoped;

    /// Serialized form of the plan.
    fn to_json(&self) -> serde_json::Result<Value>;

    /// The plan as an upload plan document naming its base table.
    fn unparse(&self) -> serde_json::Result<Value>;
}

/// A plan resolved against a collection, ready to bind rows.
pub trait ScopedUploadable {
    type Bound: BoundUploadable;

    /// Parse the row's cells for this plan and every nested relation.
    ///
    /// Any cell issue anywhere in the plan yields `ParseFailures` carrying all
    /// of them, and no bound row.
    fn bind(
        &self,
        collection: &Collection,
        row: &Row,
    ) -> std::result::Result<Self::Bound, ParseFailures>;
}

/// A plan bound to one row.
pub trait BoundUploadable {
    /// Whether the parent holds this record as a to-one relation.
    fn is_one_to_one(&self) -> bool;

    /// Whether finding no existing record is a failure.
    fn must_match(&self) -> bool;

    /// Filters and excludes a related lookup reaching this record through
    /// `path` must apply.
    fn filter_on(&self, path: &str) -> FilterPack;

    /// Look up existing records without creating anything.
    fn match_row(&self) -> Result<UploadResult>;

    /// Match, creating the record when nothing matches.
    fn process_row(&self) -> Result<UploadResult>;

    /// Create the record without matching.
    fn force_upload_row(&self) -> Result<UploadResult>;
}
