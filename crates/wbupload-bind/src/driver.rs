use serde::{Deserialize, Serialize};
use tracing::info;

use wbupload_core::UploadResult;

use crate::collection::Collection;
use crate::errors::Result;
use crate::protocol::{BoundUploadable, Row, ScopedUploadable};

/// What to do with each bound row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadMode {
    /// Look up existing records only.
    Match,
    /// Match, creating records that are not found.
    #[default]
    Process,
    /// Create records without matching.
    ForceUpload,
}

/// Bind one row and run it in `mode`.
///
/// A row that fails to bind yields a `ParseFailures` leaf rather than an
/// error.
pub fn upload_row<S: ScopedUploadable>(
    scoped: &S,
    collection: &Collection,
    row: &Row,
    mode: UploadMode,
) -> Result<UploadResult> {
    let bound = match scoped.bind(collection, row) {
        Ok(bound) => bound,
        Err(failures) => return Ok(UploadResult::leaf(failures)),
    };

    match mode {
        UploadMode::Match => bound.match_row(),
        UploadMode::Process => bound.process_row(),
        UploadMode::ForceUpload => bound.force_upload_row(),
    }
}

/// Run every row in order, stopping at the first error.
pub fn upload_rows<'r, S, I>(
    scoped: &S,
    collection: &Collection,
    rows: I,
    mode: UploadMode,
) -> Result<Vec<UploadResult>>
where
    S: ScopedUploadable,
    I: IntoIterator<Item = &'r Row>,
{
    let mut results = Vec::new();
    for (row_index, row) in rows.into_iter().enumerate() {
        let result = upload_row(scoped, collection, row, mode)?;
        info!(
            row_index,
            outcome = result.record_result.variant_name(),
            failure = result.contains_failure(),
            "row processed"
        );
        results.push(result);
    }
    info!(
        rows = results.len(),
        collection = %collection.name,
        ?mode,
        "upload finished"
    );
    Ok(results)
}
