use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::upload::UploadResult;
use crate::validation::RowValidation;

/// Emit the JSON Schema for encoded upload result trees.
pub fn upload_result_json_schema() -> RootSchema {
    schema_for!(UploadResult)
}

/// Emit the JSON Schema for aggregated row validation reports.
pub fn row_validation_json_schema() -> RootSchema {
    schema_for!(RowValidation)
}
