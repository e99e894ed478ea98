use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::plan::UploadTable;

/// Emit the JSON Schema for serialized upload plans.
pub fn upload_plan_json_schema() -> RootSchema {
    schema_for!(UploadTable)
}
