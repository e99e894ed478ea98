//! Binding protocol for row uploads.
//!
//! An [`UploadTable`] plan is scoped to a [`Collection`], bound to one dataset
//! row, and then matched or uploaded against the collection's [`Store`],
//! producing an [`wbupload_core::UploadResult`] tree.

pub mod bound;
pub mod collection;
pub mod driver;
pub mod errors;
pub mod options;
pub mod parser;
pub mod plan;
pub mod protocol;
pub mod schema;
pub mod scoped;
pub mod store;

pub use bound::BoundUploadTable;
pub use collection::{Collection, Picklist};
pub use driver::{UploadMode, upload_row, upload_rows};
pub use errors::{Result, StoreError, UploadError};
pub use options::UploadOptions;
pub use parser::{CellParser, DefaultCellParser};
pub use plan::{ColumnMapping, FieldKind, ToManyRelation, UploadPlan, UploadTable};
pub use protocol::{BoundUploadable, Row, ScopedUploadable, Uploadable};
pub use schema::upload_plan_json_schema;
pub use scoped::ScopedUploadTable;
pub use store::{MemoryStore, Store, StoredRecord};
