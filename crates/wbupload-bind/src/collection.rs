use std::sync::Arc;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::options::UploadOptions;
use crate::parser::{CellParser, DefaultCellParser};
use crate::store::Store;

/// Controlled vocabulary for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Picklist {
    pub name: String,
    /// Unknown values are rejected instead of added.
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub items: Vec<String>,
}

impl Picklist {
    pub fn new<I, S>(name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            read_only: false,
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn contains(&self, value: &str) -> bool {
        self.items.iter().any(|item| item == value)
    }
}

/// Collection a plan is scoped to and rows are uploaded into.
///
/// Carries the collaborators binding and uploading need: the backing store
/// and the cell parser.
#[derive(Debug, Clone)]
pub struct Collection {
    pub id: i64,
    pub name: String,
    pub picklists: IndexMap<String, Picklist>,
    pub options: UploadOptions,
    store: Arc<dyn Store>,
    parser: Arc<dyn CellParser>,
}

impl Collection {
    pub fn new(id: i64, name: impl Into<String>, store: Arc<dyn Store>) -> Self {
        Self {
            id,
            name: name.into(),
            picklists: IndexMap::new(),
            options: UploadOptions::default(),
            store,
            parser: Arc::new(DefaultCellParser),
        }
    }

    pub fn with_picklist(mut self, picklist: Picklist) -> Self {
        self.picklists.insert(picklist.name.clone(), picklist);
        self
    }

    pub fn with_options(mut self, options: UploadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn CellParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn parser(&self) -> &dyn CellParser {
        self.parser.as_ref()
    }
}
