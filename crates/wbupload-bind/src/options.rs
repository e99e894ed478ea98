use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Options that control how rows are read and bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadOptions {
    /// Strip surrounding whitespace from cells before parsing.
    pub trim_cells: bool,
    /// Cell texts treated as blank.
    pub null_values: Vec<String>,
    /// Add unknown values to editable picklists instead of rejecting them.
    pub add_picklist_items: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            trim_cells: true,
            null_values: vec![String::new()],
            add_picklist_items: true,
        }
    }
}

impl UploadOptions {
    /// Load options from TOML; missing keys keep their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn is_null(&self, cell: &str) -> bool {
        self.null_values.iter().any(|null| null == cell)
    }
}
