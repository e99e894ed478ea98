use std::fmt;

use serde_json::{Number, Value};

use crate::plan::{ColumnMapping, FieldKind};

/// Turns a non-blank cell into a field value.
///
/// Blank cells never reach the parser. The error string becomes the cell
/// issue reported for the column.
pub trait CellParser: fmt::Debug + Send + Sync {
    fn parse(&self, mapping: &ColumnMapping, cell: &str) -> Result<Value, String>;
}

/// Parser for the plain field kinds.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCellParser;

impl CellParser for DefaultCellParser {
    fn parse(&self, mapping: &ColumnMapping, cell: &str) -> Result<Value, String> {
        match mapping.kind {
            FieldKind::Text => Ok(Value::String(cell.to_string())),
            FieldKind::Integer => cell
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| format!("value '{cell}' must be an integer")),
            FieldKind::Decimal => cell
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("value '{cell}' must be a number")),
            FieldKind::Boolean => match cell.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "0" => Ok(Value::Bool(false)),
                _ => Err(format!("value '{cell}' must be true or false")),
            },
        }
    }
}
