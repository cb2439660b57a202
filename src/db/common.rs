//! Column metadata and the reductions applied to catalog rows

use serde::{Deserialize, Serialize};

/// Column excluded from the fillable field list
pub const PRIMARY_KEY_COLUMN: &str = "id";

/// One row of `information_schema.COLUMNS`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    pub data_type: String,
    pub comment: String,
}

impl ColumnMetadata {
    pub fn new<N, T, C>(name: N, data_type: T, comment: C) -> Self
    where
        N: Into<String>,
        T: Into<String>,
        C: Into<String>,
    {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            comment: comment.into(),
        }
    }
}

/// Strings derived from a table's columns, ready for the stub
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSummary {
    pub comments: String,
    pub fields: String,
}

/// Docblock type for a SQL data type
pub fn alias_type(data_type: &str) -> String {
    match data_type.to_ascii_lowercase().as_str() {
        "varchar" | "char" => "string".to_string(),
        "tinyint" | "mediumint" | "bigint" => "int".to_string(),
        "timestamp" => "datetime".to_string(),
        "decimal" => "float".to_string(),
        _ => data_type.to_string(),
    }
}

/// ` * @property {type} {column} {comment}`
pub fn property_line(column: &ColumnMetadata) -> String {
    format!(
        " * @property {} {} {}",
        alias_type(&column.data_type),
        column.name,
        column.comment
    )
}

/// Docblock lines for every column, in catalog order
pub fn property_comments(columns: &[ColumnMetadata]) -> String {
    columns
        .iter()
        .map(property_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `'title', 'body'`
pub fn quoted_fields<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|name| format!("'{}'", name.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}
