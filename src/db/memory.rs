//! In-memory catalog for running the generator without a live database

use super::{ColumnMetadata, SchemaIntrospector, PRIMARY_KEY_COLUMN};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryIntrospector {
    database: String,
    // table name -> columns in ordinal order
    tables: HashMap<String, Vec<ColumnMetadata>>,
    failing: bool,
}

impl MemoryIntrospector {
    pub fn new<S: Into<String>>(database: S) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_table<S: Into<String>>(mut self, table: S, columns: Vec<ColumnMetadata>) -> Self {
        self.tables.insert(table.into(), columns);
        self
    }

    /// Make every catalog query fail
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    fn table(&self, database: &str, table: &str) -> Result<&[ColumnMetadata]> {
        if self.failing {
            return Err(Error::DatabaseQuery("catalog unavailable".to_string()));
        }
        if database != self.database {
            return Ok(&[]);
        }
        Ok(self.tables.get(table).map(Vec::as_slice).unwrap_or(&[]))
    }
}

#[async_trait]
impl SchemaIntrospector for MemoryIntrospector {
    async fn columns(&self, database: &str, table: &str) -> Result<Vec<ColumnMetadata>> {
        Ok(self.table(database, table)?.to_vec())
    }

    async fn field_names(&self, database: &str, table: &str) -> Result<Vec<String>> {
        Ok(self
            .table(database, table)?
            .iter()
            .filter(|column| column.name != PRIMARY_KEY_COLUMN)
            .map(|column| column.name.clone())
            .collect())
    }

    async fn database_name(&self) -> Result<String> {
        Ok(self.database.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_field_names_skip_primary_key() {
        let catalog = MemoryIntrospector::new("shop").with_table(
            "orders",
            vec![
                ColumnMetadata::new("id", "bigint", ""),
                ColumnMetadata::new("total", "decimal", "order total"),
                ColumnMetadata::new("order_id", "bigint", "external id"),
            ],
        );

        let names = catalog.field_names("shop", "orders").await.unwrap();
        assert_eq!(names, vec!["total".to_string(), "order_id".to_string()]);
        assert_eq!(catalog.columns("shop", "orders").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_other_database_has_no_rows() {
        let catalog = MemoryIntrospector::new("shop")
            .with_table("orders", vec![ColumnMetadata::new("id", "int", "")]);

        assert!(catalog.columns("archive", "orders").await.unwrap().is_empty());
        assert_eq!(catalog.database_name().await.unwrap(), "shop");
    }
}
