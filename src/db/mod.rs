//! Schema catalog access

mod common;
mod memory;
mod mysql;

pub use common::*;
pub use memory::MemoryIntrospector;
pub use mysql::MySqlIntrospector;

use crate::config::ConnectionConfig;
use crate::error::{Error, Result};
use crate::utils::validators::validate_sql_identifier;
use async_trait::async_trait;

/// Read-only access to a database's column catalog
#[async_trait]
pub trait SchemaIntrospector: Send + Sync {
    /// Every column of `database.table` in ordinal order
    async fn columns(&self, database: &str, table: &str) -> Result<Vec<ColumnMetadata>>;

    /// Column names of `database.table` except the primary key column
    async fn field_names(&self, database: &str, table: &str) -> Result<Vec<String>>;

    /// Schema the connection is currently using
    async fn database_name(&self) -> Result<String>;
}

/// Create an introspector for a connection URL
pub async fn create_introspector(
    connection: &ConnectionConfig,
) -> Result<Box<dyn SchemaIntrospector>> {
    let url = connection.url.as_deref().unwrap_or_default();

    if url.starts_with("mysql://") || url.starts_with("mariadb://") {
        let max_connections = connection.max_connections.unwrap_or(1);
        Ok(Box::new(MySqlIntrospector::connect(url, max_connections).await?))
    } else {
        Err(Error::config(
            "Unsupported database type. The schema catalog is read from MySQL (mysql://)",
        ))
    }
}

/// Run both catalog queries for a table and reduce them for the stub.
///
/// A failed query or an empty result is logged and yields an empty string,
/// so generation still goes ahead.
pub async fn summarize(
    introspector: &dyn SchemaIntrospector,
    database: &str,
    table: &str,
) -> Result<SchemaSummary> {
    validate_sql_identifier("database", database)?;
    validate_sql_identifier("table", table)?;

    log::debug!("Reading column catalog for {}.{}", database, table);

    let comments = match introspector.columns(database, table).await {
        Ok(columns) => {
            if columns.is_empty() {
                log::warn!("No columns found for {}.{}", database, table);
            }
            property_comments(&columns)
        }
        Err(e) => {
            log::warn!("Column comment query failed for {}.{}: {}", database, table, e);
            String::new()
        }
    };

    let fields = match introspector.field_names(database, table).await {
        Ok(names) => quoted_fields(&names),
        Err(e) => {
            log::warn!("Field list query failed for {}.{}: {}", database, table, e);
            String::new()
        }
    };

    Ok(SchemaSummary { comments, fields })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blog() -> MemoryIntrospector {
        MemoryIntrospector::new("blog").with_table(
            "posts",
            vec![
                ColumnMetadata::new("id", "int", "pk"),
                ColumnMetadata::new("title", "varchar", "post title"),
            ],
        )
    }

    #[tokio::test]
    async fn test_summarize_table() {
        let summary = summarize(&blog(), "blog", "posts").await.unwrap();

        assert_eq!(summary.fields, "'title'");
        assert_eq!(
            summary.comments,
            " * @property int id pk\n * @property string title post title"
        );
    }

    #[tokio::test]
    async fn test_unknown_table_is_empty_not_fatal() {
        let summary = summarize(&blog(), "blog", "comments").await.unwrap();
        assert_eq!(summary, SchemaSummary::default());
    }

    #[tokio::test]
    async fn test_failing_catalog_is_empty_not_fatal() {
        let introspector = blog().failing();
        let summary = summarize(&introspector, "blog", "posts").await.unwrap();
        assert_eq!(summary, SchemaSummary::default());
    }

    #[tokio::test]
    async fn test_rejects_unsafe_identifiers() {
        let err = summarize(&blog(), "blog", "posts' OR '1'='1").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = summarize(&blog(), "blog;drop", "posts").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_unsupported_url() {
        let connection = ConnectionConfig {
            url: Some("postgres://localhost/blog".to_string()),
            ..ConnectionConfig::default()
        };
        let err = create_introspector(&connection).await.err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }
}
