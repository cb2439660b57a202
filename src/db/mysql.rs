//! MySQL catalog introspection

use super::{ColumnMetadata, SchemaIntrospector, PRIMARY_KEY_COLUMN};
use crate::error::{Error, Result};
use async_trait::async_trait;
use sqlx::{MySql, Pool, Row};

const COLUMNS_QUERY: &str = r#"
    SELECT
        CAST(c.COLUMN_NAME AS CHAR) as column_name,
        CAST(c.DATA_TYPE AS CHAR) as data_type,
        CAST(c.COLUMN_COMMENT AS CHAR) as column_comment
    FROM information_schema.COLUMNS c
    WHERE c.TABLE_SCHEMA = ? AND c.TABLE_NAME = ?
    ORDER BY c.ORDINAL_POSITION
"#;

const FIELD_NAMES_QUERY: &str = r#"
    SELECT
        CAST(c.COLUMN_NAME AS CHAR) as column_name
    FROM information_schema.COLUMNS c
    WHERE c.TABLE_SCHEMA = ? AND c.TABLE_NAME = ? AND c.COLUMN_NAME <> ?
    ORDER BY c.ORDINAL_POSITION
"#;

pub struct MySqlIntrospector {
    pool: Pool<MySql>,
}

impl MySqlIntrospector {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = sqlx::mysql::MySqlPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(database_url)
            .await
            .map_err(|e| Error::DatabaseConnection(e.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl SchemaIntrospector for MySqlIntrospector {
    async fn columns(&self, database: &str, table: &str) -> Result<Vec<ColumnMetadata>> {
        let rows = sqlx::query(COLUMNS_QUERY)
            .bind(database)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            columns.push(ColumnMetadata {
                name: row.try_get("column_name")?,
                data_type: row.try_get("data_type")?,
                comment: row
                    .try_get::<Option<String>, _>("column_comment")?
                    .unwrap_or_default(),
            });
        }

        Ok(columns)
    }

    async fn field_names(&self, database: &str, table: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(FIELD_NAMES_QUERY)
            .bind(database)
            .bind(table)
            .bind(PRIMARY_KEY_COLUMN)
            .fetch_all(&self.pool)
            .await?;

        let mut names = Vec::with_capacity(rows.len());
        for row in rows {
            names.push(row.try_get("column_name")?);
        }

        Ok(names)
    }

    async fn database_name(&self) -> Result<String> {
        let row = sqlx::query("SELECT DATABASE() as db_name")
            .fetch_one(&self.pool)
            .await?;

        let db_name: Option<String> = row.try_get("db_name")?;
        db_name.ok_or_else(|| {
            Error::config("The connection has no default database; set `database` for the connection")
        })
    }
}
