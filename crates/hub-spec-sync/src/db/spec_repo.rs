//! Spec repository: reads and writes rows of the per-kind spec tables.
//!
//! Every table has the same shape (`id text`, `payload jsonb`, `deleted
//! boolean`), so one gateway serves every kind and takes the table name
//! per call.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use serde_json::Value;

use super::{validate_identifier, DatabaseError, SPEC_SCHEMA};

/// Row-level access to the spec tables.
///
/// Each call is a single statement; callers never get a transaction spanning
/// several of them.
#[async_trait]
pub trait SpecStore: Send + Sync {
    /// Returns the stored payload for `id`, or `None` if no row exists.
    async fn get(&self, table: &str, id: &str) -> Result<Option<Value>, DatabaseError>;

    /// Inserts a new row. Fails if a row with `id` already exists.
    async fn insert(&self, table: &str, id: &str, payload: &Value) -> Result<(), DatabaseError>;

    /// Overwrites the payload of an existing row.
    async fn update(&self, table: &str, id: &str, payload: &Value) -> Result<(), DatabaseError>;

    /// Flags every live row whose payload names the given instance as deleted.
    ///
    /// Matches on the payload's `metadata.name` / `metadata.namespace`, since
    /// a vanished instance's uid is no longer known. Returns the number of
    /// rows flipped; rows that are already tombstoned are left alone.
    async fn mark_deleted(
        &self,
        table: &str,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<u64, DatabaseError>;
}

/// [`SpecStore`] over a shared SeaORM Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PostgresSpecStore {
    conn: Arc<DatabaseConnection>,
}

impl PostgresSpecStore {
    /// Creates a store over the tables of the `spec` schema.
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn: Arc::new(conn) }
    }

    fn qualified(&self, table: &str) -> Result<String, DatabaseError> {
        validate_identifier(table)?;
        Ok(format!("{}.{}", SPEC_SCHEMA, table))
    }

    fn statement(&self, sql: String, values: Vec<sea_orm::Value>) -> Statement {
        Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
    }
}

#[async_trait]
impl SpecStore for PostgresSpecStore {
    async fn get(&self, table: &str, id: &str) -> Result<Option<Value>, DatabaseError> {
        let sql = format!("SELECT payload FROM {} WHERE id = $1", self.qualified(table)?);
        let row = self
            .conn
            .query_one(self.statement(sql, vec![id.into()]))
            .await?;

        match row {
            Some(row) => {
                let payload: Value =
                    row.try_get("", "payload")
                        .map_err(|e| DatabaseError::MalformedPayload {
                            id: id.to_string(),
                            reason: e.to_string(),
                        })?;
                Ok(Some(payload))
            }
            None => Ok(None),
        }
    }

    async fn insert(&self, table: &str, id: &str, payload: &Value) -> Result<(), DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (id, payload) VALUES ($1, $2)",
            self.qualified(table)?
        );
        self.conn
            .execute(self.statement(sql, vec![id.into(), payload.clone().into()]))
            .await?;
        Ok(())
    }

    async fn update(&self, table: &str, id: &str, payload: &Value) -> Result<(), DatabaseError> {
        let sql = format!(
            "UPDATE {} SET payload = $1 WHERE id = $2",
            self.qualified(table)?
        );
        self.conn
            .execute(self.statement(sql, vec![payload.clone().into(), id.into()]))
            .await?;
        Ok(())
    }

    async fn mark_deleted(
        &self,
        table: &str,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<u64, DatabaseError> {
        let table = self.qualified(table)?;
        let statement = match namespace {
            Some(namespace) => self.statement(
                format!(
                    "UPDATE {} SET deleted = true WHERE payload -> 'metadata' ->> 'name' = $1 \
                     AND payload -> 'metadata' ->> 'namespace' = $2 AND deleted = false",
                    table
                ),
                vec![name.into(), namespace.into()],
            ),
            None => self.statement(
                format!(
                    "UPDATE {} SET deleted = true WHERE payload -> 'metadata' ->> 'name' = $1 \
                     AND payload -> 'metadata' ->> 'namespace' IS NULL AND deleted = false",
                    table
                ),
                vec![name.into()],
            ),
        };

        let result = self.conn.execute(statement).await?;
        Ok(result.rows_affected())
    }
}
