//! Database error types.

use thiserror::Error;

/// Errors from database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error reported by SeaORM / the underlying sqlx pool.
    #[error("Database error: {0}")]
    Db(#[from] sea_orm::DbErr),

    /// A schema or table name that cannot be spliced into a statement.
    #[error("Invalid SQL identifier '{0}'")]
    InvalidIdentifier(String),

    /// The connection URL could not be built from the settings.
    #[error("Invalid database URL: {0}")]
    InvalidUrl(String),

    /// A stored payload column was not valid JSON.
    #[error("Malformed payload for id '{id}': {reason}")]
    MalformedPayload { id: String, reason: String },

    /// A migration failed to apply.
    #[error("Migration failed: {0}")]
    Migration(String),
}
