use crate::{config::ConfigError, store::MigrationError};
use shapedb_schema::{SchemaChange, SchemaError};
use thiserror::Error as ThisError;

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("refusing {} destructive schema change(s)", .changes.len())]
    DestructiveChange { changes: Vec<SchemaChange> },

    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
