//! Storage-engine boundary.
//!
//! The engine owns the persisted schema and applies structural changes
//! transactionally. This crate never sees file formats or transactions;
//! it only reads the committed schema and hands over ordered changes.

mod memory;

pub use memory::MemoryStorage;

use shapedb_schema::{SchemaChange, node::Schema};
use thiserror::Error as ThisError;

///
/// MigrationError
/// Opaque failure surfaced by the storage engine.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MigrationError {
    #[error("migration failed: {reason}")]
    MigrationFailed { reason: String },
}

impl MigrationError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::MigrationFailed {
            reason: reason.into(),
        }
    }
}

///
/// StorageEngine
///

pub trait StorageEngine {
    /// The schema currently committed to storage; empty on first open.
    fn persisted_schema(&self) -> Schema;

    /// Apply `changes` (in order) so that storage matches `schema`,
    /// including its class and column order. `changes` is empty when only
    /// the order differs. Either everything commits or nothing does.
    fn apply_schema(
        &mut self,
        schema: &Schema,
        changes: &[SchemaChange],
    ) -> Result<(), MigrationError>;
}
