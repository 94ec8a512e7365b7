//! ## Crate layout
//! - `schema`: property, object-schema, and schema descriptors plus the diff.
//! - `store`: the storage-engine boundary and an in-memory engine.
//! - `migrate`: opens a schema against a storage engine and applies changes.
//! - `handle`: the shared, swappable schema snapshot.
//! - `config`: TOML-backed settings.
//! - `obs`: optional migration event sink.
//!
//! `#[derive(Object)]` turns a struct into an object class.

pub use shapedb_derive::Object;
pub use shapedb_schema as schema;

pub mod config;
pub mod error;
pub mod handle;
pub mod migrate;
pub mod obs;
pub mod store;

pub use error::Error;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Object,
        config::Config,
        handle::SchemaHandle,
        migrate::Migrator,
        schema::prelude::*,
        store::{MemoryStorage, StorageEngine},
    };
}
