//! Object-schema metadata for ShapeDB: property descriptors, per-class
//! schemas, whole-schema validation, relationship resolution, and the
//! version diff that drives migrations.
//!
//! Everything here is an immutable value once constructed. Nothing performs
//! I/O; the storage engine consumes these types through the facade crate.

pub mod diff;
pub mod error;
pub mod model;
pub mod node;
pub mod types;
pub mod validate;

///
/// CONSTANTS
///

/// Maximum length (bytes) for object class names.
///
/// The storage engine prefixes class names when it names physical tables,
/// and the combined identifier must stay within 63 bytes.
pub const MAX_CLASS_NAME_LEN: usize = 57;

/// Maximum length (bytes) for property names.
pub const MAX_PROPERTY_NAME_LEN: usize = 63;

// re-exports
pub use diff::{SchemaChange, diff};
pub use error::SchemaError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        diff::{SchemaChange, diff},
        error::SchemaError,
        model::{Link, List, ObjectModel, PropertyValue, SchemaBuilder},
        node::{ClassId, ObjectSchema, Property, ResolvedSchema, Schema},
        types::{PropertyAttributes, PropertyType},
    };
}
