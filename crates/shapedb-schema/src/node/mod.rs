//! Schema nodes: properties, object schemas, and the assembled schema.

mod object_schema;
mod property;
mod resolved;
mod schema;

pub use object_schema::ObjectSchema;
pub use property::Property;
pub use resolved::{ClassId, Relationship, ResolvedSchema};
pub use schema::Schema;
