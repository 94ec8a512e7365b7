use crate::{error::SchemaError, node::Schema};

/// Every relationship target must name a class in the same schema.
/// Errors are pushed in class order, then property declaration order.
pub fn validate_relationship_targets(schema: &Schema, errs: &mut Vec<SchemaError>) {
    for object_schema in schema.object_schemas() {
        for property in object_schema.relationships() {
            let Some(target) = property.object_class_name() else {
                continue;
            };

            if !schema.contains(target) {
                errs.push(SchemaError::unresolved(
                    object_schema.class_name(),
                    property.name(),
                    target,
                ));
            }
        }
    }
}
