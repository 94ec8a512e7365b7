//! Schema validation orchestration.

pub mod naming;
pub mod relation;

use crate::{error::SchemaError, node::Schema};

///
/// ValidateOptions
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ValidateOptions {
    /// Also require class and property names to be ASCII identifiers.
    pub strict_names: bool,
}

impl ValidateOptions {
    #[must_use]
    pub const fn strict() -> Self {
        Self { strict_names: true }
    }
}

/// Run schema-wide validation in a staged, deterministic order.
/// Never mutates the schema; the same input always yields the same list.
pub(crate) fn validate_schema(schema: &Schema, options: ValidateOptions) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    // Phase 1: naming rules that need no cross-class view.
    if options.strict_names {
        naming::validate_identifiers(schema, &mut errors);
    }

    // Phase 2: cross-class references.
    relation::validate_relationship_targets(schema, &mut errors);

    errors
}
