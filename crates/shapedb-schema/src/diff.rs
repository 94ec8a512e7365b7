//! Schema comparison for migrations.
//!
//! `diff` reports the structural changes needed to go from one schema
//! version to the next. The order of the returned changes is part of the
//! contract with the storage engine's migrator:
//!
//! - classes are visited in the order they appear in the new schema
//! - inside a class, additions and changes follow the new declaration order,
//!   then removals follow the old declaration order
//! - classes only present in the old schema come last, in old order
//!
//! A brand-new class yields a single `ClassAdded`; its properties are read
//! from the new schema by the engine.

use crate::{
    node::{ObjectSchema, Property, Schema},
    types::PropertyAttributes,
};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// SchemaChange
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
#[remain::sorted]
pub enum SchemaChange {
    ClassAdded {
        class_name: String,
    },
    ClassRemoved {
        class_name: String,
    },
    PropertyAdded {
        class_name: String,
        property: Property,
    },
    PropertyChanged {
        class_name: String,
        property: String,
        old: Property,
        new: Property,
    },
    PropertyRemoved {
        class_name: String,
        property: String,
    },
}

impl SchemaChange {
    #[must_use]
    pub fn class_name(&self) -> &str {
        match self {
            Self::ClassAdded { class_name }
            | Self::ClassRemoved { class_name }
            | Self::PropertyAdded { class_name, .. }
            | Self::PropertyChanged { class_name, .. }
            | Self::PropertyRemoved { class_name, .. } => class_name,
        }
    }

    /// Whether applying the change can drop or invalidate stored data.
    #[must_use]
    pub fn is_destructive(&self) -> bool {
        match self {
            Self::ClassAdded { .. } | Self::PropertyAdded { .. } => false,
            Self::ClassRemoved { .. } | Self::PropertyRemoved { .. } => true,
            Self::PropertyChanged { old, new, .. } => {
                old.ty() != new.ty()
                    || old.object_class_name() != new.object_class_name()
                    || (new.is_required() && !old.is_required())
                    || (new.is_primary_key() && !old.is_primary_key())
            }
        }
    }

    /// Index toggles are applied in place; everything else rewrites data.
    #[must_use]
    pub fn requires_migration(&self) -> bool {
        match self {
            Self::PropertyChanged { old, new, .. } => !only_index_differs(old, new),
            _ => true,
        }
    }
}

impl fmt::Display for SchemaChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClassAdded { class_name } => write!(f, "+ class {class_name}"),
            Self::ClassRemoved { class_name } => write!(f, "- class {class_name}"),
            Self::PropertyAdded {
                class_name,
                property,
            } => write!(f, "+ {class_name}.{} {property}", property.name()),
            Self::PropertyChanged {
                class_name,
                property,
                old,
                new,
            } => write!(f, "~ {class_name}.{property} {old} -> {new}"),
            Self::PropertyRemoved {
                class_name,
                property,
            } => write!(f, "- {class_name}.{property}"),
        }
    }
}

fn only_index_differs(old: &Property, new: &Property) -> bool {
    let strip = |mut attrs: PropertyAttributes| {
        attrs.remove(PropertyAttributes::INDEXED);
        attrs
    };

    old.ty() == new.ty()
        && old.object_class_name() == new.object_class_name()
        && strip(old.attributes()) == strip(new.attributes())
}

/// Compute the ordered changes that turn `old` into `new`.
#[must_use]
pub fn diff(old: &Schema, new: &Schema) -> Vec<SchemaChange> {
    let mut changes = Vec::new();

    for new_class in new.object_schemas() {
        match old.object_schema_named(new_class.class_name()) {
            Some(old_class) => diff_class(old_class, new_class, &mut changes),
            None => changes.push(SchemaChange::ClassAdded {
                class_name: new_class.class_name().to_string(),
            }),
        }
    }

    for old_class in old.object_schemas() {
        if !new.contains(old_class.class_name()) {
            changes.push(SchemaChange::ClassRemoved {
                class_name: old_class.class_name().to_string(),
            });
        }
    }

    changes
}

fn diff_class(old: &ObjectSchema, new: &ObjectSchema, changes: &mut Vec<SchemaChange>) {
    let class_name = new.class_name();

    for new_prop in new.properties() {
        match old.property_named(new_prop.name()) {
            Some(old_prop) if old_prop == new_prop => {}
            Some(old_prop) => changes.push(SchemaChange::PropertyChanged {
                class_name: class_name.to_string(),
                property: new_prop.name().to_string(),
                old: old_prop.clone(),
                new: new_prop.clone(),
            }),
            None => changes.push(SchemaChange::PropertyAdded {
                class_name: class_name.to_string(),
                property: new_prop.clone(),
            }),
        }
    }

    for old_prop in old.properties() {
        if new.property_named(old_prop.name()).is_none() {
            changes.push(SchemaChange::PropertyRemoved {
                class_name: class_name.to_string(),
                property: old_prop.name().to_string(),
            });
        }
    }
}

///
/// TESTS
///
