use thiserror::Error as ThisError;

///
/// SchemaError
///
/// Structural errors raised while building or validating a schema.
/// All of them are detected at construction or validation time, never on
/// field access, and all of them are fatal to schema assembly.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum SchemaError {
    #[error("duplicate class name '{class_name}'")]
    DuplicateClassName { class_name: String },

    #[error("class '{class_name}' declares property '{property}' more than once")]
    DuplicatePropertyName { class_name: String, property: String },

    #[error("invalid class name '{class_name}': {reason}")]
    InvalidClassName { class_name: String, reason: String },

    #[error("invalid property definition '{property}': {reason}")]
    InvalidPropertyDefinition { property: String, reason: String },

    #[error("class '{class_name}' declares more than one primary key ('{first}' and '{second}')")]
    MultiplePrimaryKeys {
        class_name: String,
        first: String,
        second: String,
    },

    #[error("property '{class_name}.{property}' links to unknown class '{target}'")]
    UnresolvedRelationshipTarget {
        class_name: String,
        property: String,
        target: String,
    },
}

impl SchemaError {
    pub(crate) fn invalid_property(property: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPropertyDefinition {
            property: property.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_class(class_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidClassName {
            class_name: class_name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unresolved(
        class_name: impl Into<String>,
        property: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::UnresolvedRelationshipTarget {
            class_name: class_name.into(),
            property: property.into(),
            target: target.into(),
        }
    }
}
