use crate::{
    MAX_PROPERTY_NAME_LEN,
    error::SchemaError,
    types::{PropertyAttributes, PropertyType},
};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Property
///
/// One field descriptor on an object class.
/// Immutable once built; structural equality covers every field, which is
/// what the schema diff compares.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "PropertyRepr")]
pub struct Property {
    name: String,

    #[serde(rename = "type")]
    ty: PropertyType,

    attributes: PropertyAttributes,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    object_class_name: Option<String>,
}

impl Property {
    /// Build a property with no attributes.
    pub fn new(
        name: impl Into<String>,
        ty: PropertyType,
        object_class_name: Option<&str>,
    ) -> Result<Self, SchemaError> {
        Self::with_attributes(name, ty, PropertyAttributes::NONE, object_class_name)
    }

    /// Build a property, checking the name, the relationship target, and the
    /// attribute set against the type.
    pub fn with_attributes(
        name: impl Into<String>,
        ty: PropertyType,
        attributes: PropertyAttributes,
        object_class_name: Option<&str>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();

        validate_name(&name)?;
        let object_class_name = validate_target(&name, ty, object_class_name)?;
        validate_attributes(&name, ty, attributes)?;

        Ok(Self {
            name,
            ty,
            attributes,
            object_class_name,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn ty(&self) -> PropertyType {
        self.ty
    }

    #[must_use]
    pub const fn attributes(&self) -> PropertyAttributes {
        self.attributes
    }

    /// Target class for relationship properties; `None` for everything else.
    #[must_use]
    pub fn object_class_name(&self) -> Option<&str> {
        self.object_class_name.as_deref()
    }

    #[must_use]
    pub const fn is_relationship(&self) -> bool {
        self.ty.is_relationship()
    }

    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.attributes.is_primary_key()
    }

    #[must_use]
    pub const fn is_indexed(&self) -> bool {
        self.attributes.is_indexed()
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.attributes.is_required()
    }

    #[must_use]
    pub const fn is_optional(&self) -> bool {
        !self.is_required()
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ name: {:?}, type: {}, attributes: {}",
            self.name, self.ty, self.attributes
        )?;
        if let Some(target) = &self.object_class_name {
            write!(f, ", object_class_name: {target:?}")?;
        }

        write!(f, " }}")
    }
}

///
/// PropertyRepr
/// Unchecked wire shape; deserialization funnels through the constructor.
///

#[derive(Deserialize)]
struct PropertyRepr {
    name: String,

    #[serde(rename = "type")]
    ty: PropertyType,

    #[serde(default)]
    attributes: PropertyAttributes,

    #[serde(default)]
    object_class_name: Option<String>,
}

impl TryFrom<PropertyRepr> for Property {
    type Error = SchemaError;

    fn try_from(repr: PropertyRepr) -> Result<Self, Self::Error> {
        Self::with_attributes(
            repr.name,
            repr.ty,
            repr.attributes,
            repr.object_class_name.as_deref(),
        )
    }
}

// validate_name
fn validate_name(name: &str) -> Result<(), SchemaError> {
    if name.is_empty() {
        return Err(SchemaError::invalid_property(name, "name is empty"));
    }
    if name.len() > MAX_PROPERTY_NAME_LEN {
        return Err(SchemaError::invalid_property(
            name,
            format!("name exceeds max length {MAX_PROPERTY_NAME_LEN}"),
        ));
    }

    Ok(())
}

// Relationship types need a non-empty target; nothing else may carry one.
fn validate_target(
    name: &str,
    ty: PropertyType,
    object_class_name: Option<&str>,
) -> Result<Option<String>, SchemaError> {
    match (ty.is_relationship(), object_class_name) {
        (true, Some(target)) if !target.is_empty() => Ok(Some(target.to_string())),
        (true, _) => Err(SchemaError::invalid_property(
            name,
            format!("{ty} property requires an object class name"),
        )),
        (false, Some(target)) => Err(SchemaError::invalid_property(
            name,
            format!("{ty} property cannot link to class '{target}'"),
        )),
        (false, None) => Ok(None),
    }
}

fn validate_attributes(
    name: &str,
    ty: PropertyType,
    attributes: PropertyAttributes,
) -> Result<(), SchemaError> {
    if !attributes.is_consistent() {
        return Err(SchemaError::invalid_property(
            name,
            format!("primary key must also be required and indexed, got {attributes}"),
        ));
    }
    if attributes.is_primary_key() && !ty.supports_primary_key() {
        return Err(SchemaError::invalid_property(
            name,
            format!("{ty} property cannot be a primary key"),
        ));
    }
    if attributes.is_indexed() && !ty.supports_index() {
        return Err(SchemaError::invalid_property(
            name,
            format!("{ty} property cannot be indexed"),
        ));
    }
    if attributes.is_required() && !ty.supports_required() {
        return Err(SchemaError::invalid_property(
            name,
            format!("{ty} property cannot be required"),
        ));
    }

    Ok(())
}

///
/// TESTS
///
