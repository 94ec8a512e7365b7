//! Reflection over statically typed object models.
//!
//! A Rust struct becomes an object class by implementing `ObjectModel`,
//! usually through `#[derive(Object)]`. Each field type maps onto a
//! `PropertyType` through `PropertyValue`.

use crate::{
    error::SchemaError,
    node::{ObjectSchema, Property, Schema},
    types::{PropertyAttributes, PropertyType},
};
use chrono::{DateTime, Utc};
use std::ops::{Deref, DerefMut};

///
/// ObjectModel
///

pub trait ObjectModel {
    /// Class name used in the schema and as a relationship target.
    const CLASS_NAME: &'static str;

    fn object_schema() -> Result<ObjectSchema, SchemaError>;
}

///
/// PropertyValue
///
/// Maps a Rust field type onto a storable kind.
///

pub trait PropertyValue {
    const TYPE: PropertyType;

    /// Whether the value can never be absent.
    const REQUIRED: bool = true;

    fn object_class_name() -> Option<&'static str> {
        None
    }
}

macro_rules! impl_property_value {
    ($ty:ty => $kind:ident) => {
        impl PropertyValue for $ty {
            const TYPE: PropertyType = PropertyType::$kind;
        }
    };
    ($ty:ty => $kind:ident, optional) => {
        impl PropertyValue for $ty {
            const TYPE: PropertyType = PropertyType::$kind;
            const REQUIRED: bool = false;
        }
    };
}

impl_property_value!(i8 => Int);
impl_property_value!(i16 => Int);
impl_property_value!(i32 => Int);
impl_property_value!(i64 => Int);
impl_property_value!(u8 => Int);
impl_property_value!(u16 => Int);
impl_property_value!(u32 => Int);
impl_property_value!(bool => Bool);
impl_property_value!(f32 => Float);
impl_property_value!(f64 => Double);
impl_property_value!(String => String);
impl_property_value!(Vec<u8> => Data);
impl_property_value!(DateTime<Utc> => Date);
impl_property_value!(serde_json::Value => Mixed, optional);

impl<T: PropertyValue> PropertyValue for Option<T> {
    const TYPE: PropertyType = T::TYPE;
    const REQUIRED: bool = false;

    fn object_class_name() -> Option<&'static str> {
        T::object_class_name()
    }
}

///
/// Link
/// Single relationship to another object class; always nullable.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Link<T>(Option<Box<T>>);

impl<T> Link<T> {
    #[must_use]
    pub fn new(target: T) -> Self {
        Self(Some(Box::new(target)))
    }

    #[must_use]
    pub const fn null() -> Self {
        Self(None)
    }

    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.0.as_deref()
    }

    pub fn set(&mut self, target: Option<T>) {
        self.0 = target.map(Box::new);
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.0.is_none()
    }
}

impl<T> Default for Link<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ObjectModel> PropertyValue for Link<T> {
    const TYPE: PropertyType = PropertyType::Object;
    const REQUIRED: bool = false;

    fn object_class_name() -> Option<&'static str> {
        Some(T::CLASS_NAME)
    }
}

///
/// List
/// List relationship to another object class.
///

#[derive(Clone, Debug, PartialEq)]
pub struct List<T>(Vec<T>);

impl<T> List<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for List<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for List<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: ObjectModel> PropertyValue for List<T> {
    const TYPE: PropertyType = PropertyType::Array;
    const REQUIRED: bool = false;

    fn object_class_name() -> Option<&'static str> {
        Some(T::CLASS_NAME)
    }
}

/// Build the property descriptor for a field of type `V`.
///
/// Non-optional field types add `REQUIRED`; asking for `REQUIRED` (or a
/// primary key) on an optional field type is rejected.
pub fn reflect_property<V: PropertyValue>(
    name: &str,
    attributes: PropertyAttributes,
) -> Result<Property, SchemaError> {
    if attributes.is_required() && !V::REQUIRED {
        return Err(SchemaError::invalid_property(
            name,
            format!("optional {} field cannot be required", V::TYPE),
        ));
    }

    let mut attributes = attributes;
    if V::REQUIRED {
        attributes.insert(PropertyAttributes::REQUIRED);
    }

    Property::with_attributes(name, V::TYPE, attributes, V::object_class_name())
}

///
/// SchemaBuilder
/// Assembles a schema from reflected models and explicit object schemas.
///

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    object_schemas: Vec<ObjectSchema>,
}

impl SchemaBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: ObjectModel>(&mut self) -> Result<&mut Self, SchemaError> {
        self.object_schemas.push(T::object_schema()?);

        Ok(self)
    }

    pub fn push(&mut self, object_schema: ObjectSchema) -> &mut Self {
        self.object_schemas.push(object_schema);

        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        Schema::new(self.object_schemas)
    }
}

///
/// TESTS
///
