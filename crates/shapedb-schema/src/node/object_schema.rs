use crate::{MAX_CLASS_NAME_LEN, error::SchemaError, node::Property};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

///
/// ObjectSchema
///
/// The ordered property list for one object class.
/// Declaration order is significant: the storage engine maps it to physical
/// column order.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "ObjectSchemaRepr")]
pub struct ObjectSchema {
    class_name: String,
    properties: Vec<Property>,

    #[serde(skip)]
    primary_key: Option<usize>,
}

impl ObjectSchema {
    pub fn new(
        class_name: impl Into<String>,
        properties: impl IntoIterator<Item = Property>,
    ) -> Result<Self, SchemaError> {
        let class_name = class_name.into();
        validate_class_name(&class_name)?;

        let properties = properties.into_iter().collect::<Vec<_>>();

        let mut seen = BTreeMap::new();
        let mut primary_key: Option<usize> = None;
        for (index, property) in properties.iter().enumerate() {
            if seen.insert(property.name(), index).is_some() {
                return Err(SchemaError::DuplicatePropertyName {
                    class_name,
                    property: property.name().to_string(),
                });
            }

            if property.is_primary_key() {
                if let Some(first) = primary_key {
                    return Err(SchemaError::MultiplePrimaryKeys {
                        class_name,
                        first: properties[first].name().to_string(),
                        second: property.name().to_string(),
                    });
                }
                primary_key = Some(index);
            }
        }

        Ok(Self {
            class_name,
            properties,
            primary_key,
        })
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Look up a property by name; absence is not an error.
    #[must_use]
    pub fn property_named(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Declaration position (column order) of a property.
    #[must_use]
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name() == name)
    }

    #[must_use]
    pub fn primary_key_property(&self) -> Option<&Property> {
        self.primary_key.map(|index| &self.properties[index])
    }

    /// Relationship properties, in declaration order.
    pub fn relationships(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.is_relationship())
    }
}

impl fmt::Display for ObjectSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", self.class_name)?;
        for property in &self.properties {
            writeln!(f, "    {property}")?;
        }

        write!(f, "}}")
    }
}

///
/// ObjectSchemaRepr
///

#[derive(Deserialize)]
struct ObjectSchemaRepr {
    class_name: String,

    #[serde(default)]
    properties: Vec<Property>,
}

impl TryFrom<ObjectSchemaRepr> for ObjectSchema {
    type Error = SchemaError;

    fn try_from(repr: ObjectSchemaRepr) -> Result<Self, Self::Error> {
        Self::new(repr.class_name, repr.properties)
    }
}

fn validate_class_name(class_name: &str) -> Result<(), SchemaError> {
    if class_name.is_empty() {
        return Err(SchemaError::invalid_class(class_name, "class name is empty"));
    }
    if class_name.len() > MAX_CLASS_NAME_LEN {
        return Err(SchemaError::invalid_class(
            class_name,
            format!("class name exceeds max length {MAX_CLASS_NAME_LEN}"),
        ));
    }

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PropertyAttributes, PropertyType};
    use proptest::prelude::*;

    fn scalar(name: &str, ty: PropertyType) -> Property {
        Property::new(name, ty, None).unwrap()
    }

    fn pk(name: &str) -> Property {
        Property::with_attributes(name, PropertyType::Int, PropertyAttributes::PRIMARY_KEY, None)
            .unwrap()
    }

    proptest! {
        #[test]
        fn any_repeated_name_is_rejected(
            names in prop::collection::vec("[a-c]", 2..6),
        ) {
            let mut sorted = names.clone();
            sorted.sort();
            sorted.dedup();
            prop_assume!(sorted.len() < names.len());

            let properties = names.iter().map(|n| scalar(n, PropertyType::String));
            let err = ObjectSchema::new("Thing", properties).unwrap_err();

            let is_duplicate = matches!(err, SchemaError::DuplicatePropertyName { .. });
            prop_assert!(is_duplicate);
        }
    }

    #[test]
    fn duplicate_property_name_is_rejected() {
        let err = ObjectSchema::new(
            "Person",
            [scalar("name", PropertyType::String), scalar("name", PropertyType::Int)],
        )
        .unwrap_err();

        assert_eq!(
            err,
            SchemaError::DuplicatePropertyName {
                class_name: "Person".to_string(),
                property: "name".to_string(),
            }
        );
    }

    #[test]
    fn multiple_primary_keys_are_rejected() {
        let err = ObjectSchema::new("Person", [pk("id"), pk("other_id")]).unwrap_err();

        assert_eq!(
            err,
            SchemaError::MultiplePrimaryKeys {
                class_name: "Person".to_string(),
                first: "id".to_string(),
                second: "other_id".to_string(),
            }
        );
    }

    #[test]
    fn class_name_is_checked() {
        assert!(matches!(
            ObjectSchema::new("", Vec::<Property>::new()),
            Err(SchemaError::InvalidClassName { .. })
        ));
        assert!(ObjectSchema::new("C".repeat(MAX_CLASS_NAME_LEN + 1), Vec::<Property>::new()).is_err());
    }

    #[test]
    fn lookups_follow_declaration_order() {
        let person = ObjectSchema::new(
            "Person",
            [
                scalar("name", PropertyType::String),
                pk("id"),
                Property::new("dog", PropertyType::Object, Some("Dog")).unwrap(),
            ],
        )
        .unwrap();

        assert_eq!(person.len(), 3);
        assert_eq!(person.property_index("id"), Some(1));
        assert_eq!(person.property_named("dog").map(Property::ty), Some(PropertyType::Object));
        assert!(person.property_named("missing").is_none());
        assert_eq!(person.primary_key_property().map(Property::name), Some("id"));
        assert_eq!(
            person.relationships().map(Property::name).collect::<Vec<_>>(),
            vec!["dog"]
        );
    }

    #[test]
    fn no_primary_key_is_absent() {
        let dog = ObjectSchema::new("Dog", [scalar("name", PropertyType::String)]).unwrap();

        assert!(dog.primary_key_property().is_none());
    }

    #[test]
    fn display_lists_properties() {
        let dog = ObjectSchema::new("Dog", [scalar("name", PropertyType::String)]).unwrap();

        assert_eq!(
            dog.to_string(),
            "Dog {\n    { name: \"name\", type: string, attributes: [] }\n}"
        );
    }

    #[test]
    fn deserialization_rebuilds_primary_key() {
        let person = ObjectSchema::new("Person", [pk("id"), scalar("name", PropertyType::String)])
            .unwrap();

        let json = serde_json::to_string(&person).unwrap();
        let back: ObjectSchema = serde_json::from_str(&json).unwrap();

        assert_eq!(back, person);
        assert_eq!(back.primary_key_property().map(Property::name), Some("id"));
    }
}
