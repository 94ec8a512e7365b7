use crate::{
    error::SchemaError,
    node::{ObjectSchema, ResolvedSchema},
    validate::{ValidateOptions, validate_schema},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

///
/// Schema
///
/// Every object class known to one database session, keyed by class name.
/// Class order is the order the classes were supplied in; the diff uses it
/// to order migration steps.
///
/// Relationship targets are free text until `validate` or `resolve` runs.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(
    into = "Vec<ObjectSchema>",
    try_from = "Vec<ObjectSchema>"
)]
pub struct Schema {
    object_schemas: Vec<ObjectSchema>,
    by_name: BTreeMap<String, usize>,
}

impl Schema {
    pub fn new(object_schemas: impl IntoIterator<Item = ObjectSchema>) -> Result<Self, SchemaError> {
        let object_schemas = object_schemas.into_iter().collect::<Vec<_>>();

        let mut by_name = BTreeMap::new();
        for (index, object_schema) in object_schemas.iter().enumerate() {
            let class_name = object_schema.class_name();
            if by_name.insert(class_name.to_string(), index).is_some() {
                return Err(SchemaError::DuplicateClassName {
                    class_name: class_name.to_string(),
                });
            }
        }

        Ok(Self {
            object_schemas,
            by_name,
        })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn object_schema_named(&self, class_name: &str) -> Option<&ObjectSchema> {
        self.index_of(class_name).map(|index| &self.object_schemas[index])
    }

    #[must_use]
    pub fn contains(&self, class_name: &str) -> bool {
        self.by_name.contains_key(class_name)
    }

    /// Object schemas in insertion order.
    #[must_use]
    pub fn object_schemas(&self) -> &[ObjectSchema] {
        &self.object_schemas
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.object_schemas.iter().map(ObjectSchema::class_name)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.object_schemas.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.object_schemas.is_empty()
    }

    /// Check that every relationship target names a class in this schema.
    /// Pure: repeated calls give the same answer.
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.validate_with(ValidateOptions::default())
    }

    pub fn validate_with(&self, options: ValidateOptions) -> Result<(), SchemaError> {
        match validate_schema(self, options).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Every violation, in class then property order.
    #[must_use]
    pub fn validate_all(&self) -> Vec<SchemaError> {
        validate_schema(self, ValidateOptions::default())
    }

    /// Validate, then bind relationship targets to class ids.
    pub fn resolve(self) -> Result<ResolvedSchema, SchemaError> {
        self.resolve_with(ValidateOptions::default())
    }

    pub fn resolve_with(self, options: ValidateOptions) -> Result<ResolvedSchema, SchemaError> {
        self.validate_with(options)?;

        ResolvedSchema::from_validated(self)
    }

    pub(crate) fn index_of(&self, class_name: &str) -> Option<usize> {
        self.by_name.get(class_name).copied()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, object_schema) in self.object_schemas.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{object_schema}")?;
        }

        Ok(())
    }
}

impl From<Schema> for Vec<ObjectSchema> {
    fn from(schema: Schema) -> Self {
        schema.object_schemas
    }
}

impl TryFrom<Vec<ObjectSchema>> for Schema {
    type Error = SchemaError;

    fn try_from(object_schemas: Vec<ObjectSchema>) -> Result<Self, Self::Error> {
        Self::new(object_schemas)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        node::Property,
        types::{PropertyAttributes, PropertyType},
    };

    fn class(name: &str, properties: Vec<Property>) -> ObjectSchema {
        ObjectSchema::new(name, properties).unwrap()
    }

    fn string(name: &str) -> Property {
        Property::new(name, PropertyType::String, None).unwrap()
    }

    fn link(name: &str, target: &str) -> Property {
        Property::new(name, PropertyType::Object, Some(target)).unwrap()
    }

    fn list(name: &str, target: &str) -> Property {
        Property::new(name, PropertyType::Array, Some(target)).unwrap()
    }

    #[test]
    fn duplicate_class_name_is_rejected() {
        let err = Schema::new([class("Dog", vec![]), class("Dog", vec![string("name")])])
            .unwrap_err();

        assert_eq!(
            err,
            SchemaError::DuplicateClassName {
                class_name: "Dog".to_string()
            }
        );
    }

    #[test]
    fn self_relationship_resolves() {
        let schema = Schema::new([class(
            "Person",
            vec![string("name"), link("best_friend", "Person")],
        )])
        .unwrap();

        assert_eq!(schema.validate(), Ok(()));
    }

    #[test]
    fn missing_target_is_unresolved() {
        let schema =
            Schema::new([class("Person", vec![string("name"), link("dog", "Dog")])]).unwrap();

        assert_eq!(
            schema.validate(),
            Err(SchemaError::UnresolvedRelationshipTarget {
                class_name: "Person".to_string(),
                property: "dog".to_string(),
                target: "Dog".to_string(),
            })
        );
    }

    #[test]
    fn validate_is_idempotent() {
        let schema = Schema::new([class("Person", vec![link("dog", "Dog")])]).unwrap();
        let before = schema.clone();

        let first = schema.validate();
        let second = schema.validate();

        assert_eq!(first, second);
        assert_eq!(schema, before);
    }

    #[test]
    fn validate_all_reports_in_declaration_order() {
        let schema = Schema::new([
            class("Person", vec![link("dog", "Dog"), list("cats", "Cat")]),
            class("Owner", vec![link("house", "House")]),
        ])
        .unwrap();

        let targets = schema
            .validate_all()
            .into_iter()
            .map(|err| match err {
                SchemaError::UnresolvedRelationshipTarget { target, .. } => target,
                other => panic!("unexpected error {other}"),
            })
            .collect::<Vec<_>>();

        assert_eq!(targets, vec!["Dog", "Cat", "House"]);
    }

    #[test]
    fn forward_declared_target_resolves() {
        let schema = Schema::new([
            class("Person", vec![list("dogs", "Dog")]),
            class("Dog", vec![string("name")]),
        ])
        .unwrap();

        assert!(schema.validate().is_ok());
    }

    #[test]
    fn lookup_and_order() {
        let schema = Schema::new([class("B", vec![]), class("A", vec![])]).unwrap();

        assert_eq!(schema.class_names().collect::<Vec<_>>(), vec!["B", "A"]);
        assert!(schema.contains("A"));
        assert!(schema.object_schema_named("C").is_none());
        assert_eq!(schema.len(), 2);
        assert!(Schema::empty().is_empty());
    }

    #[test]
    fn serde_roundtrip_keeps_order_and_checks_duplicates() {
        let id = Property::with_attributes(
            "id",
            PropertyType::String,
            PropertyAttributes::PRIMARY_KEY,
            None,
        )
        .unwrap();
        let schema = Schema::new([
            class("Person", vec![id, link("dog", "Dog")]),
            class("Dog", vec![string("name")]),
        ])
        .unwrap();

        let json = serde_json::to_string(&schema).unwrap();
        let back: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schema);

        let dup = r#"[{"class_name":"Dog"},{"class_name":"Dog"}]"#;
        assert!(serde_json::from_str::<Schema>(dup).is_err());
    }
}
