use crate::{
    error::SchemaError,
    node::{ObjectSchema, Property, Schema},
};
use serde::Serialize;
use std::fmt;

///
/// ClassId
/// Position of a class in a resolved schema's class table.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ClassId(usize);

impl ClassId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

///
/// Relationship
/// One resolved relationship edge.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Relationship<'a> {
    pub source: ClassId,
    pub property: &'a Property,
    pub target: ClassId,
}

///
/// ResolvedSchema
///
/// A validated schema whose relationship targets are bound to class ids.
/// This is the snapshot handed to the storage engine and binding layers;
/// it is never mutated, only replaced.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedSchema {
    schema: Schema,

    // targets[class][property], aligned with declaration order
    targets: Vec<Vec<Option<ClassId>>>,
}

impl ResolvedSchema {
    // Callers run validation first; an unresolved target here is still an error.
    pub(crate) fn from_validated(schema: Schema) -> Result<Self, SchemaError> {
        let mut targets = Vec::with_capacity(schema.len());

        for object_schema in schema.object_schemas() {
            let mut row = Vec::with_capacity(object_schema.len());
            for property in object_schema.properties() {
                let target = match property.object_class_name() {
                    Some(target) => {
                        let index = schema.index_of(target).ok_or_else(|| {
                            SchemaError::unresolved(
                                object_schema.class_name(),
                                property.name(),
                                target,
                            )
                        })?;
                        Some(ClassId(index))
                    }
                    None => None,
                };
                row.push(target);
            }
            targets.push(row);
        }

        Ok(Self { schema, targets })
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn into_schema(self) -> Schema {
        self.schema
    }

    #[must_use]
    pub fn class_id(&self, class_name: &str) -> Option<ClassId> {
        self.schema.index_of(class_name).map(ClassId)
    }

    #[must_use]
    pub fn object_schema(&self, id: ClassId) -> Option<&ObjectSchema> {
        self.schema.object_schemas().get(id.0)
    }

    #[must_use]
    pub fn object_schema_named(&self, class_name: &str) -> Option<&ObjectSchema> {
        self.schema.object_schema_named(class_name)
    }

    /// Class id a relationship property points at.
    #[must_use]
    pub fn target_id(&self, class_name: &str, property: &str) -> Option<ClassId> {
        let class = self.schema.index_of(class_name)?;
        let position = self.schema.object_schemas()[class].property_index(property)?;

        self.targets[class][position]
    }

    /// Object schema a relationship property points at.
    #[must_use]
    pub fn target(&self, class_name: &str, property: &str) -> Option<&ObjectSchema> {
        self.target_id(class_name, property)
            .and_then(|id| self.object_schema(id))
    }

    /// Every relationship edge, in class then property order.
    pub fn relationships(&self) -> impl Iterator<Item = Relationship<'_>> {
        self.schema
            .object_schemas()
            .iter()
            .zip(&self.targets)
            .enumerate()
            .flat_map(|(class, (object_schema, row))| {
                object_schema
                    .properties()
                    .iter()
                    .zip(row)
                    .filter_map(move |(property, &target)| {
                        target.map(|target| Relationship {
                            source: ClassId(class),
                            property,
                            target,
                        })
                    })
            })
    }

    /// Classes that link to `id`, without duplicates.
    #[must_use]
    pub fn referrers(&self, id: ClassId) -> Vec<ClassId> {
        let mut referrers = self
            .relationships()
            .filter(|rel| rel.target == id)
            .map(|rel| rel.source)
            .collect::<Vec<_>>();
        referrers.dedup();

        referrers
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PropertyType;

    fn person_dog() -> Schema {
        let person = ObjectSchema::new(
            "Person",
            [
                Property::new("name", PropertyType::String, None).unwrap(),
                Property::new("dogs", PropertyType::Array, Some("Dog")).unwrap(),
                Property::new("best_friend", PropertyType::Object, Some("Person")).unwrap(),
            ],
        )
        .unwrap();
        let dog = ObjectSchema::new(
            "Dog",
            [
                Property::new("name", PropertyType::String, None).unwrap(),
                Property::new("owner", PropertyType::Object, Some("Person")).unwrap(),
            ],
        )
        .unwrap();

        Schema::new([person, dog]).unwrap()
    }

    #[test]
    fn resolve_binds_targets() {
        let resolved = person_dog().resolve().unwrap();
        let dog = resolved.class_id("Dog").unwrap();

        assert_eq!(resolved.target_id("Person", "dogs"), Some(dog));
        assert_eq!(
            resolved.target("Dog", "owner").map(ObjectSchema::class_name),
            Some("Person")
        );
        assert_eq!(resolved.target_id("Person", "name"), None);
        assert_eq!(resolved.target_id("Cat", "name"), None);
    }

    #[test]
    fn relationships_in_declaration_order() {
        let resolved = person_dog().resolve().unwrap();

        let edges = resolved
            .relationships()
            .map(|rel| (rel.source.index(), rel.property.name(), rel.target.index()))
            .collect::<Vec<_>>();

        assert_eq!(
            edges,
            vec![(0, "dogs", 1), (0, "best_friend", 0), (1, "owner", 0)]
        );
    }

    #[test]
    fn referrers_are_deduplicated() {
        let resolved = person_dog().resolve().unwrap();
        let person = resolved.class_id("Person").unwrap();

        let referrers = resolved.referrers(person);
        assert_eq!(referrers.len(), 2);
    }

    #[test]
    fn resolve_rejects_unresolved_schema() {
        let schema = Schema::new([ObjectSchema::new(
            "Person",
            [Property::new("dog", PropertyType::Object, Some("Dog")).unwrap()],
        )
        .unwrap()])
        .unwrap();

        assert!(matches!(
            schema.resolve(),
            Err(SchemaError::UnresolvedRelationshipTarget { .. })
        ));
    }
}
