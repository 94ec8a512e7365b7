#![allow(dead_code)]

use chrono::{DateTime, Utc};
use shapedb::{Object, schema::prelude::*};

///
/// Person
///

#[derive(Object)]
struct Person {
    #[shapedb(primary_key)]
    id: String,

    #[shapedb(indexed)]
    name: String,

    age: Option<i64>,
    best_friend: Link<Person>,
    dogs: List<Dog>,

    #[shapedb(ignore)]
    cache: Vec<String>,
}

///
/// Dog
///

#[derive(Object)]
#[shapedb(class_name = "Canine")]
struct Dog {
    #[shapedb(rename = "dog_name")]
    name: String,

    born: DateTime<Utc>,
    picture: Option<Vec<u8>>,
    weight: f64,
    good: bool,
}

///
/// Tagged
///

#[derive(Object)]
struct Tagged<T> {
    value: T,
}

#[test]
fn derive_maps_fields_in_declaration_order() {
    let person = Person::object_schema().unwrap();

    assert_eq!(person.class_name(), "Person");
    assert_eq!(
        person.properties().iter().map(Property::name).collect::<Vec<_>>(),
        vec!["id", "name", "age", "best_friend", "dogs"]
    );
    assert_eq!(person.primary_key_property().map(Property::name), Some("id"));

    let name = person.property_named("name").unwrap();
    assert!(name.is_indexed());
    assert!(name.is_required());

    let age = person.property_named("age").unwrap();
    assert_eq!(age.ty(), PropertyType::Int);
    assert!(age.is_optional());
}

#[test]
fn derive_links_use_target_class_name() {
    let person = Person::object_schema().unwrap();

    let friend = person.property_named("best_friend").unwrap();
    assert_eq!(friend.ty(), PropertyType::Object);
    assert_eq!(friend.object_class_name(), Some("Person"));

    let dogs = person.property_named("dogs").unwrap();
    assert_eq!(dogs.ty(), PropertyType::Array);
    assert_eq!(dogs.object_class_name(), Some("Canine"));
}

#[test]
fn derive_honours_class_name_and_rename() {
    let dog = Dog::object_schema().unwrap();

    assert_eq!(Dog::CLASS_NAME, "Canine");
    assert!(dog.property_named("name").is_none());
    assert_eq!(
        dog.property_named("dog_name").map(Property::ty),
        Some(PropertyType::String)
    );
    assert_eq!(dog.property_named("born").map(Property::ty), Some(PropertyType::Date));
    assert!(dog.property_named("picture").unwrap().is_optional());
    assert_eq!(dog.property_named("weight").map(Property::ty), Some(PropertyType::Double));
    assert_eq!(dog.property_named("good").map(Property::ty), Some(PropertyType::Bool));
}

#[test]
fn derive_supports_generic_structs() {
    let tagged = Tagged::<i32>::object_schema().unwrap();

    assert_eq!(tagged.class_name(), "Tagged");
    assert_eq!(tagged.property_named("value").map(Property::ty), Some(PropertyType::Int));
}

#[test]
fn derived_models_assemble_into_a_valid_schema() {
    let mut builder = SchemaBuilder::new();
    builder.register::<Person>().unwrap().register::<Dog>().unwrap();
    let schema = builder.build().unwrap();

    assert!(schema.validate().is_ok());

    let resolved = schema.resolve().unwrap();
    assert_eq!(
        resolved.target("Person", "dogs").map(ObjectSchema::class_name),
        Some("Canine")
    );
}

#[test]
fn missing_model_leaves_link_unresolved() {
    let mut builder = SchemaBuilder::new();
    builder.register::<Person>().unwrap();
    let schema = builder.build().unwrap();

    assert_eq!(
        schema.validate(),
        Err(SchemaError::UnresolvedRelationshipTarget {
            class_name: "Person".to_string(),
            property: "dogs".to_string(),
            target: "Canine".to_string(),
        })
    );
}
