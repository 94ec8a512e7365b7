use crate::{error::SchemaError, node::Schema};

/// Reject class and property names that are not plain ASCII identifiers.
pub fn validate_identifiers(schema: &Schema, errs: &mut Vec<SchemaError>) {
    for object_schema in schema.object_schemas() {
        let class_name = object_schema.class_name();
        if let Err(reason) = check_identifier(class_name) {
            errs.push(SchemaError::invalid_class(class_name, reason));
        }

        for property in object_schema.properties() {
            if let Err(reason) = check_identifier(property.name()) {
                errs.push(SchemaError::invalid_property(
                    format!("{class_name}.{}", property.name()),
                    reason,
                ));
            }
        }
    }
}

// Names are non-empty by construction.
fn check_identifier(name: &str) -> Result<(), String> {
    if !name.is_ascii() {
        return Err(format!("'{name}' must be ASCII"));
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(format!("'{name}' must not start with a digit"));
    }
    if let Some(c) = name.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(format!("'{name}' contains invalid character '{c}'"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        node::{ObjectSchema, Property},
        types::PropertyType,
        validate::ValidateOptions,
    };

    #[test]
    fn rejects_non_identifier_names() {
        assert!(check_identifier("Person").is_ok());
        assert!(check_identifier("first_name2").is_ok());
        assert!(check_identifier("2fast").is_err());
        assert!(check_identifier("first name").is_err());
        assert!(check_identifier("Persön").is_err());
    }

    #[test]
    fn strict_mode_is_opt_in() {
        let class = ObjectSchema::new(
            "Person",
            [Property::new("first name", PropertyType::String, None).unwrap()],
        )
        .unwrap();
        let schema = Schema::new([class]).unwrap();

        assert!(schema.validate().is_ok());
        assert!(matches!(
            schema.validate_with(ValidateOptions::strict()),
            Err(SchemaError::InvalidPropertyDefinition { .. })
        ));
    }
}
