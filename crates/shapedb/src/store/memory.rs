use super::{MigrationError, StorageEngine};
use shapedb_schema::{
    SchemaChange,
    node::{Property, Schema},
};
use std::collections::BTreeMap;

///
/// MemoryStorage
///
/// In-memory storage engine. Changes are replayed against a working copy of
/// the committed schema; the copy is committed only if every change applies
/// and the result matches the requested schema.
///

#[derive(Debug, Default)]
pub struct MemoryStorage {
    schema: Schema,
    history: Vec<Vec<SchemaChange>>,
    fail_next: Option<String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Every committed change batch, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Vec<SchemaChange>] {
        &self.history
    }

    /// Make the next `apply_schema` call fail without touching storage.
    pub fn fail_next_apply(&mut self, reason: impl Into<String>) {
        self.fail_next = Some(reason.into());
    }
}

impl StorageEngine for MemoryStorage {
    fn persisted_schema(&self) -> Schema {
        self.schema.clone()
    }

    fn apply_schema(
        &mut self,
        schema: &Schema,
        changes: &[SchemaChange],
    ) -> Result<(), MigrationError> {
        if let Some(reason) = self.fail_next.take() {
            return Err(MigrationError::failed(reason));
        }

        let working = replay(&self.schema, schema, changes)?;
        ensure_matches(&working, schema)?;

        // commit
        self.schema = schema.clone();
        self.history.push(changes.to_vec());

        Ok(())
    }
}

type Working = BTreeMap<String, Vec<Property>>;

// Apply each change to a copy of the committed classes.
fn replay(
    committed: &Schema,
    target: &Schema,
    changes: &[SchemaChange],
) -> Result<Working, MigrationError> {
    let mut working: Working = committed
        .object_schemas()
        .iter()
        .map(|os| (os.class_name().to_string(), os.properties().to_vec()))
        .collect();

    for change in changes {
        match change {
            SchemaChange::ClassAdded { class_name } => {
                let object_schema = target.object_schema_named(class_name).ok_or_else(|| {
                    MigrationError::failed(format!("added class '{class_name}' is not in target"))
                })?;
                if working
                    .insert(class_name.clone(), object_schema.properties().to_vec())
                    .is_some()
                {
                    return Err(MigrationError::failed(format!(
                        "class '{class_name}' already exists"
                    )));
                }
            }
            SchemaChange::ClassRemoved { class_name } => {
                if working.remove(class_name).is_none() {
                    return Err(MigrationError::failed(format!(
                        "cannot remove missing class '{class_name}'"
                    )));
                }
            }
            SchemaChange::PropertyAdded {
                class_name,
                property,
            } => {
                let properties = class_mut(&mut working, class_name)?;
                if properties.iter().any(|p| p.name() == property.name()) {
                    return Err(MigrationError::failed(format!(
                        "property '{class_name}.{}' already exists",
                        property.name()
                    )));
                }
                properties.push(property.clone());
            }
            SchemaChange::PropertyChanged {
                class_name,
                property,
                old,
                new,
            } => {
                let properties = class_mut(&mut working, class_name)?;
                let slot = properties
                    .iter_mut()
                    .find(|p| p.name() == property)
                    .filter(|p| *p == old)
                    .ok_or_else(|| {
                        MigrationError::failed(format!(
                            "property '{class_name}.{property}' does not match its old definition"
                        ))
                    })?;
                *slot = new.clone();
            }
            SchemaChange::PropertyRemoved {
                class_name,
                property,
            } => {
                let properties = class_mut(&mut working, class_name)?;
                let before = properties.len();
                properties.retain(|p| p.name() != property);
                if properties.len() == before {
                    return Err(MigrationError::failed(format!(
                        "cannot remove missing property '{class_name}.{property}'"
                    )));
                }
            }
        }
    }

    Ok(working)
}

fn class_mut<'a>(
    working: &'a mut Working,
    class_name: &str,
) -> Result<&'a mut Vec<Property>, MigrationError> {
    working
        .get_mut(class_name)
        .ok_or_else(|| MigrationError::failed(format!("unknown class '{class_name}'")))
}

// The replayed classes must hold exactly the target's properties.
// Column order comes from the target schema.
fn ensure_matches(working: &Working, target: &Schema) -> Result<(), MigrationError> {
    if working.len() != target.len() {
        return Err(MigrationError::failed(
            "changes do not produce the requested class set",
        ));
    }

    for object_schema in target.object_schemas() {
        let class_name = object_schema.class_name();
        let Some(properties) = working.get(class_name) else {
            return Err(MigrationError::failed(format!(
                "class '{class_name}' missing after migration"
            )));
        };

        let complete = properties.len() == object_schema.len()
            && object_schema
                .properties()
                .iter()
                .all(|p| properties.contains(p));
        if !complete {
            return Err(MigrationError::failed(format!(
                "class '{class_name}' does not match the requested schema after migration"
            )));
        }
    }

    Ok(())
}

///
/// TESTS
///
