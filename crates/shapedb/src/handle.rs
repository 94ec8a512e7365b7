use shapedb_schema::node::ResolvedSchema;
use std::sync::{Arc, PoisonError, RwLock};

///
/// SchemaHandle
///
/// Explicit snapshot handle threaded through every schema consumer.
/// Readers clone the current `Arc` and keep a whole snapshot for as long as
/// they hold it; a migration swaps in a new snapshot in one step.
///

#[derive(Debug)]
pub struct SchemaHandle {
    current: RwLock<Arc<ResolvedSchema>>,
}

impl SchemaHandle {
    #[must_use]
    pub fn new(schema: ResolvedSchema) -> Self {
        Self {
            current: RwLock::new(Arc::new(schema)),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn load(&self) -> Arc<ResolvedSchema> {
        // the guarded value is a single Arc, so a poisoned lock still holds a whole snapshot
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);

        Arc::clone(&guard)
    }

    /// Install a new snapshot and return the previous one.
    pub fn replace(&self, schema: ResolvedSchema) -> Arc<ResolvedSchema> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);

        std::mem::replace(&mut *guard, Arc::new(schema))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use shapedb_schema::{
        node::{ObjectSchema, Property, Schema},
        types::PropertyType,
    };
    use std::thread;

    fn resolved(classes: &[&str]) -> ResolvedSchema {
        let classes = classes.iter().map(|name| {
            ObjectSchema::new(
                *name,
                [Property::new("name", PropertyType::String, None).unwrap()],
            )
            .unwrap()
        });

        Schema::new(classes).unwrap().resolve().unwrap()
    }

    #[test]
    fn readers_keep_their_snapshot_across_replace() {
        let handle = SchemaHandle::new(resolved(&["Person"]));
        let before = handle.load();

        let previous = handle.replace(resolved(&["Person", "Dog"]));

        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(before.schema().len(), 1);
        assert_eq!(handle.load().schema().len(), 2);
    }

    #[test]
    fn concurrent_readers_see_whole_snapshots() {
        let handle = Arc::new(SchemaHandle::new(resolved(&["A"])));

        let readers = (0..4)
            .map(|_| {
                let handle = Arc::clone(&handle);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let len = handle.load().schema().len();
                        assert!(len == 1 || len == 3);
                    }
                })
            })
            .collect::<Vec<_>>();

        handle.replace(resolved(&["A", "B", "C"]));

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(handle.load().schema().len(), 3);
    }
}
