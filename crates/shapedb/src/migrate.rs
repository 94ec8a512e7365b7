//! Open an application schema against a storage engine.
//!
//! The application schema is resolved first; structural errors are fatal and
//! never reach storage. The diff against the persisted schema is then
//! checked against the destructive-change policy and handed to the engine.
//! Nothing is retried here.

use crate::{
    Error,
    config::Config,
    handle::SchemaHandle,
    obs::{MigrationEvent, MigrationSink, record},
    store::StorageEngine,
};
use log::{debug, info, warn};
use shapedb_schema::{
    SchemaChange, diff,
    node::{ResolvedSchema, Schema},
};

///
/// MigrationReport
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MigrationReport {
    /// Ordered changes handed to the engine; empty when storage was current.
    pub changes: Vec<SchemaChange>,

    /// Class or column order was committed without structural changes.
    pub reordered: bool,
}

impl MigrationReport {
    #[must_use]
    pub const fn is_up_to_date(&self) -> bool {
        self.changes.is_empty() && !self.reordered
    }

    #[must_use]
    pub fn destructive_count(&self) -> usize {
        self.changes.iter().filter(|c| c.is_destructive()).count()
    }

    /// Changes that rewrite stored data; index toggles are applied in place.
    #[must_use]
    pub fn rewrite_count(&self) -> usize {
        self.changes.iter().filter(|c| c.requires_migration()).count()
    }
}

///
/// OpenedSchema
///

#[derive(Debug)]
pub struct OpenedSchema {
    pub schema: ResolvedSchema,
    pub report: MigrationReport,
}

///
/// Migrator
///

#[derive(Default)]
pub struct Migrator<'a> {
    config: Config,
    sink: Option<&'a dyn MigrationSink>,
}

impl<'a> Migrator<'a> {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config, sink: None }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: &'a dyn MigrationSink) -> Self {
        self.sink = Some(sink);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve `schema`, diff it against storage, and apply the changes.
    pub fn open<E>(&self, engine: &mut E, schema: Schema) -> Result<OpenedSchema, Error>
    where
        E: StorageEngine + ?Sized,
    {
        let resolved = schema.resolve_with(self.config.validate_options())?;

        let persisted = engine.persisted_schema();
        let changes = diff(&persisted, resolved.schema());
        let destructive = changes.iter().filter(|c| c.is_destructive()).count();

        debug!(
            "schema diff: {} class(es) persisted, {} class(es) requested, {} change(s), {} destructive",
            persisted.len(),
            resolved.schema().len(),
            changes.len(),
            destructive
        );
        record(
            self.sink,
            MigrationEvent::Diffed {
                changes: changes.len(),
                destructive,
            },
        );

        if changes.is_empty() {
            if persisted == *resolved.schema() {
                record(self.sink, MigrationEvent::UpToDate);

                return Ok(OpenedSchema {
                    schema: resolved,
                    report: MigrationReport::default(),
                });
            }

            // same classes and properties, different order: commit the new layout
            if let Err(err) = engine.apply_schema(resolved.schema(), &[]) {
                warn!("storage engine rejected schema reorder: {err}");
                record(self.sink, MigrationEvent::Failed);

                return Err(err.into());
            }

            info!("committed new class/column order");
            record(self.sink, MigrationEvent::Reordered);

            return Ok(OpenedSchema {
                schema: resolved,
                report: MigrationReport {
                    changes,
                    reordered: true,
                },
            });
        }

        if destructive > 0 && !self.config.migration.allow_destructive {
            warn!("refusing {destructive} destructive schema change(s)");
            record(self.sink, MigrationEvent::Rejected { destructive });

            let changes = changes.into_iter().filter(SchemaChange::is_destructive).collect();
            return Err(Error::DestructiveChange { changes });
        }

        if let Err(err) = engine.apply_schema(resolved.schema(), &changes) {
            warn!("storage engine rejected schema migration: {err}");
            record(self.sink, MigrationEvent::Failed);

            return Err(err.into());
        }

        let report = MigrationReport {
            changes,
            reordered: false,
        };

        info!(
            "applied {} schema change(s), {} rewriting stored data",
            report.changes.len(),
            report.rewrite_count()
        );
        if self.config.migration.log_changes {
            for change in &report.changes {
                info!("  {change}");
            }
        }
        record(
            self.sink,
            MigrationEvent::Applied {
                changes: report.changes.len(),
            },
        );

        Ok(OpenedSchema {
            schema: resolved,
            report,
        })
    }

    /// Migrate to `schema` and swap it into `handle`.
    /// On error the handle keeps its current snapshot.
    pub fn migrate<E>(
        &self,
        engine: &mut E,
        handle: &SchemaHandle,
        schema: Schema,
    ) -> Result<MigrationReport, Error>
    where
        E: StorageEngine + ?Sized,
    {
        let opened = self.open(engine, schema)?;
        handle.replace(opened.schema);

        Ok(opened.report)
    }
}
