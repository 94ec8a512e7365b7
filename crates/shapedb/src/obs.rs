//! Migration observability boundary.
//!
//! The sink is optional, injected by the caller, and must not affect
//! migration semantics.

///
/// MigrationSink
///

pub trait MigrationSink: Send + Sync {
    fn on_event(&self, event: MigrationEvent);
}

///
/// MigrationEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MigrationEvent {
    /// The application schema was resolved and diffed against storage.
    Diffed { changes: usize, destructive: usize },

    /// Storage already matches; nothing was applied.
    UpToDate,

    /// Destructive changes were refused by configuration.
    Rejected { destructive: usize },

    /// Storage had the same structure in a different order; the new order
    /// was committed.
    Reordered,

    /// The storage engine applied the changes.
    Applied { changes: usize },

    /// The storage engine reported a migration failure.
    Failed,
}

pub(crate) fn record(sink: Option<&dyn MigrationSink>, event: MigrationEvent) {
    if let Some(sink) = sink {
        sink.on_event(event);
    }
}
