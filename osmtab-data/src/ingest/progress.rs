//! Periodic progress notifications emitted while decoding.
use log::info;
use osmtab_core::EntityKind;

/// Per-kind intervals between progress notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressThresholds {
    /// Notify after every this many nodes.
    pub nodes: u64,
    /// Notify after every this many ways.
    pub ways: u64,
    /// Notify after every this many relations.
    pub relations: u64,
}

impl Default for ProgressThresholds {
    fn default() -> Self {
        Self {
            nodes: 100_000,
            ways: 10_000,
            relations: 1_000,
        }
    }
}

impl ProgressThresholds {
    /// Interval configured for `kind`.
    #[must_use]
    pub const fn for_kind(&self, kind: EntityKind) -> u64 {
        match kind {
            EntityKind::Node => self.nodes,
            EntityKind::Way => self.ways,
            EntityKind::Relation => self.relations,
        }
    }

    /// Whether reaching `count` entities of `kind` warrants a notification.
    ///
    /// A zero interval disables notifications for that kind.
    #[must_use]
    pub const fn is_due(&self, kind: EntityKind, count: u64) -> bool {
        let interval = self.for_kind(kind);
        interval != 0 && count != 0 && count.is_multiple_of(interval)
    }
}

/// Receives running counts during ingestion.
pub trait ProgressObserver {
    /// Called when `count` entities of `kind` have been accumulated.
    fn on_progress(&mut self, kind: EntityKind, count: u64);
}

impl<O: ProgressObserver + ?Sized> ProgressObserver for &mut O {
    fn on_progress(&mut self, kind: EntityKind, count: u64) {
        (**self).on_progress(kind, count);
    }
}

/// Observer that reports progress through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&mut self, kind: EntityKind, count: u64) {
        info!("Processed {count} {kind} elements");
    }
}

/// Observer that discards notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressObserver for SilentProgress {
    fn on_progress(&mut self, _kind: EntityKind, _count: u64) {}
}
