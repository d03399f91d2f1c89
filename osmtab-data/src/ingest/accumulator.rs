//! Accumulator turning decoded elements into the owned entity model.
//!
//! Copies identifiers, coordinates, references and tags out of the decoder's
//! buffers, appends them to the per-kind store and drives progress
//! notifications.
use osmtab_core::{EntityKind, Member, Node, OsmDataset, Relation, Way};

use super::OsmIngestSummary;
use super::progress::{ProgressObserver, ProgressThresholds};
use super::source::{ElementSink, RawMember};
use super::tags::collect_tags;

/// Appends every received element to an [`OsmDataset`].
#[derive(Debug)]
pub struct OsmAccumulator<O: ProgressObserver> {
    dataset: OsmDataset,
    summary: OsmIngestSummary,
    thresholds: ProgressThresholds,
    observer: O,
}

impl<O: ProgressObserver> OsmAccumulator<O> {
    /// Create an empty accumulator reporting through `observer` at the
    /// default intervals.
    pub fn new(observer: O) -> Self {
        Self::with_thresholds(observer, ProgressThresholds::default())
    }

    /// Create an empty accumulator with custom progress intervals.
    pub fn with_thresholds(observer: O, thresholds: ProgressThresholds) -> Self {
        Self {
            dataset: OsmDataset::default(),
            summary: OsmIngestSummary::default(),
            thresholds,
            observer,
        }
    }

    /// Entities accumulated so far.
    pub const fn dataset(&self) -> &OsmDataset {
        &self.dataset
    }

    /// Running counts and bounds.
    pub const fn summary(&self) -> &OsmIngestSummary {
        &self.summary
    }

    /// Finish accumulation, returning the store and its summary.
    pub fn into_parts(self) -> (OsmDataset, OsmIngestSummary) {
        (self.dataset, self.summary)
    }

    fn notify(&mut self, kind: EntityKind, count: u64) {
        if self.thresholds.is_due(kind, count) {
            self.observer.on_progress(kind, count);
        }
    }
}

impl<O: ProgressObserver> ElementSink for OsmAccumulator<O> {
    fn node<'a, T>(&mut self, id: i64, lat: f64, lon: f64, tags: T)
    where
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.dataset
            .push_node(Node::new(id, lat, lon, collect_tags(tags)));
        let count = self.summary.record_node(lon, lat);
        self.notify(EntityKind::Node, count);
    }

    fn way<'a, R, T>(&mut self, id: i64, refs: R, tags: T)
    where
        R: IntoIterator<Item = i64>,
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let node_ids: Vec<i64> = refs.into_iter().collect();
        self.dataset
            .push_way(Way::new(id, node_ids, collect_tags(tags)));
        let count = self.summary.record_way();
        self.notify(EntityKind::Way, count);
    }

    fn relation<'a, M, T>(&mut self, id: i64, raw_members: M, tags: T)
    where
        M: IntoIterator<Item = RawMember<'a>>,
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let members = raw_members
            .into_iter()
            .map(|member| Member::new(member.kind, member.id, member.role))
            .collect();
        self.dataset
            .push_relation(Relation::new(id, members, collect_tags(tags)));
        let count = self.summary.record_relation();
        self.notify(EntityKind::Relation, count);
    }
}
