//! Append-only in-memory store for decoded entities.

use crate::entity::{EntityKind, Node, Relation, Way};

/// Per-kind entity totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntityCounts {
    /// Number of nodes.
    pub nodes: u64,
    /// Number of ways.
    pub ways: u64,
    /// Number of relations.
    pub relations: u64,
}

impl EntityCounts {
    /// Sum of all three kinds.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.nodes + self.ways + self.relations
    }

    /// Count for a single kind.
    #[must_use]
    pub const fn get(&self, kind: EntityKind) -> u64 {
        match kind {
            EntityKind::Node => self.nodes,
            EntityKind::Way => self.ways,
            EntityKind::Relation => self.relations,
        }
    }

    /// Increment the counter for `kind` and return its new value.
    pub const fn increment(&mut self, kind: EntityKind) -> u64 {
        let slot = match kind {
            EntityKind::Node => &mut self.nodes,
            EntityKind::Way => &mut self.ways,
            EntityKind::Relation => &mut self.relations,
        };
        *slot += 1;
        *slot
    }
}

/// Every entity decoded from one input, one ordered collection per kind.
///
/// Entities are only ever appended; projection borrows the collections
/// read-only.
///
/// # Examples
/// ```
/// use osmtab_core::{Node, OsmDataset, Tags};
///
/// let mut dataset = OsmDataset::default();
/// dataset.push_node(Node::new(1, 55.75, 37.6, Tags::new()));
/// assert_eq!(dataset.counts().nodes, 1);
/// assert!(dataset.ways().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OsmDataset {
    nodes: Vec<Node>,
    ways: Vec<Way>,
    relations: Vec<Relation>,
}

impl OsmDataset {
    /// Append a node.
    pub fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Append a way.
    pub fn push_way(&mut self, way: Way) {
        self.ways.push(way);
    }

    /// Append a relation.
    pub fn push_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    /// Nodes in decode order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Ways in decode order.
    #[must_use]
    pub fn ways(&self) -> &[Way] {
        &self.ways
    }

    /// Relations in decode order.
    #[must_use]
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Per-kind totals.
    #[must_use]
    pub fn counts(&self) -> EntityCounts {
        EntityCounts {
            nodes: self.nodes.len() as u64,
            ways: self.ways.len() as u64,
            relations: self.relations.len() as u64,
        }
    }

    /// Whether no entity of any kind was stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.ways.is_empty() && self.relations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Member, MemberKind, Tags};
    use rstest::rstest;

    #[rstest]
    fn counts_track_each_collection() {
        let mut dataset = OsmDataset::default();
        dataset.push_node(Node::new(1, 0.0, 0.0, Tags::new()));
        dataset.push_node(Node::new(2, 0.0, 0.0, Tags::new()));
        dataset.push_way(Way::new(3, vec![1, 2], Tags::new()));
        dataset.push_relation(Relation::new(
            4,
            vec![Member::new(MemberKind::Way, 3, "outer")],
            Tags::new(),
        ));

        let counts = dataset.counts();
        assert_eq!(counts.nodes, 2);
        assert_eq!(counts.ways, 1);
        assert_eq!(counts.relations, 1);
        assert_eq!(counts.total(), 4);
        assert!(!dataset.is_empty());
    }

    #[rstest]
    fn preserves_insertion_order() {
        let mut dataset = OsmDataset::default();
        for id in [5, 3, 9] {
            dataset.push_node(Node::new(id, 0.0, 0.0, Tags::new()));
        }
        let ids: Vec<i64> = dataset.nodes().iter().map(|node| node.id).collect();
        assert_eq!(ids, vec![5, 3, 9]);
    }

    #[rstest]
    #[case(EntityKind::Node)]
    #[case(EntityKind::Way)]
    #[case(EntityKind::Relation)]
    fn increment_touches_only_one_kind(#[case] kind: EntityKind) {
        let mut counts = EntityCounts::default();
        assert_eq!(counts.increment(kind), 1);
        assert_eq!(counts.increment(kind), 2);
        assert_eq!(counts.get(kind), 2);
        assert_eq!(counts.total(), 2);
    }
}
