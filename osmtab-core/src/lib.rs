//! Core domain types for `osmtab`.
//!
//! Responsibilities:
//! - Model OpenStreetMap nodes, ways and relations with their tags.
//! - Hold decoded entities in an append-only, per-kind store.
//! - Project entities into flat three-column tables.
//!
//! Boundaries:
//! - No I/O. Decoding and table serialization live in `osmtab-data`.
//!
//! Invariants:
//! - Entity and member order is preserved exactly as decoded.
//! - Tag rows exist only for non-empty tag values.
#![forbid(unsafe_code)]

mod dataset;
mod entity;
mod projection;

pub use dataset::{EntityCounts, OsmDataset};
pub use entity::{
    EntityKind, Member, MemberKind, Node, ParseMemberError, Relation, TaggedEntity, Tags, Way,
};
pub use projection::{
    Header, LIST_DELIMITER, NODES_HEADER, RELATIONS_HEADER, Record, TagRow, Table, WAYS_HEADER,
    format_coordinate, join_members, join_node_ids, member_token, project_dataset, project_nodes,
    project_relations, project_tags, project_ways, tag_rows,
};
