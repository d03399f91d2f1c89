//! Facade crate for the OSM tabular converter.
//!
//! This crate re-exports the entity model and projection rules together with
//! the PBF ingestion and table writing entry points.

#![forbid(unsafe_code)]

pub use osmtab_core::{
    EntityCounts, EntityKind, Member, MemberKind, Node, OsmDataset, Relation, Table, Tags, Way,
    project_dataset,
};
pub use osmtab_data::{
    FileStats, IngestOutcome, OsmIngestError, OutputEncoding, TableWriteError, WrittenTable,
    file_stats, ingest_osm_pbf, write_dataset, write_readme,
};
