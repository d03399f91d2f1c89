//! File-facing half of the OSM tabular converter.
//!
//! Responsibilities:
//! - Decode OSM PBF input into an in-memory [`osmtab_core::OsmDataset`].
//! - Serialise projected tables as delimited text in a configurable encoding.
//! - Report cheap per-file statistics.
//!
//! Boundaries:
//! - Row layout and formatting rules live in `osmtab-core`.
//! - Argument parsing and process exit codes live in `osmtab-cli`.
//!
//! Invariants:
//! - A decode failure never discards entities decoded before it.
//! - No global mutable state.
#![forbid(unsafe_code)]

pub mod ingest;
pub mod stats;
pub mod tables;

pub use ingest::{IngestOutcome, OsmIngestError, OsmIngestSummary, ingest, ingest_osm_pbf};
pub use stats::{FileStats, StatsError, count_entities, file_stats};
pub use tables::{
    OutputEncoding, OutputEncodingError, TableWriteError, TableWriter, WrittenTable,
    write_dataset, write_readme,
};
