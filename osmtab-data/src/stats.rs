//! Entity counts for an OSM PBF file without retaining its contents.
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use log::warn;
use osmtab_core::{EntityCounts, EntityKind};
use thiserror::Error;

use crate::ingest::{ElementSink, ElementSource, PbfHeaderError, PbfSource, RawMember};

/// Size and entity counts of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    /// Base name of the file.
    pub file_name: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Entities decoded before end of input or the first decode error.
    pub counts: EntityCounts,
}

impl fmt::Display for FileStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== FILE STATISTICS: {} ===", self.file_name)?;
        writeln!(f, "File size: {} MB", format_megabytes(self.size_bytes))?;
        writeln!(f, "Nodes: {}", self.counts.nodes)?;
        writeln!(f, "Ways: {}", self.counts.ways)?;
        writeln!(f, "Relations: {}", self.counts.relations)?;
        write!(f, "Total entities: {}", self.counts.total())
    }
}

/// Render a byte count as mebibytes with two decimals.
#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "file sizes are only rounded for display"
)]
fn format_megabytes(bytes: u64) -> String {
    const MEBIBYTE: f64 = 1_048_576.0;
    format!("{:.2}", bytes as f64 / MEBIBYTE)
}

/// Errors raised while gathering file statistics.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The input file could not be opened or inspected.
    #[error("failed to open OSM PBF file at {path:?}")]
    Open {
        /// Path that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The input does not start with a readable OSM PBF header.
    #[error("{path:?} is not an OSM PBF file: {source}")]
    InvalidHeader {
        /// Path of the rejected input.
        path: Utf8PathBuf,
        /// Why the header was rejected.
        #[source]
        source: PbfHeaderError,
    },
}

#[derive(Debug, Default)]
struct Counter(EntityCounts);

impl ElementSink for Counter {
    fn node<'a, T>(&mut self, _id: i64, _lat: f64, _lon: f64, _tags: T)
    where
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.0.increment(EntityKind::Node);
    }

    fn way<'a, R, T>(&mut self, _id: i64, _refs: R, _tags: T)
    where
        R: IntoIterator<Item = i64>,
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.0.increment(EntityKind::Way);
    }

    fn relation<'a, M, T>(&mut self, _id: i64, _members: M, _tags: T)
    where
        M: IntoIterator<Item = RawMember<'a>>,
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.0.increment(EntityKind::Relation);
    }
}

/// Count the entities of any element source.
///
/// Decoding stops silently at the first error, keeping the counts so far.
#[must_use]
pub fn count_entities<S: ElementSource>(source: S) -> EntityCounts {
    let mut counter = Counter::default();
    if let Err(err) = source.drain_into(&mut counter) {
        warn!("Stopped counting at a decode error: {err}");
    }
    counter.0
}

/// Gather size and entity counts for the PBF file at `path`.
///
/// The header must decode; later corruption only stops the count.
pub fn file_stats(path: &Utf8Path) -> Result<FileStats, StatsError> {
    let open_err = |source| StatsError::Open {
        path: path.to_path_buf(),
        source,
    };
    let size_bytes = osmtab_fs::file_size(path).map_err(open_err)?;
    let file = osmtab_fs::open_utf8_file(path).map_err(open_err)?;
    let source = PbfSource::new(file).map_err(|source| StatsError::InvalidHeader {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FileStats {
        file_name: path.file_name().unwrap_or(path.as_str()).to_owned(),
        size_bytes,
        counts: count_entities(source),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0.00")]
    #[case(1_048_576, "1.00")]
    #[case(1_572_864, "1.50")]
    #[case(5_000, "0.00")]
    #[case(10_000_000, "9.54")]
    fn megabytes_use_two_decimals(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(format_megabytes(bytes), expected);
    }

    #[rstest]
    fn display_lists_counts_and_total() {
        let stats = FileStats {
            file_name: "city.osm.pbf".to_owned(),
            size_bytes: 2_097_152,
            counts: EntityCounts {
                nodes: 3,
                ways: 2,
                relations: 1,
            },
        };
        let rendered = stats.to_string();
        assert!(rendered.starts_with("=== FILE STATISTICS: city.osm.pbf ==="));
        assert!(rendered.contains("File size: 2.00 MB"));
        assert!(rendered.contains("Nodes: 3"));
        assert!(rendered.ends_with("Total entities: 6"));
    }

    #[rstest]
    fn missing_file_is_an_open_error() {
        let err = file_stats(Utf8Path::new("missing/file.osm.pbf")).expect_err("missing file");
        assert!(matches!(err, StatsError::Open { .. }));
    }
}
