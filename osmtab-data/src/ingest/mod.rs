//! Streaming ingestion of OSM PBF files into the in-memory entity store.
use camino::{Utf8Path, Utf8PathBuf};
use geo::{Coord, Rect};
use log::{info, warn};
use osmtab_core::{EntityCounts, EntityKind, OsmDataset};
use thiserror::Error;

mod accumulator;
mod progress;
mod source;
mod tags;

pub use accumulator::OsmAccumulator;
pub use progress::{LogProgress, ProgressObserver, ProgressThresholds, SilentProgress};
pub use source::{ElementSink, ElementSource, PbfHeaderError, PbfSource, RawMember};

/// Summary of raw OSM elements discovered during ingestion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OsmIngestSummary {
    /// Number of nodes, ways and relations accumulated.
    pub counts: EntityCounts,
    /// Bounding box covering all valid node coordinates, if any.
    /// Coordinates are WGS84 with `x = longitude`, `y = latitude`.
    pub bounds: Option<Rect<f64>>,
}

impl OsmIngestSummary {
    fn include_bounds(&mut self, bounds: Rect<f64>) {
        match &mut self.bounds {
            Some(existing) => {
                let min = Coord {
                    x: existing.min().x.min(bounds.min().x),
                    y: existing.min().y.min(bounds.min().y),
                };
                let max = Coord {
                    x: existing.max().x.max(bounds.max().x),
                    y: existing.max().y.max(bounds.max().y),
                };
                *existing = Rect::new(min, max);
            }
            None => self.bounds = Some(bounds),
        }
    }

    fn record_node(&mut self, lon: f64, lat: f64) -> u64 {
        if let Some(bounds) = Self::coordinate_bounds(lon, lat) {
            self.include_bounds(bounds);
        }
        self.counts.increment(EntityKind::Node)
    }

    const fn record_way(&mut self) -> u64 {
        self.counts.increment(EntityKind::Way)
    }

    const fn record_relation(&mut self) -> u64 {
        self.counts.increment(EntityKind::Relation)
    }

    fn coordinate_bounds(lon: f64, lat: f64) -> Option<Rect<f64>> {
        (lon.is_finite()
            && lat.is_finite()
            && (-180.0..=180.0).contains(&lon)
            && (-90.0..=90.0).contains(&lat))
        .then(|| {
            let coordinate = Coord { x: lon, y: lat };
            Rect::new(coordinate, coordinate)
        })
    }
}

/// Result of one ingestion pass.
///
/// Decoding problems never fail ingestion: the pass stops and whatever was
/// decoded before the failure is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    /// Every entity decoded before end of input or the first decode error.
    pub dataset: OsmDataset,
    /// Counts and bounds of `dataset`.
    pub summary: OsmIngestSummary,
    /// Description of the decode error that ended the pass early, if any.
    pub decode_error: Option<String>,
}

/// Errors returned when ingesting an OSM PBF file.
#[derive(Debug, Error)]
pub enum OsmIngestError {
    /// The input file could not be opened.
    #[error("failed to open OSM PBF file at {path:?}")]
    Open {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Path that failed to open.
        path: Utf8PathBuf,
    },
    /// The input does not start with a readable OSM PBF header.
    #[error("{path:?} is not an OSM PBF file: {source}")]
    InvalidHeader {
        /// Why the header was rejected.
        #[source]
        source: PbfHeaderError,
        /// Path of the rejected input.
        path: Utf8PathBuf,
    },
}

/// Drain `source` into an in-memory dataset.
///
/// # Examples
/// ```
/// use osmtab_data::ingest::{ElementSink, ElementSource, SilentProgress, ingest};
///
/// struct OneNode;
///
/// impl ElementSource for OneNode {
///     type Error = std::io::Error;
///
///     fn drain_into<S: ElementSink>(self, sink: &mut S) -> Result<(), Self::Error> {
///         sink.node(1, 55.75, 37.6, [("name", "X")]);
///         Ok(())
///     }
/// }
///
/// let outcome = ingest(OneNode, SilentProgress);
/// assert_eq!(outcome.summary.counts.nodes, 1);
/// assert!(outcome.decode_error.is_none());
/// ```
pub fn ingest<S, O>(source: S, observer: O) -> IngestOutcome
where
    S: ElementSource,
    O: ProgressObserver,
{
    let mut accumulator = OsmAccumulator::new(observer);
    let decode_error = source.drain_into(&mut accumulator).err().map(|err| {
        let counts = accumulator.summary().counts;
        warn!(
            "Stopped decoding after {} nodes, {} ways and {} relations: {err}",
            counts.nodes, counts.ways, counts.relations
        );
        err.to_string()
    });
    let (dataset, summary) = accumulator.into_parts();
    info!(
        "Accumulated {} nodes, {} ways and {} relations",
        summary.counts.nodes, summary.counts.ways, summary.counts.relations
    );
    IngestOutcome {
        dataset,
        summary,
        decode_error,
    }
}

/// Read an OSM PBF file sequentially into memory, logging progress.
///
/// A missing or unreadable header is fatal; corruption after the header
/// only ends the pass early (see [`IngestOutcome::decode_error`]).
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use osmtab_data::ingest::ingest_osm_pbf;
///
/// # fn main() -> Result<(), osmtab_data::ingest::OsmIngestError> {
/// let outcome = ingest_osm_pbf(Utf8Path::new("berlin.osm.pbf"))?;
/// println!("Nodes: {}", outcome.summary.counts.nodes);
/// # Ok(())
/// # }
/// ```
pub fn ingest_osm_pbf(path: &Utf8Path) -> Result<IngestOutcome, OsmIngestError> {
    let file = osmtab_fs::open_utf8_file(path).map_err(|source| OsmIngestError::Open {
        source,
        path: path.to_path_buf(),
    })?;
    let source = PbfSource::new(file).map_err(|source| OsmIngestError::InvalidHeader {
        source,
        path: path.to_path_buf(),
    })?;
    Ok(ingest(source, LogProgress))
}
