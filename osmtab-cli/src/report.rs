//! Final summary printed after a conversion.
use std::{fmt, time::Duration};

use camino::Utf8PathBuf;
use geo::Rect;
use osmtab_core::EntityCounts;
use osmtab_data::WrittenTable;

const RULE: &str = "==================================================";

/// Outcome of one successful conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    /// Entities accumulated per kind.
    pub counts: EntityCounts,
    /// Bounding box of valid node coordinates, if any.
    pub bounds: Option<Rect<f64>>,
    /// Wall-clock time for the whole pipeline.
    pub elapsed: Duration,
    /// Directory holding the tables.
    pub output_dir: Utf8PathBuf,
    /// Tables written, in write order.
    pub tables: Vec<WrittenTable>,
    /// Location of the schema description.
    pub readme: Utf8PathBuf,
    /// Why decoding stopped before the end of the input, if it did.
    pub decode_error: Option<String>,
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "CONVERSION COMPLETE")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Nodes: {}", self.counts.nodes)?;
        writeln!(f, "Ways: {}", self.counts.ways)?;
        writeln!(f, "Relations: {}", self.counts.relations)?;
        if let Some(bounds) = &self.bounds {
            writeln!(
                f,
                "Bounds: {:.7},{:.7} .. {:.7},{:.7}",
                bounds.min().y,
                bounds.min().x,
                bounds.max().y,
                bounds.max().x
            )?;
        }
        if let Some(reason) = &self.decode_error {
            writeln!(f, "Decoding stopped early: {reason}")?;
        }
        writeln!(f, "Elapsed: {:.2} s", self.elapsed.as_secs_f64())?;
        writeln!(f, "Output directory: {}", self.output_dir)?;
        for table in &self.tables {
            let name = table.path.file_name().unwrap_or(table.path.as_str());
            writeln!(f, "  {name} ({} rows)", table.rows)?;
        }
        let readme = self.readme.file_name().unwrap_or(self.readme.as_str());
        write!(f, "  {readme}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};

    #[fixture]
    fn report() -> ConversionReport {
        ConversionReport {
            counts: EntityCounts {
                nodes: 3,
                ways: 1,
                relations: 0,
            },
            bounds: Some(Rect::new(
                Coord { x: 37.6, y: 55.75 },
                Coord { x: 37.61, y: 55.76 },
            )),
            elapsed: Duration::from_millis(1_234),
            output_dir: Utf8PathBuf::from("berlin.osm_csv"),
            tables: vec![
                WrittenTable {
                    path: Utf8PathBuf::from("berlin.osm_csv/nodes.csv"),
                    rows: 3,
                },
                WrittenTable {
                    path: Utf8PathBuf::from("berlin.osm_csv/ways.csv"),
                    rows: 1,
                },
            ],
            readme: Utf8PathBuf::from("berlin.osm_csv/README.txt"),
            decode_error: None,
        }
    }

    #[rstest]
    fn lists_totals_time_and_tables(report: ConversionReport) {
        let rendered = report.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.get(1), Some(&"CONVERSION COMPLETE"));
        assert!(lines.contains(&"Nodes: 3"));
        assert!(lines.contains(&"Relations: 0"));
        assert!(lines.contains(&"Bounds: 55.7500000,37.6000000 .. 55.7600000,37.6100000"));
        assert!(lines.contains(&"Elapsed: 1.23 s"));
        assert!(lines.contains(&"Output directory: berlin.osm_csv"));
        assert!(lines.contains(&"  nodes.csv (3 rows)"));
        assert_eq!(lines.last(), Some(&"  README.txt"));
        assert!(!rendered.contains("stopped early"));
    }

    #[rstest]
    fn mentions_early_stop(mut report: ConversionReport) {
        report.decode_error = Some("corrupt blob".to_owned());
        assert!(
            report
                .to_string()
                .contains("Decoding stopped early: corrupt blob")
        );
    }
}
