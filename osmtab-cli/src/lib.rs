//! Command-line interface converting OSM PBF extracts into CSV tables.
#![forbid(unsafe_code)]

use std::time::Instant;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{CommandFactory, Parser};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use osmtab_data::{
    FileStats, OutputEncoding, file_stats, ingest_osm_pbf, write_dataset, write_readme,
};
use serde::{Deserialize, Serialize};

mod error;
mod report;

pub use error::CliError;
pub use report::ConversionReport;

const ARG_INPUT: &str = "input";
const ARG_OUTPUT_DIR: &str = "output-dir";
const ENV_INPUT: &str = "OSMTAB_CMDS_OSMTAB_INPUT";
const OUTPUT_DIR_SUFFIX: &str = "_csv";

/// Run the converter with the current process arguments and environment.
pub fn run() -> Result<ConversionReport, CliError> {
    let args = ConvertArgs::try_parse().map_err(CliError::ArgumentParsing)?;
    run_convert(args)
}

/// Run the statistics tool with the current process arguments.
pub fn run_stat() -> Result<FileStats, CliError> {
    let args = StatArgs::try_parse().map_err(CliError::ArgumentParsing)?;
    require_file(&args.input, ARG_INPUT)?;
    Ok(file_stats(&args.input)?)
}

/// Usage line of the converter, printed alongside errors.
#[must_use]
pub fn usage() -> String {
    ConvertArgs::command().render_usage().to_string()
}

/// Usage line of the statistics tool.
#[must_use]
pub fn stat_usage() -> String {
    StatArgs::command().render_usage().to_string()
}

fn run_convert(args: ConvertArgs) -> Result<ConversionReport, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    convert(&config)
}

fn convert(config: &ConvertConfig) -> Result<ConversionReport, CliError> {
    let started = Instant::now();
    info!("Converting {} to CSV", config.input);
    info!("Output directory: {}", config.output_dir);
    let outcome = ingest_osm_pbf(&config.input)?;
    let tables = write_dataset(&config.output_dir, &outcome.dataset, config.encoding)?;
    let readme = write_readme(&config.output_dir)?;
    Ok(ConversionReport {
        counts: outcome.summary.counts,
        bounds: outcome.summary.bounds,
        elapsed: started.elapsed(),
        output_dir: config.output_dir.clone(),
        tables,
        readme,
        decode_error: outcome.decode_error,
    })
}

/// Arguments for converting one PBF file into CSV tables.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "osmtab",
    about = "Convert an OpenStreetMap PBF extract into CSV tables",
    long_about = "Convert an OpenStreetMap PBF extract into CSV tables. \
                  Values can also come from configuration files or \
                  environment variables.",
    version
)]
#[ortho_config(prefix = "OSMTAB")]
struct ConvertArgs {
    /// Path to the OpenStreetMap PBF file.
    #[arg(value_name = "input.osm.pbf")]
    #[serde(default)]
    input: Option<Utf8PathBuf>,
    /// Directory receiving the tables; defaults to `<input stem>_csv`.
    #[arg(value_name = "output_directory")]
    #[serde(default)]
    output_dir: Option<Utf8PathBuf>,
    /// Character encoding of the tables, as a WHATWG label.
    #[arg(long, value_name = "label")]
    #[serde(default)]
    encoding: Option<String>,
}

impl ConvertArgs {
    fn into_config(self) -> Result<ConvertConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ConvertConfig::try_from(merged)
    }
}

/// Arguments for reporting statistics about one PBF file.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "osmtab-stat",
    about = "Print size and entity counts of an OpenStreetMap PBF file",
    version
)]
struct StatArgs {
    /// Path to the OpenStreetMap PBF file.
    #[arg(value_name = "file.osm.pbf")]
    input: Utf8PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ConvertConfig {
    input: Utf8PathBuf,
    output_dir: Utf8PathBuf,
    encoding: OutputEncoding,
}

impl ConvertConfig {
    fn validate_sources(&self) -> Result<(), CliError> {
        require_file(&self.input, ARG_INPUT)?;
        let blocked = osmtab_fs::path_blocks_directory(&self.output_dir).map_err(|source| {
            CliError::InspectPath {
                field: ARG_OUTPUT_DIR,
                path: self.output_dir.clone(),
                source,
            }
        })?;
        if blocked {
            return Err(CliError::OutputDirectoryNotDirectory {
                path: self.output_dir.clone(),
            });
        }
        Ok(())
    }
}

impl TryFrom<ConvertArgs> for ConvertConfig {
    type Error = CliError;

    fn try_from(args: ConvertArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: ENV_INPUT,
        })?;
        let output_dir = args
            .output_dir
            .unwrap_or_else(|| default_output_dir(&input));
        let encoding = args
            .encoding
            .as_deref()
            .map_or_else(|| Ok(OutputEncoding::default()), OutputEncoding::for_label)?;
        Ok(Self {
            input,
            output_dir,
            encoding,
        })
    }
}

/// Output directory used when none is configured: the input file name with
/// its last extension replaced by `_csv`, relative to the working directory.
fn default_output_dir(input: &Utf8Path) -> Utf8PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    Utf8PathBuf::from(format!("{stem}{OUTPUT_DIR_SUFFIX}"))
}

fn require_file(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match osmtab_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectPath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests;
