//! Serialization of projected tables to delimited text files.

use std::borrow::Cow;
use std::io::{BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use osmtab_core::{OsmDataset, Table, project_dataset};
use thiserror::Error;

mod encoding;
mod readme;

pub use encoding::{DEFAULT_ENCODING_LABEL, OutputEncoding, OutputEncodingError};
pub use readme::{README_FILE_NAME, write_readme};

/// Errors raised while writing tables. Every variant aborts the run.
#[derive(Debug, Error)]
pub enum TableWriteError {
    /// Failed to create the output directory.
    #[error("failed to create output directory {path:?}")]
    CreateDirectory {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Failed to create a table file.
    #[error("failed to create table file {path:?}")]
    CreateFile {
        /// File that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Writing a record failed.
    #[error("failed to write a record to {path:?}")]
    Write {
        /// File being written.
        path: Utf8PathBuf,
        /// Source error returned by `csv`.
        #[source]
        source: csv::Error,
    },
    /// Flushing buffered records failed.
    #[error("failed to flush {path:?}")]
    Flush {
        /// File being written.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A field holds a character the output encoding cannot represent.
    #[error("{path:?}: character {character:?} in {value:?} is not representable in {encoding}")]
    Unrepresentable {
        /// File being written.
        path: Utf8PathBuf,
        /// Field value containing the character.
        value: String,
        /// First character that failed to encode.
        character: char,
        /// Name of the output encoding.
        encoding: &'static str,
    },
    /// Writing the schema description failed.
    #[error("failed to write schema description {path:?}")]
    WriteReadme {
        /// Description file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A table file that was written successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    /// Location of the file.
    pub path: Utf8PathBuf,
    /// Number of data rows, excluding the header.
    pub rows: u64,
}

/// Writes tables into one directory using a fixed output encoding.
///
/// Files are comma-separated with a header line, `\n` line endings and
/// quotes only where a field requires them.
#[derive(Debug, Clone)]
pub struct TableWriter {
    dir: Utf8PathBuf,
    encoding: OutputEncoding,
}

impl TableWriter {
    /// Create a writer targeting `dir`, which must already exist.
    pub fn new(dir: impl Into<Utf8PathBuf>, encoding: OutputEncoding) -> Self {
        Self {
            dir: dir.into(),
            encoding,
        }
    }

    /// Directory receiving the table files.
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Write one table, replacing any existing file of the same name.
    pub fn write(&self, table: &Table<'_>) -> Result<WrittenTable, TableWriteError> {
        let path = self.dir.join(table.name());
        let file =
            osmtab_fs::create_utf8_file(&path).map_err(|source| TableWriteError::CreateFile {
                path: path.clone(),
                source,
            })?;
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(BufWriter::new(file));

        self.write_record(&mut writer, &path, table.header())?;
        let mut rows = 0_u64;
        for record in table.records() {
            self.write_record(&mut writer, &path, record.each_ref().map(|field| &**field))?;
            rows += 1;
        }
        writer.flush().map_err(|source| TableWriteError::Flush {
            path: path.clone(),
            source,
        })?;

        info!("Saved {rows} rows to {path}");
        Ok(WrittenTable { path, rows })
    }

    /// Write tables in order, stopping at the first failure.
    pub fn write_all<'t, 'd: 't, I>(&self, tables: I) -> Result<Vec<WrittenTable>, TableWriteError>
    where
        I: IntoIterator<Item = &'t Table<'d>>,
    {
        tables.into_iter().map(|table| self.write(table)).collect()
    }

    fn write_record<W: Write>(
        &self,
        writer: &mut csv::Writer<W>,
        path: &Utf8Path,
        fields: [&str; 3],
    ) -> Result<(), TableWriteError> {
        let [first, second, third] = fields;
        let encoded = [
            self.encode_field(path, first)?,
            self.encode_field(path, second)?,
            self.encode_field(path, third)?,
        ];
        writer
            .write_record(&encoded)
            .map_err(|source| TableWriteError::Write {
                path: path.to_path_buf(),
                source,
            })
    }

    fn encode_field<'f>(
        &self,
        path: &Utf8Path,
        value: &'f str,
    ) -> Result<Cow<'f, [u8]>, TableWriteError> {
        self.encoding
            .encode(value)
            .map_err(|character| TableWriteError::Unrepresentable {
                path: path.to_path_buf(),
                value: value.to_owned(),
                character,
                encoding: self.encoding.name(),
            })
    }
}

/// Project `dataset` and write every non-empty table into `dir`.
///
/// The directory and its ancestors are created first. Kinds without
/// entities, and tag tables without rows, produce no file.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use osmtab_core::OsmDataset;
/// use osmtab_data::tables::{OutputEncoding, write_dataset};
///
/// # fn main() -> Result<(), osmtab_data::tables::TableWriteError> {
/// let written = write_dataset(
///     Utf8Path::new("berlin_csv"),
///     &OsmDataset::default(),
///     OutputEncoding::default(),
/// )?;
/// assert!(written.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn write_dataset(
    dir: &Utf8Path,
    dataset: &OsmDataset,
    encoding: OutputEncoding,
) -> Result<Vec<WrittenTable>, TableWriteError> {
    osmtab_fs::ensure_dir(dir).map_err(|source| TableWriteError::CreateDirectory {
        path: dir.to_path_buf(),
        source,
    })?;
    info!("Writing tables to {dir} as {}", encoding.name());
    let tables = project_dataset(dataset);
    TableWriter::new(dir, encoding).write_all(&tables)
}
