//! Test helpers for materialising PBF fixtures in scratch directories.

use super::ConvertArgs;
use base64::{Engine as _, engine::general_purpose};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Scratch directory addressed through UTF-8 paths.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace path");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }
}

/// Decode `tests/fixtures/<stem>.osm.pbf.b64` into `dir`, returning its path.
pub(super) fn decode_pbf_fixture(dir: &Utf8Path, stem: &str) -> Utf8PathBuf {
    let encoded_path = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(format!("{stem}.osm.pbf.b64"));
    let encoded = fs::read_to_string(&encoded_path)
        .unwrap_or_else(|err| panic!("failed to read base64 fixture {encoded_path}: {err}"));
    let cleaned: String = encoded
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect();
    let decoded = general_purpose::STANDARD
        .decode(cleaned.as_bytes())
        .unwrap_or_else(|err| panic!("failed to decode base64 fixture {encoded_path}: {err}"));
    let target = dir.join(format!("{stem}.osm.pbf"));
    fs::write(&target, decoded)
        .unwrap_or_else(|err| panic!("failed to write decoded fixture {target}: {err}"));
    target
}

/// Arguments naming an input and output directory and nothing else.
pub(super) fn convert_args(input: &Utf8Path, output_dir: &Utf8Path) -> ConvertArgs {
    ConvertArgs {
        input: Some(input.to_path_buf()),
        output_dir: Some(output_dir.to_path_buf()),
        encoding: None,
    }
}
