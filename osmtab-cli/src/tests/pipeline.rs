//! Pipeline tests covering the full conversion flow.

use super::helpers::{Workspace, convert_args, decode_pbf_fixture};
use super::*;
use rstest::rstest;
use std::fs;

#[rstest]
fn conversion_writes_tables_and_readme() {
    let workspace = Workspace::new();
    let input = decode_pbf_fixture(workspace.root(), "city_block");
    let output_dir = workspace.root().join("city_csv");

    let report = run_convert(convert_args(&input, &output_dir)).expect("conversion succeeds");

    assert_eq!(report.counts.total(), 5);
    assert!(report.decode_error.is_none());
    assert_eq!(report.output_dir, output_dir);
    let names: Vec<&str> = report
        .tables
        .iter()
        .filter_map(|table| table.path.file_name())
        .collect();
    assert_eq!(
        names,
        vec![
            "nodes.csv",
            "ways.csv",
            "relations.csv",
            "nodes_tags.csv",
            "ways_tags.csv",
            "relations_tags.csv",
        ]
    );
    assert!(report.readme.is_file());
    let ways = fs::read(output_dir.join("ways.csv")).expect("ways.csv");
    assert_eq!(ways, b"id,node_ids,nodes_count\n10,1;2;3;1,4\n");
}

#[rstest]
fn conversion_reports_partial_input() {
    let workspace = Workspace::new();
    let input = decode_pbf_fixture(workspace.root(), "truncated");
    let output_dir = workspace.root().join("partial");

    let report = run_convert(convert_args(&input, &output_dir)).expect("partial data is kept");

    assert_eq!(report.counts.nodes, 50);
    assert!(report.decode_error.is_some());
    assert_eq!(report.tables.len(), 1);
    assert!(report.to_string().contains("Decoding stopped early"));
}

#[rstest]
fn stat_counts_fixture_entities() {
    let workspace = Workspace::new();
    let input = decode_pbf_fixture(workspace.root(), "city_block");
    let stats = file_stats(&input).expect("stats");
    assert_eq!(stats.file_name, "city_block.osm.pbf");
    assert_eq!(stats.counts.nodes, 3);
}

#[rstest]
fn conversion_rejects_input_without_header() {
    let workspace = Workspace::new();
    let input = workspace.root().join("empty.osm.pbf");
    fs::write(&input, b"").expect("write empty input");
    let output_dir = workspace.root().join("empty_csv");

    let err = run_convert(convert_args(&input, &output_dir)).expect_err("no header");

    assert!(
        matches!(
            err,
            CliError::OsmIngest(osmtab_data::OsmIngestError::InvalidHeader { .. })
        ),
        "unexpected {err:?}"
    );
    assert!(!output_dir.exists(), "nothing is written for a rejected input");
}
