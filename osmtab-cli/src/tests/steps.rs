//! Behaviour-driven step definitions driving the converter scenarios.

use super::helpers::{Workspace, decode_pbf_fixture};
use super::*;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::{cell::RefCell, fs};

/// Aggregates converter scenario state so each step only needs a single world
/// argument.
struct ConvertWorld {
    workspace: Workspace,
    input: RefCell<Option<Utf8PathBuf>>,
    cli_args: RefCell<Vec<String>>,
    result: RefCell<Option<Result<ConversionReport, CliError>>>,
}

impl ConvertWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            input: RefCell::new(None),
            cli_args: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn output_dir(&self) -> Utf8PathBuf {
        self.workspace.root().join("tables")
    }

    fn input(&self) -> Utf8PathBuf {
        self.input
            .borrow()
            .clone()
            .expect("input should be prepared")
    }

    fn expect_error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("converter should have run")
                .as_ref()
                .expect_err("expected an error")
        })
    }
}

#[fixture]
fn world() -> ConvertWorld {
    ConvertWorld::new()
}

#[given("a PBF extract on disk")]
fn extract_on_disk(#[from(world)] world: &ConvertWorld) {
    let input = decode_pbf_fixture(world.workspace.root(), "city_block");
    world.input.replace(Some(input));
}

#[given("I pass the extract and an output directory")]
fn pass_extract_and_output(#[from(world)] world: &ConvertWorld) {
    let input = world.input();
    world
        .cli_args
        .borrow_mut()
        .extend([input.into_string(), world.output_dir().into_string()]);
}

#[given("I pass a path that does not exist")]
fn pass_missing_path(#[from(world)] world: &ConvertWorld) {
    let missing = world.workspace.root().join("absent.osm.pbf");
    world
        .cli_args
        .borrow_mut()
        .extend([missing.into_string(), world.output_dir().into_string()]);
}

#[given("I pass an existing file as the output directory")]
fn pass_file_as_output(#[from(world)] world: &ConvertWorld) {
    let output = world.output_dir();
    fs::write(&output, b"occupied").expect("write blocking file");
    world
        .cli_args
        .borrow_mut()
        .extend([world.input().into_string(), output.into_string()]);
}

#[when("I run the converter")]
fn run_converter(#[from(world)] world: &ConvertWorld) {
    let mut invocation = vec!["osmtab".to_owned()];
    invocation.extend(world.cli_args.borrow().iter().cloned());
    let outcome = ConvertArgs::try_parse_from(invocation)
        .map_err(CliError::ArgumentParsing)
        .and_then(run_convert);
    world.result.replace(Some(outcome));
}

#[then("the report lists {count} tables")]
fn report_lists_tables(#[from(world)] world: &ConvertWorld, count: usize) {
    let borrowed = world.result.borrow();
    let report = borrowed
        .as_ref()
        .expect("converter should have run")
        .as_ref()
        .expect("expected success");
    assert_eq!(report.tables.len(), count);
    assert_eq!(report.output_dir, world.output_dir());
}

#[then("the output directory holds a README")]
fn output_holds_readme(#[from(world)] world: &ConvertWorld) {
    let readme = world.output_dir().join("README.txt");
    assert!(readme.is_file(), "expected {readme} to exist");
}

#[then("the CLI reports that the input file is missing")]
fn reports_missing_input(#[from(world)] world: &ConvertWorld) {
    match &*world.expect_error() {
        CliError::MissingSourceFile { field, .. } => assert_eq!(*field, ARG_INPUT),
        other => panic!("unexpected error {other:?}"),
    }
}

#[then("the CLI reports that the output path is not a directory")]
fn reports_blocked_output(#[from(world)] world: &ConvertWorld) {
    match &*world.expect_error() {
        CliError::OutputDirectoryNotDirectory { path } => {
            assert_eq!(*path, world.output_dir());
        }
        other => panic!("unexpected error {other:?}"),
    }
}

macro_rules! register_convert_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/convert_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: ConvertWorld) {
            let _ = world;
        }
    };
}

register_convert_scenario!(
    converting_into_output_dir,
    "converting into an explicit output directory"
);
register_convert_scenario!(rejecting_missing_input, "rejecting a missing input file");
register_convert_scenario!(
    rejecting_blocked_output,
    "rejecting an output path occupied by a file"
);
