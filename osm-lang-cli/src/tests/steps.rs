//! Behaviour-driven step definitions driving the build CLI scenarios.

use super::helpers::{Workspace, build_from_args, parse_build};
use super::*;
use osm_lang_data::{TrainingReport, TrainingSet};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

type BuildOutcome = Result<Vec<(TrainingSet, TrainingReport)>, CliError>;

/// Aggregates build scenario state so each step only needs a single world
/// argument.
struct BuildWorld {
    workspace: Workspace,
    cli_args: RefCell<Vec<String>>,
    outcome: RefCell<Option<BuildOutcome>>,
}

impl BuildWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            cli_args: RefCell::new(Vec::new()),
            outcome: RefCell::new(None),
        }
    }

    fn push_args<I, S>(&self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cli_args
            .borrow_mut()
            .extend(args.into_iter().map(Into::into));
    }

    fn error(&self) -> String {
        match self.outcome.borrow().as_ref() {
            Some(Err(err)) => err.to_string(),
            Some(Ok(reports)) => panic!("expected the build to fail, found {reports:?}"),
            None => panic!("the build command did not run"),
        }
    }
}

#[fixture]
fn world() -> BuildWorld {
    BuildWorld::new()
}

#[given("an index directory and OSM extracts on disk")]
fn workspace_exists(#[from(world)] world: &BuildWorld) {
    let workspace = &world.workspace;
    assert!(workspace.index_dir().join("regions.olri").is_file());
    assert!(workspace.ways().is_file());
    assert!(workspace.addresses().is_file());
}

#[given("I pass the streets and address extracts with the format-only flag")]
fn cli_streets_and_formatted(#[from(world)] world: &BuildWorld) {
    let workspace = &world.workspace;
    world.push_args([
        format!("--{ARG_STREETS_FILE}"),
        workspace.ways().into_string(),
        format!("--{ARG_ADDRESS_FILE}"),
        workspace.addresses().into_string(),
        format!("--{ARG_FORMAT_ONLY}"),
        format!("--{ARG_INDEX_DIR}"),
        workspace.index_dir().into_string(),
        format!("--{ARG_OUT_DIR}"),
        workspace.out_dir().into_string(),
    ]);
}

#[given("I pass only the streets extract")]
fn cli_only_streets(#[from(world)] world: &BuildWorld) {
    world.push_args([
        format!("--{ARG_STREETS_FILE}"),
        world.workspace.ways().into_string(),
    ]);
}

#[given("I pass the streets extract with an output path that is a file")]
fn cli_out_dir_is_file(#[from(world)] world: &BuildWorld) {
    let workspace = &world.workspace;
    let out_file = workspace.root().join("out.tsv");
    std::fs::write(&out_file, b"previous rows").expect("write output file");
    world.push_args([
        format!("--{ARG_STREETS_FILE}"),
        workspace.ways().into_string(),
        format!("--{ARG_INDEX_DIR}"),
        workspace.index_dir().into_string(),
        format!("--{ARG_OUT_DIR}"),
        out_file.into_string(),
    ]);
}

#[when("I run the build command")]
fn run_build_command(#[from(world)] world: &BuildWorld) {
    let args: Vec<String> = world.cli_args.borrow().clone();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let outcome = parse_build(&args).and_then(build_from_args);
    world.outcome.replace(Some(outcome));
}

#[then("the streets and tagged formatted address sets are written")]
fn sets_written(#[from(world)] world: &BuildWorld) {
    let outcome = world.outcome.borrow();
    let reports = match outcome.as_ref() {
        Some(Ok(reports)) => reports,
        other => panic!("expected a successful build, found {other:?}"),
    };
    let sets: Vec<TrainingSet> = reports.iter().map(|(set, _)| *set).collect();
    assert_eq!(
        sets,
        [
            TrainingSet::Streets,
            TrainingSet::FormattedAddresses { tagged: true }
        ]
    );

    let workspace = &world.workspace;
    assert_eq!(
        workspace.output(TrainingSet::Streets),
        "en\tca\tMain Street\nfr\tca\tRue Principale\n"
    );
    assert_eq!(
        workspace.output(TrainingSet::FormattedAddresses { tagged: true }),
        "fr\tca\t1455/house_number Rue/road Sainte-Catherine/road | Montréal/city H3G/postcode 1M8/postcode\n"
    );
}

#[then("the command fails because the index directory is missing")]
fn index_dir_missing(#[from(world)] world: &BuildWorld) {
    assert_eq!(
        world.error(),
        format!("missing {ARG_INDEX_DIR} (set --{ARG_INDEX_DIR} or {ENV_INDEX_DIR})")
    );
}

#[then("the command fails because the output directory is a file")]
fn out_dir_is_file(#[from(world)] world: &BuildWorld) {
    assert!(
        world.error().contains("is not a directory"),
        "unexpected error: {}",
        world.error()
    );
}

#[then("no training set is written")]
fn nothing_written(#[from(world)] world: &BuildWorld) {
    let out_file = world.workspace.root().join("out.tsv");
    assert_eq!(
        std::fs::read_to_string(out_file).expect("read output file"),
        "previous rows"
    );
    assert!(!world.workspace.out_dir().exists());
}

macro_rules! register_build_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/build_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: BuildWorld) {
            let _ = world;
        }
    };
}

register_build_scenario!(
    cli_flag_build,
    "building streets and tagged addresses from CLI flags"
);
register_build_scenario!(rejecting_missing_index_dir, "rejecting a missing index directory");
register_build_scenario!(refusing_file_out_dir, "refusing to write into a file");
