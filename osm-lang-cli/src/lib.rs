//! Command-line interface for building multilingual OSM training sets.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod build;
mod error;

pub use error::CliError;

use build::{BuildArgs, run_build};

const ARG_STREETS_FILE: &str = "streets-file";
const ARG_ADDRESS_FILE: &str = "address-file";
const ARG_VENUES_FILE: &str = "venues-file";
const ARG_BORDERS_FILE: &str = "borders-file";
const ARG_FORMAT_ONLY: &str = "format-only";
const ARG_UNTAGGED: &str = "untagged";
const ARG_LIMITED_ADDRESSES: &str = "limited-addresses";
const ARG_INDEX_DIR: &str = "index-dir";
const ARG_OUT_DIR: &str = "out-dir";
const ARG_STRIP_KEY: &str = "strip-key";
const ENV_INDEX_DIR: &str = "OSM_LANG_CMDS_BUILD_INDEX_DIR";

/// Run the osm-lang CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Build(args) => run_build(args),
    }
}

/// Install the `tracing` subscriber that also receives `log` records.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // Keep an already installed subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug, Parser)]
#[command(
    name = "osm-lang",
    about = "Build language-labelled training sets from OpenStreetMap extracts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Attribute OSM names to languages and write the training sets.
    Build(BuildArgs),
}

#[cfg(test)]
mod tests;
