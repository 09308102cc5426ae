//! Shared test harness modules for the osm-lang CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;
use crate::build::{BuildArgs, BuildConfig, BuildJob, config_from_layers_for_test, execute_build};

mod helpers;
mod steps;
