//! Shared test harness modules for the `wikilayer` CLI.

use super::*;

mod helpers;
mod nearby_steps;
