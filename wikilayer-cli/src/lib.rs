//! Command-line interface for listing Wikipedia articles near a point.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod nearby;

pub use error::CliError;
use nearby::{HttpSearchBackend, NearbyArgs, run_nearby};

const ARG_LAT: &str = "lat";
const ARG_LNG: &str = "lng";
const ARG_SPAN_LAT: &str = "span-lat";
const ARG_SPAN_LNG: &str = "span-lng";
const ARG_ZOOM: &str = "zoom";
const ARG_BASE_URL: &str = "base-url";
const ARG_LIMIT: &str = "limit";
const ARG_TARGET: &str = "target";
const ARG_MIN_ZOOM: &str = "min-zoom";
const ARG_MAX_ZOOM: &str = "max-zoom";
const ARG_CLEAR_OUTSIDE_BOUNDS: &str = "clear-outside-bounds";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_USER_AGENT: &str = "user-agent";
const ENV_LAT: &str = "WIKILAYER_CMDS_NEARBY_LAT";
const ENV_LNG: &str = "WIKILAYER_CMDS_NEARBY_LNG";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration layering, the
/// search or writing the output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Nearby(args) => {
            let mut stdout = std::io::stdout().lock();
            run_nearby(args, &mut HttpSearchBackend::default(), &mut stdout)
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "wikilayer",
    about = "Show the Wikipedia articles a map layer would display",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List geotagged articles inside a viewport.
    Nearby(NearbyArgs),
}

#[cfg(test)]
mod tests;
