//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use wikilayer_cli::CliError;

fn main() {
    match wikilayer_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("wikilayer: {err}");
            std::process::exit(1);
        }
    }
}
