//! Error types emitted by the CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>`.

use std::sync::Arc;

use thiserror::Error;
use wikilayer_core::{LayerOptionsError, TransportError};
use wikilayer_data::transport::ProviderBuildError;

/// Errors emitted by the `wikilayer` CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A coordinate or span lies outside its valid range.
    #[error("{field} {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// The merged layer options are inconsistent.
    #[error("invalid layer options: {0}")]
    LayerOptions(#[from] LayerOptionsError),
    /// Constructing the HTTP transport failed.
    #[error("failed to build geosearch transport: {source}")]
    BuildTransport {
        #[source]
        source: ProviderBuildError,
    },
    /// The transport stopped delivering completions.
    #[error("geosearch transport closed before request {request} completed")]
    TransportClosed { request: String },
    /// The geosearch request failed.
    #[error("geosearch failed: {0}")]
    Search(#[source] TransportError),
    /// Serializing the marker list failed.
    #[error("failed to serialize markers: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the marker list failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
