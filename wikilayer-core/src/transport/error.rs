use thiserror::Error;

/// Reasons a geosearch request produced no response.
///
/// These never reach the host as failures; the layer logs them and leaves
/// the displayed markers unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The endpoint and parameters did not form a valid URL.
    #[error("invalid request URL {url}: {message}")]
    InvalidUrl {
        /// Offending endpoint.
        url: String,
        /// Parser message.
        message: String,
    },
    /// The connection failed before a response arrived.
    #[error("network error fetching {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Underlying error message.
        message: String,
    },
    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {url}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Underlying error message.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The body was not a geosearch JSON document.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Decoder message.
        message: String,
    },
}
