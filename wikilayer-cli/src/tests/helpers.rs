//! Test helpers: a canned search backend and sample API responses.

use crate::CliError;
use crate::nearby::SearchBackend;
use wikilayer_core::test_support::{QueuedTransport, hit, response_with};
use wikilayer_core::{Completion, GeoSearchResponse, RequestId, TransportError};
use wikilayer_data::transport::HttpTransportConfig;

/// Backend answering every request with the same outcome.
#[derive(Debug)]
pub(super) struct StubBackend {
    outcome: Option<Result<GeoSearchResponse, TransportError>>,
    requests: Vec<RequestId>,
    connected: Option<HttpTransportConfig>,
}

impl StubBackend {
    pub(super) fn answering(response: GeoSearchResponse) -> Self {
        Self::with_outcome(Some(Ok(response)))
    }

    pub(super) fn failing(error: TransportError) -> Self {
        Self::with_outcome(Some(Err(error)))
    }

    pub(super) fn closed() -> Self {
        Self::with_outcome(None)
    }

    fn with_outcome(outcome: Option<Result<GeoSearchResponse, TransportError>>) -> Self {
        Self {
            outcome,
            requests: Vec::new(),
            connected: None,
        }
    }

    pub(super) fn requests(&self) -> &[RequestId] {
        &self.requests
    }

    pub(super) fn connected_with(&self) -> Option<&HttpTransportConfig> {
        self.connected.as_ref()
    }
}

impl SearchBackend for StubBackend {
    type Transport = QueuedTransport;

    fn connect(&mut self, config: &HttpTransportConfig) -> Result<Self::Transport, CliError> {
        self.connected = Some(config.clone());
        Ok(QueuedTransport::default())
    }

    fn next_completion(&mut self, request: RequestId) -> Option<Completion> {
        self.requests.push(request);
        let outcome = self.outcome.clone()?;
        Some(Completion { request, outcome })
    }
}

/// Two articles inside a 0.02 degree viewport around Trafalgar Square.
pub(super) fn trafalgar_response() -> GeoSearchResponse {
    response_with(vec![
        hit(1, 51.5080, -0.1281, "Trafalgar Square"),
        hit(2, 51.5101, -0.1340, "Covent Garden"),
    ])
}
