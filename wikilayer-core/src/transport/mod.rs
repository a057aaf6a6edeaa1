//! Fire-and-forget geosearch requests.
//!
//! A [`GeoSearchTransport`] accepts a [`GeoSearchRequest`], returns a
//! [`RequestId`] immediately and later hands the host event loop a
//! [`Completion`] carrying the same id. Transports never retry and never
//! cancel; detaching a layer leaves in-flight requests running and the layer
//! ignores their completions.

mod error;
mod sequence;

pub use error::TransportError;
pub use sequence::{RequestId, RequestSequence};

use crate::geosearch::GeoSearchResponse;
use crate::planner::SearchQuery;

/// A geosearch request: an endpoint and its query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoSearchRequest {
    /// API endpoint, possibly already carrying a query string.
    pub endpoint: String,
    /// Ordered parameters to append to the endpoint.
    pub parameters: Vec<(&'static str, String)>,
}

impl GeoSearchRequest {
    /// Request for `query` against `endpoint`.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use wikilayer_core::{GeoSearchRequest, SearchQuery};
    ///
    /// let query = SearchQuery {
    ///     center: Coord { x: 0.0, y: 0.0 },
    ///     radius_meters: 500.0,
    ///     result_limit: 10,
    /// };
    /// let request = GeoSearchRequest::new("https://en.wikipedia.org/w/api.php", &query);
    /// assert_eq!(request.parameters.len(), 6);
    /// ```
    #[must_use]
    pub fn new(endpoint: impl Into<String>, query: &SearchQuery) -> Self {
        Self {
            endpoint: endpoint.into(),
            parameters: query.parameters(),
        }
    }

    /// Value of parameter `key`, if present.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Outcome of a dispatched request, delivered on the host event loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Id returned by [`GeoSearchTransport::dispatch`].
    pub request: RequestId,
    /// Parsed response or the reason none arrived.
    pub outcome: Result<GeoSearchResponse, TransportError>,
}

impl Completion {
    /// Successful completion.
    #[must_use]
    pub const fn success(request: RequestId, response: GeoSearchResponse) -> Self {
        Self {
            request,
            outcome: Ok(response),
        }
    }

    /// Failed completion.
    #[must_use]
    pub const fn failure(request: RequestId, error: TransportError) -> Self {
        Self {
            request,
            outcome: Err(error),
        }
    }
}

/// Asynchronous request-by-URL primitive.
///
/// Implementations own a [`RequestSequence`] so ids are unique per transport
/// instance rather than per process.
pub trait GeoSearchTransport {
    /// Issue `request` without waiting for it to finish.
    fn dispatch(&mut self, request: GeoSearchRequest) -> RequestId;
}
