//! Core domain types for the Wikilayer marker engine.
//!
//! The crate turns a map viewport into a bounded Wikipedia geosearch query
//! and keeps the set of displayed article markers in step with the results.
//! The host map widget and the network are modelled as capability traits
//! ([`MapHost`], [`GeoSearchTransport`]) so the engine can be driven from any
//! single-threaded event loop.
//!
//! Coordinates are WGS84 with `x = longitude` and `y = latitude`.

#![forbid(unsafe_code)]

pub mod geosearch;
pub mod host;
pub mod layer;
pub mod marker;
pub mod options;
pub mod planner;
pub mod reconcile;
pub mod transport;
pub mod viewport;

#[doc(hidden)]
pub mod test_support;

pub use geosearch::{GeoSearchHit, GeoSearchResponse, PageId, SearchResult};
pub use host::{HeadlessMap, MapHost, MapLayer};
pub use layer::{LayerState, WikipediaLayer};
pub use marker::{MarkerIcon, Popup, WikipediaIcon, WikipediaMarker};
pub use options::{LayerOptions, LayerOptionsError};
pub use planner::{
    MAX_SEARCH_RADIUS_METERS, SearchQuery, build_query, compute_radius, is_query_allowed,
};
pub use reconcile::{MarkerRegistry, MarkerSetReconciler, ReconcileReport, RegisteredMarker};
pub use transport::{
    Completion, GeoSearchRequest, GeoSearchTransport, RequestId, RequestSequence, TransportError,
};
pub use viewport::{Viewport, ViewportBounds};
