//! Facade crate for the Wikilayer marker engine.
//!
//! This crate re-exports the core planning and reconciliation types and, with
//! the `http` feature, the reqwest-backed geosearch transport.

#![forbid(unsafe_code)]

pub use wikilayer_core::{
    Completion, GeoSearchHit, GeoSearchRequest, GeoSearchResponse, GeoSearchTransport,
    HeadlessMap, LayerOptions, LayerOptionsError, LayerState, MapHost, MapLayer, MarkerIcon,
    MarkerRegistry, MarkerSetReconciler, PageId, Popup, ReconcileReport, RequestId,
    RequestSequence, SearchQuery, SearchResult, TransportError, Viewport, ViewportBounds,
    WikipediaIcon, WikipediaLayer, WikipediaMarker,
};

#[cfg(feature = "http")]
pub use wikilayer_data::transport::{
    CompletionReceiver, HttpGeoSearchTransport, HttpTransportConfig, ProviderBuildError,
};
