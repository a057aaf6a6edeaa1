//! HTTP geosearch transport for the MediaWiki API.
//!
//! [`HttpGeoSearchTransport`] implements the fire-and-forget
//! [`wikilayer_core::GeoSearchTransport`] capability. Each dispatch spawns a
//! GET request on a Tokio runtime and sends the resulting
//! [`wikilayer_core::Completion`] down an unbounded channel. The host event
//! loop drains the paired [`CompletionReceiver`] and hands each completion to
//! the layer, so all marker mutation stays on the host's thread.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use wikilayer_core::{HeadlessMap, LayerOptions, MapLayer, Viewport, WikipediaLayer};
//! use wikilayer_data::transport::{HttpGeoSearchTransport, HttpTransportConfig};
//! use geo::Coord;
//!
//! let config = HttpTransportConfig::default()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-map/1.0");
//! let (transport, mut completions) = HttpGeoSearchTransport::with_config(config)?;
//!
//! let viewport = Viewport::around(Coord { x: -0.12, y: 51.5 }, Coord { x: 0.02, y: 0.01 }, 15);
//! let mut map = HeadlessMap::new(viewport);
//! let mut layer: WikipediaLayer<_, u64> = WikipediaLayer::new(LayerOptions::default(), transport)?;
//! layer.on_add(&mut map);
//!
//! if let Some(completion) = completions.blocking_recv() {
//!     layer.handle_completion(&mut map, completion);
//! }
//! println!("{} articles nearby", map.marker_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod provider;

pub use provider::{
    CompletionReceiver, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpGeoSearchTransport,
    HttpTransportConfig, ProviderBuildError, request_url,
};
