//! The Wikipedia marker layer and its attach/detach lifecycle.
//!
//! ```text
//! Detached --on_add--> Attached --on_remove--> Detached
//!                      |      ^
//!                      +------+  on_viewport_change / handle_completion
//! ```
//!
//! Attaching subscribes to viewport changes and immediately refreshes.
//! Each refresh either dispatches one geosearch request or, when the zoom gate
//! rejects the current zoom, clears every marker. Completions are applied as
//! they arrive. A completion is ignored when it lands after detachment, when it
//! answers a request issued before the most recent detachment, or when the
//! host's zoom is outside the gate by the time it lands.

use log::{debug, warn};

use crate::geosearch::PageId;
use crate::host::{MapHost, MapLayer};
use crate::marker::WikipediaMarker;
use crate::options::{LayerOptions, LayerOptionsError};
use crate::planner::{build_query, is_query_allowed};
use crate::reconcile::{MarkerSetReconciler, ReconcileReport};
use crate::transport::{Completion, GeoSearchRequest, GeoSearchTransport, RequestId};

/// Whether the layer is on a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerState {
    /// Not on a map; the registry is empty.
    Detached,
    /// On a map and subscribed to viewport changes.
    Attached,
}

/// Layer showing nearby Wikipedia articles as markers.
///
/// `T` is the transport used to fetch results and `K` the host's marker
/// handle type.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wikilayer_core::test_support::QueuedTransport;
/// use wikilayer_core::{HeadlessMap, LayerOptions, MapLayer, Viewport, WikipediaLayer};
///
/// # fn main() -> Result<(), wikilayer_core::LayerOptionsError> {
/// let viewport = Viewport::around(Coord { x: -0.12, y: 51.5 }, Coord { x: 0.02, y: 0.01 }, 15);
/// let mut map = HeadlessMap::new(viewport);
/// let mut layer: WikipediaLayer<_, u64> =
///     WikipediaLayer::new(LayerOptions::default(), QueuedTransport::default())?;
///
/// layer.on_add(&mut map);
///
/// assert!(layer.is_attached());
/// assert_eq!(layer.transport().dispatched().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WikipediaLayer<T, K> {
    options: LayerOptions,
    transport: T,
    reconciler: MarkerSetReconciler<K>,
    state: LayerState,
    latest_request: Option<RequestId>,
    dispatched_through: Option<RequestId>,
    retired_through: Option<RequestId>,
}

impl<T, K> WikipediaLayer<T, K>
where
    T: GeoSearchTransport,
{
    /// Detached layer using `options` and `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`LayerOptionsError`] when `options` fail validation.
    pub fn new(options: LayerOptions, transport: T) -> Result<Self, LayerOptionsError> {
        options.validate()?;
        let reconciler = MarkerSetReconciler::new(options.clear_outside_bounds);
        Ok(Self {
            options,
            transport,
            reconciler,
            state: LayerState::Detached,
            latest_request: None,
            dispatched_through: None,
            retired_through: None,
        })
    }

    /// Layer options.
    #[must_use]
    pub const fn options(&self) -> &LayerOptions {
        &self.options
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> LayerState {
        self.state
    }

    /// Whether the layer is on a map.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.state == LayerState::Attached
    }

    /// The transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the transport.
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Most recently dispatched request, if any.
    ///
    /// Reset when the zoom gate clears the map and on detachment, so no
    /// earlier request counts as current afterwards.
    #[must_use]
    pub const fn latest_request(&self) -> Option<RequestId> {
        self.latest_request
    }

    /// Number of markers currently displayed.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.reconciler.registry().len()
    }

    /// Page ids currently displayed, ascending.
    pub fn displayed_ids(&self) -> impl Iterator<Item = PageId> + '_ {
        self.reconciler.registry().ids()
    }

    /// Plan and dispatch a query for the host's current viewport.
    ///
    /// Returns the id of the dispatched request. Returns `None`, dispatching
    /// nothing, when the layer is detached or when the zoom gate rejects the
    /// current zoom; in the latter case every marker is cleared.
    pub fn refresh<H>(&mut self, host: &mut H) -> Option<RequestId>
    where
        H: MapHost<Handle = K>,
    {
        if !self.is_attached() {
            debug!("ignoring refresh while detached");
            return None;
        }
        let viewport = host.viewport();
        if !is_query_allowed(viewport.zoom, self.options.min_zoom, self.options.max_zoom) {
            self.latest_request = None;
            let removed = self.reconciler.clear(host);
            debug!(
                "zoom {} outside gate {:?}..={:?}; cleared {removed} markers",
                viewport.zoom, self.options.min_zoom, self.options.max_zoom
            );
            return None;
        }
        let query = build_query(viewport.center, &viewport.bounds, self.options.limit);
        let request = GeoSearchRequest::new(self.options.api_url(), &query);
        let id = self.transport.dispatch(request);
        debug!(
            "dispatched geosearch {id} at {}|{} radius {}m",
            query.center.y, query.center.x, query.radius_meters
        );
        self.latest_request = Some(id);
        self.dispatched_through = self.dispatched_through.max(Some(id));
        Some(id)
    }

    /// Apply a completion delivered by the transport.
    ///
    /// Returns the pass report, or `None` when the completion was ignored:
    /// the layer is detached, the request predates the last detachment, the
    /// host's zoom is outside the gate, the request failed, or stale responses
    /// are being discarded and the request is not the latest.
    pub fn handle_completion<H>(
        &mut self,
        host: &mut H,
        completion: Completion,
    ) -> Option<ReconcileReport>
    where
        H: MapHost<Handle = K>,
    {
        if !self.is_attached() {
            debug!("ignoring completion {} after detach", completion.request);
            return None;
        }
        if self
            .retired_through
            .is_some_and(|retired| completion.request <= retired)
        {
            debug!(
                "ignoring completion {} issued before the last detach",
                completion.request
            );
            return None;
        }
        let zoom = host.viewport().zoom;
        if !is_query_allowed(zoom, self.options.min_zoom, self.options.max_zoom) {
            debug!(
                "ignoring completion {} at zoom {zoom} outside the gate",
                completion.request
            );
            return None;
        }
        if self.options.discard_stale_responses
            && self.latest_request != Some(completion.request)
        {
            debug!(
                "discarding stale completion {}; latest is {:?}",
                completion.request, self.latest_request
            );
            return None;
        }
        let response = match completion.outcome {
            Ok(response) => response,
            Err(err) => {
                warn!("geosearch {} failed: {err}", completion.request);
                return None;
            }
        };
        let results = response.into_results(&self.options);
        let bounds = host.viewport().bounds;
        let options = &self.options;
        Some(
            self.reconciler
                .reconcile(host, &results, &bounds, |result| {
                    WikipediaMarker::from_result(result, options)
                }),
        )
    }

    /// Remove every displayed marker.
    pub fn clear<H>(&mut self, host: &mut H) -> usize
    where
        H: MapHost<Handle = K>,
    {
        self.reconciler.clear(host)
    }
}

impl<T, H> MapLayer<H> for WikipediaLayer<T, H::Handle>
where
    T: GeoSearchTransport,
    H: MapHost,
{
    fn on_add(&mut self, host: &mut H) {
        if self.is_attached() {
            debug!("layer already attached");
            return;
        }
        host.subscribe_viewport_changes();
        self.state = LayerState::Attached;
        debug!("layer attached");
        self.refresh(host);
    }

    fn on_remove(&mut self, host: &mut H) {
        if !self.is_attached() {
            return;
        }
        host.unsubscribe_viewport_changes();
        let removed = self.reconciler.clear(host);
        self.latest_request = None;
        self.retired_through = self.dispatched_through;
        self.state = LayerState::Detached;
        debug!("layer detached; cleared {removed} markers");
    }

    fn on_viewport_change(&mut self, host: &mut H) {
        self.refresh(host);
    }
}
