//! Test doubles for the host map and the transport, used by unit and
//! behaviour tests.

use std::collections::BTreeSet;

use geo::Coord;

use crate::geosearch::{GeoSearchHit, GeoSearchQuery, GeoSearchResponse, PageId};
use crate::host::{HeadlessMap, MapHost};
use crate::marker::WikipediaMarker;
use crate::transport::{
    Completion, GeoSearchRequest, GeoSearchTransport, RequestId, RequestSequence, TransportError,
};
use crate::viewport::{Viewport, ViewportBounds};

/// [`HeadlessMap`] that also records every add and remove call.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    map: HeadlessMap,
    added: Vec<PageId>,
    removed: Vec<PageId>,
    handles: Vec<(u64, PageId)>,
}

impl RecordingHost {
    /// Empty host showing `viewport`.
    #[must_use]
    pub const fn new(viewport: Viewport) -> Self {
        Self {
            map: HeadlessMap::new(viewport),
            added: Vec::new(),
            removed: Vec::new(),
            handles: Vec::new(),
        }
    }

    /// Move the map.
    pub const fn set_viewport(&mut self, viewport: Viewport) {
        self.map.set_viewport(viewport);
    }

    /// Whether a layer is subscribed to viewport changes.
    #[must_use]
    pub const fn is_subscribed(&self) -> bool {
        self.map.is_subscribed()
    }

    /// Number of markers on the surface.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.map.marker_count()
    }

    /// Page ids on the surface.
    #[must_use]
    pub fn displayed_ids(&self) -> BTreeSet<PageId> {
        self.map.marker_ids().collect()
    }

    /// Markers on the surface.
    pub fn markers(&self) -> impl Iterator<Item = &WikipediaMarker> {
        self.map.markers()
    }

    /// Page ids passed to `add_marker`, in call order.
    #[must_use]
    pub fn added(&self) -> &[PageId] {
        &self.added
    }

    /// Page ids whose markers were passed to `remove_marker`, in call order.
    #[must_use]
    pub fn removed(&self) -> &[PageId] {
        &self.removed
    }
}

impl MapHost for RecordingHost {
    type Handle = u64;

    fn viewport(&self) -> Viewport {
        self.map.viewport()
    }

    fn subscribe_viewport_changes(&mut self) {
        self.map.subscribe_viewport_changes();
    }

    fn unsubscribe_viewport_changes(&mut self) {
        self.map.unsubscribe_viewport_changes();
    }

    fn add_marker(&mut self, marker: WikipediaMarker) -> Self::Handle {
        let id = marker.id;
        let handle = self.map.add_marker(marker);
        self.added.push(id);
        self.handles.push((handle, id));
        handle
    }

    fn remove_marker(&mut self, handle: Self::Handle) {
        if let Some((_, id)) = self.handles.iter().find(|(known, _)| *known == handle) {
            self.removed.push(*id);
        }
        self.map.remove_marker(handle);
    }
}

/// Transport that records requests and completes them on demand.
#[derive(Debug, Default)]
pub struct QueuedTransport {
    sequence: RequestSequence,
    dispatched: Vec<(RequestId, GeoSearchRequest)>,
}

impl QueuedTransport {
    /// Every request dispatched so far, oldest first.
    #[must_use]
    pub fn dispatched(&self) -> &[(RequestId, GeoSearchRequest)] {
        &self.dispatched
    }

    /// Most recent request id.
    #[must_use]
    pub const fn last_issued(&self) -> Option<RequestId> {
        self.sequence.last_issued()
    }

    /// Successful completion of `request` carrying `response`.
    #[must_use]
    pub const fn complete(&self, request: RequestId, response: GeoSearchResponse) -> Completion {
        Completion::success(request, response)
    }

    /// Failed completion of `request`.
    #[must_use]
    pub const fn fail(&self, request: RequestId, error: TransportError) -> Completion {
        Completion::failure(request, error)
    }
}

impl GeoSearchTransport for QueuedTransport {
    fn dispatch(&mut self, request: GeoSearchRequest) -> RequestId {
        let id = self.sequence.next_id();
        self.dispatched.push((id, request));
        id
    }
}

/// Geosearch hit at (`lat`, `lon`).
#[must_use]
pub fn hit(id: u64, lat: f64, lon: f64, title: &str) -> GeoSearchHit {
    GeoSearchHit {
        pageid: PageId(id),
        title: title.to_owned(),
        lat,
        lon,
        dist: None,
        ns: Some(0),
    }
}

/// Response carrying `hits`.
#[must_use]
pub fn response_with(hits: Vec<GeoSearchHit>) -> GeoSearchResponse {
    GeoSearchResponse {
        query: Some(GeoSearchQuery { geosearch: hits }),
        error: None,
    }
}

/// Bounds from west, north, east and south edges in degrees.
#[must_use]
pub const fn bounds(west: f64, north: f64, east: f64, south: f64) -> ViewportBounds {
    ViewportBounds::new(Coord { x: west, y: north }, Coord { x: east, y: south })
}
