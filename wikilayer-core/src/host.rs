//! Capabilities consumed from, and offered to, the host map widget.
//!
//! The host owns rendering, projection and the event loop. It exposes the
//! current viewport and a marker surface through [`MapHost`], and drives
//! layers through [`MapLayer`].

use std::collections::BTreeMap;

use crate::geosearch::PageId;
use crate::marker::WikipediaMarker;
use crate::viewport::Viewport;

/// Map widget operations a layer relies on.
pub trait MapHost {
    /// Opaque handle identifying a marker on the surface.
    type Handle;

    /// Current visible area and zoom.
    fn viewport(&self) -> Viewport;

    /// Start delivering viewport-change signals to the layer.
    fn subscribe_viewport_changes(&mut self);

    /// Stop delivering viewport-change signals to the layer.
    fn unsubscribe_viewport_changes(&mut self);

    /// Place `marker` on the surface and return its handle.
    fn add_marker(&mut self, marker: WikipediaMarker) -> Self::Handle;

    /// Remove the marker identified by `handle` from the surface.
    fn remove_marker(&mut self, handle: Self::Handle);
}

/// Lifecycle hooks the host invokes on a layer.
pub trait MapLayer<H: MapHost> {
    /// The layer was added to the map.
    fn on_add(&mut self, host: &mut H);

    /// The layer was removed from the map.
    fn on_remove(&mut self, host: &mut H);

    /// The viewport moved or zoomed while the layer was subscribed.
    fn on_viewport_change(&mut self, host: &mut H);
}

/// In-memory host without a display.
///
/// Useful for command-line tools and servers that want the layer's
/// reconciliation behaviour without a widget. Handles are sequential
/// integers that are never reused.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wikilayer_core::{HeadlessMap, MapHost, Viewport};
///
/// let viewport = Viewport::around(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }, 10);
/// let map = HeadlessMap::new(viewport);
/// assert_eq!(map.viewport(), viewport);
/// assert_eq!(map.marker_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    viewport: Viewport,
    subscribed: bool,
    next_handle: u64,
    markers: BTreeMap<u64, WikipediaMarker>,
}

impl HeadlessMap {
    /// Empty map showing `viewport`.
    #[must_use]
    pub const fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            subscribed: false,
            next_handle: 0,
            markers: BTreeMap::new(),
        }
    }

    /// Move the map. Layers observe the change on their next refresh.
    pub const fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Whether a layer is subscribed to viewport changes.
    #[must_use]
    pub const fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Number of markers on the surface.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Markers on the surface in insertion order.
    pub fn markers(&self) -> impl Iterator<Item = &WikipediaMarker> {
        self.markers.values()
    }

    /// Page ids of the markers on the surface, in insertion order.
    pub fn marker_ids(&self) -> impl Iterator<Item = PageId> + '_ {
        self.markers.values().map(|marker| marker.id)
    }
}

impl MapHost for HeadlessMap {
    type Handle = u64;

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn subscribe_viewport_changes(&mut self) {
        self.subscribed = true;
    }

    fn unsubscribe_viewport_changes(&mut self) {
        self.subscribed = false;
    }

    fn add_marker(&mut self, marker: WikipediaMarker) -> Self::Handle {
        let handle = self.next_handle;
        self.next_handle = self.next_handle.wrapping_add(1);
        self.markers.insert(handle, marker);
        handle
    }

    fn remove_marker(&mut self, handle: Self::Handle) {
        self.markers.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{Popup, WikipediaIcon};
    use geo::Coord;
    use rstest::{fixture, rstest};

    #[fixture]
    fn map() -> HeadlessMap {
        HeadlessMap::new(Viewport::around(
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
            12,
        ))
    }

    fn marker(id: u64) -> WikipediaMarker {
        WikipediaMarker {
            id: PageId(id),
            location: Coord { x: 0.0, y: 0.0 },
            icon: WikipediaIcon::default(),
            popup: Popup {
                title: format!("Page {id}"),
                href: String::new(),
                target: "_self".to_owned(),
            },
            open_on_hover: false,
        }
    }

    #[rstest]
    fn handles_are_not_reused(mut map: HeadlessMap) {
        let first = map.add_marker(marker(1));
        map.remove_marker(first);
        let second = map.add_marker(marker(2));
        assert_ne!(first, second);
        assert_eq!(map.marker_ids().collect::<Vec<_>>(), vec![PageId(2)]);
    }

    #[rstest]
    fn subscription_toggles(mut map: HeadlessMap) {
        assert!(!map.is_subscribed());
        map.subscribe_viewport_changes();
        assert!(map.is_subscribed());
        map.unsubscribe_viewport_changes();
        assert!(!map.is_subscribed());
    }
}
