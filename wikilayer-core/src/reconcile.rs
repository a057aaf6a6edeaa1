//! Keep the displayed markers in step with geosearch results.
//!
//! [`MarkerSetReconciler`] owns a [`MarkerRegistry`] mapping page ids to host
//! handles. Every registry insertion is paired with a host `add_marker` call
//! and every removal with a `remove_marker` call, so the registry keys and the
//! markers on the host surface always describe the same set.

use std::collections::BTreeMap;

use geo::Coord;
use log::debug;

use crate::geosearch::{PageId, SearchResult};
use crate::host::MapHost;
use crate::marker::WikipediaMarker;
use crate::viewport::ViewportBounds;

/// Registry entry for a marker currently on the host surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredMarker<K> {
    /// Host handle returned by [`MapHost::add_marker`].
    pub handle: K,
    /// Marker position, used for bounds filtering.
    pub location: Coord<f64>,
}

/// Page id to displayed marker mapping.
///
/// Holds at most one entry per id.
#[derive(Debug, Clone)]
pub struct MarkerRegistry<K> {
    entries: BTreeMap<PageId, RegisteredMarker<K>>,
}

impl<K> Default for MarkerRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> MarkerRegistry<K> {
    /// Empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of registered markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: PageId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = PageId> + '_ {
        self.entries.keys().copied()
    }

    /// Entry for `id`.
    #[must_use]
    pub fn get(&self, id: PageId) -> Option<&RegisteredMarker<K>> {
        self.entries.get(&id)
    }

    /// Ids whose marker lies outside `bounds`.
    fn ids_outside(&self, bounds: &ViewportBounds) -> Vec<PageId> {
        self.entries
            .iter()
            .filter(|(_, entry)| !bounds.contains(entry.location))
            .map(|(id, _)| *id)
            .collect()
    }

    fn insert(&mut self, id: PageId, entry: RegisteredMarker<K>) {
        self.entries.insert(id, entry);
    }

    fn remove(&mut self, id: PageId) -> Option<RegisteredMarker<K>> {
        self.entries.remove(&id)
    }

    fn take_all(&mut self) -> BTreeMap<PageId, RegisteredMarker<K>> {
        std::mem::take(&mut self.entries)
    }
}

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Markers newly placed on the host.
    pub added: usize,
    /// Markers taken off the host.
    pub removed: usize,
}

impl ReconcileReport {
    /// Whether the pass changed nothing.
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Applies result batches to the host surface.
///
/// Insertion is idempotent: a result whose id is already displayed is never
/// rebuilt or updated. With `clear_outside_bounds` set, each pass ends by
/// removing every marker outside the current viewport.
#[derive(Debug, Clone)]
pub struct MarkerSetReconciler<K> {
    registry: MarkerRegistry<K>,
    clear_outside_bounds: bool,
}

impl<K> MarkerSetReconciler<K> {
    /// Reconciler with an empty registry.
    #[must_use]
    pub const fn new(clear_outside_bounds: bool) -> Self {
        Self {
            registry: MarkerRegistry::new(),
            clear_outside_bounds,
        }
    }

    /// The registry of displayed markers.
    #[must_use]
    pub const fn registry(&self) -> &MarkerRegistry<K> {
        &self.registry
    }

    /// Whether passes remove markers outside the viewport.
    #[must_use]
    pub const fn clears_outside_bounds(&self) -> bool {
        self.clear_outside_bounds
    }

    /// Run one reconciliation pass.
    ///
    /// `build` turns a result into its marker and is only called for ids not
    /// yet registered. `bounds` is the viewport at the time of the pass.
    pub fn reconcile<H, F>(
        &mut self,
        host: &mut H,
        results: &[SearchResult],
        bounds: &ViewportBounds,
        build: F,
    ) -> ReconcileReport
    where
        H: MapHost<Handle = K>,
        F: Fn(&SearchResult) -> WikipediaMarker,
    {
        let mut report = ReconcileReport::default();
        for result in results {
            if self.registry.contains(result.id) {
                continue;
            }
            let marker = build(result);
            let location = marker.location;
            let handle = host.add_marker(marker);
            self.registry
                .insert(result.id, RegisteredMarker { handle, location });
            report.added += 1;
        }
        if self.clear_outside_bounds {
            report.removed = self.remove_outside(host, bounds);
        }
        debug!(
            "reconciled {} results: {} added, {} removed, {} displayed",
            results.len(),
            report.added,
            report.removed,
            self.registry.len()
        );
        report
    }

    /// Remove every marker whose position lies outside `bounds`.
    pub fn remove_outside<H>(&mut self, host: &mut H, bounds: &ViewportBounds) -> usize
    where
        H: MapHost<Handle = K>,
    {
        let stale = self.registry.ids_outside(bounds);
        for id in &stale {
            if let Some(entry) = self.registry.remove(*id) {
                host.remove_marker(entry.handle);
            }
        }
        stale.len()
    }

    /// Remove every marker from the host and the registry.
    pub fn clear<H>(&mut self, host: &mut H) -> usize
    where
        H: MapHost<Handle = K>,
    {
        let entries = self.registry.take_all();
        let count = entries.len();
        for entry in entries.into_values() {
            host.remove_marker(entry.handle);
        }
        count
    }
}
