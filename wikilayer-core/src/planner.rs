//! Translate a viewport into a bounded geosearch query.
//!
//! The planner is pure: it reads corner coordinates, measures the
//! great-circle half-diagonal with the Haversine formula and clamps it to the
//! ceiling the geosearch API accepts.

use geo::{Coord, Distance, Haversine, Point};

use crate::viewport::ViewportBounds;

/// Largest radius, in metres, the geosearch API accepts.
pub const MAX_SEARCH_RADIUS_METERS: f64 = 10_000.0;

/// Parameters of a single geosearch request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchQuery {
    /// Search origin.
    pub center: Coord<f64>,
    /// Search radius in metres, within `[0, MAX_SEARCH_RADIUS_METERS]`.
    pub radius_meters: f64,
    /// Maximum number of results requested.
    pub result_limit: u32,
}

impl SearchQuery {
    /// Request parameters in the order the geosearch contract lists them.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use wikilayer_core::SearchQuery;
    ///
    /// let query = SearchQuery {
    ///     center: Coord { x: -0.1, y: 51.5 },
    ///     radius_meters: 10_000.0,
    ///     result_limit: 100,
    /// };
    /// let params = query.parameters();
    /// assert_eq!(params[3], ("gslimit", "100".to_owned()));
    /// assert_eq!(params[4], ("gsradius", "10000".to_owned()));
    /// assert_eq!(params[5], ("gscoord", "51.5|-0.1".to_owned()));
    /// ```
    #[must_use]
    pub fn parameters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("format", "json".to_owned()),
            ("action", "query".to_owned()),
            ("list", "geosearch".to_owned()),
            ("gslimit", self.result_limit.to_string()),
            ("gsradius", self.radius_meters.to_string()),
            ("gscoord", format!("{}|{}", self.center.y, self.center.x)),
        ]
    }
}

/// Half the great-circle diagonal of `bounds`, capped at
/// [`MAX_SEARCH_RADIUS_METERS`].
///
/// A degenerate viewport yields `0.0`. So do corners that differ numerically
/// but name the same point on the sphere, such as longitudes `-180` and `180`
/// at one latitude, or two corners on a pole.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wikilayer_core::{ViewportBounds, compute_radius, MAX_SEARCH_RADIUS_METERS};
///
/// let wide = ViewportBounds::new(Coord { x: -10.0, y: 10.0 }, Coord { x: 10.0, y: -10.0 });
/// assert_eq!(compute_radius(&wide), MAX_SEARCH_RADIUS_METERS);
///
/// let point = Coord { x: 1.0, y: 1.0 };
/// assert_eq!(compute_radius(&ViewportBounds::new(point, point)), 0.0);
/// ```
#[must_use]
pub fn compute_radius(bounds: &ViewportBounds) -> f64 {
    if bounds.is_degenerate() {
        return 0.0;
    }
    let diagonal = Haversine.distance(
        Point::from(bounds.north_west),
        Point::from(bounds.south_east),
    );
    (diagonal / 2.0).min(MAX_SEARCH_RADIUS_METERS)
}

/// Combine the viewport centre, its radius and the result ceiling.
#[must_use]
pub fn build_query(center: Coord<f64>, bounds: &ViewportBounds, limit: u32) -> SearchQuery {
    SearchQuery {
        center,
        radius_meters: compute_radius(bounds),
        result_limit: limit,
    }
}

/// Inclusive zoom gate; an absent bound leaves that side open.
///
/// # Examples
/// ```
/// use wikilayer_core::is_query_allowed;
///
/// assert!(is_query_allowed(12, Some(10), Some(18)));
/// assert!(is_query_allowed(10, Some(10), Some(18)));
/// assert!(!is_query_allowed(9, Some(10), None));
/// assert!(is_query_allowed(0, None, None));
/// ```
#[must_use]
pub fn is_query_allowed(zoom: u8, min_zoom: Option<u8>, max_zoom: Option<u8>) -> bool {
    min_zoom.is_none_or(|min| zoom >= min) && max_zoom.is_none_or(|max| zoom <= max)
}
