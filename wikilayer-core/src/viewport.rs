//! Viewport geometry read from the host map on demand.

use geo::{Coord, Intersects, Rect};

/// Corner pair describing the visible map rectangle.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wikilayer_core::ViewportBounds;
///
/// let bounds = ViewportBounds::new(Coord { x: -1.0, y: 1.0 }, Coord { x: 1.0, y: -1.0 });
/// assert!(bounds.contains(Coord { x: 0.0, y: 0.0 }));
/// assert!(bounds.contains(Coord { x: 1.0, y: 1.0 }));
/// assert!(!bounds.contains(Coord { x: 2.0, y: 0.0 }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportBounds {
    /// Upper-left corner (west longitude, north latitude).
    pub north_west: Coord<f64>,
    /// Lower-right corner (east longitude, south latitude).
    pub south_east: Coord<f64>,
}

impl ViewportBounds {
    /// Construct bounds from the north-west and south-east corners.
    #[must_use]
    pub const fn new(north_west: Coord<f64>, south_east: Coord<f64>) -> Self {
        Self {
            north_west,
            south_east,
        }
    }

    /// Construct bounds covering `rect`.
    #[must_use]
    pub fn from_rect(rect: Rect<f64>) -> Self {
        Self::new(
            Coord {
                x: rect.min().x,
                y: rect.max().y,
            },
            Coord {
                x: rect.max().x,
                y: rect.min().y,
            },
        )
    }

    /// Axis-aligned rectangle spanned by the two corners.
    #[must_use]
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(self.north_west, self.south_east)
    }

    /// Whether `location` lies inside the bounds.
    ///
    /// Points on the boundary count as inside.
    #[must_use]
    pub fn contains(&self, location: Coord<f64>) -> bool {
        self.to_rect().intersects(&location)
    }

    /// Whether both corners coincide.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.north_west == self.south_east
    }
}

/// Snapshot of the host map's visible area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Map centre.
    pub center: Coord<f64>,
    /// Visible rectangle.
    pub bounds: ViewportBounds,
    /// Current zoom level.
    pub zoom: u8,
}

impl Viewport {
    /// Construct a viewport from its parts.
    #[must_use]
    pub const fn new(center: Coord<f64>, bounds: ViewportBounds, zoom: u8) -> Self {
        Self {
            center,
            bounds,
            zoom,
        }
    }

    /// Construct a viewport centred on `center` spanning `span` degrees.
    ///
    /// `span.x` is the longitudinal extent and `span.y` the latitudinal
    /// extent. Negative spans are treated as their absolute value.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use wikilayer_core::Viewport;
    ///
    /// let viewport = Viewport::around(Coord { x: 10.0, y: 50.0 }, Coord { x: 2.0, y: 1.0 }, 12);
    /// assert_eq!(viewport.bounds.north_west, Coord { x: 9.0, y: 50.5 });
    /// assert_eq!(viewport.bounds.south_east, Coord { x: 11.0, y: 49.5 });
    /// ```
    #[must_use]
    pub fn around(center: Coord<f64>, span: Coord<f64>, zoom: u8) -> Self {
        let half_x = span.x.abs() / 2.0;
        let half_y = span.y.abs() / 2.0;
        let bounds = ViewportBounds::new(
            Coord {
                x: center.x - half_x,
                y: center.y + half_y,
            },
            Coord {
                x: center.x + half_x,
                y: center.y - half_y,
            },
        );
        Self::new(center, bounds, zoom)
    }
}
