//! MediaWiki geosearch response types.
//!
//! See: <https://www.mediawiki.org/wiki/Extension:GeoData#list=geosearch>
//!
//! A response without a `query.geosearch` list, including an API error
//! response, decodes to an empty batch rather than failing.

use std::fmt;

use geo::Coord;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::options::LayerOptions;

/// Stable identifier of a Wikipedia article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PageId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Top-level `action=query` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeoSearchResponse {
    /// Query payload; absent on error responses.
    #[serde(default)]
    pub query: Option<GeoSearchQuery>,
    /// API-level error, reported alongside a missing payload.
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// `query` object of a geosearch response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeoSearchQuery {
    /// Hits ordered by distance from the search origin.
    #[serde(default)]
    pub geosearch: Vec<GeoSearchHit>,
}

/// Error object returned by the MediaWiki API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable description.
    #[serde(default)]
    pub info: String,
}

/// A single geosearch hit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoSearchHit {
    /// Article page id.
    pub pageid: PageId,
    /// Article title.
    pub title: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Distance from the search origin in metres.
    #[serde(default)]
    pub dist: Option<f64>,
    /// Namespace of the page.
    #[serde(default)]
    pub ns: Option<i64>,
}

impl GeoSearchHit {
    /// Hit location, if it is a valid WGS84 coordinate.
    #[must_use]
    pub fn location(&self) -> Option<Coord<f64>> {
        (self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon))
        .then_some(Coord {
            x: self.lon,
            y: self.lat,
        })
    }
}

/// A geosearch hit resolved against the layer's site root.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Registry key.
    pub id: PageId,
    /// Article location.
    pub coordinate: Coord<f64>,
    /// Display label.
    pub title: String,
    /// Link to the article.
    pub canonical_url: String,
}

impl GeoSearchResponse {
    /// Number of raw hits in the response.
    #[must_use]
    pub fn hit_count(&self) -> usize {
        self.query.as_ref().map_or(0, |query| query.geosearch.len())
    }

    /// Resolve the hits into results linked under `options`' site root.
    ///
    /// Hits with unusable coordinates are skipped.
    ///
    /// # Examples
    /// ```
    /// use wikilayer_core::{GeoSearchResponse, LayerOptions};
    ///
    /// let response = GeoSearchResponse::default();
    /// assert!(response.into_results(&LayerOptions::default()).is_empty());
    /// ```
    #[must_use]
    pub fn into_results(self, options: &LayerOptions) -> Vec<SearchResult> {
        if let Some(error) = &self.error {
            warn!("geosearch API error {}: {}", error.code, error.info);
        }
        let Some(query) = self.query else {
            return Vec::new();
        };
        query
            .geosearch
            .into_iter()
            .filter_map(|hit| {
                let Some(coordinate) = hit.location() else {
                    warn!(
                        "skipping page {} with invalid coordinate ({}, {})",
                        hit.pageid, hit.lat, hit.lon
                    );
                    return None;
                };
                Some(SearchResult {
                    id: hit.pageid,
                    coordinate,
                    canonical_url: options.page_url(hit.pageid),
                    title: hit.title,
                })
            })
            .collect()
    }
}
