//! Layer configuration.
//!
//! [`LayerOptions`] deserialises with defaults for every field so hosts can
//! supply a partial JSON or TOML document and override only what they need.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geosearch::PageId;

/// Default Wikipedia site root.
pub const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org/";
/// Path of the MediaWiki API below the site root.
pub const API_PATH: &str = "w/api.php";
/// Query fragment used to link an article by page id.
pub const PAGE_QUERY: &str = "?curid=";
/// Default maximum number of results requested per query.
pub const DEFAULT_LIMIT: u32 = 100;
/// Default link target for popup anchors.
pub const DEFAULT_TARGET: &str = "_self";
/// Default folder holding the marker icon images.
pub const DEFAULT_IMAGES: &str = "images/";

/// Options recognised by [`crate::WikipediaLayer`].
///
/// # Examples
/// ```
/// use wikilayer_core::LayerOptions;
///
/// let options = LayerOptions::default()
///     .with_base_url("https://de.wikipedia.org")
///     .with_zoom_range(Some(12), Some(18));
/// assert_eq!(options.api_url(), "https://de.wikipedia.org/w/api.php");
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerOptions {
    /// Wikipedia site root; the API endpoint and article links hang off it.
    pub base_url: String,
    /// Maximum number of results per query.
    pub limit: u32,
    /// Open the popup when the pointer hovers a marker.
    pub popup_on_mouseover: bool,
    /// Remove markers that fall outside the viewport after each pass.
    pub clear_outside_bounds: bool,
    /// Browsing context the article link opens in.
    pub target: String,
    /// Folder containing `wikipedia-icon.png` and `wikipedia-icon-2x.png`.
    pub images: String,
    /// Lowest zoom level at which queries are issued.
    pub min_zoom: Option<u8>,
    /// Highest zoom level at which queries are issued.
    pub max_zoom: Option<u8>,
    /// Drop completions that are not for the most recently issued request.
    pub discard_stale_responses: bool,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            limit: DEFAULT_LIMIT,
            popup_on_mouseover: false,
            clear_outside_bounds: false,
            target: DEFAULT_TARGET.to_owned(),
            images: DEFAULT_IMAGES.to_owned(),
            min_zoom: None,
            max_zoom: None,
            discard_stale_responses: false,
        }
    }
}

/// Errors returned by [`LayerOptions::validate`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LayerOptionsError {
    /// The site root was blank.
    #[error("base URL must not be empty")]
    EmptyBaseUrl,
    /// A zero result limit would never display anything.
    #[error("result limit must be positive")]
    ZeroLimit,
    /// The zoom gate admits no level.
    #[error("minimum zoom {min} exceeds maximum zoom {max}")]
    InvertedZoomRange {
        /// Configured lower bound.
        min: u8,
        /// Configured upper bound.
        max: u8,
    },
}

impl LayerOptions {
    /// Set the Wikipedia site root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-query result limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Toggle opening popups on hover.
    #[must_use]
    pub const fn with_popup_on_mouseover(mut self, enabled: bool) -> Self {
        self.popup_on_mouseover = enabled;
        self
    }

    /// Toggle removal of markers outside the viewport.
    #[must_use]
    pub const fn with_clear_outside_bounds(mut self, enabled: bool) -> Self {
        self.clear_outside_bounds = enabled;
        self
    }

    /// Set the link target.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Set the icon image folder.
    #[must_use]
    pub fn with_images(mut self, images: impl Into<String>) -> Self {
        self.images = images.into();
        self
    }

    /// Set the inclusive zoom gate.
    #[must_use]
    pub const fn with_zoom_range(mut self, min_zoom: Option<u8>, max_zoom: Option<u8>) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    /// Toggle discarding of out-of-date completions.
    #[must_use]
    pub const fn with_discard_stale_responses(mut self, enabled: bool) -> Self {
        self.discard_stale_responses = enabled;
        self
    }

    /// Check the options describe a usable layer.
    ///
    /// # Errors
    ///
    /// Returns [`LayerOptionsError`] for a blank base URL, a zero limit or a
    /// minimum zoom above the maximum.
    pub fn validate(&self) -> Result<(), LayerOptionsError> {
        if self.base_url.trim().is_empty() {
            return Err(LayerOptionsError::EmptyBaseUrl);
        }
        if self.limit == 0 {
            return Err(LayerOptionsError::ZeroLimit);
        }
        if let (Some(min), Some(max)) = (self.min_zoom, self.max_zoom)
            && min > max
        {
            return Err(LayerOptionsError::InvertedZoomRange { min, max });
        }
        Ok(())
    }

    /// Site root with exactly one trailing slash.
    #[must_use]
    pub fn site_root(&self) -> String {
        with_trailing_slash(self.base_url.trim())
    }

    /// Geosearch API endpoint.
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("{}{API_PATH}", self.site_root())
    }

    /// Article link for `id`.
    ///
    /// # Examples
    /// ```
    /// use wikilayer_core::{LayerOptions, PageId};
    ///
    /// let options = LayerOptions::default();
    /// assert_eq!(
    ///     options.page_url(PageId(42)),
    ///     "https://en.wikipedia.org/?curid=42"
    /// );
    /// ```
    #[must_use]
    pub fn page_url(&self, id: PageId) -> String {
        format!("{}{PAGE_QUERY}{id}", self.site_root())
    }

    /// Icon folder with a trailing slash.
    #[must_use]
    pub fn image_folder(&self) -> String {
        with_trailing_slash(&self.images)
    }
}

fn with_trailing_slash(path: &str) -> String {
    if path.is_empty() || path.ends_with('/') {
        path.to_owned()
    } else {
        format!("{path}/")
    }
}
