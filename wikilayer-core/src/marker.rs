//! Markers handed to the host map.
//!
//! The host decides how to draw them; this module only describes the icon,
//! the popup contents and the hover behaviour.

use geo::Coord;

use crate::geosearch::{PageId, SearchResult};
use crate::options::LayerOptions;

/// Icon capability consumed by the host when drawing a marker.
pub trait MarkerIcon {
    /// Standard-resolution image URL.
    fn icon_url(&self) -> &str;
    /// High-DPI image URL.
    fn icon_retina_url(&self) -> &str;
    /// Rendered size in pixels (`[width, height]`).
    fn icon_size(&self) -> [u32; 2];
    /// Popup offset from the marker's anchor point in pixels.
    fn popup_anchor(&self) -> [i32; 2];
}

/// The Wikipedia globe icon.
///
/// The images come from the Tango-style Wikipedia icon on Wikimedia Commons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikipediaIcon {
    icon_url: String,
    icon_retina_url: String,
}

impl WikipediaIcon {
    /// Standard-resolution file name.
    pub const ICON_FILE: &'static str = "wikipedia-icon.png";
    /// High-DPI file name.
    pub const RETINA_FILE: &'static str = "wikipedia-icon-2x.png";
    /// Icon size in pixels.
    pub const SIZE: [u32; 2] = [40, 40];
    /// Popup anchor relative to the icon anchor.
    pub const POPUP_ANCHOR: [i32; 2] = [0, -20];

    /// Icon whose images live in `folder`.
    ///
    /// `folder` is used verbatim as a prefix, so it should end in `/`.
    ///
    /// # Examples
    /// ```
    /// use wikilayer_core::{MarkerIcon, WikipediaIcon};
    ///
    /// let icon = WikipediaIcon::in_folder("static/");
    /// assert_eq!(icon.icon_url(), "static/wikipedia-icon.png");
    /// assert_eq!(icon.icon_retina_url(), "static/wikipedia-icon-2x.png");
    /// ```
    #[must_use]
    pub fn in_folder(folder: &str) -> Self {
        Self {
            icon_url: format!("{folder}{}", Self::ICON_FILE),
            icon_retina_url: format!("{folder}{}", Self::RETINA_FILE),
        }
    }
}

impl Default for WikipediaIcon {
    fn default() -> Self {
        Self::in_folder(crate::options::DEFAULT_IMAGES)
    }
}

impl MarkerIcon for WikipediaIcon {
    fn icon_url(&self) -> &str {
        &self.icon_url
    }

    fn icon_retina_url(&self) -> &str {
        &self.icon_retina_url
    }

    fn icon_size(&self) -> [u32; 2] {
        Self::SIZE
    }

    fn popup_anchor(&self) -> [i32; 2] {
        Self::POPUP_ANCHOR
    }
}

/// Popup bound to a marker: a single link to the article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    /// Link text.
    pub title: String,
    /// Link target URL.
    pub href: String,
    /// Browsing context the link opens in.
    pub target: String,
}

impl Popup {
    /// HTML anchor rendered inside the popup.
    ///
    /// # Examples
    /// ```
    /// use wikilayer_core::Popup;
    ///
    /// let popup = Popup {
    ///     title: "Fish & Chips".to_owned(),
    ///     href: "https://en.wikipedia.org/?curid=7".to_owned(),
    ///     target: "_blank".to_owned(),
    /// };
    /// assert_eq!(
    ///     popup.html(),
    ///     r#"<a href="https://en.wikipedia.org/?curid=7" target="_blank">Fish &amp; Chips</a>"#
    /// );
    /// ```
    #[must_use]
    pub fn html(&self) -> String {
        format!(
            r#"<a href="{}" target="{}">{}</a>"#,
            escape_html(&self.href),
            escape_html(&self.target),
            escape_html(&self.title)
        )
    }
}

// Covers the five characters significant in HTML text and quoted attributes.
fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// A marker for one Wikipedia article.
#[derive(Debug, Clone, PartialEq)]
pub struct WikipediaMarker {
    /// Article page id; the registry key.
    pub id: PageId,
    /// Marker position.
    pub location: Coord<f64>,
    /// Icon drawn at the position.
    pub icon: WikipediaIcon,
    /// Popup bound to the marker.
    pub popup: Popup,
    /// Open the popup on pointer hover as well as on click.
    pub open_on_hover: bool,
}

impl WikipediaMarker {
    /// Build the marker for `result` under `options`.
    #[must_use]
    pub fn from_result(result: &SearchResult, options: &LayerOptions) -> Self {
        Self {
            id: result.id,
            location: result.coordinate,
            icon: WikipediaIcon::in_folder(&options.image_folder()),
            popup: Popup {
                title: result.title.clone(),
                href: result.canonical_url.clone(),
                target: options.target.clone(),
            },
            open_on_hover: options.popup_on_mouseover,
        }
    }
}
