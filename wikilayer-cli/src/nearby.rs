//! Nearby command implementation for the `wikilayer` CLI.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use geo::Coord;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wikilayer_core::{
    Completion, GeoSearchTransport, HeadlessMap, LayerOptions, MapHost, MapLayer, MarkerIcon,
    RequestId, Viewport, WikipediaLayer, WikipediaMarker,
};
use wikilayer_data::transport::{CompletionReceiver, HttpGeoSearchTransport, HttpTransportConfig};

use crate::{
    ARG_BASE_URL, ARG_CLEAR_OUTSIDE_BOUNDS, ARG_LAT, ARG_LIMIT, ARG_LNG, ARG_MAX_ZOOM,
    ARG_MIN_ZOOM, ARG_SPAN_LAT, ARG_SPAN_LNG, ARG_TARGET, ARG_TIMEOUT_SECS, ARG_USER_AGENT,
    ARG_ZOOM, CliError, ENV_LAT, ENV_LNG,
};

/// Viewport height and width used when no span is configured.
pub(crate) const DEFAULT_SPAN_DEGREES: f64 = 0.02;

/// Zoom level used when none is configured.
pub(crate) const DEFAULT_ZOOM: u8 = 15;

/// CLI arguments for the `nearby` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "nearby",
    allow_negative_numbers = true,
    long_about = "Attach the Wikipedia layer to a headless map centred on the \
                 given point, run one geosearch and print the markers the \
                 layer displays as JSON. Options can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "List Wikipedia articles inside a viewport"
)]
#[ortho_config(prefix = "WIKILAYER")]
pub(crate) struct NearbyArgs {
    /// Latitude of the viewport centre in degrees.
    #[arg(long = ARG_LAT, value_name = "degrees")]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the viewport centre in degrees.
    #[arg(long = ARG_LNG, value_name = "degrees")]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// Viewport height in degrees of latitude.
    #[arg(long = ARG_SPAN_LAT, value_name = "degrees")]
    #[serde(default)]
    pub(crate) span_lat: Option<f64>,
    /// Viewport width in degrees of longitude.
    #[arg(long = ARG_SPAN_LNG, value_name = "degrees")]
    #[serde(default)]
    pub(crate) span_lng: Option<f64>,
    /// Map zoom level checked against the layer's zoom range.
    #[arg(long = ARG_ZOOM, value_name = "level")]
    #[serde(default)]
    pub(crate) zoom: Option<u8>,
    /// Wikipedia site root (e.g. "https://de.wikipedia.org/").
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Maximum number of articles to request.
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<u32>,
    /// Browsing context popup links open in.
    #[arg(long = ARG_TARGET, value_name = "target")]
    #[serde(default)]
    pub(crate) target: Option<String>,
    /// Smallest zoom level at which the layer searches.
    #[arg(long = ARG_MIN_ZOOM, value_name = "level")]
    #[serde(default)]
    pub(crate) min_zoom: Option<u8>,
    /// Largest zoom level at which the layer searches.
    #[arg(long = ARG_MAX_ZOOM, value_name = "level")]
    #[serde(default)]
    pub(crate) max_zoom: Option<u8>,
    /// Drop markers that fall outside the viewport.
    #[arg(
        long = ARG_CLEAR_OUTSIDE_BOUNDS,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) clear_outside_bounds: Option<bool>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// User agent sent to the API.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
}

impl NearbyArgs {
    pub(crate) fn into_config(self) -> Result<NearbyConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        NearbyConfig::try_from(merged)
    }
}

/// Resolved `nearby` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NearbyConfig {
    /// Viewport shown by the headless map.
    pub(crate) viewport: Viewport,
    /// Options for the Wikipedia layer.
    pub(crate) options: LayerOptions,
    /// HTTP client settings.
    pub(crate) transport: HttpTransportConfig,
}

impl TryFrom<NearbyArgs> for NearbyConfig {
    type Error = CliError;

    fn try_from(args: NearbyArgs) -> Result<Self, Self::Error> {
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_LAT,
        })?;
        let lng = args.lng.ok_or(CliError::MissingArgument {
            field: ARG_LNG,
            env: ENV_LNG,
        })?;
        let lat = require_range(ARG_LAT, lat, -90.0, 90.0)?;
        let lng = require_range(ARG_LNG, lng, -180.0, 180.0)?;
        let span_lat = require_range(
            ARG_SPAN_LAT,
            args.span_lat.unwrap_or(DEFAULT_SPAN_DEGREES),
            0.0,
            180.0,
        )?;
        let span_lng = require_range(
            ARG_SPAN_LNG,
            args.span_lng.unwrap_or(DEFAULT_SPAN_DEGREES),
            0.0,
            360.0,
        )?;
        let viewport = Viewport::around(
            Coord { x: lng, y: lat },
            Coord {
                x: span_lng,
                y: span_lat,
            },
            args.zoom.unwrap_or(DEFAULT_ZOOM),
        );

        let mut options = LayerOptions::default()
            .with_zoom_range(args.min_zoom, args.max_zoom)
            .with_clear_outside_bounds(args.clear_outside_bounds.unwrap_or(false));
        if let Some(base_url) = args.base_url {
            options = options.with_base_url(base_url);
        }
        if let Some(limit) = args.limit {
            options = options.with_limit(limit);
        }
        if let Some(target) = args.target {
            options = options.with_target(target);
        }
        options.validate()?;

        let mut transport = HttpTransportConfig::default();
        if let Some(secs) = args.timeout_secs {
            transport = transport.with_timeout(Duration::from_secs(secs));
        }
        if let Some(user_agent) = args.user_agent {
            transport = transport.with_user_agent(user_agent);
        }

        Ok(Self {
            viewport,
            options,
            transport,
        })
    }
}

fn require_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, CliError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(CliError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// One marker as printed by the `nearby` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct DisplayedMarker {
    pub(crate) pageid: u64,
    pub(crate) title: String,
    pub(crate) lat: f64,
    pub(crate) lon: f64,
    pub(crate) url: String,
    pub(crate) icon: String,
    pub(crate) popup: String,
    pub(crate) open_on_hover: bool,
}

impl From<&WikipediaMarker> for DisplayedMarker {
    fn from(marker: &WikipediaMarker) -> Self {
        Self {
            pageid: marker.id.0,
            title: marker.popup.title.clone(),
            lat: marker.location.y,
            lon: marker.location.x,
            url: marker.popup.href.clone(),
            icon: marker.icon.icon_url().to_owned(),
            popup: marker.popup.html(),
            open_on_hover: marker.open_on_hover,
        }
    }
}

/// Supplies the transport for one invocation and waits for its completions.
pub(crate) trait SearchBackend {
    /// Transport handed to the layer.
    type Transport: GeoSearchTransport;

    /// Build the transport for `config`.
    fn connect(&mut self, config: &HttpTransportConfig) -> Result<Self::Transport, CliError>;

    /// Block until the completion for `request` arrives.
    fn next_completion(&mut self, request: RequestId) -> Option<Completion>;
}

/// Backend that talks to the MediaWiki API over HTTP.
#[derive(Debug, Default)]
pub(crate) struct HttpSearchBackend {
    completions: Option<CompletionReceiver>,
}

impl SearchBackend for HttpSearchBackend {
    type Transport = HttpGeoSearchTransport;

    fn connect(&mut self, config: &HttpTransportConfig) -> Result<Self::Transport, CliError> {
        let (transport, completions) = HttpGeoSearchTransport::with_config(config.clone())
            .map_err(|source| CliError::BuildTransport { source })?;
        self.completions = Some(completions);
        Ok(transport)
    }

    fn next_completion(&mut self, _request: RequestId) -> Option<Completion> {
        self.completions.as_mut()?.blocking_recv()
    }
}

pub(crate) fn run_nearby<B: SearchBackend>(
    args: NearbyArgs,
    backend: &mut B,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let markers = collect_markers(&config, backend)?;
    write_markers(writer, &markers)
}

/// Attach a layer to a headless map, run one search and list the result.
pub(crate) fn collect_markers<B: SearchBackend>(
    config: &NearbyConfig,
    backend: &mut B,
) -> Result<Vec<DisplayedMarker>, CliError> {
    let transport = backend.connect(&config.transport)?;
    let mut map = HeadlessMap::new(config.viewport);
    let mut layer: WikipediaLayer<B::Transport, u64> =
        WikipediaLayer::new(config.options.clone(), transport)?;

    layer.on_add(&mut map);
    let Some(request) = layer.latest_request() else {
        debug!(
            "zoom {} is outside the layer's zoom range; nothing to show",
            map.viewport().zoom
        );
        return Ok(Vec::new());
    };

    let completion = backend
        .next_completion(request)
        .ok_or_else(|| CliError::TransportClosed {
            request: request.to_string(),
        })?;
    if let Err(err) = &completion.outcome {
        return Err(CliError::Search(err.clone()));
    }
    if let Some(report) = layer.handle_completion(&mut map, completion) {
        debug!(
            "search {request} added {} and removed {} markers",
            report.added, report.removed
        );
    }

    let markers = map.markers().map(DisplayedMarker::from).collect();
    layer.on_remove(&mut map);
    Ok(markers)
}

fn write_markers(writer: &mut dyn Write, markers: &[DisplayedMarker]) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(markers).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<NearbyConfig, CliError> {
    let merged = NearbyArgs::merge_from_layers(layers).map_err(CliError::from)?;
    NearbyConfig::try_from(merged)
}
