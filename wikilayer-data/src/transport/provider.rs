//! Reqwest-backed implementation of [`GeoSearchTransport`].

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use url::Url;
use wikilayer_core::{
    Completion, GeoSearchRequest, GeoSearchResponse, GeoSearchTransport, RequestId,
    RequestSequence, TransportError,
};

/// Receiving end of a transport's completion channel.
///
/// Use `recv().await` inside an async event loop or `blocking_recv()` from a
/// plain thread.
pub type CompletionReceiver = UnboundedReceiver<Completion>;

/// Error type for [`HttpGeoSearchTransport`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default user agent for geosearch requests.
pub const DEFAULT_USER_AGENT: &str = "wikilayer/0.1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpGeoSearchTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTransportConfig {
    /// Connect and total request timeout.
    pub timeout: Duration,
    /// User agent string sent with every request.
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpTransportConfig {
    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

enum Executor {
    Owned(Runtime),
    Shared(Handle),
}

impl Executor {
    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self {
            Self::Owned(runtime) => drop(runtime.spawn(task)),
            Self::Shared(handle) => drop(handle.spawn(task)),
        }
    }
}

/// Geosearch transport issuing HTTP GET requests with reqwest.
///
/// # Runtime behaviour
///
/// [`HttpGeoSearchTransport::with_config`] owns a small multi-threaded Tokio
/// runtime so requests make progress while the caller blocks on the
/// completion channel. Callers already running inside a Tokio runtime should
/// use [`HttpGeoSearchTransport::with_handle`] instead; dropping an owned
/// runtime from within an async context panics.
///
/// Requests are never retried or cancelled. When the receiver has been
/// dropped, finished requests are discarded.
pub struct HttpGeoSearchTransport {
    client: Client,
    config: HttpTransportConfig,
    sequence: RequestSequence,
    completions: UnboundedSender<Completion>,
    executor: Executor,
}

impl std::fmt::Debug for HttpGeoSearchTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let executor = match self.executor {
            Executor::Owned(_) => "<owned tokio::runtime::Runtime>",
            Executor::Shared(_) => "<shared tokio::runtime::Handle>",
        };
        f.debug_struct("HttpGeoSearchTransport")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("sequence", &self.sequence)
            .field("executor", &executor)
            .finish_non_exhaustive()
    }
}

impl HttpGeoSearchTransport {
    /// Transport with default configuration and its completion receiver.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new() -> Result<(Self, CompletionReceiver), ProviderBuildError> {
        Self::with_config(HttpTransportConfig::default())
    }

    /// Transport with explicit configuration and its own runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(
        config: HttpTransportConfig,
    ) -> Result<(Self, CompletionReceiver), ProviderBuildError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("wikilayer-http")
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Self::build(config, Executor::Owned(runtime))
    }

    /// Transport spawning requests onto an existing runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_handle(
        config: HttpTransportConfig,
        handle: Handle,
    ) -> Result<(Self, CompletionReceiver), ProviderBuildError> {
        Self::build(config, Executor::Shared(handle))
    }

    fn build(
        config: HttpTransportConfig,
        executor: Executor,
    ) -> Result<(Self, CompletionReceiver), ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let (completions, receiver) = mpsc::unbounded_channel();
        let transport = Self {
            client,
            config,
            sequence: RequestSequence::new(),
            completions,
            executor,
        };
        Ok((transport, receiver))
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    /// Most recently dispatched request id.
    #[must_use]
    pub const fn last_issued(&self) -> Option<RequestId> {
        self.sequence.last_issued()
    }

    fn deliver(&self, completion: Completion) {
        if self.completions.send(completion).is_err() {
            debug!("completion receiver dropped; discarding result");
        }
    }
}

impl GeoSearchTransport for HttpGeoSearchTransport {
    fn dispatch(&mut self, request: GeoSearchRequest) -> RequestId {
        let id = self.sequence.next_id();
        let url = match request_url(&request) {
            Ok(url) => url,
            Err(err) => {
                warn!("geosearch {id} not sent: {err}");
                self.deliver(Completion::failure(id, err));
                return id;
            }
        };
        debug!("geosearch {id}: GET {url}");
        let client = self.client.clone();
        let sender = self.completions.clone();
        let timeout_secs = self.config.timeout.as_secs();
        self.executor.spawn(async move {
            let outcome = fetch(&client, url, timeout_secs).await;
            if sender.send(Completion { request: id, outcome }).is_err() {
                debug!("completion receiver dropped; discarding geosearch {id}");
            }
        });
        id
    }
}

/// Append the request parameters to its endpoint.
///
/// Parameters are form-encoded and joined with `&` when the endpoint already
/// carries a query string, `?` otherwise.
///
/// # Errors
///
/// Returns [`TransportError::InvalidUrl`] when the endpoint does not parse or
/// is not an HTTP(S) URL.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wikilayer_core::{GeoSearchRequest, SearchQuery};
/// use wikilayer_data::transport::request_url;
///
/// let query = SearchQuery { center: Coord { x: 2.0, y: 1.0 }, radius_meters: 50.0, result_limit: 5 };
/// let request = GeoSearchRequest::new("https://en.wikipedia.org/w/api.php", &query);
/// let url = request_url(&request)?;
/// assert_eq!(url.query_pairs().count(), 6);
/// assert!(url.as_str().starts_with("https://en.wikipedia.org/w/api.php?format=json&"));
/// # Ok::<(), wikilayer_core::TransportError>(())
/// ```
pub fn request_url(request: &GeoSearchRequest) -> Result<Url, TransportError> {
    let invalid = |message: String| TransportError::InvalidUrl {
        url: request.endpoint.clone(),
        message,
    };
    let mut url = Url::parse(&request.endpoint).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    url.query_pairs_mut().extend_pairs(
        request
            .parameters
            .iter()
            .map(|(key, value)| (*key, value.as_str())),
    );
    Ok(url)
}

async fn fetch(
    client: &Client,
    url: Url,
    timeout_secs: u64,
) -> Result<GeoSearchResponse, TransportError> {
    let url_text = url.to_string();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|err| convert_reqwest_error(&err, &url_text, timeout_secs))?
        .error_for_status()
        .map_err(|err| convert_reqwest_error(&err, &url_text, timeout_secs))?;
    let body = response
        .bytes()
        .await
        .map_err(|err| convert_reqwest_error(&err, &url_text, timeout_secs))?;
    serde_json::from_slice(&body).map_err(|err| TransportError::Decode {
        url: url_text,
        message: err.to_string(),
    })
}

fn convert_reqwest_error(error: &reqwest::Error, url: &str, timeout_secs: u64) -> TransportError {
    if error.is_timeout() {
        return TransportError::Timeout {
            url: url.to_owned(),
            timeout_secs,
        };
    }

    if let Some(status) = error.status() {
        return TransportError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    TransportError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}
