//! Behavioural tests for [`HttpGeoSearchTransport`] against a mock API.

mod support;

use geo::Coord;
use httpmock::MockServer;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::time::Duration;
use support::{API_PATH, CannedReply, closed_port_url, geosearch_endpoint};
use wikilayer_core::{
    Completion, GeoSearchRequest, GeoSearchTransport, LayerOptions, PageId, SearchQuery,
    TransportError,
};
use wikilayer_data::transport::{HttpGeoSearchTransport, HttpTransportConfig};

const ONE_ARTICLE: &str = r#"{"batchcomplete":"","query":{"geosearch":[
    {"pageid":1,"ns":0,"title":"Trafalgar Square","lat":51.508,"lon":-0.128,"dist":12.5,"primary":""}
]}}"#;

fn outcome(completion: &RefCell<Option<Completion>>) -> Completion {
    completion.borrow().clone().expect("completion received")
}

fn serve(api: &RefCell<Option<CannedReply>>, status: u16, body: &'static str) {
    *api.borrow_mut() = Some(CannedReply { status, body });
}

#[fixture]
fn api() -> RefCell<Option<CannedReply>> {
    RefCell::new(None)
}

#[fixture]
fn hits() -> RefCell<usize> {
    RefCell::new(0)
}

#[fixture]
fn completion() -> RefCell<Option<Completion>> {
    RefCell::new(None)
}

// --- Given steps ---

#[given("an API that returns one article")]
fn api_returns_article(#[from(api)] api: &RefCell<Option<CannedReply>>) {
    serve(api, 200, ONE_ARTICLE);
}

#[given("an API that fails with status 500")]
fn api_fails(#[from(api)] api: &RefCell<Option<CannedReply>>) {
    serve(api, 500, "{}");
}

#[given("an API that returns a malformed body")]
fn api_returns_garbage(#[from(api)] api: &RefCell<Option<CannedReply>>) {
    serve(api, 200, "/**/callback({})");
}

#[given("an API that is not listening")]
fn api_not_listening(#[from(api)] api: &RefCell<Option<CannedReply>>) {
    *api.borrow_mut() = None;
}

#[given("an API that returns an error object")]
fn api_returns_error_object(#[from(api)] api: &RefCell<Option<CannedReply>>) {
    serve(
        api,
        200,
        r#"{"error":{"code":"invalid-coord","info":"Invalid coordinate provided"}}"#,
    );
}

// --- When steps ---

#[when("a search for 20 results is dispatched")]
fn dispatch_search(
    #[from(api)] api: &RefCell<Option<CannedReply>>,
    #[from(hits)] hits: &RefCell<usize>,
    #[from(completion)] completion: &RefCell<Option<Completion>>,
) {
    let server = MockServer::start();
    let reply = api.borrow().clone();
    let mock = reply
        .as_ref()
        .map(|reply| geosearch_endpoint(&server, reply));
    let target = match mock {
        Some(_) => server.url(API_PATH),
        None => format!("{}{API_PATH}", closed_port_url()),
    };

    let config = HttpTransportConfig::default().with_timeout(Duration::from_secs(5));
    let (mut transport, mut completions) =
        HttpGeoSearchTransport::with_config(config).expect("transport should build");
    let query = SearchQuery {
        center: Coord { x: -0.128, y: 51.508 },
        radius_meters: 500.0,
        result_limit: 20,
    };

    let id = transport.dispatch(GeoSearchRequest::new(target, &query));

    let received = completions.blocking_recv().expect("completion delivered");
    assert_eq!(received.request, id, "completion should echo the request id");
    if let Some(mock) = &mock {
        *hits.borrow_mut() = mock.hits();
    }
    *completion.borrow_mut() = Some(received);
}

// --- Then steps ---

#[then("the completion carries one article")]
fn completion_has_article(#[from(completion)] completion: &RefCell<Option<Completion>>) {
    let response = outcome(completion).outcome.expect("request should succeed");
    assert_eq!(response.hit_count(), 1);
    let results = response.into_results(&LayerOptions::default());
    let result = results.first().expect("one result");
    assert_eq!(result.id, PageId(1));
    assert_eq!(result.title, "Trafalgar Square");
    assert_eq!(result.canonical_url, "https://en.wikipedia.org/?curid=1");
}

#[then("the request asked for 20 geosearch results")]
fn request_shape(#[from(hits)] hits: &RefCell<usize>) {
    assert_eq!(
        *hits.borrow(),
        1,
        "the API should receive one request with the geosearch parameters"
    );
}

#[then("the completion fails with HTTP status 500")]
fn completion_http_error(#[from(completion)] completion: &RefCell<Option<Completion>>) {
    let err = outcome(completion)
        .outcome
        .expect_err("request should fail");
    assert!(
        matches!(err, TransportError::Http { status: 500, .. }),
        "unexpected error {err:?}"
    );
}

#[then("the completion fails to decode")]
fn completion_decode_error(#[from(completion)] completion: &RefCell<Option<Completion>>) {
    let err = outcome(completion)
        .outcome
        .expect_err("request should fail");
    assert!(
        matches!(err, TransportError::Decode { .. }),
        "unexpected error {err:?}"
    );
}

#[then("the completion fails with a network error")]
fn completion_network_error(#[from(completion)] completion: &RefCell<Option<Completion>>) {
    let err = outcome(completion)
        .outcome
        .expect_err("request should fail");
    assert!(
        matches!(err, TransportError::Network { .. }),
        "unexpected error {err:?}"
    );
}

#[then("the completion carries no articles")]
fn completion_empty(#[from(completion)] completion: &RefCell<Option<Completion>>) {
    let response = outcome(completion).outcome.expect("request should succeed");
    assert_eq!(response.hit_count(), 0);
    assert!(response.into_results(&LayerOptions::default()).is_empty());
}

#[scenario(path = "tests/features/http_geosearch.feature", index = 0)]
fn scenario_success(
    api: RefCell<Option<CannedReply>>,
    hits: RefCell<usize>,
    completion: RefCell<Option<Completion>>,
) {
    let _ = (api, hits, completion);
}

#[scenario(path = "tests/features/http_geosearch.feature", index = 1)]
fn scenario_http_error(
    api: RefCell<Option<CannedReply>>,
    hits: RefCell<usize>,
    completion: RefCell<Option<Completion>>,
) {
    let _ = (api, hits, completion);
}

#[scenario(path = "tests/features/http_geosearch.feature", index = 2)]
fn scenario_decode_error(
    api: RefCell<Option<CannedReply>>,
    hits: RefCell<usize>,
    completion: RefCell<Option<Completion>>,
) {
    let _ = (api, hits, completion);
}

#[scenario(path = "tests/features/http_geosearch.feature", index = 3)]
fn scenario_unreachable(
    api: RefCell<Option<CannedReply>>,
    hits: RefCell<usize>,
    completion: RefCell<Option<Completion>>,
) {
    let _ = (api, hits, completion);
}

#[scenario(path = "tests/features/http_geosearch.feature", index = 4)]
fn scenario_api_error(
    api: RefCell<Option<CannedReply>>,
    hits: RefCell<usize>,
    completion: RefCell<Option<Completion>>,
) {
    let _ = (api, hits, completion);
}
