//! Mock MediaWiki API used by the transport behaviour tests.

use httpmock::Mock;
use httpmock::prelude::*;
use std::net::TcpListener;

/// Path of the API endpoint on the mock server.
pub const API_PATH: &str = "/w/api.php";

/// Response the mock API serves.
#[derive(Debug, Clone)]
pub struct CannedReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: &'static str,
}

/// Register a geosearch endpoint on `server` that answers with `reply`.
///
/// Only requests carrying the expected geosearch parameters for a 20-result,
/// 500 m search around Trafalgar Square match; anything else gets the mock
/// server's 404.
pub fn geosearch_endpoint<'a>(server: &'a MockServer, reply: &CannedReply) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path(API_PATH)
            .query_param("format", "json")
            .query_param("action", "query")
            .query_param("list", "geosearch")
            .query_param("gslimit", "20")
            .query_param("gsradius", "500")
            .query_param("gscoord", "51.508|-0.128");
        then.status(reply.status)
            .header("content-type", "application/json")
            .body(reply.body);
    })
}

/// Base URL of a loopback port with nothing listening.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
    let address = listener.local_addr().expect("listener address");
    drop(listener);
    format!("http://{address}")
}
