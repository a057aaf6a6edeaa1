//! Behaviour-driven step definitions driving the nearby CLI scenarios.

use super::helpers::{StubBackend, trafalgar_response};
use super::*;
use crate::nearby::{DisplayedMarker, run_nearby};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use wikilayer_core::TransportError;

#[derive(Debug)]
struct NearbyWorld {
    backend: RefCell<Option<StubBackend>>,
    include_lat: RefCell<bool>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl NearbyWorld {
    fn new() -> Self {
        Self {
            backend: RefCell::new(None),
            include_lat: RefCell::new(true),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["wikilayer".to_owned(), "nearby".to_owned()];
        if *self.include_lat.borrow() {
            argv.push(format!("--{ARG_LAT}=51.508"));
        }
        argv.push(format!("--{ARG_LNG}=-0.128"));
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> NearbyWorld {
    NearbyWorld::new()
}

#[given("the API returns two articles near Trafalgar Square")]
fn api_returns_articles(#[from(world)] world: &NearbyWorld) {
    *world.backend.borrow_mut() = Some(StubBackend::answering(trafalgar_response()));
}

#[given("the API fails with status 503")]
fn api_fails(#[from(world)] world: &NearbyWorld) {
    *world.backend.borrow_mut() = Some(StubBackend::failing(TransportError::Http {
        url: "https://en.wikipedia.org/w/api.php".to_owned(),
        status: 503,
        message: "Service Unavailable".to_owned(),
    }));
}

#[given("the transport closes without answering")]
fn transport_closes(#[from(world)] world: &NearbyWorld) {
    *world.backend.borrow_mut() = Some(StubBackend::closed());
}

#[given("the map zoom is below the layer's minimum")]
fn zoom_below_minimum(#[from(world)] world: &NearbyWorld) {
    world.cli_args.borrow_mut().extend([
        format!("--{ARG_ZOOM}=5"),
        format!("--{ARG_MIN_ZOOM}=10"),
    ]);
}

#[given("I omit the latitude")]
fn omit_latitude(#[from(world)] world: &NearbyWorld) {
    *world.include_lat.borrow_mut() = false;
}

#[when("I run the nearby command")]
fn run_nearby_command(#[from(world)] world: &NearbyWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Nearby(args) => {
            let mut backend = world.backend.borrow_mut();
            let backend = backend.as_mut().expect("backend configured");
            let mut buffer = world.stdout.borrow_mut();
            run_nearby(args, backend, &mut *buffer)
        }
    });

    world.result.replace(Some(outcome));
}

#[then("the command prints two markers as JSON")]
fn prints_two_markers(#[from(world)] world: &NearbyWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");

    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    let markers: Vec<DisplayedMarker> =
        serde_json::from_str(&stdout).expect("output should be a JSON marker list");
    let titles: Vec<&str> = markers.iter().map(|marker| marker.title.as_str()).collect();
    assert_eq!(titles, vec!["Trafalgar Square", "Covent Garden"]);
}

#[then("the command prints an empty marker list")]
fn prints_empty_list(#[from(world)] world: &NearbyWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");

    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    let markers: Vec<DisplayedMarker> =
        serde_json::from_str(&stdout).expect("output should be a JSON marker list");
    assert!(markers.is_empty(), "expected no markers, found {markers:?}");
}

#[then("no search completion was awaited")]
fn no_completion_awaited(#[from(world)] world: &NearbyWorld) {
    let backend = world.backend.borrow();
    let backend = backend.as_ref().expect("backend configured");
    assert!(backend.requests().is_empty());
}

#[then("the command fails with HTTP status 503")]
fn fails_with_status(#[from(world)] world: &NearbyWorld) {
    match &*world.error() {
        CliError::Search(TransportError::Http { status, .. }) => assert_eq!(*status, 503),
        other => panic!("expected Search, found {other:?}"),
    }
}

#[then("the command fails because the transport closed")]
fn fails_transport_closed(#[from(world)] world: &NearbyWorld) {
    match &*world.error() {
        CliError::TransportClosed { request } => assert_eq!(request, "#1"),
        other => panic!("expected TransportClosed, found {other:?}"),
    }
}

#[then("the command fails because the latitude is missing")]
fn fails_missing_latitude(#[from(world)] world: &NearbyWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_LAT),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

macro_rules! register_nearby_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/nearby_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: NearbyWorld) {
            let _ = world;
        }
    };
}

register_nearby_scenario!(nearby_happy_path, "printing the markers for a viewport");
register_nearby_scenario!(nearby_zoom_gate, "staying quiet outside the zoom range");
register_nearby_scenario!(nearby_failed_search, "reporting a failed search");
register_nearby_scenario!(nearby_closed_transport, "reporting a closed transport");
register_nearby_scenario!(nearby_missing_latitude, "rejecting a missing latitude");
