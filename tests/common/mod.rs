//! Shared utilities for integration tests: mock upstreams and a gateway launcher.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::net::TcpListener;

use travel_gateway::config::GatewayConfig;
use travel_gateway::{HttpServer, Shutdown};

pub const FLIGHTAWARE_KEY: &str = "fa-test-key";
pub const AUTODEV_KEY: &str = "autodev-test-key";
pub const CHAT_KEY: &str = "chat-test-key";

/// Serve `router` on an ephemeral local port.
pub async fn spawn_mock(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A running gateway. Dropping it leaves the task running until the runtime ends.
pub struct Gateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl Gateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the gateway on an ephemeral port.
pub async fn spawn_gateway(config: GatewayConfig) -> Gateway {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });

    Gateway { addr, shutdown }
}

/// Config pointing every upstream at `mock`, with all credentials set.
pub fn config_for(mock: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.flightaware.base_url = format!("http://{mock}/aeroapi");
    config.flightaware.api_key = FLIGHTAWARE_KEY.to_string();
    config.autodev.base_url = format!("http://{mock}/api");
    config.autodev.api_key = AUTODEV_KEY.to_string();
    config.chat.base_url = format!("http://{mock}/v1");
    config.chat.api_key = CHAT_KEY.to_string();
    config.timeouts.upstream_secs = 5;
    config
}

/// Mock upstreams and a gateway wired to them.
pub async fn start_stack() -> Gateway {
    let mock = spawn_mock(mock_upstreams()).await;
    spawn_gateway(config_for(mock)).await
}

/// Every third-party API the gateway talks to, under distinct path prefixes.
pub fn mock_upstreams() -> Router {
    Router::new()
        .route("/aeroapi/airports/{code}", get(fa_airport))
        .route("/aeroapi/airports/{code}/flights", get(fa_airport_flights))
        .route("/aeroapi/airports/{code}/flights/departures", get(fa_departures))
        .route("/aeroapi/airports/{code}/flights/arrivals", get(fa_arrivals))
        .route(
            "/aeroapi/airports/{code}/flights/to/{destination}",
            get(fa_route),
        )
        .route("/aeroapi/flights/{ident}", get(fa_flight))
        .route("/aeroapi/flights/{ident}/track", get(fa_track))
        .route("/api/listings", get(autodev_listings))
        .route("/photos/{name}", get(photo))
        .route("/v1/chat/completions", post(chat_completions))
}

fn has_key(headers: &HeaderMap, name: &str, expected: &str) -> bool {
    headers.get(name).and_then(|v| v.to_str().ok()) == Some(expected)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"title": "Unauthorized"}))).into_response()
}

fn flight(ident: &str, origin: &str, destination: &str, scheduled_out: &str, aircraft: &str) -> Value {
    json!({
        "ident": ident,
        "fa_flight_id": format!("{ident}-1"),
        "scheduled_out": scheduled_out,
        "aircraft_type": aircraft,
        "status": "Scheduled",
        "origin": {"code_icao": origin, "city": "origin city"},
        "destination": {"code_icao": destination, "city": "destination city"},
    })
}

/// Departure boards for the aggregation sources.
///
/// - SBGR: two US flights (one freighter) and one domestic flight
/// - SBGL: a duplicate of the SBGR passenger flight plus an earlier US flight
/// - SBRF: upstream failure
/// - everything else: empty
fn departures_for(code: &str) -> Option<Vec<Value>> {
    match code {
        "SBGR" => Some(vec![
            flight("TAM8180", "SBGR", "KJFK", "2026-10-18T02:00:00Z", "B77W"),
            flight("LTC9001", "SBGR", "KMIA", "2026-10-18T01:00:00Z", "B77F"),
            flight("GLO1234", "SBGR", "SBRJ", "2026-10-17T23:00:00Z", "B738"),
        ]),
        "SBGL" => Some(vec![
            flight("TAM8180", "SBGL", "KJFK", "2026-10-18T05:00:00Z", "B77W"),
            flight("AAL904", "SBGL", "KMIA", "2026-10-17T22:00:00Z", "B772"),
        ]),
        "SBRF" => None,
        _ => Some(vec![]),
    }
}

async fn fa_departures(Path(code): Path<String>, headers: HeaderMap) -> Response {
    if !has_key(&headers, "x-apikey", FLIGHTAWARE_KEY) {
        return unauthorized();
    }
    match departures_for(&code) {
        Some(departures) => Json(json!({ "departures": departures })).into_response(),
        None => (StatusCode::BAD_GATEWAY, Json(json!({"detail": "upstream unavailable"})))
            .into_response(),
    }
}

async fn fa_arrivals(Path(code): Path<String>, headers: HeaderMap) -> Response {
    if !has_key(&headers, "x-apikey", FLIGHTAWARE_KEY) {
        return unauthorized();
    }
    let arrivals: Vec<Value> = (1..=5)
        .map(|n| flight(&format!("ARR{n}"), "SBGR", &code, "2026-10-17T20:00:00Z", "A320"))
        .collect();
    Json(json!({ "arrivals": arrivals })).into_response()
}

async fn fa_airport_flights(Path(code): Path<String>, headers: HeaderMap) -> Response {
    if !has_key(&headers, "x-apikey", FLIGHTAWARE_KEY) {
        return unauthorized();
    }
    Json(json!({
        "arrivals": [flight("IN1", "SBGR", &code, "2026-10-17T20:00:00Z", "A320")],
        "departures": [
            flight("OUT1", &code, "SBGR", "2026-10-17T21:00:00Z", "B763"),
            flight("OUT2", &code, "SBGL", "2026-10-17T22:00:00Z", "B763"),
        ],
    }))
    .into_response()
}

async fn fa_airport(Path(code): Path<String>, headers: HeaderMap) -> Response {
    if !has_key(&headers, "x-apikey", FLIGHTAWARE_KEY) {
        return unauthorized();
    }
    match code.as_str() {
        "KJFK" => Json(json!({"code_icao": "KJFK", "name": "John F Kennedy Intl"})).into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"title": "Not found"}))).into_response(),
    }
}

async fn fa_route(Path((code, destination)): Path<(String, String)>, headers: HeaderMap) -> Response {
    if !has_key(&headers, "x-apikey", FLIGHTAWARE_KEY) {
        return unauthorized();
    }
    let flights: Vec<Value> = (1..=3)
        .map(|n| flight(&format!("RT{n}"), &code, &destination, "2026-10-17T20:00:00Z", "B77W"))
        .collect();
    Json(json!({ "flights": flights })).into_response()
}

async fn fa_flight(Path(ident): Path<String>, headers: HeaderMap) -> Response {
    if !has_key(&headers, "x-apikey", FLIGHTAWARE_KEY) {
        return unauthorized();
    }
    match ident.as_str() {
        "AA123" => {
            let mut f = flight("AA123", "KJFK", "SBGR", "2026-10-17T23:30:00Z", "B772");
            f["status"] = json!("Active");
            Json(json!({ "flights": [f] })).into_response()
        }
        "XX429" => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"title": "Too many requests"})),
        )
            .into_response(),
        "XX400" => (
            StatusCode::BAD_REQUEST,
            Json(json!({"title": "Bad request", "detail": "Invalid ident"})),
        )
            .into_response(),
        _ => Json(json!({ "flights": [] })).into_response(),
    }
}

async fn fa_track(Path(ident): Path<String>, headers: HeaderMap) -> Response {
    if !has_key(&headers, "x-apikey", FLIGHTAWARE_KEY) {
        return unauthorized();
    }
    match ident.as_str() {
        "AA123" => Json(json!({
            "positions": [
                {"latitude": 40.6, "longitude": -73.8, "altitude": 10},
                {"latitude": 39.9, "longitude": -72.1, "altitude": 310},
            ]
        }))
        .into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"title": "Not found"}))).into_response(),
    }
}

async fn autodev_listings(
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let bearer = format!("Bearer {AUTODEV_KEY}");
    if !has_key(&headers, "authorization", &bearer) {
        return unauthorized();
    }
    if params.get("make").map(String::as_str) == Some("Forbidden") {
        return (StatusCode::FORBIDDEN, Json(json!({"error": "plan limit"}))).into_response();
    }

    let records = match params.get("color").map(String::as_str) {
        Some("Black") => json!([
            {"make": "Toyota", "photoUrls": ["black.jpg"], "price": 30000}
        ]),
        Some(_) => json!([]),
        None => json!([
            {"make": "Toyota", "photoUrls": ["a.jpg", "b.jpg"], "price": 25000},
            {"make": "Toyota", "photoUrls": ["b.jpg", "c.jpg"], "listPrice": 27001},
            {"make": "Toyota", "photoUrls": [], "price": "call us"},
        ]),
    };
    Json(json!({ "records": records })).into_response()
}

async fn photo(Path(name): Path<String>) -> Response {
    match name.as_str() {
        "car.png" => ([(header::CONTENT_TYPE, "image/png")], vec![0x89, b'P', b'N', b'G']).into_response(),
        "untyped" => Response::new(Body::from(vec![0xff, 0xd8, 0xff])),
        "huge.jpg" => ([(header::CONTENT_TYPE, "image/jpeg")], vec![0u8; 8 * 1024]).into_response(),
        // Chunked, so no Content-Length is declared.
        "streamed.jpg" => {
            let chunks = (0..8).map(|_| Ok::<_, std::convert::Infallible>(vec![0u8; 1024]));
            Response::new(Body::from_stream(futures_util::stream::iter(chunks)))
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn chat_completions(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let bearer = format!("Bearer {CHAT_KEY}");
    if !has_key(&headers, "authorization", &bearer) {
        return unauthorized();
    }
    let user = body["messages"][1]["content"].as_str().unwrap_or_default();
    if user == "fail" {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": {"message": "overloaded"}})))
            .into_response();
    }
    Json(json!({
        "model": body["model"],
        "choices": [{"message": {"role": "assistant", "content": format!("Echo: {user}")}}],
        "usage": {"total_tokens": 42},
        "system_prompt_seen": body["messages"][0]["role"],
    }))
    .into_response()
}
