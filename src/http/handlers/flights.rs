//! FlightAware-backed endpoints.

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::flights::{
    status_description, AggregationRequest, Board, FlightRecord, FlightAwareClient, SourceError,
};
use crate::http::response::{now_iso, ApiError};
use crate::http::server::AppState;
use crate::http::validation::{is_airport_code, is_flight_number, parse_flag, parse_limit, present};

const DEFAULT_AIRPORT_LIMIT: usize = 10;
const DEFAULT_AGGREGATE_LIMIT: usize = 20;
const DEFAULT_ROUTE_LIMIT: usize = 10;

/// Attach the display label and lookup timestamp every flight endpoint adds.
fn enrich(flight: &mut FlightRecord, timestamp: &str) {
    flight.status_description = flight.status().map(status_description);
    flight.set_field("search_timestamp", timestamp);
}

pub async fn test_connection(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let flights = state
        .flights
        .airport_board("KJFK", Board::Both)
        .await
        .map_err(|e| ApiError::flightaware(&e, "Failed to test FlightAware connection"))?;

    Ok(Json(json!({
        "success": true,
        "message": "FlightAware connection established",
        "data": {
            "airport": "JFK",
            "flights_count": flights.len(),
            "api_status": "connected",
            "timestamp": now_iso(),
        }
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub flight: Option<String>,
}

/// `flight` may come from the query string or a JSON body; the query wins.
pub async fn search_flight(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let from_body = serde_json::from_slice::<SearchQuery>(&body)
        .ok()
        .and_then(|b| b.flight);
    let flight = present(query.flight.as_deref())
        .or_else(|| present(from_body.as_deref()))
        .ok_or_else(|| ApiError::bad_request("MISSING_FLIGHT_NUMBER", "Flight number is required"))?;

    if !is_flight_number(flight) {
        return Err(ApiError::bad_request(
            "INVALID_FLIGHT_FORMAT",
            "Invalid flight number format (e.g. AA123, TAM3054)",
        ));
    }
    let ident = flight.to_uppercase();

    let flights = state
        .flights
        .flights_by_ident(&ident)
        .await
        .map_err(|e| ApiError::flightaware(&e, "Failed to fetch flight information"))?;

    let Some(mut found) = flights.into_iter().next() else {
        return Err(ApiError::not_found(
            "FLIGHT_NOT_FOUND",
            format!("Flight {ident} not found"),
        ));
    };
    enrich(&mut found, &now_iso());
    found.set_field("flight_number", ident.as_str());

    Ok(Json(json!({
        "success": true,
        "data": found,
        "message": format!("Flight {ident} found"),
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct AirportQuery {
    pub airport: Option<String>,
    #[serde(rename = "type")]
    pub board: Option<String>,
    pub limit: Option<String>,
}

pub async fn airport_flights(
    State(state): State<AppState>,
    Query(query): Query<AirportQuery>,
) -> Result<Json<Value>, ApiError> {
    let airport = present(query.airport.as_deref())
        .ok_or_else(|| ApiError::bad_request("MISSING_AIRPORT_CODE", "Airport code is required"))?;
    if !is_airport_code(airport) {
        return Err(ApiError::bad_request(
            "INVALID_AIRPORT_CODE",
            "Invalid airport code (e.g. GRU, SBGR)",
        ));
    }
    let board: Board = present(query.board.as_deref())
        .unwrap_or("both")
        .parse()
        .map_err(|_| {
            ApiError::bad_request(
                "INVALID_FLIGHT_TYPE",
                "Type must be one of: arrivals, departures, both",
            )
        })?;
    let limit = parse_limit(
        query.limit.as_deref(),
        DEFAULT_AIRPORT_LIMIT,
        state.limits.airport_max,
    )?;
    let airport = airport.to_uppercase();

    let mut flights = state
        .flights
        .airport_board(&airport, board)
        .await
        .map_err(|e| ApiError::flightaware(&e, "Failed to fetch airport flights"))?;
    flights.truncate(limit);

    let timestamp = now_iso();
    flights.iter_mut().for_each(|f| enrich(f, &timestamp));

    Ok(Json(json!({
        "success": true,
        "count": flights.len(),
        "airport": &airport,
        "type": board.as_str(),
        "message": format!("{} flights found for {airport}", flights.len()),
        "data": flights,
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct BrazilUsaQuery {
    pub limit: Option<String>,
    pub include_cargo: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BrazilUsaResponse {
    pub success: bool,
    pub data: Vec<FlightRecord>,
    pub count: usize,
    pub total_found: usize,
    pub airports_searched: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<SourceError>>,
    pub search_timestamp: String,
    pub message: String,
}

/// Brazil → USA departures merged across the major Brazilian airports.
pub async fn brazil_usa_flights(
    State(state): State<AppState>,
    Query(query): Query<BrazilUsaQuery>,
) -> Result<Json<BrazilUsaResponse>, ApiError> {
    let limit = parse_limit(
        query.limit.as_deref(),
        DEFAULT_AGGREGATE_LIMIT,
        state.limits.aggregate_max,
    )?;
    let request = AggregationRequest {
        limit,
        include_cargo: parse_flag(query.include_cargo.as_deref()),
    };

    let result = state.aggregator.aggregate(request).await;
    if !result.errors.is_empty() {
        tracing::warn!(
            failed = result.errors.len(),
            queried = result.sources_queried,
            "Aggregation completed with source errors"
        );
    }

    let count = result.flights.len();
    Ok(Json(BrazilUsaResponse {
        success: true,
        data: result.flights,
        count,
        total_found: result.total_found,
        airports_searched: result.sources_queried,
        errors: (!result.errors.is_empty()).then_some(result.errors),
        search_timestamp: now_iso(),
        message: format!("{count} Brazil-USA flights found"),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct FlightDetailsQuery {
    pub flight_id: Option<String>,
    pub include_history: Option<String>,
}

pub async fn flight_details(
    State(state): State<AppState>,
    Query(query): Query<FlightDetailsQuery>,
) -> Result<Json<Value>, ApiError> {
    let flight_id = present(query.flight_id.as_deref())
        .ok_or_else(|| ApiError::bad_request("MISSING_FLIGHT_ID", "Flight ID is required"))?;

    let flights = state
        .flights
        .flights_by_ident(flight_id)
        .await
        .map_err(|e| ApiError::flightaware(&e, "Failed to fetch flight details"))?;
    let Some(mut flight) = flights.into_iter().next() else {
        return Err(ApiError::not_found("FLIGHT_NOT_FOUND", "Flight not found"));
    };
    enrich(&mut flight, &now_iso());

    if parse_flag(query.include_history.as_deref()) {
        match state.flights.track(flight_id).await {
            Ok(Some(positions)) => flight.set_field("track_history", positions),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(flight_id, error = %e, "Flight track unavailable");
                flight.set_field("track_history_error", "History not available");
            }
        }
    }

    let origin = flight.origin_icao().map(str::to_string);
    let destination = flight.destination_icao().map(str::to_string);
    let (origin_details, destination_details) = tokio::join!(
        airport_details(&state.flights, origin.as_deref()),
        airport_details(&state.flights, destination.as_deref()),
    );
    if let Some(details) = origin_details {
        flight.set_field("origin_details", details);
    }
    if let Some(details) = destination_details {
        flight.set_field("destination_details", details);
    }

    Ok(Json(json!({
        "success": true,
        "data": flight,
        "message": format!("Details for flight {flight_id} retrieved"),
    })))
}

/// Airport metadata, or `None` when there is no code or the lookup fails.
async fn airport_details(client: &FlightAwareClient, code: Option<&str>) -> Option<Value> {
    let code = code?;
    match client.airport_info(code).await {
        Ok(info) => Some(info),
        Err(e) => {
            tracing::warn!(airport = code, error = %e, "Airport lookup failed");
            None
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RouteQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub limit: Option<String>,
}

pub async fn route_flights(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<Value>, ApiError> {
    let (Some(origin), Some(destination)) = (
        present(query.origin.as_deref()),
        present(query.destination.as_deref()),
    ) else {
        return Err(ApiError::bad_request(
            "MISSING_AIRPORTS",
            "Origin and destination airports are required",
        ));
    };
    if !is_airport_code(origin) || !is_airport_code(destination) {
        return Err(ApiError::bad_request(
            "INVALID_AIRPORT_CODES",
            "Invalid airport codes (e.g. GRU, KJFK)",
        ));
    }
    let limit = parse_limit(
        query.limit.as_deref(),
        DEFAULT_ROUTE_LIMIT,
        state.limits.route_max,
    )?;
    let origin = origin.to_uppercase();
    let destination = destination.to_uppercase();
    let route = format!("{origin} → {destination}");

    let mut flights = state
        .flights
        .route_flights(&origin, &destination)
        .await
        .map_err(|e| ApiError::flightaware(&e, "Failed to fetch route flights"))?;
    flights.truncate(limit);

    let timestamp = now_iso();
    for flight in &mut flights {
        enrich(flight, &timestamp);
        flight.set_field("route", route.as_str());
    }

    Ok(Json(json!({
        "success": true,
        "count": flights.len(),
        "route": {"origin": origin, "destination": destination},
        "message": format!("{} flights found on route {route}", flights.len()),
        "data": flights,
    })))
}
