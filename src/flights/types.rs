//! Flight record and aggregation types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One upstream query target: an origin airport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Source {
    /// ICAO code used in the upstream path.
    pub code: &'static str,
    /// Display name attached to records retrieved from this source.
    pub label: &'static str,
}

impl Source {
    pub const fn new(code: &'static str, label: &'static str) -> Self {
        Self { code, label }
    }
}

/// A flight movement as returned by AeroAPI.
///
/// The upstream object is kept verbatim in `fields`, nulls and unknown keys
/// included, and serialized back unchanged. The accessors read the few
/// values the gateway interprets; a missing or non-string value reads as
/// `None`, so one oddly typed field never fails the whole page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Label of the source airport this record was retrieved through.
    #[serde(
        rename = "origin_airport_name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub origin_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_type: Option<String>,

    /// Upstream fields plus any the gateway attached with `set_field`.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl FlightRecord {
    fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key)?.as_str()
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.text(key).filter(|raw| !raw.is_empty())
    }

    fn airport_code(&self, key: &str) -> Option<&str> {
        self.fields.get(key)?.get("code_icao")?.as_str()
    }

    /// Natural key used for de-duplication.
    pub fn ident(&self) -> Option<&str> {
        self.text("ident")
    }

    pub fn status(&self) -> Option<&str> {
        self.text("status")
    }

    /// ICAO aircraft type designator (e.g. `B77W`, `B77F`).
    pub fn aircraft_type(&self) -> Option<&str> {
        self.text("aircraft_type")
    }

    pub fn origin_icao(&self) -> Option<&str> {
        self.airport_code("origin")
    }

    pub fn destination_icao(&self) -> Option<&str> {
        self.airport_code("destination")
    }

    /// Departure time used for ordering.
    ///
    /// A non-empty `scheduled_out` wins over `estimated_out`. A record with
    /// neither, or with an unparseable value, sorts at the epoch.
    pub fn ordering_key(&self) -> DateTime<Utc> {
        self.non_empty("scheduled_out")
            .or_else(|| self.non_empty("estimated_out"))
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_default()
    }

    /// Attach a top-level field, replacing any previous value.
    pub fn set_field(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }
}

/// Caller parameters for one aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationRequest {
    /// Maximum number of records returned. Bounds are enforced by the caller.
    pub limit: usize,
    /// Keep freighter aircraft types in the result.
    pub include_cargo: bool,
}

/// A source that could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceError {
    pub airport: String,
    pub error: String,
}

/// Outcome of an aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationResult {
    pub flights: Vec<FlightRecord>,
    /// De-duplicated count before truncation.
    pub total_found: usize,
    pub sources_queried: usize,
    pub errors: Vec<SourceError>,
}

/// AeroAPI `/flights/{ident}` and `/airports/{code}/flights...` envelopes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightsPage {
    #[serde(default)]
    pub flights: Option<Vec<FlightRecord>>,
    #[serde(default)]
    pub arrivals: Option<Vec<FlightRecord>>,
    #[serde(default)]
    pub departures: Option<Vec<FlightRecord>>,
    #[serde(default)]
    pub scheduled_arrivals: Option<Vec<FlightRecord>>,
    #[serde(default)]
    pub scheduled_departures: Option<Vec<FlightRecord>>,
}

/// AeroAPI `/flights/{id}/track` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub positions: Option<Vec<Value>>,
}
