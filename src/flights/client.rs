//! FlightAware AeroAPI client.
//!
//! # Responsibilities
//! - Authenticate every call with the static `x-apikey` credential
//! - Build AeroAPI paths with percent-encoded segments
//! - Unwrap the paged envelopes into plain record lists
//! - Serve as the aggregator's retrieval collaborator

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::FlightAwareConfig;
use crate::flights::aggregator::RecordSource;
use crate::flights::types::{FlightRecord, FlightsPage, Source, TrackPage};
use crate::upstream::{build_http_client, read_json, UpstreamError, UpstreamResult};

const API_KEY_HEADER: &str = "x-apikey";

/// Which airport board to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    Arrivals,
    Departures,
    Both,
}

impl Board {
    /// AeroAPI path for this board: `/airports/{code}/flights[/arrivals|/departures]`.
    fn path(self, airport: &str) -> Vec<&str> {
        let mut segments = vec!["airports", airport, "flights"];
        match self {
            Board::Arrivals => segments.push("arrivals"),
            Board::Departures => segments.push("departures"),
            Board::Both => {}
        }
        segments
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Board::Arrivals => "arrivals",
            Board::Departures => "departures",
            Board::Both => "both",
        }
    }

    /// Pick the matching list out of an airport page.
    ///
    /// The combined `/flights` endpoint reports arrivals and departures
    /// separately; `Both` prefers a `flights` array when present and otherwise
    /// concatenates departures then arrivals.
    fn select(self, page: FlightsPage) -> Vec<FlightRecord> {
        match self {
            Board::Arrivals => page.arrivals.unwrap_or_default(),
            Board::Departures => page.departures.unwrap_or_default(),
            Board::Both => match page.flights {
                Some(flights) => flights,
                None => {
                    let mut all = page.departures.unwrap_or_default();
                    all.extend(page.arrivals.unwrap_or_default());
                    all
                }
            },
        }
    }
}

impl FromStr for Board {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arrivals" => Ok(Board::Arrivals),
            "departures" => Ok(Board::Departures),
            "both" => Ok(Board::Both),
            _ => Err(()),
        }
    }
}

/// Thin AeroAPI wrapper. Cheap to clone; the reqwest pool is shared.
#[derive(Clone)]
pub struct FlightAwareClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl FlightAwareClient {
    pub fn new(config: &FlightAwareConfig, timeout: Duration) -> UpstreamResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| UpstreamError::Decode(format!("invalid FlightAware base URL: {e}")))?;
        Ok(Self {
            http: build_http_client(timeout)?,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> UpstreamResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::Decode("FlightAware base URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> UpstreamResult<T> {
        if self.api_key.is_empty() {
            return Err(UpstreamError::NotConfigured("FlightAware"));
        }
        let url = self.endpoint(segments)?;
        tracing::debug!(path = url.path(), "FlightAware request");

        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await?;
        read_json(response).await
    }

    /// First page of an airport's arrivals, departures, or both.
    pub async fn airport_board(&self, airport: &str, board: Board) -> UpstreamResult<Vec<FlightRecord>> {
        let page: FlightsPage = self
            .get_json(&board.path(airport), &[("max_pages", "1")])
            .await?;
        Ok(board.select(page))
    }

    /// All known flights for an ident or `fa_flight_id`, most relevant first.
    pub async fn flights_by_ident(&self, ident: &str) -> UpstreamResult<Vec<FlightRecord>> {
        let page: FlightsPage = self.get_json(&["flights", ident], &[]).await?;
        Ok(page.flights.unwrap_or_default())
    }

    /// Position history for a flight.
    pub async fn track(&self, flight_id: &str) -> UpstreamResult<Option<Vec<Value>>> {
        let page: TrackPage = self.get_json(&["flights", flight_id, "track"], &[]).await?;
        Ok(page.positions)
    }

    /// Airport metadata as returned by AeroAPI.
    pub async fn airport_info(&self, airport: &str) -> UpstreamResult<Value> {
        self.get_json(&["airports", airport], &[]).await
    }

    /// Flights between two airports.
    pub async fn route_flights(&self, origin: &str, destination: &str) -> UpstreamResult<Vec<FlightRecord>> {
        let page: FlightsPage = self
            .get_json(
                &["airports", origin, "flights", "to", destination],
                &[("max_pages", "1")],
            )
            .await?;
        Ok(page.flights.unwrap_or_default())
    }
}

impl RecordSource for FlightAwareClient {
    fn fetch_records(
        &self,
        source: &Source,
    ) -> impl Future<Output = UpstreamResult<Vec<FlightRecord>>> + Send {
        let airport = source.code;
        async move { self.airport_board(airport, Board::Departures).await }
    }
}

impl std::fmt::Debug for FlightAwareClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightAwareClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key_set", &!self.api_key.is_empty())
            .finish()
    }
}
