//! Multi-airport flight aggregation.
//!
//! # Data Flow
//! ```text
//! static source list
//!     → one fetch per source, run concurrently, joined in source order
//!     → per-source: failure → SourceError, success → corridor/cargo filter + annotate
//!     → concatenate (source order)
//!     → de-duplicate by ident (first seen wins)
//!     → stable sort by departure time
//!     → truncate to limit
//! ```
//!
//! A failing source never aborts the run; it only contributes an entry to
//! `errors`. Nothing is merged until every fetch has resolved, so output
//! order never depends on which upstream answered first.

use std::collections::HashSet;
use std::future::Future;

use futures_util::future::join_all;

use crate::flights::catalog::{is_cargo, Corridor, BRAZILIAN_AIRPORTS, BRAZIL_USA};
use crate::flights::status::status_description;
use crate::flights::types::{
    AggregationRequest, AggregationResult, FlightRecord, Source, SourceError,
};
use crate::observability::metrics;
use crate::upstream::UpstreamResult;

/// Retrieval collaborator: fetch the candidate records for one source.
///
/// Implementations build the source-specific request, authenticate, and
/// collapse any failure (network, status, body) into a single error.
pub trait RecordSource: Send + Sync {
    fn fetch_records(
        &self,
        source: &Source,
    ) -> impl Future<Output = UpstreamResult<Vec<FlightRecord>>> + Send;
}

/// Fans out over a fixed source list and merges the results.
#[derive(Debug, Clone)]
pub struct Aggregator<R> {
    retriever: R,
    sources: Vec<Source>,
    corridor: Corridor,
}

impl<R: RecordSource> Aggregator<R> {
    pub fn new(retriever: R, sources: Vec<Source>, corridor: Corridor) -> Self {
        Self {
            retriever,
            sources,
            corridor,
        }
    }

    /// Brazil → USA departures from the major Brazilian airports.
    pub fn brazil_usa(retriever: R) -> Self {
        Self::new(retriever, BRAZILIAN_AIRPORTS.to_vec(), BRAZIL_USA)
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Run one aggregation. Always returns; per-source failures land in `errors`.
    pub async fn aggregate(&self, request: AggregationRequest) -> AggregationResult {
        let fetches = self.sources.iter().map(|source| async move {
            (source, self.retriever.fetch_records(source).await)
        });
        let outcomes = join_all(fetches).await;

        let mut merged = Vec::new();
        let mut errors = Vec::new();
        for (source, outcome) in outcomes {
            match outcome {
                Ok(records) => {
                    let fetched = records.len();
                    let before = merged.len();
                    merged.extend(self.select(source, records, request.include_cargo));
                    tracing::debug!(
                        airport = source.code,
                        fetched,
                        kept = merged.len() - before,
                        "Source retrieved"
                    );
                }
                Err(e) => {
                    tracing::warn!(airport = source.code, error = %e, "Source retrieval failed");
                    errors.push(SourceError {
                        airport: source.code.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }
        metrics::record_aggregation(self.sources.len(), errors.len());

        let mut flights = dedup_by_ident(merged);
        flights.sort_by_cached_key(FlightRecord::ordering_key);

        let total_found = flights.len();
        flights.truncate(request.limit);

        AggregationResult {
            flights,
            total_found,
            sources_queried: self.sources.len(),
            errors,
        }
    }

    /// Filter one source's records and attach the derived display fields.
    fn select(
        &self,
        source: &Source,
        records: Vec<FlightRecord>,
        include_cargo: bool,
    ) -> impl Iterator<Item = FlightRecord> + '_ {
        let label = source.label;
        records
            .into_iter()
            .filter(move |f| include_cargo || !is_cargo(f))
            .filter(move |f| self.corridor.matches(f))
            .map(move |mut f| {
                f.origin_label = Some(label.to_string());
                f.status_description = f.status().map(status_description);
                f.route_type = Some(self.corridor.label.to_string());
                f
            })
    }
}

/// Keep the first record for each `ident`. A missing ident counts as a key
/// of its own, so at most one ident-less record survives.
pub fn dedup_by_ident(records: Vec<FlightRecord>) -> Vec<FlightRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|f| seen.insert(f.ident().map(str::to_string)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::UpstreamError;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    const A: Source = Source::new("SBGR", "Guarulhos");
    const B: Source = Source::new("SBBR", "Brasília");
    const C: Source = Source::new("SBGL", "Galeão");

    /// Canned per-source outcomes with an optional artificial delay.
    struct StubSource {
        outcomes: HashMap<&'static str, Result<Vec<FlightRecord>, String>>,
        delays_ms: HashMap<&'static str, u64>,
    }

    impl StubSource {
        fn new() -> Self {
            Self {
                outcomes: HashMap::new(),
                delays_ms: HashMap::new(),
            }
        }

        fn ok(mut self, source: Source, records: Vec<FlightRecord>) -> Self {
            self.outcomes.insert(source.code, Ok(records));
            self
        }

        fn fail(mut self, source: Source, message: &str) -> Self {
            self.outcomes.insert(source.code, Err(message.to_string()));
            self
        }

        fn delay(mut self, source: Source, ms: u64) -> Self {
            self.delays_ms.insert(source.code, ms);
            self
        }
    }

    impl RecordSource for StubSource {
        fn fetch_records(
            &self,
            source: &Source,
        ) -> impl Future<Output = UpstreamResult<Vec<FlightRecord>>> + Send {
            let delay = self.delays_ms.get(source.code).copied().unwrap_or(0);
            let outcome = self
                .outcomes
                .get(source.code)
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()));
            async move {
                if delay > 0 {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                outcome.map_err(UpstreamError::Decode)
            }
        }
    }

    fn flight(ident: &str, dest: &str, scheduled: Option<&str>, ty: &str) -> FlightRecord {
        let mut value = json!({
            "ident": ident,
            "status": "Scheduled",
            "aircraft_type": ty,
            "origin": {"code_icao": "SBGR"},
            "destination": {"code_icao": dest},
        });
        if let Some(t) = scheduled {
            value["scheduled_out"] = json!(t);
        }
        serde_json::from_value(value).unwrap()
    }

    fn idents(result: &AggregationResult) -> Vec<&str> {
        result
            .flights
            .iter()
            .map(|f| f.ident().unwrap_or("-"))
            .collect()
    }

    fn request(limit: usize, include_cargo: bool) -> AggregationRequest {
        AggregationRequest {
            limit,
            include_cargo,
        }
    }

    #[tokio::test]
    async fn test_mixed_outcomes_scenario() {
        let stub = StubSource::new()
            .ok(
                A,
                vec![
                    flight("X1", "KJFK", Some("2024-06-01T12:00:00Z"), "B77W"),
                    flight("X2", "KMIA", Some("2024-06-01T09:00:00Z"), "B789"),
                ],
            )
            .fail(B, "connection refused")
            .ok(
                C,
                vec![
                    flight("X1", "KATL", Some("2024-06-01T01:00:00Z"), "A332"),
                    flight("X3", "KMIA", Some("2024-06-01T05:00:00Z"), "B77F"),
                ],
            );
        let aggregator = Aggregator::new(stub, vec![A, B, C], BRAZIL_USA);

        let result = aggregator.aggregate(request(10, false)).await;

        assert_eq!(idents(&result), vec!["X2", "X1"]);
        // X1 is the copy from A, not the earlier-departing copy from C.
        assert_eq!(result.flights[1].destination_icao(), Some("KJFK"));
        assert_eq!(result.flights[1].origin_label.as_deref(), Some("Guarulhos"));
        assert_eq!(result.total_found, 2);
        assert_eq!(result.sources_queried, 3);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].airport, "SBBR");
        assert!(result.errors[0].error.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_all_sources_fail() {
        let stub = StubSource::new()
            .fail(A, "timeout")
            .fail(B, "401")
            .fail(C, "dns");
        let aggregator = Aggregator::new(stub, vec![A, B, C], BRAZIL_USA);

        let result = aggregator.aggregate(request(20, true)).await;

        assert!(result.flights.is_empty());
        assert_eq!(result.total_found, 0);
        let failed: Vec<_> = result.errors.iter().map(|e| e.airport.as_str()).collect();
        assert_eq!(failed, vec!["SBGR", "SBBR", "SBGL"]);
    }

    #[tokio::test]
    async fn test_truncates_but_reports_total() {
        let records = (0..6)
            .map(|i| {
                flight(
                    &format!("F{i}"),
                    "KJFK",
                    Some(format!("2024-06-01T0{i}:00:00Z").as_str()),
                    "B789",
                )
            })
            .collect();
        let stub = StubSource::new().ok(A, records);
        let aggregator = Aggregator::new(stub, vec![A], BRAZIL_USA);

        let result = aggregator.aggregate(request(4, false)).await;

        assert_eq!(idents(&result), vec!["F0", "F1", "F2", "F3"]);
        assert_eq!(result.total_found, 6);
    }

    #[tokio::test]
    async fn test_missing_timestamps_sort_first_and_ties_keep_source_order() {
        let stub = StubSource::new()
            .ok(
                A,
                vec![
                    flight("LATE", "KJFK", Some("2024-06-01T20:00:00Z"), "B789"),
                    flight("SAME1", "KJFK", Some("2024-06-01T10:00:00Z"), "B789"),
                ],
            )
            .ok(
                B,
                vec![
                    flight("SAME2", "KMCO", Some("2024-06-01T10:00:00Z"), "B789"),
                    flight("NOTIME", "KMCO", None, "B789"),
                ],
            );
        let aggregator = Aggregator::new(stub, vec![A, B], BRAZIL_USA);

        let result = aggregator.aggregate(request(10, false)).await;

        assert_eq!(idents(&result), vec!["NOTIME", "SAME1", "SAME2", "LATE"]);
    }

    #[tokio::test]
    async fn test_merge_order_ignores_completion_order() {
        // A answers last but is processed first, so its copy of DUP wins.
        let stub = StubSource::new()
            .ok(A, vec![flight("DUP", "KJFK", None, "B789")])
            .ok(B, vec![flight("DUP", "KIAH", None, "B789")])
            .delay(A, 50);
        let aggregator = Aggregator::new(stub, vec![A, B], BRAZIL_USA);

        let result = aggregator.aggregate(request(10, false)).await;

        assert_eq!(result.flights.len(), 1);
        assert_eq!(result.flights[0].destination_icao(), Some("KJFK"));
    }

    #[tokio::test]
    async fn test_cargo_filter_toggle() {
        let stub = StubSource::new().ok(
            A,
            vec![
                flight("PAX", "KJFK", None, "B77W"),
                flight("CGO", "KMIA", None, "B77F"),
            ],
        );
        let aggregator = Aggregator::new(stub, vec![A], BRAZIL_USA);

        let without = aggregator.aggregate(request(10, false)).await;
        assert_eq!(idents(&without), vec!["PAX"]);

        let with = aggregator.aggregate(request(10, true)).await;
        assert_eq!(idents(&with), vec!["PAX", "CGO"]);
    }

    #[tokio::test]
    async fn test_off_corridor_flights_dropped_and_survivors_annotated() {
        let stub = StubSource::new().ok(
            A,
            vec![
                flight("EU", "LPPT", None, "A339"),
                flight("US", "KMIA", None, "A339"),
            ],
        );
        let aggregator = Aggregator::new(stub, vec![A], BRAZIL_USA);

        let result = aggregator.aggregate(request(10, false)).await;

        assert_eq!(idents(&result), vec!["US"]);
        let kept = &result.flights[0];
        assert_eq!(kept.route_type.as_deref(), Some("Brasil-EUA"));
        assert_eq!(kept.status_description.as_deref(), Some("Programado"));
    }

    #[test]
    fn test_dedup_keeps_first() {
        let records = vec![
            flight("A1", "KJFK", None, "x"),
            flight("A2", "KJFK", None, "x"),
            flight("A1", "KMIA", None, "x"),
        ];
        let unique = dedup_by_ident(records);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].destination_icao(), Some("KJFK"));
    }

    #[test]
    fn test_brazil_usa_uses_catalog() {
        let aggregator = Aggregator::brazil_usa(StubSource::new());
        assert_eq!(aggregator.sources().len(), BRAZILIAN_AIRPORTS.len());
        assert_eq!(aggregator.sources()[0].code, "SBGR");
    }
}
