//! Flight data subsystem (FlightAware AeroAPI).
//!
//! # Data Flow
//! ```text
//! handler
//!     → client.rs (single-endpoint lookups: ident, airport board, route, track)
//!     → aggregator.rs (multi-airport fan-out for the Brazil → USA board)
//!         → catalog.rs (source list, corridor, freighter types)
//!         → status.rs (display labels)
//! ```

pub mod aggregator;
pub mod catalog;
pub mod client;
pub mod status;
pub mod types;

pub use aggregator::{Aggregator, RecordSource};
pub use client::{Board, FlightAwareClient};
pub use status::status_description;
pub use types::{
    AggregationRequest, AggregationResult, FlightRecord, Source, SourceError,
};
