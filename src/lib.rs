//! Travel information gateway library.
//!
//! Fronts FlightAware AeroAPI, Auto.dev and an OpenAI-compatible chat API
//! behind one JSON HTTP service, and aggregates Brazil → USA departures
//! across several origin airports.

pub mod chat;
pub mod config;
pub mod flights;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;
pub mod vehicles;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
