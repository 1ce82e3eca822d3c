//! Third-party API plumbing shared by the flight, vehicle and chat clients.
//!
//! # Data Flow
//! ```text
//! handler
//!     → domain client (flights / vehicles / chat)
//!     → client.rs (reqwest, timeout, status check, JSON decode)
//!     → UpstreamError on any failure
//! ```

pub mod client;
pub mod types;

pub use client::{build_http_client, ensure_success, read_json};
pub use types::{UpstreamError, UpstreamResult};
