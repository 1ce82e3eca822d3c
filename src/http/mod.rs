//! HTTP surface of the gateway.
//!
//! # Data Flow
//! ```text
//! Client request
//!     → server.rs (layers: request id, trace, CORS, timeout, body limit)
//!     → handlers/* (validation.rs checks parameters)
//!     → flights / vehicles / chat clients → third-party API
//!     → response.rs (error mapping, JSON envelope)
//!     → Client response
//! ```

pub mod cors;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;
pub mod validation;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{AppState, HttpServer};
