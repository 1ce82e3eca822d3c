//! Vehicle listings subsystem (Auto.dev).
//!
//! # Data Flow
//! ```text
//! /getCarPhotos
//!     → listings.rs (colour translation)
//!     → client.rs (Auto.dev listings, bearer auth)
//!     → listings.rs (unique photos, per-listing price, average)
//!
//! /getCarPhotoProxy
//!     → client.rs (raw image fetch, content type preserved)
//! ```

pub mod client;
pub mod listings;
pub mod types;

pub use client::{AutoDevClient, Photo};
pub use listings::{color_filter, summarize};
pub use types::{Listing, ListingQuery, ListingSummary};
