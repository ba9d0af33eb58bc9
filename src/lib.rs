//! Safespot - backend for a residential safety review app.
//!
//! Proxies a mapping provider (geocoding, reverse geocoding, place search) and a
//! chat-completion provider (review summaries and keywords) behind a small JSON
//! HTTP API. Both clients degrade instead of failing where they can.

pub mod api;
pub mod config;
pub mod error;
pub mod location;
pub mod models;
pub mod review;

pub use error::{Error, Result};
pub use location::LocationClient;
pub use models::{LocationRecord, ReviewAnalysis};
pub use review::ReviewAnalysisClient;
