//! HTTP entry points.
//!
//! Each handler validates its JSON body, calls one client operation and wraps the
//! outcome in a JSON envelope. Every response allows any origin.

mod error;
mod handlers;
mod models;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Config, Credentials};
use crate::error::Result;
use crate::location::LocationClient;
use crate::review::ReviewAnalysisClient;

pub use error::ApiError;
pub use models::*;

/// Clients built once at startup.
///
/// A client whose construction failed keeps its configuration error, which is
/// reported by the health endpoint and returned by the routes that need it.
pub struct AppState {
    pub location: Result<LocationClient>,
    pub review: Result<ReviewAnalysisClient>,
}

impl AppState {
    pub fn new(location: Result<LocationClient>, review: Result<ReviewAnalysisClient>) -> Self {
        Self { location, review }
    }

    pub fn from_config(credentials: &Credentials, config: &Config) -> Self {
        Self::new(
            LocationClient::from_credentials(credentials, &config.map),
            ReviewAnalysisClient::from_credentials(credentials, &config.llm),
        )
    }

    fn location_client(&self) -> std::result::Result<&LocationClient, ApiError> {
        self.location
            .as_ref()
            .map_err(|e| ApiError::Unavailable(e.to_string()))
    }

    fn review_client(&self) -> std::result::Result<&ReviewAnalysisClient, ApiError> {
        self.review
            .as_ref()
            .map_err(|e| ApiError::Unavailable(e.to_string()))
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/search_location", post(handlers::search_location))
        .route("/api/geocoding", post(handlers::geocoding))
        .route("/api/reverse_geocoding", post(handlers::reverse_geocoding))
        .route("/api/get_current_location", post(handlers::current_location))
        .route("/api/analyze_review", post(handlers::analyze_review))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
