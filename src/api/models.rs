use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{LocationRecord, ReviewAnalysis};

/// Body of `POST /api/search_location`.
#[derive(Debug, Deserialize)]
pub struct SearchLocationRequest {
    #[serde(default)]
    pub query: String,
    /// Restrict results to a region, e.g. a city name.
    pub region: Option<String>,
    /// Bias results towards a `"lat,lng"` center point.
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingRequest {
    #[serde(default)]
    pub address: String,
}

/// Body of the reverse geocoding and current location routes.
#[derive(Debug, Deserialize)]
pub struct CoordinatesRequest {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeReviewRequest {
    #[serde(default)]
    pub text_review: String,
}

impl SearchLocationRequest {
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(Error::Validation("query must not be empty".into()));
        }
        Ok(())
    }
}

impl GeocodingRequest {
    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(Error::Validation("address must not be empty".into()));
        }
        Ok(())
    }
}

impl CoordinatesRequest {
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::Validation("latitude must be between -90 and 90".into()));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::Validation("longitude must be between -180 and 180".into()));
        }
        Ok(())
    }
}

impl AnalyzeReviewRequest {
    pub fn validate(&self) -> Result<()> {
        if self.text_review.trim().is_empty() {
            return Err(Error::Validation("text_review must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct SearchLocationResponse {
    pub success: bool,
    pub results: Vec<LocationRecord>,
}

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub success: bool,
    pub result: LocationRecord,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeReviewResponse {
    pub success: bool,
    #[serde(flatten)]
    pub analysis: ReviewAnalysis,
}

/// Which upstream providers are usable. Never includes the keys themselves.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub baidu_map_configured: bool,
    pub deepseek_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
