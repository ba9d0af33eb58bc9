use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::info;

use super::error::ApiError;
use super::models::*;
use super::AppState;

type JsonBody<T> = Result<Json<T>, JsonRejection>;

/// Health check: reports which providers are configured.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        baidu_map_configured: state.location.is_ok(),
        deepseek_configured: state.review.is_ok(),
    })
}

/// Place search with geocoding fallback.
pub async fn search_location(
    State(state): State<Arc<AppState>>,
    payload: JsonBody<SearchLocationRequest>,
) -> Result<Json<SearchLocationResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let client = state.location_client()?;
    let query = request.query.trim();
    info!(query, region = ?request.region, "Searching places");

    let results = client
        .place_search(query, request.region.as_deref(), request.location.as_deref())
        .await?;

    Ok(Json(SearchLocationResponse {
        success: true,
        results,
    }))
}

pub async fn geocoding(
    State(state): State<Arc<AppState>>,
    payload: JsonBody<GeocodingRequest>,
) -> Result<Json<LocationResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let client = state.location_client()?;
    let result = client.geocode(request.address.trim()).await?;

    Ok(Json(LocationResponse {
        success: true,
        result,
    }))
}

pub async fn reverse_geocoding(
    State(state): State<Arc<AppState>>,
    payload: JsonBody<CoordinatesRequest>,
) -> Result<Json<LocationResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let client = state.location_client()?;
    let result = client
        .reverse_geocode(request.latitude, request.longitude)
        .await?;

    Ok(Json(LocationResponse {
        success: true,
        result,
    }))
}

/// Reverse geocoding with the requested coordinates echoed back.
pub async fn current_location(
    State(state): State<Arc<AppState>>,
    payload: JsonBody<CoordinatesRequest>,
) -> Result<Json<LocationResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let client = state.location_client()?;
    let result = client
        .current_location_info(request.latitude, request.longitude)
        .await?;

    Ok(Json(LocationResponse {
        success: true,
        result,
    }))
}

/// Review analysis. Only fails on bad input or a missing API key.
pub async fn analyze_review(
    State(state): State<Arc<AppState>>,
    payload: JsonBody<AnalyzeReviewRequest>,
) -> Result<Json<AnalyzeReviewResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let client = state.review_client()?;
    info!(chars = request.text_review.chars().count(), "Analyzing review");
    let analysis = client.analyze_review(&request.text_review).await;

    Ok(Json(AnalyzeReviewResponse {
        success: true,
        analysis,
    }))
}
