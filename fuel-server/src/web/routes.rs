//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::cache::{CacheStats, QueryError};
use crate::domain::{DomainError, FuelTypeFilter};
use crate::upstream::PriceSource;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
///
/// `/data` and `/stats` are only routed when diagnostics are enabled.
pub fn create_router<S: PriceSource>(state: AppState<S>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/stations", get(stations_within_radius::<S>))
        .route("/stations/:code", get(station_prices::<S>))
        .route("/stations/:code/prices", get(prices_for_station::<S>))
        .route("/prices", get(query_radius::<S>));

    if state.diagnostics {
        router = router
            .route("/data", get(dump_data::<S>))
            .route("/stats", get(stats::<S>));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Stations within a radius, without prices.
async fn stations_within_radius<S: PriceSource>(
    State(state): State<AppState<S>>,
    query: Result<Query<RadiusRequest>, QueryRejection>,
) -> Result<Json<Vec<StationResult>>, AppError> {
    let Query(req) = query?;
    let (center, radius) = req.parse()?;

    let stations = state.cache.stations_within_radius(center, radius).await;

    Ok(Json(stations.iter().map(StationResult::from).collect()))
}

/// One station and all of its prices.
async fn station_prices<S: PriceSource>(
    State(state): State<AppState<S>>,
    Path(code): Path<String>,
) -> Result<Json<StationPricesResult>, AppError> {
    let view = state.cache.station_prices(&code).await?;

    Ok(Json(StationPricesResult::new(&view.station, &view.prices)))
}

/// Price rows for one station. Unknown stations have no rows.
async fn prices_for_station<S: PriceSource>(
    State(state): State<AppState<S>>,
    Path(code): Path<String>,
) -> Json<Vec<PriceResult>> {
    let prices = state.cache.prices_for_station(&code).await;

    Json(prices.iter().map(PriceResult::from).collect())
}

/// Stations near a point selling the requested fuel types, cheapest
/// primary fuel first.
async fn query_radius<S: PriceSource>(
    State(state): State<AppState<S>>,
    query: Result<Query<PriceSearchRequest>, QueryRejection>,
) -> Result<Json<Vec<StationPricesResult>>, AppError> {
    let Query(req) = query?;
    let (center, radius) = req.area().parse()?;
    let fuel_types = FuelTypeFilter::parse_list(req.fuel_types.as_deref().unwrap_or(""))?;

    let results = state.cache.query_radius(center, radius, &fuel_types).await;

    Ok(Json(
        results
            .iter()
            .map(|r| StationPricesResult::new(&r.station, &r.prices))
            .collect(),
    ))
}

/// Dump every cached station and price.
async fn dump_data<S: PriceSource>(State(state): State<AppState<S>>) -> Json<DataResponse> {
    let store = state.cache.snapshot().await;
    Json(DataResponse::from(&store))
}

/// Cache counters.
async fn stats<S: PriceSource>(State(state): State<AppState<S>>) -> Json<CacheStats> {
    Json(state.cache.stats().await)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::NotFound { .. } => AppError::NotFound {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
        };

        warn!(%status, %message, "request rejected");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
