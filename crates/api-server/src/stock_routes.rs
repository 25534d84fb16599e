//! Stock Routes
//!
//! Combined price/prediction/sentiment series per symbol and the chart and
//! calibration views derived from it.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use market_core::{CombinedRecord, MarketDataError};
use prediction_pipeline::{calibrate, render_dashboard, CalibrationReport};

use crate::{ApiResponse, AppError, AppState};

const MAX_SYMBOL_LEN: usize = 10;

/// Uppercase and sanity-check a ticker from the path.
pub fn normalize_symbol(raw: &str) -> Result<String, MarketDataError> {
    let symbol = raw.trim().to_uppercase();
    let valid = !symbol.is_empty()
        && symbol.len() <= MAX_SYMBOL_LEN
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if valid {
        Ok(symbol)
    } else {
        Err(MarketDataError::InvalidInput(format!("invalid ticker symbol '{}'", raw)))
    }
}

pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/api/stock/:symbol", get(get_combined))
        .route("/api/stock/:symbol/charts", get(get_charts))
        .route("/api/stock/:symbol/calibration", get(get_calibration))
}

#[utoipa::path(
    get,
    path = "/api/stock/{symbol}",
    params(("symbol" = String, Path, description = "Stock ticker symbol")),
    responses(
        (status = 200, description = "Per-date price, volume, sentiment and fused prediction", body = [CombinedRecord]),
        (status = 404, description = "No stock rows for the symbol"),
        (status = 500, description = "Data store failure"),
    ),
    tag = "Stock"
)]
pub async fn get_combined(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<Vec<CombinedRecord>>>, AppError> {
    let symbol = normalize_symbol(&symbol)?;
    let records = state.pipeline.combined(&symbol).await?;
    Ok(Json(ApiResponse::success(records)))
}

#[utoipa::path(
    get,
    path = "/api/stock/{symbol}/charts",
    params(("symbol" = String, Path, description = "Stock ticker symbol")),
    responses((status = 200, description = "Line, bar and gauge chart payloads")),
    tag = "Stock"
)]
pub async fn get_charts(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let symbol = normalize_symbol(&symbol)?;
    let records = state.pipeline.combined(&symbol).await?;
    Ok(Json(ApiResponse::success(render_dashboard(&records))))
}

#[utoipa::path(
    get,
    path = "/api/stock/{symbol}/calibration",
    params(("symbol" = String, Path, description = "Stock ticker symbol")),
    responses(
        (status = 200, description = "Least-squares fit of price on prediction and sentiment", body = CalibrationReport),
        (status = 422, description = "Too few or degenerate records"),
    ),
    tag = "Stock"
)]
pub async fn get_calibration(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<CalibrationReport>>, AppError> {
    let symbol = normalize_symbol(&symbol)?;
    let records = state.pipeline.combined(&symbol).await?;
    let report = calibrate(&records)?;
    Ok(Json(ApiResponse::success(report)))
}
