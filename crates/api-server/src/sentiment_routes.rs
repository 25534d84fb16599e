//! Sentiment Routes
//!
//! Summary statistics over a company's news sentiment, and ingestion of
//! scored articles.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use market_store::NewsSentimentInput;
use sentiment_analysis::{summarize, ArticleScore, SentimentSummary};

use crate::stock_routes::normalize_symbol;
use crate::{ApiResponse, AppError, AppState};

pub fn sentiment_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sentiment/record", post(record_sentiment))
        .route("/api/sentiment/:symbol", get(get_sentiment_summary))
}

#[utoipa::path(
    get,
    path = "/api/sentiment/{symbol}",
    params(("symbol" = String, Path, description = "Company ticker symbol")),
    responses((status = 200, description = "Average, label ratios and latest score", body = SentimentSummary)),
    tag = "Sentiment"
)]
pub async fn get_sentiment_summary(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<SentimentSummary>>, AppError> {
    let symbol = normalize_symbol(&symbol)?;
    let history = state.pipeline.sentiment_history(&symbol).await?;
    Ok(Json(ApiResponse::success(summarize(&symbol, &history))))
}

#[utoipa::path(
    post,
    path = "/api/sentiment/record",
    request_body = NewsSentimentInput,
    responses((status = 200, description = "Stored overall score and label", body = ArticleScore)),
    tag = "Sentiment"
)]
pub async fn record_sentiment(
    State(state): State<AppState>,
    Json(mut req): Json<NewsSentimentInput>,
) -> Result<Json<ApiResponse<ArticleScore>>, AppError> {
    req.company = normalize_symbol(&req.company)?;
    let score = state
        .store
        .record_news_sentiment(&req)
        .await
        .map_err(|e| e.context(format!("Failed to record sentiment for {}", req.company)))?;
    Ok(Json(ApiResponse::success(score)))
}
