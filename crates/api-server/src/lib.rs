//! HTTP surface of the sentiment-fused prediction service.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use market_core::{CompanyCatalog, MarketDataError};
use market_store::{MarketDb, SqliteMarketStore};
use prediction_pipeline::{CalibrationError, FileCoefficients, PredictionPipeline, SnapshotWriter};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod company_routes;
pub mod config;
pub mod request_id;
pub mod sentiment_routes;
pub mod stock_routes;

pub use config::{AppEnv, ServerConfig};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PredictionPipeline>,
    pub store: Arc<SqliteMarketStore>,
    pub catalog: CompanyCatalog,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire the store, coefficient file and optional snapshot into a pipeline.
    pub fn new(store: Arc<SqliteMarketStore>, catalog: CompanyCatalog, config: ServerConfig) -> Self {
        let coefficients = Arc::new(FileCoefficients::new(config.coefficients_path.clone()));
        let mut pipeline = PredictionPipeline::new(store.clone(), coefficients);
        if let Some(path) = &config.snapshot_path {
            pipeline = pipeline.with_snapshot(SnapshotWriter::new(path.clone()));
        }

        Self {
            pipeline: Arc::new(pipeline),
            store,
            catalog,
            config: Arc::new(config),
        }
    }
}

/// Envelope shared by every JSON endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Marks a response whose body carries internal failure detail.
#[derive(Clone, Copy, Debug)]
struct InternalFailure;

const GENERIC_INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn with_status(status: StatusCode, error: anyhow::Error) -> Self {
        Self { status, error }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = format!("{:#}", self.error);
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %message, "Request failed");
        } else {
            tracing::debug!(status = %self.status, error = %message, "Request rejected");
        }

        let mut response = (self.status, Json(ApiResponse::<()>::error(message))).into_response();
        if self.status.is_server_error() {
            response.extensions_mut().insert(InternalFailure);
        }
        response
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl From<MarketDataError> for AppError {
    fn from(error: MarketDataError) -> Self {
        let status = match &error {
            MarketDataError::NotFound(_) => StatusCode::NOT_FOUND,
            MarketDataError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            MarketDataError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::with_status(status, error.into())
    }
}

impl From<CalibrationError> for AppError {
    fn from(error: CalibrationError) -> Self {
        Self::with_status(StatusCode::UNPROCESSABLE_ENTITY, error.into())
    }
}

/// Swap internal failure detail for a generic message outside development.
async fn redact_internal_errors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if state.config.expose_error_details() || response.extensions().get::<InternalFailure>().is_none() {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    let body = Json(ApiResponse::<()>::error(GENERIC_INTERNAL_ERROR));
    (parts, body).into_response()
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Sentiment Prediction API", version = "0.1.0"),
    paths(
        company_routes::list_companies,
        stock_routes::get_combined,
        stock_routes::get_charts,
        stock_routes::get_calibration,
        sentiment_routes::get_sentiment_summary,
        sentiment_routes::record_sentiment,
    ),
    components(schemas(
        market_core::Company,
        market_core::CombinedRecord,
        sentiment_analysis::SentimentSummary,
        sentiment_analysis::ArticleScore,
        market_store::NewsSentimentInput,
        prediction_pipeline::CalibrationReport,
    ))
)]
pub struct ApiDoc;

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(company_routes::company_routes())
        .merge(stock_routes::stock_routes())
        .merge(sentiment_routes::sentiment_routes())
        .layer(middleware::from_fn_with_state(state.clone(), redact_internal_errors))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

pub fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json_logging {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        environment = ?config.environment,
        database_url = %config.database_url,
        coefficients = %config.coefficients_path.display(),
        "Starting prediction API server"
    );

    let db = MarketDb::new(&config.database_url).await?;
    let store = Arc::new(SqliteMarketStore::new(db));
    let bind_addr = config.bind_addr;
    let state = AppState::new(store, CompanyCatalog::default(), config);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
