//! Company catalog
//!
//! Read-only list of the symbols the dashboard offers.

use axum::{extract::State, routing::get, Json, Router};
use market_core::Company;

use crate::{ApiResponse, AppState};

pub fn company_routes() -> Router<AppState> {
    Router::new().route("/api/companies", get(list_companies))
}

#[utoipa::path(
    get,
    path = "/api/companies",
    responses((status = 200, description = "Supported company symbols and names", body = [Company])),
    tag = "Catalog"
)]
pub async fn list_companies(State(state): State<AppState>) -> Json<ApiResponse<Vec<Company>>> {
    Json(ApiResponse::success(state.catalog.all().to_vec()))
}
