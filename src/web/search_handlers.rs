// src/web/search_handlers.rs
use crate::{
    error::AppResult,
    models::search::{SearchCriteria, SearchParams},
    services::catalog_service,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

// GET /api/scholarships?q=&community=&education=&income=&maxAmount=
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Value>> {
    let criteria = SearchCriteria::from(params);
    let query = criteria.to_query_string();

    let scholarships =
        catalog_service::search(state.catalog.clone(), criteria, state.config.search_latency)
            .await?;

    Ok(Json(json!({
        "count": scholarships.len(),
        "query": query,
        "scholarships": scholarships,
    })))
}

// GET /api/scholarships/{id}
pub async fn handle_detail(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<Value>> {
    let (scholarship, similar) =
        catalog_service::scholarship_detail(&state.catalog, id, state.config.detail_latency)
            .await?;
    Ok(Json(json!({
        "scholarship": scholarship,
        "similar": similar,
    })))
}
