// src/web/dashboard_handlers.rs
use crate::{
    error::AppResult,
    models::dashboard::{Dashboard, StatusPayload},
    services::dashboard_service,
    state::AppState,
    web::mw_auth::CurrentUser,
};
use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};

// GET /api/dashboard (protegido pelo middleware)
pub async fn show_dashboard(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Json<Dashboard>> {
    let dashboard = dashboard_service::load_dashboard(&state.db_pool, &state.catalog, &user.id).await?;
    Ok(Json(dashboard))
}

// POST /api/dashboard/saved/{id}
pub async fn handle_save(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<u32>,
) -> AppResult<Json<Value>> {
    dashboard_service::save_scholarship(&state.db_pool, &state.catalog, &user.id, id).await?;
    Ok(Json(json!({ "message": "Scholarship saved" })))
}

// DELETE /api/dashboard/saved/{id}
pub async fn handle_remove_saved(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<u32>,
) -> AppResult<Json<Value>> {
    let removed = dashboard_service::remove_saved(&state.db_pool, &user.id, id).await?;
    Ok(Json(json!({
        "removed": removed,
        "message": "Scholarship removed from saved list",
    })))
}

// PUT /api/dashboard/applications/{id}  body: {"status": "Applied"}
pub async fn handle_update_status(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<u32>,
    Json(payload): Json<StatusPayload>,
) -> AppResult<Json<Value>> {
    dashboard_service::set_application_status(
        &state.db_pool,
        &state.catalog,
        &user.id,
        id,
        payload.status,
    )
    .await?;
    Ok(Json(json!({
        "message": format!("Application status updated to: {}", payload.status.as_str()),
    })))
}

// DELETE /api/dashboard/applications/{id}
pub async fn handle_remove_application(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<u32>,
) -> AppResult<Json<Value>> {
    let removed = dashboard_service::remove_application(&state.db_pool, &user.id, id).await?;
    Ok(Json(json!({
        "removed": removed,
        "message": "Application removed",
    })))
}
