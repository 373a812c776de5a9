// src/web/auth_handlers.rs
use crate::{
    error::AppResult,
    models::user::{LoginForm, SessionStatus, SignupForm},
    services::session_service::SessionManager,
};
use axum::{extract::State, Json};
use serde_json::{json, Value};

// GET /api/session
pub async fn show_session(State(session): State<SessionManager>) -> Json<SessionStatus> {
    Json(session.status().await)
}

// POST /api/login
pub async fn handle_login(
    State(session): State<SessionManager>,
    Json(form): Json<LoginForm>,
) -> AppResult<Json<Value>> {
    let user = session.login(&form.email, &form.password).await?;
    Ok(Json(json!({
        "user": user,
        "message": "Successfully logged in!",
    })))
}

// POST /api/signup
pub async fn handle_signup(
    State(session): State<SessionManager>,
    Json(form): Json<SignupForm>,
) -> AppResult<Json<Value>> {
    let user = session.signup(&form.name, &form.email, &form.password).await?;
    Ok(Json(json!({
        "user": user,
        "message": "Account created successfully!",
    })))
}

// POST /api/logout (sempre bem-sucedido)
pub async fn handle_logout(State(session): State<SessionManager>) -> Json<Value> {
    session.logout().await;
    Json(json!({ "message": "Logged out successfully" }))
}
