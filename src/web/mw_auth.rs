// src/web/mw_auth.rs
use crate::{error::AppError, models::user::UserSession, state::AppState};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

// Middleware que verifica se existe uma sessão ativa
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match state.session.current().await {
        Some(user) => {
            tracing::debug!("Autenticação MW: Utilizador '{}' autenticado. Prosseguindo...", user.id);
            // Os handlers protegidos leem o utilizador das extensões
            request.extensions_mut().insert(CurrentUser(user));
            Ok(next.run(request).await)
        }
        None => {
            tracing::debug!("Autenticação MW: Sem sessão ativa.");
            Err(AppError::Unauthorized)
        }
    }
}

/// Utilizador autenticado, posto nas extensões da requisição por `require_auth`.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub UserSession);
