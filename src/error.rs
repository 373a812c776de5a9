// src/error.rs
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Valor inválido para {key}: '{value}'")]
    InvalidConfig { key: &'static str, value: String },

    #[error("Erro ao processar password")]
    PasswordHashingError,

    // Login sem correspondência email+password
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already in use")]
    EmailAlreadyRegistered,

    // Registo persistido ilegível. Nunca chega ao cliente: restore() apaga-o.
    #[error("Sessão persistida corrompida: {0}")]
    CorruptPersistedSession(#[from] serde_json::Error),

    #[error("Failed to load scholarships. Please try again later.")]
    TransientFetchFailure,

    #[error("ID de bolsa duplicado no catálogo: {0}")]
    DuplicateScholarshipId(u32),

    #[error("Recurso não encontrado: {0}")]
    NotFound(String),

    #[error("Erro interno inesperado")]
    InternalServerError,

    #[error("Não autorizado")]
    Unauthorized,
}

impl AppError {
    /// Estado HTTP e mensagem legível para o utilizador.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to access stored data.".to_string(),
            ),
            AppError::InvalidConfig { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error.".to_string(),
            ),
            AppError::PasswordHashingError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process credentials.".to_string(),
            ),
            // As mensagens destes dois são as mesmas mostradas na notificação
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::EmailAlreadyRegistered => (StatusCode::CONFLICT, self.to_string()),
            AppError::TransientFetchFailure => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Please log in to continue.".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred.".to_string(),
            ),
        }
    }
}

// Como converter AppError numa resposta HTTP
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Loga o erro detalhado no servidor
        tracing::error!("Erro processado: {:?}", self);

        let (status, user_message) = self.status_and_message();
        (status, Json(json!({ "error": user_message }))).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;
