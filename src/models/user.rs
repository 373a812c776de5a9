// src/models/user.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Identidade autenticada corrente. Nunca inclui a password.
/// É também o formato do registo persistido (chaves camelCase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

/// Uma entrada do armazém de credenciais (seed ou tabela `accounts`).
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile_image_url: Option<String>,
}

impl Account {
    pub fn to_session(&self) -> UserSession {
        UserSession {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            profile_image_url: self.profile_image_url.clone(),
        }
    }
}

// Corpo do POST /api/login
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

// Corpo do POST /api/signup
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthPhase {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// Fotografia do estado de autenticação (utilizador, carregamento, último erro).
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub phase: AuthPhase,
    pub user: Option<UserSession>,
    pub error: Option<String>,
}
