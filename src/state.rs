// src/state.rs
use crate::{
    config::AppConfig,
    error::AppResult,
    services::{auth_service::CredentialStore, catalog_service::Catalog, session_service::SessionManager},
};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    // Catálogo fixo, só de leitura
    pub catalog: Arc<Catalog>,
    // Contexto de sessão único do processo
    pub session: SessionManager,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Monta o estado: catálogo seed, armazém de credenciais e gestor de sessão.
    /// A sessão persistida NÃO é recuperada aqui; chamar `session.restore()` no arranque.
    pub async fn build(db_pool: SqlitePool, config: AppConfig) -> AppResult<Self> {
        let catalog = Catalog::seeded()?;
        tracing::info!("📚 Catálogo carregado com {} bolsas.", catalog.records().len());

        let credentials =
            CredentialStore::seeded(db_pool.clone(), config.persist_new_accounts, config.bcrypt_cost)
                .await?;
        let session = SessionManager::new(db_pool.clone(), credentials, config.auth_latency);

        Ok(Self {
            db_pool,
            catalog: Arc::new(catalog),
            session,
            config: Arc::new(config),
        })
    }
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}

impl axum::extract::FromRef<AppState> for SessionManager {
    fn from_ref(state: &AppState) -> SessionManager {
        state.session.clone()
    }
}
