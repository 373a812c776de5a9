// src/services/session_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{Account, AuthPhase, SessionStatus, UserSession},
    services::auth_service::{avatar_url, CredentialStore},
};
use sqlx::SqlitePool;
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Chave do registo persistido na tabela `kv_store`.
pub const SESSION_KEY: &str = "scholarseeker_user";

// Estado partilhado: a sessão corrente e o último erro
#[derive(Debug, Default)]
struct SessionSlot {
    current: Option<UserSession>,
    last_error: Option<String>,
}

// Conta uma tentativa em curso enquanto viver, mesmo que o futuro seja abandonado
struct PendingAttempt(Arc<AtomicUsize>);

impl PendingAttempt {
    fn start(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for PendingAttempt {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Gestor da sessão: no máximo uma identidade autenticada de cada vez,
/// persistida entre reinícios do processo.
#[derive(Clone)]
pub struct SessionManager {
    slot: Arc<Mutex<SessionSlot>>,
    pending: Arc<AtomicUsize>,
    credentials: Arc<CredentialStore>,
    db_pool: SqlitePool,
    latency: Duration,
}

impl SessionManager {
    pub fn new(db_pool: SqlitePool, credentials: CredentialStore, latency: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(SessionSlot::default())),
            pending: Arc::new(AtomicUsize::new(0)),
            credentials: Arc::new(credentials),
            db_pool,
            latency,
        }
    }

    pub async fn current(&self) -> Option<UserSession> {
        self.slot.lock().await.current.clone()
    }

    pub async fn status(&self) -> SessionStatus {
        let slot = self.slot.lock().await;
        let phase = if self.pending.load(Ordering::SeqCst) > 0 {
            AuthPhase::Authenticating
        } else if slot.current.is_some() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Unauthenticated
        };
        SessionStatus {
            phase,
            user: slot.current.clone(),
            error: slot.last_error.clone(),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<UserSession> {
        tracing::info!("Tentativa de login para: {}", email);
        let _attempt = self.begin_attempt().await;
        let outcome = self.check_credentials(email, password).await;

        let session = self.finish_attempt(outcome).await?;
        tracing::info!("✅ Login bem-sucedido para: {}", session.id);
        Ok(session)
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> AppResult<UserSession> {
        tracing::info!("Tentativa de signup para: {}", email);
        let _attempt = self.begin_attempt().await;
        let outcome = self.create_identity(name, email, password).await;
        let registered = outcome.is_ok();

        let result = self.finish_attempt(outcome).await;
        if registered && result.is_err() {
            // A sessão não foi gravada: a conta acabada de criar não deve ficar
            self.credentials.unregister(email).await;
        }
        let session = result?;
        tracing::info!("✅ Conta criada e sessão iniciada: {}", session.id);
        Ok(session)
    }

    /// Termina a sessão. Nunca falha: erros de persistência só são registados.
    pub async fn logout(&self) {
        let mut slot = self.slot.lock().await;
        let previous = slot.current.take();
        if let Err(e) = clear_persisted(&self.db_pool).await {
            tracing::error!("Falha ao apagar sessão persistida: {:?}", e);
        }

        match previous {
            Some(session) => tracing::info!("🚪 Utilizador '{}' desligado.", session.id),
            None => tracing::info!("🚪 Logout sem sessão ativa."),
        }
    }

    /// Recupera a sessão persistida no arranque. Registos corrompidos são apagados.
    pub async fn restore(&self) -> Option<UserSession> {
        let mut slot = self.slot.lock().await;

        let raw = match load_persisted(&self.db_pool).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("Nenhuma sessão persistida.");
                return None;
            }
            Err(e) => {
                tracing::error!("Falha ao ler sessão persistida: {:?}", e);
                return None;
            }
        };

        match decode_session(&raw) {
            Ok(session) => {
                tracing::info!("🔑 Sessão recuperada para '{}'.", session.id);
                slot.current = Some(session.clone());
                Some(session)
            }
            Err(e) => {
                tracing::warn!("{} A descartar o registo.", e);
                if let Err(e) = clear_persisted(&self.db_pool).await {
                    tracing::error!("Falha ao apagar sessão corrompida: {:?}", e);
                }
                None
            }
        }
    }

    async fn check_credentials(&self, email: &str, password: &str) -> AppResult<UserSession> {
        self.simulate_latency().await;
        self.credentials
            .authenticate(email, password)
            .await?
            .map(|account| account.to_session())
            .ok_or(AppError::InvalidCredentials)
    }

    async fn create_identity(&self, name: &str, email: &str, password: &str) -> AppResult<UserSession> {
        self.simulate_latency().await;
        if self.credentials.find_by_email(email).await?.is_some() {
            tracing::warn!("Signup recusado: email '{}' já registado.", email);
            return Err(AppError::EmailAlreadyRegistered);
        }

        let account = Account {
            id: format!("user-{}", Uuid::new_v4().simple()),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            profile_image_url: Some(avatar_url(email)),
        };
        self.credentials.register(&account, password).await?;
        Ok(account.to_session())
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    async fn begin_attempt(&self) -> PendingAttempt {
        let attempt = PendingAttempt::start(&self.pending);
        self.slot.lock().await.last_error = None;
        attempt
    }

    // Aplica o resultado sob o lock: adota + persiste, ou guarda o erro
    async fn finish_attempt(&self, outcome: AppResult<UserSession>) -> AppResult<UserSession> {
        let mut slot = self.slot.lock().await;
        let result = match outcome {
            Ok(session) => persist(&self.db_pool, &session).await.map(|_| session),
            Err(e) => Err(e),
        };

        match result {
            Ok(session) => {
                slot.current = Some(session.clone());
                Ok(session)
            }
            Err(e) => {
                tracing::warn!("Autenticação falhou: {}", e);
                slot.last_error = Some(user_message(&e));
                Err(e)
            }
        }
    }
}

fn user_message(error: &AppError) -> String {
    match error {
        AppError::InvalidCredentials | AppError::EmailAlreadyRegistered => error.to_string(),
        _ => "Authentication failed. Please try again.".to_string(),
    }
}

fn decode_session(raw: &str) -> AppResult<UserSession> {
    Ok(serde_json::from_str::<UserSession>(raw)?)
}

async fn load_persisted(db_pool: &SqlitePool) -> AppResult<Option<String>> {
    let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?1")
        .bind(SESSION_KEY)
        .fetch_optional(db_pool)
        .await?;
    Ok(value)
}

async fn persist(db_pool: &SqlitePool, session: &UserSession) -> AppResult<()> {
    let value = serde_json::to_string(session).map_err(|e| {
        tracing::error!("Erro ao serializar sessão: {:?}", e);
        AppError::InternalServerError
    })?;
    sqlx::query(
        r#"
        INSERT INTO kv_store (key, value) VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(SESSION_KEY)
    .bind(value)
    .execute(db_pool)
    .await?;
    tracing::debug!("Sessão persistida para '{}'.", session.id);
    Ok(())
}

async fn clear_persisted(db_pool: &SqlitePool) -> AppResult<()> {
    sqlx::query("DELETE FROM kv_store WHERE key = ?1")
        .bind(SESSION_KEY)
        .execute(db_pool)
        .await?;
    Ok(())
}
