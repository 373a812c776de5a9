// src/services/auth_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::Account,
    services::user_service,
};
use sqlx::SqlitePool;

/// Verifica se a senha fornecida corresponde ao hash guardado.
pub async fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Verificando hash bcrypt...");
        bcrypt::verify(&password, &stored_hash)
    })
    .await
    .map_err(|e| {
        tracing::error!("Erro na task spawn_blocking (verify_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("Erro bcrypt ao verificar senha: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Gera um hash bcrypt para uma senha.
pub async fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Gerando hash bcrypt (custo {})...", cost);
        bcrypt::hash(&password, cost)
    })
    .await
    .map_err(|e| {
        tracing::error!("Erro na task spawn_blocking (hash_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("Erro bcrypt ao gerar hash: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Armazém de credenciais: contas de demonstração e, opcionalmente,
/// as contas criadas via signup (tabela `accounts`).
#[derive(Debug, Clone)]
pub struct CredentialStore {
    seeded: Vec<Account>,
    db_pool: SqlitePool,
    persist_new_accounts: bool,
    bcrypt_cost: u32,
}

impl CredentialStore {
    /// Cria o armazém com a conta de demonstração (password guardada como hash).
    pub async fn seeded(
        db_pool: SqlitePool,
        persist_new_accounts: bool,
        bcrypt_cost: u32,
    ) -> AppResult<Self> {
        let demo = Account {
            id: "user-1".to_string(),
            name: "Demo User".to_string(),
            email: "demo@example.com".to_string(),
            password_hash: hash_password("password123", bcrypt_cost).await?,
            profile_image_url: Some(avatar_url("demo@example.com")),
        };

        let store = Self {
            seeded: vec![demo],
            db_pool,
            persist_new_accounts,
            bcrypt_cost,
        };
        tracing::debug!("Armazém de credenciais com {} conta(s) seed.", store.seeded.len());
        Ok(store)
    }

    /// Procura uma conta pelo email (comparação exata, sensível a maiúsculas).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        if let Some(account) = self.seeded.iter().find(|a| a.email == email) {
            return Ok(Some(account.clone()));
        }
        if self.persist_new_accounts {
            return user_service::find_account_by_email(&self.db_pool, email).await;
        }
        Ok(None)
    }

    /// Devolve a conta se email e password corresponderem.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<Account>> {
        let Some(account) = self.find_by_email(email).await? else {
            tracing::warn!("Email não encontrado: {}", email);
            return Ok(None);
        };

        if verify_password(password, &account.password_hash).await? {
            Ok(Some(account))
        } else {
            tracing::warn!("Senha incorreta para: {}", email);
            Ok(None)
        }
    }

    /// Regista uma nova conta. Só é guardada quando `persist_new_accounts` está ativo.
    pub async fn register(&self, account: &Account, raw_password: &str) -> AppResult<()> {
        if !self.persist_new_accounts {
            tracing::debug!("Conta '{}' não persistida (PERSIST_NEW_ACCOUNTS=false).", account.email);
            return Ok(());
        }
        let password_hash = hash_password(raw_password, self.bcrypt_cost).await?;
        user_service::create_account(&self.db_pool, account, &password_hash).await
    }

    /// Desfaz um `register`. Falhas só são registadas.
    pub async fn unregister(&self, email: &str) {
        if !self.persist_new_accounts {
            return;
        }
        if let Err(e) = user_service::delete_account_by_email(&self.db_pool, email).await {
            tracing::error!("Falha ao remover conta '{}': {:?}", email, e);
        }
    }
}

/// URL do avatar gerado para um email.
pub fn avatar_url(email: &str) -> String {
    format!("https://i.pravatar.cc/150?u={}", urlencoding::encode(email))
}
