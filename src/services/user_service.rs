// src/services/user_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::Account,
};
use chrono::Utc;
use sqlx::SqlitePool;

/// Busca uma conta registada pelo email (comparação exata).
pub async fn find_account_by_email(db_pool: &SqlitePool, email: &str) -> AppResult<Option<Account>> {
    tracing::debug!("Buscando conta por email: {}", email);
    let account = sqlx::query_as::<_, Account>(
        r#"
        SELECT id, name, email, password_hash, profile_image_url
        FROM accounts
        WHERE email = ?1
        "#,
    )
    .bind(email)
    .fetch_optional(db_pool)
    .await?;

    if account.is_some() {
        tracing::debug!("Conta '{}' encontrada.", email);
    } else {
        tracing::debug!("Conta '{}' não encontrada.", email);
    }
    Ok(account)
}

/// Insere uma conta nova. Email repetido devolve `EmailAlreadyRegistered`.
pub async fn create_account(
    db_pool: &SqlitePool,
    account: &Account,
    password_hash: &str,
) -> AppResult<()> {
    tracing::info!("Tentando criar conta: {}", account.email);

    let insert_result = sqlx::query(
        r#"
        INSERT INTO accounts (id, name, email, password_hash, profile_image_url, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&account.id)
    .bind(&account.name)
    .bind(&account.email)
    .bind(password_hash)
    .bind(&account.profile_image_url)
    .bind(Utc::now().to_rfc3339())
    .execute(db_pool)
    .await;

    // Verifica erro de constraint (email duplicado)
    if let Err(sqlx::Error::Database(db_err)) = &insert_result {
        if db_err.is_unique_violation() {
            tracing::warn!("Falha ao criar conta: email '{}' já existe.", account.email);
            return Err(AppError::EmailAlreadyRegistered);
        }
    }
    insert_result?;

    tracing::info!("✅ Conta '{}' criada com sucesso.", account.email);
    Ok(())
}

/// Apaga a conta com este email. Devolve `false` se não existia.
pub async fn delete_account_by_email(db_pool: &SqlitePool, email: &str) -> AppResult<bool> {
    let rows_affected = sqlx::query("DELETE FROM accounts WHERE email = ?1")
        .bind(email)
        .execute(db_pool)
        .await?
        .rows_affected();
    tracing::info!("Conta '{}' removida ({} linha(s)).", email, rows_affected);
    Ok(rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn jane() -> Account {
        Account {
            id: "user-jane".to_string(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: String::new(),
            profile_image_url: None,
        }
    }

    #[tokio::test]
    async fn created_account_is_found_by_exact_email() {
        let pool = test_pool().await;
        create_account(&pool, &jane(), "hash").await.unwrap();

        let found = find_account_by_email(&pool, "jane@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, "user-jane");
        assert_eq!(found.password_hash, "hash");
        assert!(find_account_by_email(&pool, "JANE@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let pool = test_pool().await;
        create_account(&pool, &jane(), "hash").await.unwrap();

        let mut again = jane();
        again.id = "user-other".to_string();
        match create_account(&pool, &again, "hash").await {
            Err(AppError::EmailAlreadyRegistered) => {}
            other => panic!("esperado EmailAlreadyRegistered, obtido {other:?}"),
        }
    }

    #[tokio::test]
    async fn deleted_account_is_gone() {
        let pool = test_pool().await;
        create_account(&pool, &jane(), "hash").await.unwrap();

        assert!(delete_account_by_email(&pool, "jane@example.com").await.unwrap());
        assert!(find_account_by_email(&pool, "jane@example.com").await.unwrap().is_none());
        assert!(!delete_account_by_email(&pool, "jane@example.com").await.unwrap());
    }
}
