// src/services/dashboard_service.rs
use crate::{
    error::{AppError, AppResult},
    models::dashboard::{
        ApplicationEntry, ApplicationRow, ApplicationStatus, Dashboard, SavedRow, SavedScholarship,
    },
    models::scholarship::ScholarshipRecord,
    services::catalog_service::Catalog,
};
use chrono::Utc;
use sqlx::SqlitePool;

// Garante que o ID existe no catálogo antes de gravar
fn ensure_known(catalog: &Catalog, scholarship_id: u32) -> AppResult<()> {
    if catalog.find(scholarship_id).is_none() {
        tracing::warn!("Bolsa {} não existe no catálogo.", scholarship_id);
        return Err(AppError::NotFound(format!("Scholarship {scholarship_id}")));
    }
    Ok(())
}

/// Guarda uma bolsa na lista do utilizador (repetir não altera a data original).
pub async fn save_scholarship(
    db_pool: &SqlitePool,
    catalog: &Catalog,
    user_id: &str,
    scholarship_id: u32,
) -> AppResult<()> {
    ensure_known(catalog, scholarship_id)?;
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO saved_scholarships (user_id, scholarship_id, saved_at)
        VALUES (?1, ?2, ?3)
        "#,
    )
    .bind(user_id)
    .bind(i64::from(scholarship_id))
    .bind(Utc::now().to_rfc3339())
    .execute(db_pool)
    .await?;

    tracing::info!("⭐ Bolsa {} guardada por '{}'.", scholarship_id, user_id);
    Ok(())
}

/// Remove uma bolsa da lista. Devolve `false` se não estava guardada.
pub async fn remove_saved(db_pool: &SqlitePool, user_id: &str, scholarship_id: u32) -> AppResult<bool> {
    let rows_affected = sqlx::query(
        "DELETE FROM saved_scholarships WHERE user_id = ?1 AND scholarship_id = ?2",
    )
    .bind(user_id)
    .bind(i64::from(scholarship_id))
    .execute(db_pool)
    .await?
    .rows_affected();

    tracing::debug!(
        "Remoção da bolsa {} para '{}': {} linha(s).",
        scholarship_id,
        user_id,
        rows_affected
    );
    Ok(rows_affected > 0)
}

/// Cria ou atualiza o estado da candidatura.
pub async fn set_application_status(
    db_pool: &SqlitePool,
    catalog: &Catalog,
    user_id: &str,
    scholarship_id: u32,
    status: ApplicationStatus,
) -> AppResult<()> {
    ensure_known(catalog, scholarship_id)?;
    sqlx::query(
        r#"
        INSERT INTO applications (user_id, scholarship_id, status, updated_at)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(user_id, scholarship_id)
        DO UPDATE SET status = excluded.status, updated_at = excluded.updated_at
        "#,
    )
    .bind(user_id)
    .bind(i64::from(scholarship_id))
    .bind(status.as_str())
    .bind(Utc::now().to_rfc3339())
    .execute(db_pool)
    .await?;

    tracing::info!(
        "Estado da candidatura {} de '{}' atualizado para: {}",
        scholarship_id,
        user_id,
        status.as_str()
    );
    Ok(())
}

pub async fn remove_application(
    db_pool: &SqlitePool,
    user_id: &str,
    scholarship_id: u32,
) -> AppResult<bool> {
    let rows_affected =
        sqlx::query("DELETE FROM applications WHERE user_id = ?1 AND scholarship_id = ?2")
            .bind(user_id)
            .bind(i64::from(scholarship_id))
            .execute(db_pool)
            .await?
            .rows_affected();
    Ok(rows_affected > 0)
}

/// Painel do utilizador: bolsas guardadas e candidaturas, resolvidas no catálogo.
/// Linhas com IDs que já não existem no catálogo são ignoradas.
pub async fn load_dashboard(
    db_pool: &SqlitePool,
    catalog: &Catalog,
    user_id: &str,
) -> AppResult<Dashboard> {
    tracing::debug!("Carregando painel de '{}'", user_id);

    let saved_rows = sqlx::query_as::<_, SavedRow>(
        r#"
        SELECT scholarship_id, saved_at
        FROM saved_scholarships
        WHERE user_id = ?1
        ORDER BY saved_at ASC, scholarship_id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db_pool)
    .await?;

    let application_rows = sqlx::query_as::<_, ApplicationRow>(
        r#"
        SELECT scholarship_id, status, updated_at
        FROM applications
        WHERE user_id = ?1
        ORDER BY scholarship_id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db_pool)
    .await?;

    let saved = saved_rows
        .into_iter()
        .filter_map(|row| {
            let scholarship = lookup(catalog, row.scholarship_id)?;
            Some(SavedScholarship {
                scholarship,
                saved_at: row.saved_at,
            })
        })
        .collect();

    let applications = application_rows
        .into_iter()
        .filter_map(|row| {
            let scholarship = lookup(catalog, row.scholarship_id)?;
            let Some(status) = ApplicationStatus::from_db(&row.status) else {
                tracing::warn!("Estado desconhecido na DB: '{}'", row.status);
                return None;
            };
            Some(ApplicationEntry {
                scholarship,
                status,
                updated_at: row.updated_at,
            })
        })
        .collect();

    Ok(Dashboard {
        saved,
        applications,
    })
}

fn lookup(catalog: &Catalog, raw_id: i64) -> Option<ScholarshipRecord> {
    let found = u32::try_from(raw_id)
        .ok()
        .and_then(|id| catalog.find(id))
        .cloned();
    if found.is_none() {
        tracing::warn!("Bolsa {} guardada mas ausente do catálogo.", raw_id);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn catalog() -> Catalog {
        Catalog::seeded().unwrap()
    }

    #[tokio::test]
    async fn saved_scholarships_round_trip() {
        let pool = test_pool().await;
        let catalog = catalog();
        save_scholarship(&pool, &catalog, "user-1", 3).await.unwrap();
        save_scholarship(&pool, &catalog, "user-1", 1).await.unwrap();
        save_scholarship(&pool, &catalog, "user-1", 1).await.unwrap();

        let dashboard = load_dashboard(&pool, &catalog, "user-1").await.unwrap();
        let mut ids: Vec<u32> = dashboard.saved.iter().map(|s| s.scholarship.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 3]);

        assert!(remove_saved(&pool, "user-1", 3).await.unwrap());
        assert!(!remove_saved(&pool, "user-1", 3).await.unwrap());
        let dashboard = load_dashboard(&pool, &catalog, "user-1").await.unwrap();
        assert_eq!(dashboard.saved.len(), 1);
    }

    #[tokio::test]
    async fn unknown_scholarship_cannot_be_saved() {
        let pool = test_pool().await;
        match save_scholarship(&pool, &catalog(), "user-1", 404).await {
            Err(AppError::NotFound(_)) => {}
            other => panic!("esperado NotFound, obtido {other:?}"),
        }
    }

    #[tokio::test]
    async fn application_status_is_upserted() {
        let pool = test_pool().await;
        let catalog = catalog();
        set_application_status(&pool, &catalog, "user-1", 4, ApplicationStatus::Applied)
            .await
            .unwrap();
        set_application_status(&pool, &catalog, "user-1", 4, ApplicationStatus::UnderReview)
            .await
            .unwrap();

        let dashboard = load_dashboard(&pool, &catalog, "user-1").await.unwrap();
        assert_eq!(dashboard.applications.len(), 1);
        assert_eq!(dashboard.applications[0].status, ApplicationStatus::UnderReview);
        assert_eq!(dashboard.applications[0].scholarship.id, 4);

        assert!(remove_application(&pool, "user-1", 4).await.unwrap());
        let dashboard = load_dashboard(&pool, &catalog, "user-1").await.unwrap();
        assert!(dashboard.applications.is_empty());
    }

    #[tokio::test]
    async fn dashboards_are_per_user() {
        let pool = test_pool().await;
        let catalog = catalog();
        save_scholarship(&pool, &catalog, "user-1", 2).await.unwrap();

        let other = load_dashboard(&pool, &catalog, "user-2").await.unwrap();
        assert!(other.saved.is_empty());
        assert!(other.applications.is_empty());
    }

    #[tokio::test]
    async fn stale_rows_are_skipped() {
        let pool = test_pool().await;
        sqlx::query(
            "INSERT INTO saved_scholarships (user_id, scholarship_id, saved_at) VALUES ('user-1', 77, '2025-01-01T00:00:00+00:00')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let dashboard = load_dashboard(&pool, &catalog(), "user-1").await.unwrap();
        assert!(dashboard.saved.is_empty());
    }
}
