// src/config.rs
use crate::error::{AppError, AppResult};
use std::{env, net::SocketAddr, str::FromStr, time::Duration};

/// Configuração lida das variáveis de ambiente (e do `.env`, via dotenvy).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    // Latências simuladas (0 desliga a espera)
    pub auth_latency: Duration,
    pub search_latency: Duration,
    pub detail_latency: Duration,
    /// Guarda contas criadas no signup na tabela `accounts`.
    pub persist_new_accounts: bool,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Constrói a configuração a partir de uma função de pesquisa de chaves.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "sqlite://scholarseeker.db".to_string());

        Ok(Self {
            database_url,
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            auth_latency: Duration::from_millis(parse_or(&lookup, "AUTH_LATENCY_MS", 1000)?),
            search_latency: Duration::from_millis(parse_or(&lookup, "SEARCH_LATENCY_MS", 1000)?),
            detail_latency: Duration::from_millis(parse_or(&lookup, "DETAIL_LATENCY_MS", 800)?),
            persist_new_accounts: parse_or(&lookup, "PERSIST_NEW_ACCOUNTS", false)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }

    /// Configuração usada nos testes: sem latência, custo bcrypt mínimo.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            auth_latency: Duration::ZERO,
            search_latency: Duration::ZERO,
            detail_latency: Duration::ZERO,
            persist_new_accounts: false,
            bcrypt_cost: 4,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| {
            tracing::warn!("Valor inválido em {}: '{}'", key, raw);
            AppError::InvalidConfig { key, value: raw }
        }),
    }
}
