// src/web/mod.rs
pub mod auth_handlers;
pub mod dashboard_handlers;
pub mod mw_auth;
pub mod routes;
pub mod search_handlers;
