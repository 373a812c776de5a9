// src/services/mod.rs
pub mod auth_service;
pub mod catalog_service;
pub mod dashboard_service;
pub mod session_service;
pub mod user_service;
