// src/models/mod.rs
pub mod dashboard;
pub mod scholarship;
pub mod search;
pub mod user;
