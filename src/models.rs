// src/models.rs

pub mod analytics;
pub mod auth;
pub mod campaign;
pub mod client;
pub mod dashboard;
pub mod lead;
pub mod reference;
pub mod task;
