// src/services.rs

pub mod ad_platforms;
pub mod analytics_service;
pub mod auth;
pub mod campaign_service;
pub mod client_service;
pub mod lead_lifecycle;
pub mod lead_service;
pub mod metrics_normalizer;
pub mod populate;
pub mod task_service;
pub mod user_service;
