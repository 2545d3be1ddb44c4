// src/db.rs

pub mod analytics_repo;
pub mod campaign_repo;
pub mod client_repo;
pub mod lead_repo;
pub mod task_repo;
pub mod user_repo;

pub use analytics_repo::AnalyticsRepository;
pub use campaign_repo::CampaignRepository;
pub use client_repo::ClientRepository;
pub use lead_repo::LeadRepository;
pub use task_repo::TaskRepository;
pub use user_repo::UserRepository;
