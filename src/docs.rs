// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::users::update_profile,
        handlers::users::list_commercials,

        // --- Campaigns ---
        handlers::campaigns::list_campaigns,
        handlers::campaigns::get_campaign,
        handlers::campaigns::create_campaign,
        handlers::campaigns::update_campaign,
        handlers::campaigns::delete_campaign,

        // --- Clients ---
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::create_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,

        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::filter_leads_by_status,
        handlers::leads::get_lead,
        handlers::leads::create_lead,
        handlers::leads::update_lead,
        handlers::leads::update_lead_status,
        handlers::leads::add_interaction,
        handlers::leads::delete_lead,

        // --- Tasks ---
        handlers::tasks::list_tasks,
        handlers::tasks::get_task,
        handlers::tasks::create_task,
        handlers::tasks::update_task,
        handlers::tasks::delete_task,

        // --- Analytics ---
        handlers::analytics::get_dashboard,
        handlers::analytics::add_analytics,
        handlers::analytics::get_by_campaign,
        handlers::analytics::get_meta_stats,
        handlers::analytics::sync_facebook,
        handlers::analytics::sync_google,
        handlers::analytics::sync_meta,
        handlers::analytics::sync_meta_all,
        handlers::analytics::sync_and_get_meta,

        // --- Meta Ads ---
        handlers::meta_ads::sync,
        handlers::meta_ads::metrics,
        handlers::meta_ads::campaigns,
    ),
    components(
        schemas(
            handlers::MessageResponse,

            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::UserSummary,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthUser,
            models::auth::AuthResponse,
            models::auth::CreateUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::UpdateProfilePayload,

            // --- Campaigns ---
            models::campaign::CampaignStatus,
            models::campaign::Campaign,
            models::campaign::CampaignSummary,
            models::campaign::CampaignPayload,

            // --- Clients ---
            models::client::ClientStatus,
            models::client::ClientLegacyFields,
            models::client::Client,
            models::client::CreateClientPayload,
            models::client::UpdateClientPayload,

            // --- Leads ---
            models::lead::LeadStatus,
            models::lead::NeedType,
            models::lead::Interaction,
            models::lead::Lead,
            models::lead::CreateLeadPayload,
            models::lead::UpdateLeadPayload,
            models::lead::UpdateLeadStatusPayload,
            models::lead::AddInteractionPayload,

            // --- Tasks ---
            models::task::TaskKind,
            models::task::TaskPriority,
            models::task::TaskStatus,
            models::task::Task,
            models::task::CreateTaskPayload,
            models::task::UpdateTaskPayload,

            // --- Analytics ---
            models::analytics::AnalyticsRecord,
            models::analytics::NewAnalyticsRecord,
            models::analytics::AddAnalyticsPayload,
            models::analytics::AnalyticsSaved,
            models::analytics::MetaStats,
            models::analytics::SyncResponse,
            models::analytics::MetaAdsSyncPayload,
            models::analytics::MetaAdsSyncResponse,
            models::analytics::MetaAdsMetrics,
            models::analytics::MetaAdsCampaign,
            models::analytics::MetaAdsCampaignPerformance,

            // --- Dashboard ---
            models::dashboard::DashboardStats,
            models::dashboard::CampaignPerformanceEntry,
            models::dashboard::SourceCount,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Gestão de Usuários e Perfil"),
        (name = "Campaigns", description = "Campanhas de Marketing"),
        (name = "Clients", description = "Carteira de Clientes"),
        (name = "Leads", description = "Funil de Vendas"),
        (name = "Tasks", description = "Tarefas da Equipe"),
        (name = "Analytics", description = "Painel e Sincronização de Métricas"),
        (name = "Meta Ads", description = "Consultas Diretas à Conta de Anúncios")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
