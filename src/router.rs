// src/router.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post, put},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn create_router(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/", get(handlers::users::list_users).post(handlers::users::create_user))
        .route("/commercials", get(handlers::users::list_commercials))
        .route("/profile/me", put(handlers::users::update_profile))
        .route("/{id}", put(handlers::users::update_user).delete(handlers::users::delete_user));

    let campaign_routes = Router::new()
        .route("/", get(handlers::campaigns::list_campaigns).post(handlers::campaigns::create_campaign))
        .route(
            "/{id}",
            get(handlers::campaigns::get_campaign)
                .put(handlers::campaigns::update_campaign)
                .delete(handlers::campaigns::delete_campaign),
        );

    let client_routes = Router::new()
        .route("/", get(handlers::clients::list_clients).post(handlers::clients::create_client))
        .route(
            "/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        );

    let lead_routes = Router::new()
        .route("/", get(handlers::leads::list_leads).post(handlers::leads::create_lead))
        .route("/filter/status", get(handlers::leads::filter_leads_by_status))
        .route(
            "/{id}",
            get(handlers::leads::get_lead)
                .put(handlers::leads::update_lead)
                .delete(handlers::leads::delete_lead),
        )
        .route("/{id}/status", patch(handlers::leads::update_lead_status))
        .route("/{id}/interactions", post(handlers::leads::add_interaction));

    let task_routes = Router::new()
        .route("/", get(handlers::tasks::list_tasks).post(handlers::tasks::create_task))
        .route(
            "/{id}",
            get(handlers::tasks::get_task)
                .put(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        );

    let analytics_routes = Router::new()
        .route("/dashboard", get(handlers::analytics::get_dashboard))
        .route("/add", post(handlers::analytics::add_analytics))
        .route("/meta/stats", get(handlers::analytics::get_meta_stats))
        .route(
            "/sync/facebook/{campaignId}/{accessToken}/{adAccountId}",
            get(handlers::analytics::sync_facebook),
        )
        .route("/sync/google/{campaignId}", get(handlers::analytics::sync_google))
        .route(
            "/sync/meta/{campaignId}/{accessToken}/{adAccountId}",
            get(handlers::analytics::sync_meta),
        )
        .route("/sync/meta-all/{accessToken}/{adAccountId}", get(handlers::analytics::sync_meta_all))
        .route(
            "/sync-and-get/meta/{accessToken}/{adAccountId}",
            post(handlers::analytics::sync_and_get_meta),
        )
        .route("/{campaignId}", get(handlers::analytics::get_by_campaign));

    let meta_ads_routes = Router::new()
        .route("/sync", post(handlers::meta_ads::sync))
        .route("/metrics/{adAccountId}", get(handlers::meta_ads::metrics))
        .route("/campaigns/{adAccountId}", get(handlers::meta_ads::campaigns));

    // Tudo abaixo exige Bearer válido; o papel é checado em cada handler
    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/campaigns", campaign_routes)
        .nest("/clients", client_routes)
        .nest("/leads", lead_routes)
        .nest("/tasks", task_routes)
        .nest("/analytics", analytics_routes)
        .nest("/meta-ads", meta_ads_routes)
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let api_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
    };
    use chrono::Utc;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{
        config::test_support::lazy_state,
        models::auth::{Role, User},
    };

    fn token_for(state: &AppState, role: Role) -> String {
        let user = User {
            id: Uuid::new_v4(),
            name: "Teste".to_string(),
            email: "teste@solar.tn".to_string(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        state.auth_service.create_token(&user).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response: Response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get_as(uri: &str, token: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = create_router(lazy_state());
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let app = create_router(lazy_state());
        let (status, body) = send(app, Request::get("/api/leads").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Missing or invalid authentication token");
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_unauthorized() {
        let app = create_router(lazy_state());
        let forged = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &crate::models::auth::Claims {
                id: Uuid::new_v4(),
                role: Role::Admin,
                exp: (Utc::now().timestamp() + 3600) as usize,
                iat: Utc::now().timestamp() as usize,
            },
            &jsonwebtoken::EncodingKey::from_secret(b"outro-segredo"),
        )
        .unwrap();

        let (status, _) = send(app, get_as("/api/users", &forged)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn commercial_cannot_list_users_or_campaigns() {
        let state = lazy_state();
        let token = token_for(&state, Role::Commercial);
        let app = create_router(state);

        let (status, body) = send(app.clone(), get_as("/api/users", &token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Access denied: role not authorized");

        let (status, _) = send(app.clone(), get_as("/api/campaigns", &token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(app, get_as("/api/analytics/meta/stats", &token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn marketing_cannot_manage_users() {
        let state = lazy_state();
        let token = token_for(&state, Role::Marketing);
        let app = create_router(state);

        let request = Request::delete(format!("/api/users/{}", Uuid::new_v4()))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn malformed_id_is_bad_request() {
        let state = lazy_state();
        let token = token_for(&state, Role::Commercial);
        let app = create_router(state);

        let (status, body) = send(app, get_as("/api/leads/not-a-uuid", &token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn unknown_status_filter_is_bad_request() {
        let state = lazy_state();
        let token = token_for(&state, Role::Commercial);
        let app = create_router(state);

        let (status, _) = send(app, get_as("/api/leads/filter/status?status=won", &token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let state = lazy_state();
        let token = token_for(&state, Role::Admin);
        let app = create_router(state);

        let request = Request::post("/api/campaigns")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn register_rejects_invalid_email_before_touching_the_store() {
        let app = create_router(lazy_state());

        let request = Request::post("/api/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"Amal","email":"amal","password":"secret123"}"#))
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "email: invalid email");
    }

    #[tokio::test]
    async fn meta_ads_metrics_require_access_token_header() {
        let state = lazy_state();
        let token = token_for(&state, Role::Marketing);
        let app = create_router(state);

        let (status, body) = send(app, get_as("/api/meta-ads/metrics/123", &token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "accesstoken header is required");
    }
}
