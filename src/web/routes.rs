// src/web/routes.rs
use crate::{
    state::AppState,
    web::{auth_handlers, dashboard_handlers, mw_auth, search_handlers},
};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route("/scholarships", get(search_handlers::handle_search))
        .route("/scholarships/{id}", get(search_handlers::handle_detail))
        .route("/session", get(auth_handlers::show_session))
        .route("/login", post(auth_handlers::handle_login))
        .route("/signup", post(auth_handlers::handle_signup))
        .route("/logout", post(auth_handlers::handle_logout));

    // --- Painel (exige sessão ativa) ---
    let dashboard_routes = Router::new()
        .route("/", get(dashboard_handlers::show_dashboard))
        .route(
            "/saved/{id}",
            post(dashboard_handlers::handle_save).delete(dashboard_handlers::handle_remove_saved),
        )
        .route(
            "/applications/{id}",
            put(dashboard_handlers::handle_update_status)
                .delete(dashboard_handlers::handle_remove_application),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_auth,
        ));

    let api = Router::new()
        .merge(public_routes)
        .nest("/dashboard", dashboard_routes);

    // --- Router Final ---
    Router::new().nest("/api", api).with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, db::test_pool};
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> Router {
        let state = AppState::build(test_pool().await, AppConfig::for_tests())
            .await
            .unwrap();
        create_router(state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn login_demo(app: &Router) {
        let (status, _) = send(
            app,
            Method::POST,
            "/api/login",
            Some(json!({ "email": "demo@example.com", "password": "password123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn search_applies_url_parameters() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/api/scholarships?maxAmount=50000", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 5);
        assert_eq!(body["query"], "maxAmount=50000");

        let ids: Vec<u64> = body["scholarships"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 3, 5, 7, 10]);
    }

    #[tokio::test]
    async fn search_reads_leading_digits_of_max_amount() {
        let app = app().await;
        let (_, body) = send(&app, Method::GET, "/api/scholarships?maxAmount=50000abc", None).await;
        assert_eq!(body["count"], 5);
        assert_eq!(body["query"], "maxAmount=50000");

        let (_, body) = send(&app, Method::GET, "/api/scholarships?maxAmount=-1", None).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn search_without_parameters_lists_catalog() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/api/scholarships", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 10);
        assert_eq!(body["scholarships"][0]["amount"]["display"], "₹50,000");
        assert_eq!(body["scholarships"][0]["amount"]["value"], 50000);
    }

    #[tokio::test]
    async fn search_by_education_and_income() {
        let app = app().await;
        let (_, body) = send(
            &app,
            Method::GET,
            "/api/scholarships?education=high%20school&income=low",
            None,
        )
        .await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["scholarships"][0]["educationLevel"], "high school");
    }

    #[tokio::test]
    async fn detail_returns_record_and_similar() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/api/scholarships/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scholarship"]["name"], "Future Engineers Scholarship");
        assert_eq!(body["similar"].as_array().unwrap().len(), 2);

        let (status, body) = send(&app, Method::GET, "/api/scholarships/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Scholarship 99 not found");
    }

    #[tokio::test]
    async fn login_failure_surfaces_message() {
        let app = app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/login",
            Some(json!({ "email": "demo@example.com", "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password");

        let (_, status_body) = send(&app, Method::GET, "/api/session", None).await;
        assert_eq!(status_body["phase"], "unauthenticated");
        assert_eq!(status_body["error"], "Invalid email or password");
        assert!(status_body["user"].is_null());
    }

    #[tokio::test]
    async fn signup_with_existing_email_conflicts() {
        let app = app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/signup",
            Some(json!({ "name": "Jane", "email": "demo@example.com", "password": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Email already in use");
    }

    #[tokio::test]
    async fn dashboard_requires_session() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/api/dashboard", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Please log in to continue.");
    }

    #[tokio::test]
    async fn dashboard_flow_after_login() {
        let app = app().await;
        login_demo(&app).await;

        let (_, session) = send(&app, Method::GET, "/api/session", None).await;
        assert_eq!(session["phase"], "authenticated");
        assert_eq!(session["user"]["email"], "demo@example.com");

        let (status, _) = send(&app, Method::POST, "/api/dashboard/saved/3", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/dashboard/applications/3",
            Some(json!({ "status": "Applied" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, dashboard) = send(&app, Method::GET, "/api/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dashboard["saved"][0]["scholarship"]["id"], 3);
        assert_eq!(dashboard["applications"][0]["status"], "Applied");

        let (status, body) = send(&app, Method::DELETE, "/api/dashboard/saved/3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["removed"], true);

        let (status, _) = send(&app, Method::POST, "/api/dashboard/saved/404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn logout_closes_dashboard() {
        let app = app().await;
        login_demo(&app).await;

        let (status, body) = send(&app, Method::POST, "/api/logout", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Logged out successfully");

        let (status, _) = send(&app, Method::GET, "/api/dashboard", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // Segundo logout continua a ter sucesso
        let (status, _) = send(&app, Method::POST, "/api/logout", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
