pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::accounts::handlers as accounts;
use crate::companies::handlers as companies;
use crate::jobs::handlers as jobs;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts (public)
        .route("/signup", post(accounts::handle_signup))
        .route("/login", post(accounts::handle_login))
        .route("/forgot-password", post(accounts::handle_forgot_password))
        .route("/reset-password", post(accounts::handle_reset_password))
        // Companies and job postings
        .route(
            "/companies",
            get(companies::handle_list_companies).post(companies::handle_create_company),
        )
        .route("/companies/:company_id", get(companies::handle_get_company))
        .route(
            "/companies/:company_id/jobs",
            get(jobs::handle_list_company_jobs).post(jobs::handle_post_job),
        )
        .route("/jobs", get(jobs::handle_list_jobs))
        .route("/jobs/:job_id", get(jobs::handle_get_job))
        // Matching
        .route(
            "/process/applications",
            post(matching::handle_process_applications),
        )
        .route(
            "/process/applications/outcomes",
            post(matching::handle_application_outcomes),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::cache::{job_key, otp_key, Cache, MemoryCache};
    use crate::config::Config;
    use crate::matching::testing::reference_job;

    /// State over a pool that never connects; only routes that stay off the
    /// database are exercised here.
    fn test_state(cache: Arc<MemoryCache>) -> AppState {
        let config = Config::for_tests();
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        AppState::new(db, cache, config)
    }

    fn bearer(state: &AppState) -> String {
        format!("Bearer {}", state.tokens.issue(1).unwrap())
    }

    fn post_json(uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = build_router(test_state(Arc::new(MemoryCache::new())));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "jobboard-api");
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let app = build_router(test_state(Arc::new(MemoryCache::new())));
        let response = app
            .oneshot(Request::get("/jobs").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_bad_token_rejected() {
        let app = build_router(test_state(Arc::new(MemoryCache::new())));
        let response = app
            .oneshot(post_json(
                "/process/applications",
                Some("Bearer not.a.jwt"),
                json!([]),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_empty_batch_returns_empty_array() {
        let state = test_state(Arc::new(MemoryCache::new()));
        let auth = bearer(&state);
        let app = build_router(state);

        let response = app
            .oneshot(post_json("/process/applications", Some(&auth), json!([])))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_invalid_application_rejected() {
        let state = test_state(Arc::new(MemoryCache::new()));
        let auth = bearer(&state);
        let app = build_router(state);

        let body = json!([
            { "name": "", "job_id": 1, "criteria": { "notice_period": 0, "experience": 0.0 } }
        ]);
        let response = app
            .oneshot(post_json("/process/applications", Some(&auth), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_batch_served_from_job_cache() {
        let cache = Arc::new(MemoryCache::new());
        let job = reference_job(1);
        cache
            .put(
                &job_key(1),
                &serde_json::to_string(&job).unwrap(),
                std::time::Duration::from_secs(60),
            )
            .await
            .unwrap();
        let state = test_state(cache);
        let auth = bearer(&state);
        let app = build_router(state);

        let body = json!([
            {
                "name": "asha",
                "job_id": 1,
                "criteria": {
                    "notice_period": 25,
                    "experience": 2.5,
                    "location_ids": [1],
                    "skill_ids": [1],
                    "qualification_ids": [1],
                    "shift_ids": [2],
                    "work_mode_ids": [1],
                    "job_type_ids": [1]
                }
            },
            {
                "name": "ravi",
                "job_id": 1,
                "criteria": { "notice_period": 90, "experience": 20.0, "location_ids": [9] }
            }
        ]);
        let response = app
            .oneshot(post_json("/process/applications", Some(&auth), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let matched = body_json(response).await;
        let names: Vec<&str> = matched
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["asha"]);
    }

    #[tokio::test]
    async fn test_outcomes_endpoint_reports_scores() {
        let cache = Arc::new(MemoryCache::new());
        cache
            .put(
                &job_key(1),
                &serde_json::to_string(&reference_job(1)).unwrap(),
                std::time::Duration::from_secs(60),
            )
            .await
            .unwrap();
        let state = test_state(cache);
        let auth = bearer(&state);
        let app = build_router(state);

        let body = json!([
            { "name": "ravi", "job_id": 1, "criteria": { "notice_period": 25, "experience": 2.5 } }
        ]);
        let response = app
            .oneshot(post_json(
                "/process/applications/outcomes",
                Some(&auth),
                body,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let outcomes = body_json(response).await;
        assert_eq!(outcomes[0]["outcome"], "unmatched");
        assert_eq!(outcomes[0]["matched_criteria"], 2);
        assert_eq!(outcomes[0]["total_criteria"], 7);
        assert_eq!(outcomes[0]["index"], 0);
    }

    #[tokio::test]
    async fn test_reset_password_requires_matching_passwords() {
        let app = build_router(test_state(Arc::new(MemoryCache::new())));
        let response = app
            .oneshot(post_json(
                "/reset-password",
                None,
                json!({
                    "email": "asha@example.com",
                    "otp": "abc123",
                    "password": "one",
                    "confirm_password": "two"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reset_password_rejects_wrong_code() {
        let cache = Arc::new(MemoryCache::new());
        cache
            .put(
                &otp_key("asha@example.com"),
                "abc123",
                std::time::Duration::from_secs(300),
            )
            .await
            .unwrap();
        let app = build_router(test_state(cache.clone()));

        let response = app
            .oneshot(post_json(
                "/reset-password",
                None,
                json!({
                    "email": "asha@example.com",
                    "otp": "zzz999",
                    "password": "new-pass",
                    "confirm_password": "new-pass"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        // a failed attempt does not burn the code
        assert_eq!(
            cache.get(&otp_key("asha@example.com")).await.unwrap(),
            Some("abc123".to_string())
        );
    }
}
