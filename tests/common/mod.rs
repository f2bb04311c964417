use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use pharmacy_api::{
    auth::{self, AuthConfig, AuthService},
    config::AppConfig,
    db,
    handlers::AppServices,
    AppState,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

/// Helper harness for spinning up an application state backed by a
/// file-based SQLite database in a temp directory.
pub struct TestApp {
    pub state: AppState,
    pub auth_service: Arc<AuthService>,
    router: Router,
    _tmp: TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let db_path = tmp.path().join("pharmacy_test.db");
        let database_url = format!("sqlite://{}?mode=rwc", db_path.display());

        let mut cfg = AppConfig::new(
            database_url,
            "test_secret_key_for_testing_purposes_only_32chars".to_string(),
            3600,
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);

        let auth_cfg = AuthConfig::new(
            cfg.jwt_secret.clone(),
            cfg.auth_issuer.clone(),
            cfg.auth_audience.clone(),
            Duration::from_secs(cfg.jwt_expiration as u64),
            Duration::from_secs(cfg.reset_token_expiration as u64),
        );
        let auth_service = Arc::new(AuthService::new(auth_cfg, db_arc.clone()));

        let services = AppServices::new(db_arc.clone(), auth_service.clone());

        let state = AppState {
            db: db_arc,
            config: cfg,
            services,
            auth: auth_service.clone(),
        };

        let router = build_router(state.clone(), auth_service.clone());

        Self {
            state,
            auth_service,
            router,
            _tmp: tmp,
        }
    }

    /// Create a user account with the given role and return its id.
    pub async fn seed_user(&self, name: &str, email: &str, password: &str, role: &str) -> Uuid {
        let user = self
            .auth_service
            .create_user(name, email, password, role)
            .await
            .expect("failed to seed user");
        user.id
    }

    /// Issue a bearer token for a seeded account.
    pub async fn token_for(&self, email: &str) -> String {
        let user = self
            .auth_service
            .find_user_by_email(email)
            .await
            .expect("user lookup failed")
            .expect("user should exist");
        self.auth_service
            .generate_token(&user)
            .await
            .expect("token generation failed")
            .access_token
    }

    /// Drive one request through the full router and decode the JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("failed to build request"),
            None => builder.body(Body::empty()).expect("failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }
}

/// Same router shape as the production binary, minus CORS/compression.
fn build_router(state: AppState, auth_service: Arc<AuthService>) -> Router {
    Router::<AppState>::new()
        .nest("/api/v1", pharmacy_api::api_v1_routes())
        .nest_service(
            "/auth",
            auth::auth_routes().with_state(auth_service.clone()),
        )
        .layer(axum::middleware::from_fn_with_state(
            auth_service,
            |axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
             mut req: axum::http::Request<Body>,
             next: axum::middleware::Next| async move {
                req.extensions_mut().insert(auth);
                next.run(req).await
            },
        ))
        .layer(axum::middleware::from_fn(
            pharmacy_api::request_id::request_id_middleware,
        ))
        .with_state(state)
}
