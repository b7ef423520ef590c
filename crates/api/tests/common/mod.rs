#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use tsumi_api::auth::jwt::{generate_access_token, JwtConfig};
use tsumi_api::config::{default_stats_offset, ServerConfig};
use tsumi_api::routes;
use tsumi_api::state::AppState;
use tsumi_catalog::{CatalogAdapter, CatalogConfig, CatalogError, Catalogs};
use tsumi_core::catalog::NormalizedResult;
use tsumi_core::item::ItemType;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        stats_utc_offset: default_stats_offset(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        catalog: CatalogConfig::default(),
    }
}

// ---------------------------------------------------------------------------
// Fake catalogs
// ---------------------------------------------------------------------------

/// In-process catalog that records how often it was queried.
pub struct FakeCatalog {
    item_type: ItemType,
    results: Vec<NormalizedResult>,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn returning(item_type: ItemType, results: Vec<NormalizedResult>) -> Arc<Self> {
        Arc::new(Self {
            item_type,
            results,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(item_type: ItemType) -> Arc<Self> {
        Arc::new(Self {
            item_type,
            results: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogAdapter for FakeCatalog {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn item_type(&self) -> ItemType {
        self.item_type
    }

    async fn fetch(&self, _query: &str) -> Result<Vec<NormalizedResult>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CatalogError::HttpStatus {
                catalog: "fake",
                status: 502,
            });
        }
        Ok(self.results.clone())
    }
}

/// Build a search hit for the fake catalogs.
pub fn search_hit(item_type: ItemType, external_id: &str, title: &str) -> NormalizedResult {
    NormalizedResult {
        external_id: external_id.to_string(),
        item_type,
        title: title.to_string(),
        image_url: Some(format!("https://img.example/{external_id}.jpg")),
        description: None,
        metadata: serde_json::json!({ "source": "fake" }),
    }
}

/// Catalogs that answer nothing and never touch the network.
pub fn empty_catalogs() -> Catalogs {
    Catalogs::new(
        FakeCatalog::returning(ItemType::Game, Vec::new()),
        FakeCatalog::returning(ItemType::Anime, Vec::new()),
        FakeCatalog::returning(ItemType::Book, Vec::new()),
    )
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Build the full application router with all middleware layers.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack production uses.
pub fn build_test_app(pool: SqlitePool) -> Router {
    build_test_app_with_catalogs(pool, empty_catalogs())
}

pub fn build_test_app_with_catalogs(pool: SqlitePool, catalogs: Catalogs) -> Router {
    build_test_app_with(pool, test_config(), catalogs)
}

pub fn build_test_app_with_config(pool: SqlitePool, config: ServerConfig) -> Router {
    build_test_app_with(pool, config, empty_catalogs())
}

fn build_test_app_with(pool: SqlitePool, config: ServerConfig, catalogs: Catalogs) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config),
        catalogs,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A valid bearer token for `user_id`.
pub fn token_for(user_id: &str) -> String {
    generate_access_token(user_id, &test_config().jwt).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn json_auth(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_auth(app, Method::POST, uri, token, body).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_auth(app, Method::PATCH, uri, token, body).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
