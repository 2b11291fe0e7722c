//! # cellctl: Control Layer for Church Cell Groups
//!
//! `cellctl` manages member ("contact") records, cell groups, pipeline stages and birthday
//! reporting for a church community. Data lives in PostgreSQL and is exposed through a REST
//! management API consumed by the web dashboard.
//!
//! ## Overview
//!
//! Most of the service is plain record keeping. The part with a real contract is editing a
//! contact: the edit form validates required fields, locks the cell and leader fields for anyone
//! who is not an admin, and turns picker placeholders (`no-city`, `no-cell`, ...) into nulls
//! before a single full-row update is written. The other recurring piece is the detail page,
//! which loads a record and then the rows that reference it, and must ignore results that arrive
//! after the page has moved on.
//!
//! Both live in the view-model layer ([`workflow`]), which the HTTP handlers call into. A `PUT`
//! to the API therefore goes through exactly the same rules as a save from the dialog.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer and
//! uses PostgreSQL for persistence.
//!
//! ### Request Flow
//!
//! Requests to the management API (`/admin/api/v1/*`) arrive from an authenticating proxy that
//! sets a trusted header to the caller's email. The [`api::models::profiles::CurrentUser`]
//! extractor resolves it to an active profile, whose role drives field-level permissions.
//! Handlers then call the [`workflow`] layer, which talks to storage only through the
//! [`db::backend::Backend`] trait.
//!
//! ### Core Components
//!
//! The **API layer** ([`api`]) holds the route handlers and the response models.
//!
//! The **authentication layer** ([`auth`]) resolves the proxy header and decides which contact
//! fields a role may edit.
//!
//! The **view-model layer** ([`workflow`]) holds form state, validation, sentinel handling and
//! the cancellable detail loads.
//!
//! The **database layer** ([`db`]) uses the repository pattern, one repository per table, behind
//! the object-safe [`db::backend::Backend`] trait.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use cellctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = cellctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     cellctl::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod auth;
pub mod birthdays;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
pub mod types;
pub mod workflow;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{self, HeaderValue},
    routing::get,
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;

use crate::config::{CorsOrigin, DatabaseConfig};
use crate::db::backend::{Backend, PgBackend};
use crate::openapi::AdminApiDoc;

/// Shared state handed to every handler.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .backend(Arc::new(PgBackend::new(pool)))
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub config: Config,
}

/// Get the cellctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect to PostgreSQL with the configured pool settings and run pending migrations
#[instrument(skip_all, err)]
async fn setup_database(database: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let pool_settings = &database.pool;
    let pool = PgPoolOptions::new()
        .max_connections(pool_settings.max_connections)
        .min_connections(pool_settings.min_connections)
        .acquire_timeout(Duration::from_secs(pool_settings.acquire_timeout_secs))
        .idle_timeout(Some(Duration::from_secs(pool_settings.idle_timeout_secs)))
        .max_lifetime(Some(Duration::from_secs(pool_settings.max_lifetime_secs)))
        .connect(&database.url)
        .await?;

    migrator().run(&pool).await?;
    info!("Database migrations are up to date");

    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.auth.security.cors;
    let allow_origin = if cors_config.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let origins = cors_config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin {
                CorsOrigin::Wildcard => None,
                // Browsers send origins without a trailing slash
                CorsOrigin::Url(url) => Some(url.as_str().trim_end_matches('/').parse::<HeaderValue>()),
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([http::Method::GET, http::Method::PUT])
        .allow_headers([
            http::header::CONTENT_TYPE,
            http::HeaderName::try_from(config.auth.proxy_header.header_name.as_str())?,
        ])
        .allow_credentials(cors_config.allow_credentials);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router.
///
/// - Management API under `/admin/api/v1`
/// - API docs at `/admin/docs`
/// - Liveness probe at `/healthz`
/// - Prometheus metrics at `/internal/metrics` when `enable_metrics` is set
/// - CORS and request tracing on everything
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    use api::handlers::{birthdays, cells, contacts, reference};

    let api_routes = Router::new()
        .route("/cells/{cell_id}", get(cells::get_cell).put(cells::update_cell))
        .route("/contacts/{contact_id}", get(contacts::get_contact).put(contacts::update_contact))
        .route("/reference-data", get(reference::get_reference_data))
        .route("/cities/{city_id}/neighborhoods", get(reference::list_city_neighborhoods))
        .route("/birthdays/monthly", get(birthdays::list_monthly_birthdays))
        .with_state(state.clone());

    let mut router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/admin/api/v1", api_routes)
        .merge(Scalar::with_url("/admin/docs", AdminApiDoc::openapi()))
        .layer(create_cors_layer(&state.config)?);

    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(move || async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// The cellctl server.
///
/// 1. **Create**: [`Application::new`] connects to the database, runs migrations and builds the
///    router
/// 2. **Serve**: [`Application::serve`] binds to the configured address and handles requests
/// 3. **Shutdown**: when the shutdown future resolves, in-flight requests finish, then the pool
///    is closed and telemetry flushed
pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application backed by PostgreSQL
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting cell control layer with configuration: {:#?}", config);

        let pool = setup_database(&config.database).await?;
        let backend: Arc<dyn Backend> = Arc::new(PgBackend::new(pool.clone()));

        let mut app = Self::with_backend(config, backend)?;
        app.pool = Some(pool);
        Ok(app)
    }

    /// Create an application over an existing backend
    pub fn with_backend(config: Config, backend: Arc<dyn Backend>) -> anyhow::Result<Self> {
        let state = AppState::builder().backend(backend).config(config.clone()).build();
        let router = build_router(&state)?;

        Ok(Self {
            router,
            config,
            pool: None,
        })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Cell control layer listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::*;
    use axum::http::StatusCode;
    use sqlx::ConnectOptions;

    fn memory_app(config: Config) -> axum_test::TestServer {
        Application::with_backend(config, Arc::new(MemoryBackend::default()))
            .unwrap()
            .into_test_server()
    }

    #[test_log::test(tokio::test)]
    async fn test_health_and_docs() {
        let server = memory_app(create_test_config());

        let health = server.get("/healthz").await;
        health.assert_status_ok();
        assert_eq!(health.text(), "OK");

        let docs = server.get("/admin/docs").await;
        docs.assert_status_ok();
    }

    #[test_log::test(tokio::test)]
    async fn test_api_routes_require_authentication() {
        let server = memory_app(create_test_config());

        let response = server.get("/admin/api/v1/reference-data").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[test_log::test(tokio::test)]
    async fn test_cors_preflight_allows_configured_origin() {
        let server = memory_app(create_test_config());

        let response = server
            .method(http::Method::OPTIONS, "/admin/api/v1/reference-data")
            .add_header("origin", "http://localhost:5173")
            .add_header("access-control-request-method", "PUT")
            .await;

        let allowed = response.headers().get("access-control-allow-origin").unwrap();
        assert_eq!(allowed, "http://localhost:5173");
    }

    #[test_log::test(tokio::test)]
    async fn test_build_router_with_metrics_disabled() {
        let server = memory_app(create_test_config());

        let response = server.get("/internal/metrics").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[test_log::test(tokio::test)]
    async fn test_build_router_with_metrics_enabled() {
        let mut config = create_test_config();
        config.enable_metrics = true;
        let server = memory_app(config);

        // Generate at least one recorded request
        server.get("/healthz").await.assert_status_ok();

        let response = server.get("/internal/metrics").await;
        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("# HELP") || body.contains("# TYPE"));
    }

    #[sqlx::test]
    #[test_log::test]
    #[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
    async fn test_application_integration(pool: PgPool) {
        let mut config = create_test_config();
        config.database.url = pool.connect_options().to_url_lossy().to_string();

        let server = Application::new(config).await.unwrap().into_test_server();

        server.get("/healthz").await.assert_status_ok();
        server
            .get("/admin/api/v1/reference-data")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
