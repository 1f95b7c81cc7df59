//! Application startup and lifecycle management.

use crate::config::{ProductConfig, StoreBackend};
use crate::handlers;
use crate::services::{InMemoryProductStore, MongoProductStore, ProductService, ProductStore};
use crate::ApiDoc;
use axum::{
    http::{header, HeaderName, Method},
    middleware::from_fn,
    routing::get,
    Json, Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware, tracing::REQUEST_ID_HEADER,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ProductConfig,
    pub products: ProductService,
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/product",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/api/product/:id",
            get(handlers::get_product).put(handlers::update_product),
        )
        .route_layer(from_fn(metrics_middleware));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(api)
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            },
        ))
        // Outside TraceLayer, so the span sees minted ids.
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
                .allow_headers([
                    header::CONTENT_TYPE,
                    HeaderName::from_static(REQUEST_ID_HEADER),
                ])
                .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]),
        )
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the store selected by `config.store`.
    pub async fn build(config: ProductConfig) -> Result<Self, AppError> {
        let store: Arc<dyn ProductStore> = match config.store {
            StoreBackend::Mongo => Arc::new(
                MongoProductStore::connect(
                    &config.mongodb.uri,
                    &config.mongodb.database,
                    &config.mongodb.collection,
                )
                .await
                .map_err(|e| {
                    tracing::error!("Failed to connect to MongoDB: {}", e);
                    e
                })?,
            ),
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory product store; data is lost on restart");
                Arc::new(InMemoryProductStore::new())
            }
        };

        Self::build_with_store(config, store).await
    }

    /// Build the application around an already-constructed store.
    pub async fn build_with_store(
        config: ProductConfig,
        store: Arc<dyn ProductStore>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            config: config.clone(),
            products: ProductService::new(store),
        };
        let router = build_router(state);

        // Bind HTTP listener (port 0 = random port for testing)
        let addr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Product service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
