//! HTTP API server with observability for the product-order system.
//!
//! Provides REST endpoints for catalog management and order placement,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod identity;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use catalog::CatalogStore;
use metrics_exporter_prometheus::PrometheusHandle;
use orders::OrderStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C, O>(state: Arc<AppState<C, O>>, metrics_handle: PrometheusHandle) -> Router
where
    C: CatalogStore + Clone + 'static,
    O: OrderStore + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::place::<C, O>))
        .route("/orders", get(routes::orders::list::<C, O>))
        .route("/orders/{id}", get(routes::orders::get::<C, O>))
        .route("/orders/{id}", delete(routes::orders::delete::<C, O>))
        .route("/admin/orders", get(routes::orders::list_all::<C, O>))
        .route("/products", post(routes::products::create::<C, O>))
        .route("/products", get(routes::products::search::<C, O>))
        .route("/products/{id}", get(routes::products::get::<C, O>))
        .route("/products/{id}", put(routes::products::update::<C, O>))
        .route("/products/{id}", delete(routes::products::delete::<C, O>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over the given catalog and order stores,
/// wiring the placement engine with the configured discount policy.
pub fn create_state<C, O>(catalog: C, orders: O, config: &Config) -> Arc<AppState<C, O>>
where
    C: CatalogStore + Clone + 'static,
    O: OrderStore + 'static,
{
    let policy = orders::DiscountPolicy::new(config.discount_config());
    let order_service = orders::OrderService::new(catalog.clone(), orders, policy);
    Arc::new(AppState {
        catalog,
        order_service,
    })
}

/// Creates the default application state backed by in-memory stores.
pub fn create_default_state(
    config: &Config,
) -> Arc<AppState<catalog::InMemoryCatalogStore, orders::InMemoryOrderStore>> {
    create_state(
        catalog::InMemoryCatalogStore::new(),
        orders::InMemoryOrderStore::new(),
        config,
    )
}
