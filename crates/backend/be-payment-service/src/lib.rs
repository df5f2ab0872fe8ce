use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::debug;

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod service;
pub mod signature;
pub mod types;
pub mod webhook;

use service::AppState;
use webhook::WebhookEventHandler;

pub fn create_router<H: WebhookEventHandler>(state: Arc<AppState<H>>) -> Router {
    // FRONTEND_URL is validated during PaymentConfig::from_env(), so this
    // parse cannot fail at runtime.
    let origin = state
        .config
        .frontend_url
        .parse()
        .expect("FRONTEND_URL was validated during config loading");

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let webhook_route = Router::new().route(
        "/api/webhooks/creem",
        post(handlers::handle_creem_webhook::<H>).get(handlers::get_creem_webhook_status::<H>),
    );

    let catalog_routes = Router::new()
        .route(
            "/payment/checkout/resolve",
            post(handlers::resolve_checkout::<H>),
        )
        .route("/payment/products", get(handlers::list_products::<H>))
        .route(
            "/payment/admin/products",
            put(handlers::replace_products::<H>),
        );

    webhook_route
        .merge(catalog_routes)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

pub fn init_payment_service() -> Result<Router> {
    debug!("Initializing payment service");

    let state = Arc::new(AppState::from_env().context("Failed to create payment service state")?);

    Ok(create_router(state))
}

pub use config::PaymentConfig;
pub use error::PaymentError;
pub use service::SharedCatalog;
pub use types::{CreemEvent, ResolveCheckoutRequest, ResolveCheckoutResponse, WebhookAck};
pub use webhook::{CompletedPurchase, LoggingWebhookHandler, SubscriptionChange};
