use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use be_product_catalog::{BillingCycle, IdKind, ProductRecord, Provider, ValidationReport};
use chrono::Utc;
use secrecy::ExposeSecret;
use tracing::{debug, info, instrument, warn};

use crate::auth::AdminAuth;
use crate::error::PaymentError;
use crate::service::AppState;
use crate::signature;
use crate::types::{
    CreemEvent, ProductListQuery, ResolveCheckoutRequest, ResolveCheckoutResponse, WebhookAck,
    WebhookConfigStatus, WebhookStatusResponse,
};
use crate::webhook::{CompletedPurchase, SubscriptionChange, WebhookEventHandler};

const CREEM_WEBHOOK_PATH: &str = "/api/webhooks/creem";

// ---------------------------------------------------------------------------
// POST /api/webhooks/creem
// ---------------------------------------------------------------------------

/// Verifies a Creem webhook, resolves its product against the catalog and
/// hands it to the configured event handler.
#[instrument(skip_all, fields(body_len = body.len()))]
pub async fn handle_creem_webhook<H: WebhookEventHandler>(
    State(state): State<Arc<AppState<H>>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookAck>, PaymentError> {
    let signature =
        signature::signature_from_headers(&headers).ok_or(PaymentError::WebhookSignatureInvalid)?;

    let secret = state.config.creem_webhook_secret.expose_secret().as_bytes();
    if !signature::verify(secret, body.as_bytes(), signature) {
        return Err(PaymentError::WebhookSignatureInvalid);
    }

    let event: CreemEvent =
        serde_json::from_str(&body).map_err(|e| PaymentError::InvalidPayload(e.to_string()))?;

    info!(event_id = %event.id, event_type = %event.event_type, "Received Creem webhook");

    if !event.is_checkout_completed() && !event.is_subscription_event() {
        warn!(event_type = %event.event_type, "Unhandled webhook event");
        return Ok(Json(ack(&event, None)));
    }

    let product = resolve_event_product(&state, &event)?;

    if event.is_checkout_completed() {
        let purchase = CompletedPurchase {
            event_id: event.id.clone(),
            customer_id: event.customer_id().map(str::to_string),
            customer_email: event.customer_email().map(str::to_string),
            subscription_id: event.subscription_id().map(str::to_string),
            product: product.clone(),
        };

        state.webhook_handler.on_purchase_completed(purchase).await?;
    } else {
        let change = SubscriptionChange {
            event_id: event.id.clone(),
            event_type: event.event_type.clone(),
            subscription_id: event.subscription_id().map(str::to_string),
            customer_id: event.customer_id().map(str::to_string),
            status: event.status().map(str::to_string),
            product: product.clone(),
        };

        state.webhook_handler.on_subscription_changed(change).await?;
    }

    Ok(Json(ack(&event, Some(product.internal_id))))
}

/// Looks the event's product up exactly as Creem sent it. A product the
/// catalog does not know is never credited.
fn resolve_event_product<H: WebhookEventHandler>(
    state: &AppState<H>,
    event: &CreemEvent,
) -> Result<ProductRecord, PaymentError> {
    let product_id = event
        .product_id()
        .ok_or_else(|| PaymentError::InvalidPayload("event has no product id".to_string()))?;

    let product = state
        .catalog
        .read()
        .find_by_provider_id(Provider::Creem, product_id)
        .cloned();

    product.ok_or_else(|| {
        warn!(
            event_id = %event.id,
            %product_id,
            "Webhook references a product missing from the catalog"
        );
        PaymentError::UnknownProduct(product_id.to_string())
    })
}

fn ack(event: &CreemEvent, internal_id: Option<String>) -> WebhookAck {
    WebhookAck {
        success: true,
        provider: Provider::Creem,
        event_type: event.event_type.clone(),
        event_id: event.id.clone(),
        internal_id,
        timestamp: Utc::now().to_rfc3339(),
    }
}

// ---------------------------------------------------------------------------
// GET /api/webhooks/creem
// ---------------------------------------------------------------------------

/// Reports which Creem settings are present, never their values.
pub async fn get_creem_webhook_status<H: WebhookEventHandler>(
    State(state): State<Arc<AppState<H>>>,
) -> Json<WebhookStatusResponse> {
    let config = &state.config;
    let catalog = state.catalog.read().summary();

    Json(WebhookStatusResponse {
        endpoint: CREEM_WEBHOOK_PATH,
        provider: Provider::Creem,
        timestamp: Utc::now().to_rfc3339(),
        configuration: WebhookConfigStatus {
            has_api_key: config.creem_api_key.is_some(),
            has_api_url: config.creem_api_url.is_some(),
            has_webhook_secret: !config.creem_webhook_secret.expose_secret().is_empty(),
            api_url: config.creem_api_url.clone(),
            is_test_mode: config.is_test_mode(),
        },
        catalog,
        status: if config.is_ready() {
            "ready"
        } else {
            "configuration_incomplete"
        },
    })
}

// ---------------------------------------------------------------------------
// POST /payment/checkout/resolve
// ---------------------------------------------------------------------------

/// Turns a pricing-page selection into the id the provider's checkout
/// expects: the billable price for Stripe, the product for Creem.
#[instrument(skip_all)]
pub async fn resolve_checkout<H: WebhookEventHandler>(
    State(state): State<Arc<AppState<H>>>,
    Json(body): Json<ResolveCheckoutRequest>,
) -> Result<Json<ResolveCheckoutResponse>, PaymentError> {
    debug!(product = %body.product, provider = %body.provider, "Resolving checkout product");

    let provider: Provider = body.provider.parse()?;
    // An unrecognised cycle only steers legacy aliases, where it means monthly.
    let billing_cycle = body.billing_cycle.as_deref().and_then(|cycle| {
        cycle
            .parse::<BillingCycle>()
            .inspect_err(|_| debug!(%cycle, "Unrecognised billing cycle, treating as monthly"))
            .ok()
    });

    let kind = match provider {
        Provider::Stripe => IdKind::Price,
        Provider::Creem => IdKind::Product,
    };

    let catalog = state.catalog.read();

    let internal_id = catalog
        .resolve_legacy_alias(&body.product, billing_cycle)
        .ok_or_else(|| PaymentError::NotFound(format!("product '{}'", body.product)))?;

    let provider_id = catalog
        .resolve_provider_id(&internal_id, provider, Some(kind))
        .ok_or_else(|| {
            PaymentError::NotFound(format!("{provider} {kind} id for product '{internal_id}'"))
        })?
        .to_string();

    Ok(Json(ResolveCheckoutResponse {
        internal_id,
        provider,
        kind,
        provider_id,
    }))
}

// ---------------------------------------------------------------------------
// GET /payment/products?billing_cycle=yearly
// ---------------------------------------------------------------------------

/// Lists active products in table order.
pub async fn list_products<H: WebhookEventHandler>(
    State(state): State<Arc<AppState<H>>>,
    Query(params): Query<ProductListQuery>,
) -> Result<Json<Vec<ProductRecord>>, PaymentError> {
    let billing_cycle = params
        .billing_cycle
        .as_deref()
        .map(str::parse::<BillingCycle>)
        .transpose()?;

    let products = state
        .catalog
        .read()
        .list_by_billing_cycle(billing_cycle)
        .cloned()
        .collect();

    Ok(Json(products))
}

// ---------------------------------------------------------------------------
// PUT /payment/admin/products
// ---------------------------------------------------------------------------

/// Replaces the whole product table and returns its validation report.
#[instrument(skip_all, fields(body_len = body.len()))]
pub async fn replace_products<H: WebhookEventHandler>(
    State(state): State<Arc<AppState<H>>>,
    _admin: AdminAuth,
    body: String,
) -> Result<Json<ValidationReport>, PaymentError> {
    let report = {
        let mut catalog = state.catalog.write();
        catalog.replace_all_from_json(&body)?;
        catalog.validate()
    };

    if !report.is_valid {
        warn!(errors = ?report.errors, "Replaced product table has validation errors");
    }

    Ok(Json(report))
}
