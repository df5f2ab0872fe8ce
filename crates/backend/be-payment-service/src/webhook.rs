use be_product_catalog::ProductRecord;

use crate::error::PaymentError;

/// A completed Creem checkout whose product was found in the catalog.
#[derive(Debug, Clone)]
pub struct CompletedPurchase {
    pub event_id: String,
    pub product: ProductRecord,
    pub customer_id: Option<String>,
    pub customer_email: Option<String>,
    pub subscription_id: Option<String>,
}

/// A subscription lifecycle event for a known product.
#[derive(Debug, Clone)]
pub struct SubscriptionChange {
    pub event_id: String,
    pub event_type: String,
    pub product: ProductRecord,
    pub subscription_id: Option<String>,
    pub customer_id: Option<String>,
    pub status: Option<String>,
}

/// Events dispatched by the webhook handler once a provider notification has
/// been verified and its product resolved.
///
/// Implement this trait to wire up crediting (grant credits, record the
/// subscription, etc). Unknown products never reach it.
#[allow(unused_variables)]
pub trait WebhookEventHandler: Send + Sync + 'static {
    /// The customer has paid. `purchase.product.credits` is what they bought.
    fn on_purchase_completed(
        &self,
        purchase: CompletedPurchase,
    ) -> impl std::future::Future<Output = Result<(), PaymentError>> + Send {
        async { Ok(()) }
    }

    /// A subscription was created, renewed, changed or cancelled.
    fn on_subscription_changed(
        &self,
        change: SubscriptionChange,
    ) -> impl std::future::Future<Output = Result<(), PaymentError>> + Send {
        async { Ok(()) }
    }
}

/// Default handler that logs webhook events without taking any action.
pub struct LoggingWebhookHandler;

impl WebhookEventHandler for LoggingWebhookHandler {
    async fn on_purchase_completed(&self, purchase: CompletedPurchase) -> Result<(), PaymentError> {
        tracing::info!(
            event_id = %purchase.event_id,
            internal_id = %purchase.product.internal_id,
            credits = purchase.product.credits,
            customer_id = ?purchase.customer_id,
            "Purchase completed (no-op handler)"
        );
        Ok(())
    }

    async fn on_subscription_changed(&self, change: SubscriptionChange) -> Result<(), PaymentError> {
        tracing::info!(
            event_id = %change.event_id,
            event_type = %change.event_type,
            internal_id = %change.product.internal_id,
            subscription_id = ?change.subscription_id,
            status = ?change.status,
            "Subscription changed (no-op handler)"
        );
        Ok(())
    }
}
