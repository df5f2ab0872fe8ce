use be_product_catalog::{CatalogSummary, IdKind, Provider};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope of a Creem webhook delivery.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreemEvent {
    pub id: String,
    pub event_type: String,
    #[serde(default)]
    pub object: Value,
}

impl CreemEvent {
    pub fn is_checkout_completed(&self) -> bool {
        self.event_type == "checkout.completed"
    }

    pub fn is_subscription_event(&self) -> bool {
        self.event_type.starts_with("subscription.")
    }

    /// The Creem product id, from `object.product` or `object.order.product`.
    /// Either may be a bare id or an expanded object.
    pub fn product_id(&self) -> Option<&str> {
        id_of(&self.object["product"]).or_else(|| id_of(&self.object["order"]["product"]))
    }

    pub fn customer_id(&self) -> Option<&str> {
        id_of(&self.object["customer"])
    }

    pub fn customer_email(&self) -> Option<&str> {
        self.object["customer"]["email"].as_str()
    }

    /// Subscription events carry the subscription itself as `object`;
    /// checkouts reference it.
    pub fn subscription_id(&self) -> Option<&str> {
        if self.is_subscription_event() {
            self.object["id"].as_str()
        } else {
            id_of(&self.object["subscription"])
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.object["status"].as_str()
    }
}

fn id_of(value: &Value) -> Option<&str> {
    value
        .as_str()
        .or_else(|| value["id"].as_str())
        .filter(|id| !id.is_empty())
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub success: bool,
    pub provider: Provider,
    pub event_type: String,
    pub event_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookConfigStatus {
    pub has_api_key: bool,
    pub has_api_url: bool,
    pub has_webhook_secret: bool,
    pub api_url: Option<String>,
    pub is_test_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct WebhookStatusResponse {
    pub endpoint: &'static str,
    pub provider: Provider,
    pub timestamp: String,
    pub configuration: WebhookConfigStatus,
    pub catalog: CatalogSummary,
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ResolveCheckoutRequest {
    /// Internal id, Creem product id, or legacy alias.
    pub product: String,
    pub provider: String,
    #[serde(default)]
    pub billing_cycle: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolveCheckoutResponse {
    pub internal_id: String,
    pub provider: Provider,
    pub kind: IdKind,
    pub provider_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub billing_cycle: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(json: Value) -> CreemEvent {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn product_id_from_expanded_product() {
        let e = event(serde_json::json!({
            "id": "evt_1",
            "eventType": "checkout.completed",
            "object": {
                "product": { "id": "prod_abc", "name": "Plus" },
                "customer": { "id": "cust_1", "email": "a@example.com" },
                "subscription": "sub_1"
            }
        }));
        assert!(e.is_checkout_completed());
        assert_eq!(e.product_id(), Some("prod_abc"));
        assert_eq!(e.customer_id(), Some("cust_1"));
        assert_eq!(e.customer_email(), Some("a@example.com"));
        assert_eq!(e.subscription_id(), Some("sub_1"));
    }

    #[test]
    fn product_id_from_order() {
        let e = event(serde_json::json!({
            "id": "evt_2",
            "eventType": "checkout.completed",
            "object": { "order": { "product": "prod_from_order" } }
        }));
        assert_eq!(e.product_id(), Some("prod_from_order"));
        assert_eq!(e.customer_id(), None);
    }

    #[test]
    fn subscription_event_uses_object_id() {
        let e = event(serde_json::json!({
            "id": "evt_3",
            "eventType": "subscription.canceled",
            "object": { "id": "sub_9", "product": "prod_x", "status": "canceled" }
        }));
        assert!(e.is_subscription_event());
        assert_eq!(e.subscription_id(), Some("sub_9"));
        assert_eq!(e.status(), Some("canceled"));
    }

    #[test]
    fn missing_object_yields_nothing() {
        let e = event(serde_json::json!({ "id": "evt_4", "eventType": "refund.created" }));
        assert_eq!(e.product_id(), None);
        assert_eq!(e.subscription_id(), None);
    }
}
