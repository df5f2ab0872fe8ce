use std::sync::Arc;

use be_product_catalog::ProductCatalog;
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::config::PaymentConfig;
use crate::webhook::{LoggingWebhookHandler, WebhookEventHandler};

/// The catalog as shared between request handlers. Writers swap the table
/// under the write lock so readers never see half of a replacement.
pub type SharedCatalog = Arc<RwLock<ProductCatalog>>;

pub struct AppState<H: WebhookEventHandler = LoggingWebhookHandler> {
    pub config: PaymentConfig,
    pub catalog: SharedCatalog,
    pub webhook_handler: Arc<H>,
}

impl<H: WebhookEventHandler> AppState<H> {
    pub fn new(config: PaymentConfig, catalog: ProductCatalog, webhook_handler: H) -> Self {
        Self {
            config,
            catalog: Arc::new(RwLock::new(catalog)),
            webhook_handler: Arc::new(webhook_handler),
        }
    }
}

impl AppState {
    pub fn from_env() -> Result<Self, crate::error::PaymentError> {
        let config = PaymentConfig::from_env()?;

        let catalog = match &config.catalog_path {
            Some(path) => ProductCatalog::load(path)?,
            None => ProductCatalog::default(),
        };

        let report = catalog.validate();
        if report.is_valid {
            info!(
                products = catalog.products().len(),
                "Product catalog loaded"
            );
        } else {
            for error in &report.errors {
                warn!(%error, "Product catalog validation failed");
            }
        }

        Ok(Self::new(config, catalog, LoggingWebhookHandler))
    }
}
