//! Product records and the enums used to address them.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::error::CatalogError;

/// Payment platforms a product can be sold through.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Provider {
    Stripe,
    Creem,
}

impl std::str::FromStr for Provider {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stripe" => Ok(Provider::Stripe),
            "creem" => Ok(Provider::Creem),
            _ => Err(CatalogError::UnknownProvider(s.to_string())),
        }
    }
}

/// Which of a provider's identifiers is being asked for.
///
/// Stripe keeps a catalog product and a separate billable price; Creem only
/// has the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IdKind {
    Product,
    Price,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BillingCycle {
    Monthly,
    Yearly,
    OneTime,
}

impl BillingCycle {
    /// Monthly and yearly records are subscription tiers, one-time records
    /// are credit packs.
    pub fn is_recurring(&self) -> bool {
        !matches!(self, BillingCycle::OneTime)
    }
}

impl std::str::FromStr for BillingCycle {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(BillingCycle::Monthly),
            "yearly" => Ok(BillingCycle::Yearly),
            "one_time" => Ok(BillingCycle::OneTime),
            _ => Err(CatalogError::UnknownBillingCycle(s.to_string())),
        }
    }
}

/// Identifiers one provider uses for a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_id: Option<String>,
}

impl ProviderRef {
    pub fn product(product_id: impl Into<String>) -> Self {
        Self {
            product_id: Some(product_id.into()),
            price_id: None,
        }
    }

    pub fn with_price(mut self, price_id: impl Into<String>) -> Self {
        self.price_id = Some(price_id.into());
        self
    }

    /// Empty strings count as unset.
    pub fn get(&self, kind: IdKind) -> Option<&str> {
        let id = match kind {
            IdKind::Product => self.product_id.as_deref(),
            IdKind::Price => self.price_id.as_deref(),
        };
        id.filter(|id| !id.is_empty())
    }

    /// Either sub-identifier resolves to the same product.
    pub fn matches(&self, id: &str) -> bool {
        self.get(IdKind::Product) == Some(id) || self.get(IdKind::Price) == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.get(IdKind::Product).is_none() && self.get(IdKind::Price).is_none()
    }
}

/// One sellable unit: a subscription tier or a credit pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub internal_id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub currency: String,
    pub credits: u64,
    pub billing_cycle: BillingCycle,
    #[serde(default)]
    pub provider_ids: BTreeMap<Provider, ProviderRef>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ProductRecord {
    pub fn provider_id(&self, provider: Provider, kind: IdKind) -> Option<&str> {
        self.provider_ids
            .get(&provider)
            .and_then(|ids| ids.get(kind))
    }

    pub fn has_provider(&self, provider: Provider) -> bool {
        self.provider_ids
            .get(&provider)
            .is_some_and(|ids| !ids.is_empty())
    }

    pub fn has_any_provider_id(&self) -> bool {
        self.provider_ids.values().any(|ids| !ids.is_empty())
    }

    pub(crate) fn matches_provider_id(&self, provider: Provider, id: &str) -> bool {
        self.provider_ids
            .get(&provider)
            .is_some_and(|ids| ids.matches(id))
    }
}
