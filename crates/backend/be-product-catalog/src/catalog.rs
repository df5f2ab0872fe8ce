use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    defaults::default_products,
    error::{CatalogError, Result},
    legacy,
    types::{BillingCycle, IdKind, ProductRecord, Provider},
};

/// Outcome of [`ProductCatalog::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Counts over the active records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub total: usize,
    pub stripe_products: usize,
    pub creem_products: usize,
    pub subscription_products: usize,
    pub credit_pack_products: usize,
}

/// In-memory product table addressable by internal id, provider id, or
/// legacy alias.
///
/// Records with `is_active = false` stay in the table but are invisible to
/// every lookup. The table is only ever replaced as a whole.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    products: Vec<ProductRecord>,
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::new(default_products())
    }
}

impl ProductCatalog {
    pub fn new(products: Vec<ProductRecord>) -> Self {
        Self { products }
    }

    /// Parses a catalog from a JSON array of product records.
    pub fn from_json(json: &str) -> Result<Self> {
        parse_table(json).map(Self::new)
    }

    /// Reads a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        debug!(
            path = %path.display(),
            products = catalog.products.len(),
            "Loaded product table"
        );
        Ok(catalog)
    }

    /// Every record in table order, inactive ones included.
    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    fn active(&self) -> impl Iterator<Item = &ProductRecord> {
        self.products.iter().filter(|p| p.is_active)
    }

    pub fn find_by_internal_id(&self, internal_id: &str) -> Option<&ProductRecord> {
        self.active().find(|p| p.internal_id == internal_id)
    }

    /// Matches against both the product and the price identifier of
    /// `provider`.
    pub fn find_by_provider_id(
        &self,
        provider: Provider,
        provider_product_id: &str,
    ) -> Option<&ProductRecord> {
        self.active()
            .find(|p| p.matches_provider_id(provider, provider_product_id))
    }

    /// Returns the provider identifier for an internal product. Without a
    /// `kind` the product identifier is returned.
    pub fn resolve_provider_id(
        &self,
        internal_id: &str,
        provider: Provider,
        kind: Option<IdKind>,
    ) -> Option<&str> {
        self.find_by_internal_id(internal_id)?
            .provider_id(provider, kind.unwrap_or(IdKind::Product))
    }

    /// The Stripe price id, which is what subscription checkouts bill against.
    pub fn resolve_stripe_price_id(&self, internal_id: &str) -> Option<&str> {
        self.resolve_provider_id(internal_id, Provider::Stripe, Some(IdKind::Price))
    }

    pub fn list_by_billing_cycle(
        &self,
        billing_cycle: Option<BillingCycle>,
    ) -> impl Iterator<Item = &ProductRecord> + Clone {
        self.products
            .iter()
            .filter(move |p| p.is_active && billing_cycle.is_none_or(|c| p.billing_cycle == c))
    }

    /// Turns whatever a client sent as a product reference into an internal
    /// id.
    ///
    /// Live internal ids are tried first, then Creem product ids, and only
    /// then the legacy alias table, so an old alias can never shadow an id
    /// that is currently valid.
    pub fn resolve_legacy_alias(
        &self,
        alias_or_id: &str,
        billing_cycle: Option<BillingCycle>,
    ) -> Option<String> {
        if let Some(product) = self.find_by_internal_id(alias_or_id) {
            return Some(product.internal_id.clone());
        }

        if let Some(product) = self.find_by_provider_id(Provider::Creem, alias_or_id) {
            return Some(product.internal_id.clone());
        }

        legacy::lookup(alias_or_id, billing_cycle).map(str::to_string)
    }

    /// Swaps out the whole table. Nothing from the previous table survives
    /// and nothing is validated.
    pub fn replace_all(&mut self, products: Vec<ProductRecord>) {
        info!(products = products.len(), "Product table replaced");
        self.products = products;
    }

    /// Replaces the table from a JSON document, which must be an array of
    /// product records. The current table is left untouched on error.
    pub fn replace_all_from_json(&mut self, json: &str) -> Result<()> {
        let products = parse_table(json)?;
        self.replace_all(products);
        Ok(())
    }

    /// Checks every record, active or not, and collects one message per
    /// broken rule.
    pub fn validate(&self) -> ValidationReport {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for product in &self.products {
            let label = if product.internal_id.is_empty() {
                errors.push(format!(
                    "product '{}' is missing an internal_id",
                    product.display_name
                ));
                format!("'{}'", product.display_name)
            } else {
                product.internal_id.clone()
            };

            if !product.has_any_provider_id() {
                errors.push(format!("product {label} has no payment provider id configured"));
            }

            if product.price <= Decimal::ZERO {
                errors.push(format!(
                    "product {label} must have a price greater than 0, got {}",
                    product.price
                ));
            }

            if product.credits == 0 {
                errors.push(format!("product {label} must grant at least one credit"));
            }

            if product.is_active
                && !product.internal_id.is_empty()
                && !seen.insert(product.internal_id.as_str())
            {
                errors.push(format!(
                    "internal_id {} is used by more than one active product",
                    product.internal_id
                ));
            }
        }

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn summary(&self) -> CatalogSummary {
        let mut summary = CatalogSummary::default();

        for product in self.active() {
            summary.total += 1;
            if product.has_provider(Provider::Stripe) {
                summary.stripe_products += 1;
            }
            if product.has_provider(Provider::Creem) {
                summary.creem_products += 1;
            }
            if product.billing_cycle.is_recurring() {
                summary.subscription_products += 1;
            } else {
                summary.credit_pack_products += 1;
            }
        }

        summary
    }
}

fn parse_table(json: &str) -> Result<Vec<ProductRecord>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_array() {
        return Err(CatalogError::InvalidTable(format!(
            "expected an array of products, found {}",
            json_kind(&value)
        )));
    }
    Ok(serde_json::from_value(value)?)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::types::ProviderRef;

    fn record(internal_id: &str, cycle: BillingCycle) -> ProductRecord {
        ProductRecord {
            internal_id: internal_id.to_string(),
            display_name: internal_id.to_string(),
            description: String::new(),
            price: Decimal::new(500, 2),
            currency: "USD".to_string(),
            credits: 500,
            billing_cycle: cycle,
            provider_ids: BTreeMap::from([(
                Provider::Creem,
                ProviderRef::product(format!("prod_{internal_id}")),
            )]),
            is_active: true,
        }
    }

    #[test]
    fn default_catalog_is_valid() {
        let report = ProductCatalog::default().validate();
        assert!(report.is_valid, "{:?}", report.errors);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn stripe_price_id_is_distinct_from_product_id() {
        let catalog = ProductCatalog::default();
        assert_eq!(
            catalog.resolve_provider_id("pro_yearly", Provider::Stripe, None),
            Some("prod_stripe_pro_yearly")
        );
        assert_eq!(
            catalog.resolve_stripe_price_id("pro_yearly"),
            Some("price_stripe_pro_yearly")
        );
        assert_eq!(
            catalog.resolve_provider_id("pro_yearly", Provider::Creem, Some(IdKind::Price)),
            None
        );
    }

    #[test]
    fn stripe_price_and_product_ids_resolve_to_the_same_record() {
        let catalog = ProductCatalog::default();
        let by_product = catalog.find_by_provider_id(Provider::Stripe, "prod_stripe_starter");
        let by_price = catalog.find_by_provider_id(Provider::Stripe, "price_stripe_starter");
        assert_eq!(by_product.map(|p| &p.internal_id), Some(&"starter_pack".to_string()));
        assert_eq!(by_product, by_price);
    }

    #[test]
    fn provider_ids_are_not_shared_across_providers() {
        let catalog = ProductCatalog::default();
        assert!(
            catalog
                .find_by_provider_id(Provider::Stripe, "prod_vqppA0sC44rrhwN5bXWsO")
                .is_none()
        );
    }

    #[test]
    fn inactive_records_are_hidden_but_kept() {
        let mut inactive = record("legacy_pack", BillingCycle::OneTime);
        inactive.is_active = false;
        let catalog = ProductCatalog::new(vec![inactive]);

        assert!(catalog.find_by_internal_id("legacy_pack").is_none());
        assert!(
            catalog
                .find_by_provider_id(Provider::Creem, "prod_legacy_pack")
                .is_none()
        );
        assert_eq!(catalog.list_by_billing_cycle(None).count(), 0);
        assert_eq!(catalog.products().len(), 1);
    }

    #[test]
    fn validate_scans_inactive_records() {
        let mut inactive = record("next_pack", BillingCycle::OneTime);
        inactive.is_active = false;
        inactive.price = Decimal::ZERO;
        let report = ProductCatalog::new(vec![inactive]).validate();

        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("next_pack"));
    }

    #[test]
    fn validate_reports_every_broken_rule() {
        let mut unnamed = record("", BillingCycle::Monthly);
        unnamed.display_name = "Mystery Plan".to_string();
        let mut unsellable = record("orphan", BillingCycle::Monthly);
        unsellable.provider_ids.clear();
        let mut free = record("free_pack", BillingCycle::OneTime);
        free.credits = 0;

        let report = ProductCatalog::new(vec![unnamed, unsellable, free]).validate();

        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 3);
        assert!(report.errors[0].contains("Mystery Plan"));
        assert!(report.errors[1].contains("orphan"));
        assert!(report.errors[2].contains("free_pack"));
    }

    #[test]
    fn record_without_internal_id_is_named_by_display_name() {
        let mut unnamed = record("", BillingCycle::OneTime);
        unnamed.display_name = "Mystery Pack".to_string();
        unnamed.provider_ids.clear();
        unnamed.price = Decimal::ZERO;

        let report = ProductCatalog::new(vec![unnamed]).validate();

        assert_eq!(
            report.errors,
            vec![
                "product 'Mystery Pack' is missing an internal_id",
                "product 'Mystery Pack' has no payment provider id configured",
                "product 'Mystery Pack' must have a price greater than 0, got 0",
            ]
        );
    }

    #[test]
    fn validate_flags_duplicate_active_ids_only() {
        let mut retired = record("plus_monthly", BillingCycle::Monthly);
        retired.is_active = false;
        let catalog = ProductCatalog::new(vec![
            record("plus_monthly", BillingCycle::Monthly),
            retired,
        ]);
        assert!(catalog.validate().is_valid);

        let catalog = ProductCatalog::new(vec![
            record("plus_monthly", BillingCycle::Monthly),
            record("plus_monthly", BillingCycle::Monthly),
        ]);
        let report = catalog.validate();
        assert!(!report.is_valid);
        assert!(report.errors[0].contains("more than one active product"));
    }

    #[test]
    fn replace_from_json_rejects_non_arrays() {
        let mut catalog = ProductCatalog::default();
        let err = catalog
            .replace_all_from_json(r#"{"internal_id": "plus_monthly"}"#)
            .unwrap_err();

        assert!(matches!(err, CatalogError::InvalidTable(_)));
        assert!(err.to_string().contains("found an object"));
        assert!(catalog.find_by_internal_id("plus_monthly").is_some());
    }

    #[test]
    fn replace_from_json_rejects_malformed_records() {
        let mut catalog = ProductCatalog::default();
        let err = catalog
            .replace_all_from_json(r#"[{"internal_id": "x"}]"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
        assert_eq!(catalog.products().len(), 7);
    }

    #[test]
    fn summary_counts_active_records() {
        let mut catalog = ProductCatalog::default();
        assert_eq!(
            catalog.summary(),
            CatalogSummary {
                total: 7,
                stripe_products: 7,
                creem_products: 7,
                subscription_products: 4,
                credit_pack_products: 3,
            }
        );

        let mut hidden = record("hidden", BillingCycle::Monthly);
        hidden.is_active = false;
        catalog.replace_all(vec![record("solo_pack", BillingCycle::OneTime), hidden]);
        let summary = catalog.summary();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.stripe_products, 0);
        assert_eq!(summary.creem_products, 1);
        assert_eq!(summary.credit_pack_products, 1);
    }
}
