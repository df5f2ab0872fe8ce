//! Pricing consistency report.
//!
//! Unlike [`ProductCatalog::validate`], which only enforces hard rules, the
//! report also applies pricing heuristics whose thresholds are supplied by
//! the caller.

use std::ops::RangeInclusive;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    ProductCatalog,
    types::{BillingCycle, IdKind, ProductRecord, Provider},
};

#[derive(Debug, Clone)]
pub struct ReportThresholds {
    /// Minimum saving of a yearly plan over twelve monthly payments, in
    /// percent.
    pub min_annual_discount_percent: Decimal,
    /// Acceptable credits granted per unit of currency for credit packs.
    pub credits_per_unit: RangeInclusive<Decimal>,
}

impl Default for ReportThresholds {
    fn default() -> Self {
        Self {
            min_annual_discount_percent: Decimal::from(10),
            credits_per_unit: Decimal::from(50)..=Decimal::from(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanLine {
    pub tier: String,
    pub monthly_price: Decimal,
    pub yearly_price: Decimal,
    pub annual_discount_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackLine {
    pub internal_id: String,
    pub price: Decimal,
    pub credits: u64,
    pub credits_per_unit: Decimal,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PricingReport {
    pub plans: Vec<PlanLine>,
    pub packs: Vec<PackLine>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl PricingReport {
    pub fn build(catalog: &ProductCatalog, thresholds: &ReportThresholds) -> Self {
        let mut report = PricingReport {
            errors: catalog.validate().errors,
            ..Default::default()
        };

        report.check_plans(catalog, thresholds);
        report.check_packs(catalog, thresholds);
        report.check_creem_id_format(catalog);

        report
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn check_plans(&mut self, catalog: &ProductCatalog, thresholds: &ReportThresholds) {
        let mut tiers: Vec<&str> = Vec::new();
        for product in catalog.list_by_billing_cycle(None) {
            if let Some((tier, _)) = split_tier(product)
                && !tiers.contains(&tier)
            {
                tiers.push(tier);
            }
        }

        for tier in tiers {
            let monthly = find_variant(catalog, tier, BillingCycle::Monthly);
            let yearly = find_variant(catalog, tier, BillingCycle::Yearly);

            let (monthly, yearly) = match (monthly, yearly) {
                (Some(m), Some(y)) => (m, y),
                (None, _) => {
                    self.errors
                        .push(format!("subscription tier {tier} has no monthly variant"));
                    continue;
                }
                (_, None) => {
                    self.errors
                        .push(format!("subscription tier {tier} has no yearly variant"));
                    continue;
                }
            };

            // Non-positive prices are already validation errors.
            if monthly.price <= Decimal::ZERO {
                continue;
            }
            let Some(discount) = annual_discount_percent(monthly.price, yearly.price) else {
                self.errors.push(format!(
                    "subscription tier {tier} prices are out of range for the discount check"
                ));
                continue;
            };

            if discount < thresholds.min_annual_discount_percent {
                self.warnings.push(format!(
                    "subscription tier {tier} yearly discount is only {discount}%"
                ));
            }

            self.plans.push(PlanLine {
                tier: tier.to_string(),
                monthly_price: monthly.price,
                yearly_price: yearly.price,
                annual_discount_percent: discount,
            });
        }
    }

    fn check_packs(&mut self, catalog: &ProductCatalog, thresholds: &ReportThresholds) {
        for pack in catalog.list_by_billing_cycle(Some(BillingCycle::OneTime)) {
            let Some(per_unit) = Decimal::from(pack.credits).checked_div(pack.price) else {
                continue;
            };
            let per_unit = per_unit.round_dp(2);

            if !thresholds.credits_per_unit.contains(&per_unit) {
                self.warnings.push(format!(
                    "credit pack {} grants an unusual {per_unit} credits per {}",
                    pack.internal_id, pack.currency
                ));
            }

            self.packs.push(PackLine {
                internal_id: pack.internal_id.clone(),
                price: pack.price,
                credits: pack.credits,
                credits_per_unit: per_unit,
            });
        }
    }

    fn check_creem_id_format(&mut self, catalog: &ProductCatalog) {
        for product in catalog.list_by_billing_cycle(None) {
            if let Some(id) = product.provider_id(Provider::Creem, IdKind::Product)
                && !id.contains('_')
            {
                self.warnings.push(format!(
                    "product {} has a Creem id that looks like an internal id: {id}",
                    product.internal_id
                ));
            }
        }
    }
}

/// Saving of `yearly` over twelve `monthly` payments, in percent. `None` when
/// the arithmetic overflows.
fn annual_discount_percent(monthly: Decimal, yearly: Decimal) -> Option<Decimal> {
    let monthly_total = monthly.checked_mul(Decimal::from(12))?;
    let ratio = monthly_total.checked_sub(yearly)?.checked_div(monthly_total)?;
    Some(ratio.checked_mul(Decimal::from(100))?.round_dp(1))
}

/// `plus_monthly` -> `("plus", Monthly)`.
fn split_tier(product: &ProductRecord) -> Option<(&str, BillingCycle)> {
    let suffix = match product.billing_cycle {
        BillingCycle::Monthly => "_monthly",
        BillingCycle::Yearly => "_yearly",
        BillingCycle::OneTime => return None,
    };
    product
        .internal_id
        .strip_suffix(suffix)
        .map(|tier| (tier, product.billing_cycle))
}

fn find_variant<'a>(
    catalog: &'a ProductCatalog,
    tier: &str,
    cycle: BillingCycle,
) -> Option<&'a ProductRecord> {
    catalog
        .list_by_billing_cycle(Some(cycle))
        .find(|p| split_tier(p).is_some_and(|(t, _)| t == tier))
}
