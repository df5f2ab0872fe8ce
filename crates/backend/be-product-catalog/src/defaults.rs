use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::types::{BillingCycle, ProductRecord, Provider, ProviderRef};

struct Seed {
    internal_id: &'static str,
    display_name: &'static str,
    description: &'static str,
    price_cents: i64,
    credits: u64,
    billing_cycle: BillingCycle,
    stripe_product: &'static str,
    stripe_price: &'static str,
    creem_product: &'static str,
}

const SEEDS: &[Seed] = &[
    Seed {
        internal_id: "plus_monthly",
        display_name: "Plus Monthly Plan",
        description: "Plus plan billed monthly",
        price_cents: 990,
        credits: 1_900,
        billing_cycle: BillingCycle::Monthly,
        stripe_product: "prod_stripe_plus_monthly",
        stripe_price: "price_stripe_plus_monthly",
        creem_product: "prod_426VrOFIOZc6kZQukh6zj2",
    },
    Seed {
        internal_id: "plus_yearly",
        display_name: "Plus Yearly Plan",
        description: "Plus plan billed yearly",
        price_cents: 9_900,
        credits: 24_000,
        billing_cycle: BillingCycle::Yearly,
        stripe_product: "prod_stripe_plus_yearly",
        stripe_price: "price_stripe_plus_yearly",
        creem_product: "prod_1xe5segJqwLX9PMP1sPcyY",
    },
    Seed {
        internal_id: "pro_monthly",
        display_name: "Pro Monthly Plan",
        description: "Pro plan billed monthly",
        price_cents: 2_990,
        credits: 8_900,
        billing_cycle: BillingCycle::Monthly,
        stripe_product: "prod_stripe_pro_monthly",
        stripe_price: "price_stripe_pro_monthly",
        creem_product: "prod_1tSOKzqdhjeeOqSXNmbYze",
    },
    Seed {
        internal_id: "pro_yearly",
        display_name: "Pro Yearly Plan",
        description: "Pro plan billed yearly",
        price_cents: 29_900,
        credits: 120_000,
        billing_cycle: BillingCycle::Yearly,
        stripe_product: "prod_stripe_pro_yearly",
        stripe_price: "price_stripe_pro_yearly",
        creem_product: "prod_2qQ9ZPFWfO4l48zUIh1ads",
    },
    Seed {
        internal_id: "starter_pack",
        display_name: "Starter Credit Pack",
        description: "Starter credit pack for occasional use",
        price_cents: 490,
        credits: 600,
        billing_cycle: BillingCycle::OneTime,
        stripe_product: "prod_stripe_starter",
        stripe_price: "price_stripe_starter",
        creem_product: "prod_vqppA0sC44rrhwN5bXWsO",
    },
    Seed {
        internal_id: "creator_pack",
        display_name: "Creator Credit Pack",
        description: "Creator credit pack for professionals",
        price_cents: 1_500,
        credits: 4_000,
        billing_cycle: BillingCycle::OneTime,
        stripe_product: "prod_stripe_creator",
        stripe_price: "price_stripe_creator",
        creem_product: "prod_4snxLt65rTm7hhSwAcMrFS",
    },
    Seed {
        internal_id: "business_pack",
        display_name: "Business Credit Pack",
        description: "Business credit pack for heavy users",
        price_cents: 6_000,
        credits: 18_000,
        billing_cycle: BillingCycle::OneTime,
        stripe_product: "prod_stripe_business",
        stripe_price: "price_stripe_business",
        creem_product: "prod_5jWrmjopK5t302oQZo8y2B",
    },
];

/// The built-in product table used when no table is loaded from disk.
pub fn default_products() -> Vec<ProductRecord> {
    SEEDS
        .iter()
        .map(|seed| ProductRecord {
            internal_id: seed.internal_id.to_string(),
            display_name: seed.display_name.to_string(),
            description: seed.description.to_string(),
            price: Decimal::new(seed.price_cents, 2),
            currency: "USD".to_string(),
            credits: seed.credits,
            billing_cycle: seed.billing_cycle,
            provider_ids: BTreeMap::from([
                (
                    Provider::Stripe,
                    ProviderRef::product(seed.stripe_product).with_price(seed.stripe_price),
                ),
                (Provider::Creem, ProviderRef::product(seed.creem_product)),
            ]),
            is_active: true,
        })
        .collect()
}
