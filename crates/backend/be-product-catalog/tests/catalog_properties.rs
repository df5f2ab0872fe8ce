use std::io::Write;

use be_product_catalog::{
    BillingCycle, CatalogError, IdKind, ProductCatalog, ProductRecord, Provider, ProviderRef,
    default_products,
};
use rust_decimal::Decimal;

fn pack(internal_id: &str, creem_id: &str) -> ProductRecord {
    ProductRecord {
        internal_id: internal_id.to_string(),
        display_name: internal_id.to_string(),
        description: String::new(),
        price: Decimal::new(1000, 2),
        currency: "USD".to_string(),
        credits: 1000,
        billing_cycle: BillingCycle::OneTime,
        provider_ids: [(Provider::Creem, ProviderRef::product(creem_id))].into(),
        is_active: true,
    }
}

#[test]
fn every_active_record_is_found_by_internal_id() {
    let catalog = ProductCatalog::default();
    for product in catalog.products() {
        assert_eq!(catalog.find_by_internal_id(&product.internal_id), Some(product));
    }
}

#[test]
fn every_configured_provider_id_finds_its_record() {
    let catalog = ProductCatalog::default();
    for product in catalog.products() {
        for (provider, ids) in &product.provider_ids {
            for kind in [IdKind::Product, IdKind::Price] {
                if let Some(id) = ids.get(kind) {
                    assert_eq!(catalog.find_by_provider_id(*provider, id), Some(product));
                }
            }
        }
    }
}

#[test]
fn unknown_ids_are_absent_not_errors() {
    let catalog = ProductCatalog::default();
    assert!(catalog.find_by_internal_id("enterprise_yearly").is_none());
    assert!(catalog.find_by_internal_id("PLUS_MONTHLY").is_none());
    assert!(catalog.find_by_provider_id(Provider::Creem, "prod_sandbox_only").is_none());
    assert!(catalog.find_by_provider_id(Provider::Stripe, "").is_none());
    assert!(catalog.resolve_provider_id("nope", Provider::Creem, None).is_none());
    assert!(catalog.resolve_legacy_alias("nope", None).is_none());
}

#[test]
fn unrecognized_provider_name_fails_fast() {
    match "lemonsqueezy".parse::<Provider>() {
        Err(CatalogError::UnknownProvider(name)) => assert_eq!(name, "lemonsqueezy"),
        other => panic!("expected UnknownProvider, got {other:?}"),
    }
}

#[test]
fn legacy_plus_alias_follows_billing_cycle() {
    let catalog = ProductCatalog::default();
    assert_eq!(
        catalog.resolve_legacy_alias("plus", Some(BillingCycle::Yearly)).as_deref(),
        Some("plus_yearly")
    );
    assert_eq!(
        catalog.resolve_legacy_alias("plus", Some(BillingCycle::Monthly)).as_deref(),
        Some("plus_monthly")
    );
    assert_eq!(
        catalog.resolve_legacy_alias("plus", None).as_deref(),
        Some("plus_monthly")
    );
    assert_eq!(
        catalog.resolve_legacy_alias("starter", None).as_deref(),
        Some("starter_pack")
    );
}

#[test]
fn live_internal_id_wins_over_legacy_alias() {
    let catalog = ProductCatalog::new(vec![pack("plus", "prod_plus_special")]);
    assert_eq!(
        catalog.resolve_legacy_alias("plus", Some(BillingCycle::Yearly)).as_deref(),
        Some("plus")
    );
}

#[test]
fn creem_id_wins_over_legacy_alias() {
    let catalog = ProductCatalog::new(vec![pack("founders_pack", "starter")]);
    assert_eq!(
        catalog.resolve_legacy_alias("starter", None).as_deref(),
        Some("founders_pack")
    );
}

#[test]
fn creem_id_resolves_to_internal_id() {
    let catalog = ProductCatalog::default();
    assert_eq!(
        catalog.resolve_legacy_alias("prod_1xe5segJqwLX9PMP1sPcyY", None).as_deref(),
        Some("plus_yearly")
    );
}

#[test]
fn zero_price_fails_validation_naming_the_record() {
    let mut products = default_products();
    products[2].price = Decimal::ZERO;
    let report = ProductCatalog::new(products).validate();

    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("pro_monthly"));
}

#[test]
fn replace_all_discards_previous_table() {
    let mut catalog = ProductCatalog::default();
    let previous: Vec<ProductRecord> = catalog.products().to_vec();

    catalog.replace_all(Vec::new());

    for product in &previous {
        assert!(catalog.find_by_internal_id(&product.internal_id).is_none());
        for (provider, ids) in &product.provider_ids {
            if let Some(id) = ids.get(IdKind::Product) {
                assert!(catalog.find_by_provider_id(*provider, id).is_none());
            }
        }
    }
    assert_eq!(catalog.list_by_billing_cycle(None).count(), 0);
}

#[test]
fn one_time_listing_keeps_table_order_and_skips_inactive() {
    let mut products = default_products();
    products[5].is_active = false;
    let catalog = ProductCatalog::new(products);

    let ids: Vec<&str> = catalog
        .list_by_billing_cycle(Some(BillingCycle::OneTime))
        .map(|p| p.internal_id.as_str())
        .collect();
    assert_eq!(ids, ["starter_pack", "business_pack"]);

    let listing = catalog.list_by_billing_cycle(None);
    assert_eq!(listing.clone().count(), 6);
    assert_eq!(
        listing.map(|p| p.internal_id.as_str()).next(),
        Some("plus_monthly")
    );
}

#[test]
fn catalogs_are_independent() {
    let mut first = ProductCatalog::default();
    let second = ProductCatalog::default();

    first.replace_all(vec![pack("solo_pack", "prod_solo")]);

    assert!(first.find_by_internal_id("plus_monthly").is_none());
    assert!(second.find_by_internal_id("plus_monthly").is_some());
}

#[test]
fn load_reads_a_table_from_disk() {
    let table = serde_json::to_string(&vec![pack("file_pack", "prod_file")]).unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(table.as_bytes()).unwrap();

    let catalog = ProductCatalog::load(file.path()).unwrap();
    assert_eq!(
        catalog.resolve_provider_id("file_pack", Provider::Creem, None),
        Some("prod_file")
    );
}

#[test]
fn load_reports_the_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");

    match ProductCatalog::load(&path) {
        Err(CatalogError::Read { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Read error, got {other:?}"),
    }
}
