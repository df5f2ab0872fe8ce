//! Product catalog
//!
//! Maps the products we sell between their internal ids, the ids each
//! payment provider assigns to them, and the legacy names older clients
//! still send. The catalog is a plain owned value: construct one, share it
//! however the host needs, and replace its table wholesale when the product
//! configuration changes.

mod catalog;
mod defaults;
mod error;
pub mod legacy;
pub mod report;
mod types;

pub use catalog::{CatalogSummary, ProductCatalog, ValidationReport};
pub use defaults::default_products;
pub use error::{CatalogError, Result};
pub use report::{PricingReport, ReportThresholds};
pub use types::{BillingCycle, IdKind, ProductRecord, Provider, ProviderRef};
