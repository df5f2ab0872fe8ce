use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown payment provider: {0}")]
    UnknownProvider(String),

    #[error("unknown billing cycle: {0}")]
    UnknownBillingCycle(String),

    #[error("invalid product table: {0}")]
    InvalidTable(String),

    #[error("failed to parse product table")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read product table from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
