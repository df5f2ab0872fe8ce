use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use be_product_catalog::CatalogError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Webhook signature verification failed")]
    WebhookSignatureInvalid,

    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            PaymentError::Catalog(CatalogError::Read { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            PaymentError::Catalog(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            PaymentError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            PaymentError::WebhookSignatureInvalid | PaymentError::InvalidPayload(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            PaymentError::UnknownProduct(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            PaymentError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            PaymentError::Config(_) | PaymentError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(%status, error = %self, "Payment service error");
        } else {
            tracing::warn!(%status, error = %self, "Payment request rejected");
        }

        (status, axum::Json(ErrorBody { error: message })).into_response()
    }
}
