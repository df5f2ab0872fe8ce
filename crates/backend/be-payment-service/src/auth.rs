use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};

use crate::error::PaymentError;
use crate::service::AppState;
use crate::webhook::WebhookEventHandler;

/// Proof that the request carried the configured admin bearer token.
pub struct AdminAuth;

impl<H: WebhookEventHandler> FromRequestParts<Arc<AppState<H>>> for AdminAuth {
    type Rejection = PaymentError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<H>>,
    ) -> Result<Self, Self::Rejection> {
        let expected = state.config.admin_token.as_ref().ok_or_else(|| {
            PaymentError::Unauthorized("Catalog administration is disabled".to_string())
        })?;

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                PaymentError::Unauthorized("Missing authorization header".to_string())
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            PaymentError::Unauthorized(
                "Authorization header must start with 'Bearer '".to_string(),
            )
        })?;

        // Digest comparison: timing must not leak the matching prefix.
        if Sha256::digest(token.as_bytes()) != Sha256::digest(expected.expose_secret().as_bytes())
        {
            return Err(PaymentError::Unauthorized("Invalid admin token".to_string()));
        }

        Ok(AdminAuth)
    }
}
