use std::net::SocketAddr;

use axum::Router;
use be_payment_service::init_payment_service;

/// Configuration for running the monolith server.
pub struct ServerConfig {
    pub http_addr: SocketAddr,
    /// When this receiver gets a value, the server shuts down gracefully.
    pub shutdown: tokio::sync::watch::Receiver<()>,
}

/// Merges the service routers with the health check route.
pub fn build_router(payment_router: Router) -> Router {
    let health_route = Router::new().route(
        "/health",
        axum::routing::get(|| async { axum::http::StatusCode::OK }),
    );

    payment_router.merge(health_route)
}

pub async fn run_server(
    config: ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let payment_router = match init_payment_service() {
        Ok(router) => router,
        Err(e) => {
            tracing::error!("Failed to initialize payment service: {:#}", e);
            return Err(e.into());
        }
    };

    tracing::info!("Starting HTTP server at {}", config.http_addr);

    let mut http_shutdown = config.shutdown.clone();
    let http_listener = tokio::net::TcpListener::bind(config.http_addr).await?;
    let result = axum::serve(
        http_listener,
        build_router(payment_router).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let _ = http_shutdown.changed().await;
        tracing::info!("Shutting down HTTP server...");
    })
    .await;

    if let Err(e) = result {
        tracing::error!("HTTP server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn health_check_answers_ok() {
        let response = build_router(Router::new())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
