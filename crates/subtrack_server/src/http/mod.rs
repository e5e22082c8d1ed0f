//! HTTP surface: routing, handlers, error replies and request logging.

pub mod error;
pub mod handlers;

use crate::state::AppState;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, patch};
use axum::Router;
use log::info;
use std::time::Instant;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route(
            "/subscriptions",
            get(handlers::list_subscriptions_handler).post(handlers::create_subscription_handler),
        )
        .route(
            "/subscriptions/:id",
            patch(handlers::update_subscription_handler)
                .delete(handlers::delete_subscription_handler),
        )
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        "event=http_request module=http status=done method={} path={} http_status={} duration_ms={}",
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
