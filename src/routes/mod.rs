use std::{any::Any, time::Duration};

use axum::{
    Json, Router,
    http::{HeaderName, Request, Response, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{response::ApiError, state::AppState};

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod chat;
pub mod delivery;
pub mod doc;
pub mod drivers;
pub mod erp;
pub mod events;
pub mod health;
pub mod loyalty;
pub mod notifications;
pub mod orders;
pub mod params;
pub mod payments;
pub mod ratings;
pub mod support;
pub mod vendors;
pub mod wallet;

const REQUEST_ID_HEADER: &str = "x-request-id";

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/orders", orders::router())
        .nest("/stores", catalog::stores_router())
        .nest("/products", catalog::products_router())
        .nest("/vendors", vendors::router())
        .nest("/drivers", drivers::router())
        .nest("/delivery", delivery::router())
        .nest("/wallet", wallet::router())
        .nest("/payments", payments::router())
        .nest("/loyalty", loyalty::router())
        .nest("/chat", chat::router())
        .nest("/support", support::router())
        .nest("/ratings", ratings::router())
        .nest("/analytics", analytics::router())
        .nest("/erp", erp::router())
        .nest("/admin", admin::router())
        .nest("/notifications", notifications::router())
        .nest("/events", events::router())
}

fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
}

/// The full application: health, docs, the API and the middleware stack.
pub fn create_app(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id(request)
            )
        })
        .on_request(|request: &Request<_>, _span: &tracing::Span| {
            tracing::info!(
                request_id = %request_id(request),
                method = %request.method(),
                uri = %request.uri(),
                "request started"
            );
        })
        .on_response(|response: &Response<_>, latency: Duration, _span: &tracing::Span| {
            tracing::info!(
                status = %response.status(),
                ms = %latency.as_millis(),
                "request finished"
            );
        });

    let body_limit = state.config.body_limit_bytes;
    let concurrency_limit = state.config.concurrency_limit;

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(ConcurrencyLimitLayer::new(concurrency_limit))
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiError>) {
    let body = ApiError::new(format!("No route for {}", uri.path()));
    (StatusCode::NOT_FOUND, Json(body))
}

/// Turns a handler panic into the usual error envelope.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail, "handler panicked");
    let body = ApiError::new("Internal Server Error");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
