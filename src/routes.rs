//! Route table for the service.
//!
//! Local handlers are matched first. Everything else under `/api`, including a
//! local path hit with a method it does not handle, goes to the legacy proxy.

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    routing::{any, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::handlers::{self, bot, docs, health};
use crate::middleware::token_auth_middleware;
use crate::proxy::proxy_to_legacy_api;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let body_limit = state.settings.api.max_request_size_bytes;

    Router::new()
        .route("/", get(health::health_check))
        .route("/openapi.json", get(docs::openapi_json))
        .route("/docs", get(docs::docs_page))
        .merge(bot_routes())
        .merge(proxy_routes())
        .fallback(handlers::not_found)
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(middleware::from_fn_with_state(state.clone(), token_auth_middleware)),
        )
        .with_state(state)
}

/// One span per request, tagged with the caller's `x-request-id` or a fresh one.
fn request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

fn bot_routes() -> Router<AppState> {
    use bot::{off_topic_channel_names as otn, reminders};

    Router::new()
        .route(
            "/api/bot/reminders",
            get(reminders::list_reminders)
                .post(reminders::create_reminder)
                .fallback(proxy_to_legacy_api),
        )
        .route(
            "/api/bot/reminders/:reminder_id",
            get(reminders::get_reminder)
                .patch(reminders::update_reminder)
                .delete(reminders::delete_reminder)
                .fallback(proxy_to_legacy_api),
        )
        .route(
            "/api/bot/off-topic-channel-names",
            get(otn::list_names)
                .post(otn::create_name)
                .delete(otn::delete_name)
                .fallback(proxy_to_legacy_api),
        )
}

/// Catch-all for the `/api` namespace. Lower priority than every static route.
fn proxy_routes() -> Router<AppState> {
    Router::new()
        .route("/api", any(proxy_to_legacy_api))
        .route("/api/", any(proxy_to_legacy_api))
        .route("/api/*endpoint", any(proxy_to_legacy_api))
}
