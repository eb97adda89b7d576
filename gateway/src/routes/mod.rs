pub mod api;

use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use http::{HeaderValue, header};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::handlers::api::{health_check, service_info};
use crate::middleware::vapi_secret_middleware;
use crate::state::AppState;

/// Full application router: public routes plus the secret-protected API.
pub fn create_app(state: Arc<AppState>) -> Router {
    let protected_routes = api::create_api_router().layer(middleware::from_fn_with_state(
        state.clone(),
        vapi_secret_middleware,
    ));

    let public_routes = Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check));

    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(security_headers)
}
