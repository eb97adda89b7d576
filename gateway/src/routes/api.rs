use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers::tts;
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router with protected routes
///
/// Note: the secret middleware is applied by [`super::create_app`] once state is available
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tts", post(tts::tts_handler))
        .layer(TraceLayer::new_for_http())
}
