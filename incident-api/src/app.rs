use std::path::Path;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{api, AppState};

/// Full HTTP application: API routes, moderation pages and the front-end bundle.
pub fn build_router(state: AppState) -> Router {
    let static_dir = Path::new(&state.config.web.static_dir);
    let frontend = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .merge(api::routes())
        .fallback_service(frontend)
        .layer(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
