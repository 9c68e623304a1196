mod admin;
mod analytics;
mod health;
mod reports;

use axum::Router;

use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/reports",
            Router::new()
                .merge(reports::routes())
                .merge(admin::routes())
                .merge(analytics::routes()),
        )
        .nest(
            "/api",
            Router::new()
                .merge(health::routes())
                .merge(reports::json_routes()),
        )
}
