//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    AppState, endpoints, error_response,
    logging::logging_middleware,
    rewards::{get_all_rewards, get_customer_rewards},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::REWARDS, get(get_all_rewards))
        .route(endpoints::CUSTOMER_REWARDS, get(get_customer_rewards))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "the requested resource could not be found")
        .into_response()
}
