//! API router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use council_application::{AgentInvoker, ExpertEvaluator};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router<A: AgentInvoker + 'static, E: ExpertEvaluator + 'static>(
    state: AppState<A, E>,
) -> Router {
    Router::new()
        .route("/health", get(handlers::health::<A, E>))
        .route("/constitutions", get(handlers::list_constitutions::<A, E>))
        .route("/councils", get(handlers::list_councils::<A, E>))
        .route("/debate/run", post(handlers::run_debate::<A, E>))
        .route("/experts/vote", post(handlers::vote::<A, E>))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
