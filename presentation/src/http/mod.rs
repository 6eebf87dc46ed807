//! HTTP API
//!
//! | Method | Path              | Body / Response                              |
//! |--------|-------------------|----------------------------------------------|
//! | GET    | `/health`         | `{status, version}`                          |
//! | GET    | `/constitutions`  | loaded constitution summaries                |
//! | GET    | `/councils`       | loaded councils                              |
//! | POST   | `/debate/run`     | run request → `DecisionBrief`                |
//! | POST   | `/experts/vote`   | `{council_config_id, context_ref}` → votes   |
//!
//! Errors use `{error, code, details?}` bodies.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use router::create_router;
pub use state::{AppState, Catalog, RequestDefaults};

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Serve `router` until `shutdown` is cancelled.
///
/// Cancelling the token also cancels in-flight deliberations that were
/// started from [`AppState::shutdown`].
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}
