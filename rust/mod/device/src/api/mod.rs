pub mod device;

use std::sync::Arc;

use axum::Router;

use crate::service::DeviceService;

/// Shared application state.
pub type AppState = Arc<DeviceService>;

/// Build the device API router, mounted under `/api`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", device::routes())
        .with_state(state)
}
