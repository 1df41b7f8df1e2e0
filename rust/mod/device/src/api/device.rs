use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use devclass_core::ServiceError;

use super::AppState;
use crate::model::{Device, DeviceSpec};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/devices", get(list_devices).post(create_device))
        .route("/devices/{id}", get(get_device))
        .route("/devices/predict/batch_all", post(predict_batch))
        .route("/devices/predict/{id}", post(predict_device))
}

async fn list_devices(State(svc): State<AppState>) -> Result<Json<Vec<Device>>, ServiceError> {
    Ok(Json(svc.list_devices()?))
}

async fn get_device(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Device>, ServiceError> {
    Ok(Json(svc.get_device(id)?))
}

/// The body carries the hardware fields only; `id` and
/// `predictedPriceRange` are ignored if present.
async fn create_device(
    State(svc): State<AppState>,
    Json(spec): Json<DeviceSpec>,
) -> Result<Json<Device>, ServiceError> {
    Ok(Json(svc.create_device(spec)?))
}

async fn predict_device(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Device>, ServiceError> {
    Ok(Json(svc.predict_one(id).await?))
}

async fn predict_batch(State(svc): State<AppState>) -> Json<Vec<Device>> {
    Json(svc.predict_batch().await)
}
