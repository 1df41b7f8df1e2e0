pub mod api;
pub mod error;
pub mod model;
pub mod predictor;
pub mod service;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use devclass_core::ServiceConfig;
use devclass_sql::SQLStore;
use tracing::info;

use error::DeviceError;
use predictor::HttpPredictor;
use service::DeviceService;
use store::SqlDeviceStore;

/// Device module: device records and their price classification.
pub struct DeviceModule {
    service: Arc<DeviceService>,
}

impl DeviceModule {
    pub fn new(service: DeviceService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Wire the SQL-backed store and the HTTP classifier from configuration.
    pub fn from_config(config: &ServiceConfig, sql: Arc<dyn SQLStore>) -> Result<Self, DeviceError> {
        let store = SqlDeviceStore::new(sql)?;
        let predictor = HttpPredictor::new(
            config.predictor.url.clone(),
            config.predictor.timeout_secs.map(Duration::from_secs),
        )?;
        info!(
            endpoint = predictor.endpoint(),
            batch_size = config.predictor.batch_size,
            "price predictor configured"
        );

        let service = DeviceService::new(Arc::new(store), Arc::new(predictor))
            .with_batch_size(config.predictor.batch_size);
        Ok(Self::new(service))
    }

    pub fn name(&self) -> &str {
        "devices"
    }

    pub fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
