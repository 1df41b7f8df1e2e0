mod predict;

use std::sync::Arc;

use devclass_core::config::DEFAULT_BATCH_SIZE;
use tracing::info;

use crate::error::DeviceError;
use crate::model::{Device, DeviceSpec};
use crate::predictor::PricePredictor;
use crate::store::DeviceStore;

/// Device service: CRUD over the store plus price prediction.
pub struct DeviceService {
    pub(crate) store: Arc<dyn DeviceStore>,
    pub(crate) predictor: Arc<dyn PricePredictor>,
    pub(crate) batch_size: usize,
}

impl DeviceService {
    pub fn new(store: Arc<dyn DeviceStore>, predictor: Arc<dyn PricePredictor>) -> Self {
        Self {
            store,
            predictor,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Cap on devices handled by [`DeviceService::predict_batch`].
    ///
    /// Taken as given; `ServiceConfig::validate` refuses a zero size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn create_device(&self, spec: DeviceSpec) -> Result<Device, DeviceError> {
        spec.validate().map_err(DeviceError::Validation)?;
        let device = self.store.create(&spec)?;
        info!(id = device.id, "device created");
        Ok(device)
    }

    pub fn list_devices(&self) -> Result<Vec<Device>, DeviceError> {
        self.store.list()
    }

    pub fn get_device(&self, id: i64) -> Result<Device, DeviceError> {
        self.store.find(id)?.ok_or(DeviceError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedPredictor, memory_store, sample_spec};

    fn service() -> DeviceService {
        DeviceService::new(memory_store(), Arc::new(FixedPredictor::new(1)))
    }

    #[test]
    fn create_then_get() {
        let svc = service();
        let created = svc.create_device(sample_spec(1)).unwrap();

        let got = svc.get_device(created.id).unwrap();
        assert_eq!(got.id, created.id);
        assert_eq!(got.spec, sample_spec(1));
        assert!(got.predicted_price_range.is_none());
    }

    #[test]
    fn create_rejects_invalid_spec() {
        let svc = service();
        let mut spec = sample_spec(1);
        spec.talk_time = -3;

        assert!(matches!(svc.create_device(spec), Err(DeviceError::Validation(_))));
        assert!(svc.list_devices().unwrap().is_empty());
    }

    #[test]
    fn get_unknown() {
        assert!(matches!(service().get_device(9), Err(DeviceError::NotFound(9))));
    }

    #[test]
    fn batch_size_taken_as_given() {
        assert_eq!(service().batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(service().with_batch_size(0).batch_size, 0);
        assert_eq!(service().with_batch_size(25).batch_size, 25);
    }
}
