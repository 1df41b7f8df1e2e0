use tracing::{error, info, warn};

use super::DeviceService;
use crate::error::DeviceError;
use crate::model::Device;

impl DeviceService {
    /// Classify one device and persist the predicted price range.
    ///
    /// The store is written once, after the classifier answered; any
    /// failure before that leaves the stored device untouched.
    pub async fn predict_one(&self, id: i64) -> Result<Device, DeviceError> {
        let mut device = self.get_device(id)?;

        let class = self.predictor.predict(&device.spec).await?;
        device.predicted_price_range = Some(class);

        let device = self.store.save(device)?;
        info!(id, class, "price range predicted");
        Ok(device)
    }

    /// Classify the first `batch_size` devices in listing order, one at a time.
    ///
    /// A failing device is logged and skipped. Returns the selected devices
    /// as they were read before any prediction ran.
    pub async fn predict_batch(&self) -> Vec<Device> {
        let selected: Vec<Device> = match self.store.list() {
            Ok(all) => all.into_iter().take(self.batch_size).collect(),
            Err(e) => {
                error!("batch prediction: listing devices failed: {e}");
                return Vec::new();
            }
        };

        let mut failed = 0usize;
        for device in &selected {
            if let Err(e) = self.predict_one(device.id).await {
                failed += 1;
                warn!(id = device.id, "batch prediction failed: {e}");
            }
        }

        info!(
            attempted = selected.len(),
            succeeded = selected.len() - failed,
            failed,
            "batch prediction finished"
        );
        selected
    }
}
