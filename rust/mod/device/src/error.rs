use devclass_core::ServiceError;
use devclass_sql::SQLError;
use thiserror::Error;

use crate::predictor::PredictError;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device {0} not found")]
    NotFound(i64),

    #[error("validation: {0}")]
    Validation(String),

    #[error(transparent)]
    Prediction(#[from] PredictError),

    #[error("storage: {0}")]
    Storage(String),
}

impl From<SQLError> for DeviceError {
    fn from(e: SQLError) -> Self {
        DeviceError::Storage(e.to_string())
    }
}

impl From<DeviceError> for ServiceError {
    fn from(e: DeviceError) -> Self {
        let msg = e.to_string();
        match e {
            DeviceError::NotFound(_) => ServiceError::NotFound(msg),
            DeviceError::Validation(_) => ServiceError::Validation(msg),
            DeviceError::Prediction(_) => ServiceError::Upstream(msg),
            DeviceError::Storage(_) => ServiceError::Storage(msg),
        }
    }
}
