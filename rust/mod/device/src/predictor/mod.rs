//! Client side of the external price classifier.
//!
//! The classifier takes the 20 hardware fields of a device as a JSON object
//! and answers `{"predicted_price_range": <int>}`.

mod http;

pub use http::HttpPredictor;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::DeviceSpec;

/// Response field carrying the predicted class.
pub const PREDICTION_FIELD: &str = "predicted_price_range";

#[derive(Debug, Error)]
pub enum PredictError {
    /// The endpoint answered, but not with a usable prediction.
    /// `body` is the raw response, kept for diagnostics.
    #[error("invalid response from prediction API ({reason}): {body}")]
    InvalidResponse { body: String, reason: String },

    /// The endpoint could not be reached or the exchange broke off.
    #[error("prediction API unreachable: {0}")]
    Transport(String),
}

/// Something that classifies a device into a price range.
#[async_trait]
pub trait PricePredictor: Send + Sync {
    async fn predict(&self, spec: &DeviceSpec) -> Result<i32, PredictError>;
}

/// Extract the predicted class from a classifier response body.
pub fn parse_prediction(body: &str) -> Result<i32, PredictError> {
    let invalid = |reason: String| PredictError::InvalidResponse {
        body: body.to_string(),
        reason,
    };

    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| invalid(e.to_string()))?;

    let field = json
        .get(PREDICTION_FIELD)
        .ok_or_else(|| invalid(format!("missing `{PREDICTION_FIELD}`")))?;

    field
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| invalid(format!("`{PREDICTION_FIELD}` is not an integer: {field}")))
}
