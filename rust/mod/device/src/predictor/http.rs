use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{PredictError, PricePredictor, parse_prediction};
use crate::model::DeviceSpec;

/// Classifier reached over HTTP: one JSON POST per prediction, no retry.
///
/// The underlying `reqwest::Client` is built once and reused, so the
/// connection pool survives across requests.
pub struct HttpPredictor {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpPredictor {
    /// `timeout` of `None` keeps reqwest's default (no overall deadline).
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, PredictError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| PredictError::Transport(format!("build HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PricePredictor for HttpPredictor {
    async fn predict(&self, spec: &DeviceSpec) -> Result<i32, PredictError> {
        debug!(endpoint = %self.endpoint, "requesting price prediction");

        let resp = self
            .http
            .post(&self.endpoint)
            .json(spec)
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, "prediction request failed: {e}");
                PredictError::Transport(e.to_string())
            })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| PredictError::Transport(format!("read response body: {e}")))?;

        if !status.is_success() {
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "prediction API returned an error status");
            return Err(PredictError::InvalidResponse {
                body,
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        parse_prediction(&body)
    }
}
