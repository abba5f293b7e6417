// ABOUTME: Replicate API client with blocking-wait prediction calls
// ABOUTME: Handles auth, request building, response parsing, and error shaping

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

const REPLICATE_BASE_URL: &str = "https://api.replicate.com/v1";

#[derive(Debug, Error)]
pub enum ReplicateError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

pub type ReplicateResult<T> = Result<T, ReplicateError>;

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    input: &'a Value,
}

/// Client for the Replicate inference API.
///
/// Requests are sent with a `Prefer: wait` header so the API holds the
/// connection open until the prediction settles; a hung remote call
/// therefore hangs the calling flow until the request timeout fires.
pub struct ReplicateClient {
    client: Client,
    api_token: String,
    base_url: String,
}

impl ReplicateClient {
    /// Create HTTP client with timeout configuration
    fn create_client() -> Client {
        Client::builder()
            .timeout(std::time::Duration::from_secs(600))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client")
    }

    pub fn new(api_token: String) -> Self {
        Self {
            client: Self::create_client(),
            api_token,
            base_url: REPLICATE_BASE_URL.to_string(),
        }
    }

    /// Create a client against a different API root. Used by tests to point
    /// at a mock server.
    pub fn with_base_url(api_token: String, base_url: String) -> Self {
        Self {
            client: Self::create_client(),
            api_token,
            base_url,
        }
    }

    /// Run a model by its `owner/name` identifier, resolving to the latest
    /// version, and return the prediction's output value directly.
    pub async fn run(&self, model_id: &str, input: &Value) -> ReplicateResult<Value> {
        let url = format!("{}/models/{}/predictions", self.base_url, model_id);
        info!("Running Replicate model: {}", model_id);

        let request = PredictionRequest {
            version: None,
            input,
        };
        let mut prediction = self.send_prediction(&url, &request).await?;

        Ok(prediction
            .as_object_mut()
            .and_then(|obj| obj.remove("output"))
            .unwrap_or(Value::Null))
    }

    /// Create a prediction from a pinned model version.
    ///
    /// Returns the whole prediction object; callers read its `output` field.
    /// Some hosted models require explicit version pinning for
    /// reproducibility, which is why this path exists alongside
    /// [`ReplicateClient::run`].
    pub async fn create_prediction(&self, version: &str, input: &Value) -> ReplicateResult<Value> {
        let url = format!("{}/predictions", self.base_url);
        info!("Creating Replicate prediction: version={}", version);

        let request = PredictionRequest {
            version: Some(version),
            input,
        };
        self.send_prediction(&url, &request).await
    }

    async fn send_prediction(
        &self,
        url: &str,
        request: &PredictionRequest<'_>,
    ) -> ReplicateResult<Value> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_token)
            .header("Prefer", "wait")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("Replicate API request timed out");
                } else if e.is_connect() {
                    error!("Failed to connect to Replicate API: {}", e);
                } else {
                    error!("Replicate API request failed: {}", e);
                }
                ReplicateError::RequestFailed(e)
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Replicate API error: {} - {}", status, message);
            return Err(ReplicateError::Api { status, message });
        }

        let prediction: Value = response
            .json()
            .await
            .map_err(|e| ReplicateError::InvalidResponse(e.to_string()))?;

        let status = prediction.get("status").and_then(Value::as_str);
        if matches!(status, Some("failed") | Some("canceled")) {
            let message = prediction
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("prediction failed without an error message")
                .to_string();
            return Err(ReplicateError::PredictionFailed(message));
        }

        Ok(prediction)
    }
}
