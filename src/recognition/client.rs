//! Recognition service client.
//!
//! Sends captured label images to the remote recognition service and maps
//! transport outcomes onto a closed failure set, so retry classification
//! happens at this boundary instead of by matching error strings upstream.

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::retry::Retryable;

/// Extraction prompt sent with every capture.
pub const EXTRACTION_PROMPT: &str = "Extract data from this Indian postal label. \
If the image is blurry, use contextual knowledge of Indian geography (states, \
cities, districts) to correct OCR errors. Look for a 6-digit PIN code and verify \
it against the state mentioned in the address. Return trackingId, recipientName, \
address, pincode and isValid. Use 'N/A' only if completely unreadable; isValid is \
true if a plausible 6-digit PIN is found.";

/// Structured fields returned by the recognition service for one label.
///
/// Treated as untrusted: the OCR text may be noisy and every field may be
/// missing or wrong. Normalization happens in the extraction adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionFields {
    #[serde(default)]
    pub tracking_id: String,
    #[serde(default)]
    pub recipient_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub pincode: String,
    #[serde(default)]
    pub is_valid: bool,
}

/// Failure tags at the recognition transport boundary.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP 429 from the service.
    #[error("rate limited by recognition service")]
    RateLimited,
    /// HTTP 500/503/504 from the service.
    #[error("recognition service unavailable (HTTP {0})")]
    Unavailable(u16),
    /// Connection or network-level failure.
    #[error("network failure: {0}")]
    Network(String),
    /// Any other service-side rejection.
    #[error("recognition request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
    /// A response arrived but could not be understood.
    #[error("unreadable recognition response: {0}")]
    InvalidResponse(String),
}

impl Retryable for TransportError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Unavailable(_) | Self::Network(_)
        )
    }
}

/// Boundary to the external recognition service.
#[async_trait]
pub trait RecognitionClient: Send + Sync {
    /// Recognize one label image into structured fields.
    async fn recognize(&self, image: &[u8]) -> Result<RecognitionFields, TransportError>;
}

/// Configuration for the recognition client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// Service endpoint base URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model identifier requested from the service.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sampling temperature requested from the service.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// API key, supplied via the environment only.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_endpoint() -> String {
    "https://recognition.local".to_string()
}
fn default_model() -> String {
    "label-reader-v3".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_temperature() -> f32 {
    0.1
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            api_key: None,
        }
    }
}

impl RecognitionConfig {
    /// Whether service credentials are present.
    pub fn has_credentials(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

/// Recognition request payload.
#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    model: &'a str,
    image: String,
    prompt: &'a str,
    temperature: f32,
}

/// HTTP client for the recognition service.
pub struct HttpRecognitionClient {
    config: RecognitionConfig,
    client: Client,
}

impl HttpRecognitionClient {
    pub fn new(config: RecognitionConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        Self { config, client }
    }
}

#[async_trait]
impl RecognitionClient for HttpRecognitionClient {
    async fn recognize(&self, image: &[u8]) -> Result<RecognitionFields, TransportError> {
        let payload = RecognizeRequest {
            model: &self.config.model,
            image: base64::engine::general_purpose::STANDARD.encode(image),
            prompt: EXTRACTION_PROMPT,
            temperature: self.config.temperature,
        };

        let url = format!("{}/v1/recognize", self.config.endpoint);
        debug!("Recognition request to {} ({} bytes)", url, image.len());

        let mut request = self.client.post(&url).json(&payload);
        if let Some(key) = &self.config.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let code = status.as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(match code {
                429 => TransportError::RateLimited,
                500 | 503 | 504 => TransportError::Unavailable(code),
                _ => TransportError::Rejected {
                    status: code,
                    message,
                },
            });
        }

        response
            .json::<RecognitionFields>()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(TransportError::RateLimited.is_retryable());
        assert!(TransportError::Unavailable(503).is_retryable());
        assert!(TransportError::Network("connection reset".to_string()).is_retryable());
        assert!(!TransportError::Rejected {
            status: 400,
            message: "bad image".to_string()
        }
        .is_retryable());
        assert!(!TransportError::InvalidResponse("truncated body".to_string()).is_retryable());
    }

    #[test]
    fn test_fields_tolerate_missing_values() {
        let fields: RecognitionFields = serde_json::from_str(r#"{"trackingId":"TRK1"}"#).unwrap();
        assert_eq!(fields.tracking_id, "TRK1");
        assert!(fields.pincode.is_empty());
        assert!(!fields.is_valid);
    }

    #[test]
    fn test_fields_use_wire_casing() {
        let json = r#"{
            "trackingId": "EK123",
            "recipientName": "S. Rao",
            "address": "Fort, Mumbai, Maharashtra",
            "pincode": "400001",
            "isValid": true
        }"#;
        let fields: RecognitionFields = serde_json::from_str(json).unwrap();
        assert!(fields.is_valid);
        assert_eq!(fields.recipient_name, "S. Rao");
    }

    #[test]
    fn test_missing_key_means_no_credentials() {
        let mut config = RecognitionConfig::default();
        assert!(!config.has_credentials());
        config.api_key = Some(String::new());
        assert!(!config.has_credentials());
        config.api_key = Some("sk-test".to_string());
        assert!(config.has_credentials());
    }
}
