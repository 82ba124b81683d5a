//! Configuration management for pinsort.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::recognition::RecognitionConfig;
use crate::retry::RetryPolicy;

/// Retry schedule for recognition calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts before the budget is exhausted.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Wait before the second attempt, in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Factor applied to the wait after each retryable failure.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_max_attempts() -> u32 {
    4
}
fn default_initial_delay_ms() -> u64 {
    1500
}
fn default_multiplier() -> f64 {
    1.5
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_delay: std::time::Duration::from_millis(self.initial_delay_ms),
            multiplier: self.multiplier,
        }
    }
}

/// Runtime settings for the pinsort CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Data directory holding the session snapshot and manifest archive.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Directory manifests are exported into.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    /// Operator name stamped on finalized manifests.
    #[serde(default)]
    pub operator_name: Option<String>,
    #[serde(default)]
    pub recognition: RecognitionConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pinsort")
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("manifests")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            export_dir: default_export_dir(),
            operator_name: None,
            recognition: RecognitionConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

/// Load settings from the optional config file, then apply environment
/// overrides. The API key comes from the environment only.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("pinsort.json"));

    let mut settings = if path.exists() {
        let bytes = std::fs::read(&path)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?
    } else {
        Settings::default()
    };

    if let Ok(key) = std::env::var("PINSORT_API_KEY") {
        if !key.is_empty() {
            settings.recognition.api_key = Some(key);
        }
    }
    if let Ok(endpoint) = std::env::var("PINSORT_RECOGNITION_URL") {
        if !endpoint.is_empty() {
            settings.recognition.endpoint = endpoint;
        }
    }
    if let Ok(operator) = std::env::var("PINSORT_OPERATOR") {
        if !operator.is_empty() {
            settings.operator_name = Some(operator);
        }
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retry_matches_service_budget() {
        let policy = RetryConfig::default().policy();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.initial_delay.as_millis(), 1500);
        assert!((policy.multiplier - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_settings_deserialize_with_partial_file() {
        let settings: Settings =
            serde_json::from_str(r#"{"operator_name": "R. Singh"}"#).unwrap();
        assert_eq!(settings.operator_name.as_deref(), Some("R. Singh"));
        assert_eq!(settings.retry.max_attempts, 4);
        assert!(!settings.recognition.has_credentials());
    }
}
