//! Backend configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Default simulated latency in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 500;

/// Runtime configuration of the in-memory backend.
///
/// Every field has a default, so config files only list what they change.
/// The same shape is read and patched through the `commands/config` route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Simulated latency in milliseconds
    pub delay: u64,
    /// Wrap response bodies as `{"data": ...}`
    pub data_encapsulation: bool,
    /// Case-sensitive query filtering
    pub case_sensitive_search: bool,
    /// Forward unknown routes to the passthrough backend instead of answering 404
    pub passthru_unknown_url: bool,
    /// Answer 409 to a POST of an existing id instead of replacing the record
    pub post_409: bool,
    /// Answer 404 to a PUT of a missing id instead of creating the record
    pub put_404: bool,
    /// Answer 404 to a DELETE of a missing id instead of 204
    pub delete_404: bool,
    /// Fixed base path such as `api/v1`; the first path segment is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY_MS,
            data_encapsulation: true,
            case_sensitive_search: false,
            passthru_unknown_url: false,
            post_409: false,
            put_404: false,
            delete_404: false,
            api_base: None,
        }
    }
}

impl BackendConfig {
    pub fn with_delay(mut self, delay: u64) -> Self {
        self.delay = delay;
        self
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.delay)
    }

    /// Return a copy with the fields present in `patch` replaced.
    ///
    /// `patch` must be a JSON object; unknown keys are ignored and a `null`
    /// `api_base` unsets the base path.
    pub fn merged(&self, patch: &Value) -> Result<Self, serde_json::Error> {
        let mut current = serde_json::to_value(self)?;
        if let (Value::Object(target), Value::Object(fields)) = (&mut current, patch) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        } else {
            return Err(serde::de::Error::custom("config patch must be a JSON object"));
        }
        serde_json::from_value(current)
    }
}
