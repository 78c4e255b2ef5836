//! User settings
//!
//! Summarization preferences persisted through the same gateway as the
//! annotation sets, under a fixed key.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::AnnotationGateway;

/// Storage key for the global settings object.
pub const SETTINGS_KEY: &str = "settings:global";

/// Summarization preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_occupation")]
    pub occupation: String,
    #[serde(rename = "customPrompt", default)]
    pub custom_prompt: String,
    #[serde(rename = "summaryType", default = "default_summary_type")]
    pub summary_type: String,
}

fn default_occupation() -> String {
    "student".to_string()
}

fn default_summary_type() -> String {
    "key-points".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            occupation: default_occupation(),
            custom_prompt: String::new(),
            summary_type: default_summary_type(),
        }
    }
}

/// Settings repository over the persistence gateway.
#[derive(Clone)]
pub struct SettingsStore {
    gateway: Arc<dyn AnnotationGateway>,
}

impl SettingsStore {
    pub fn new(gateway: Arc<dyn AnnotationGateway>) -> Self {
        Self { gateway }
    }

    /// Load stored settings; missing or malformed values fall back to the
    /// defaults.
    pub async fn load(&self) -> Result<Settings> {
        match self.gateway.get(SETTINGS_KEY).await? {
            Some(value) => match serde_json::from_value(value) {
                Ok(settings) => Ok(settings),
                Err(err) => {
                    tracing::warn!("malformed settings, using defaults: {}", err);
                    Ok(Settings::default())
                }
            },
            None => Ok(Settings::default()),
        }
    }

    pub async fn save(&self, settings: &Settings) -> Result<()> {
        self.gateway
            .set(SETTINGS_KEY, serde_json::to_value(settings)?)
            .await
    }
}
