use crate::EditorError;
use interchange::{DEFAULT_FILE_NAME, FALLBACK_ELEMENT_ID};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Editor settings, read from a JSON file. Missing fields take defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Quiet period before a change reaches the live preview.
    pub preview_delay_ms: u64,
    /// Prefix for icon URLs; icons resolve to `<base>/icons/<file>`.
    pub icon_base_url: String,
    /// Element that dangling `elementId` references are reset to.
    pub fallback_element_id: String,
    /// File name stem for layouts without a name.
    pub default_file_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            preview_delay_ms: 350,
            icon_base_url: String::new(),
            fallback_element_id: FALLBACK_ELEMENT_ID.to_string(),
            default_file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl EditorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EditorError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// Parses a settings object. Anything other than a JSON object is an error.
    pub fn from_json(input: &str) -> Result<Self, EditorError> {
        let value: Value =
            serde_json::from_str(input).map_err(|e| EditorError::Config(format!("{}", e)))?;
        if !value.is_object() {
            return Err(EditorError::Config("Config must be a JSON object".into()));
        }
        serde_json::from_value(value).map_err(|e| EditorError::Config(format!("{}", e)))
    }

    pub fn preview_delay(&self) -> Duration {
        Duration::from_millis(self.preview_delay_ms)
    }
}
