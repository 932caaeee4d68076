use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Brand used in titles when the site config cannot be loaded.
pub const DEFAULT_BRAND_NAME: &str = "Car Insurance Comparison";

/// Site-wide settings from `GET /api/site-config/`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SiteConfig {
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SiteConfig {
    /// Trimmed brand name, or [`DEFAULT_BRAND_NAME`] when blank or missing.
    pub fn brand(&self) -> String {
        self.brand_name
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_BRAND_NAME)
            .to_string()
    }
}
