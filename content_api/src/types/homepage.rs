use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Homepage payload. Fields this crate does not model pass through in `extra`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HomepagePayload {
    #[serde(default)]
    pub sections: Vec<Value>,
    #[serde(default)]
    pub videos: Vec<Value>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub hero_image: Option<String>,
    #[serde(default)]
    pub content: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HomepagePayload {
    /// Empty but well-formed homepage used when the upstream is unavailable.
    pub fn fallback() -> Self {
        Self {
            sections: Vec::new(),
            videos: Vec::new(),
            meta_title: Some("Home".to_string()),
            meta_description: Some("Welcome".to_string()),
            hero_image: None,
            content: Value::String(String::new()),
            error: None,
            extra: Map::new(),
        }
    }

    /// Fallback that also records why the upstream could not be reached.
    pub fn fallback_with_error(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::fallback()
        }
    }
}

/// Payload for `GET /api/page/<slug>/`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PagePayload {
    #[serde(default)]
    pub sections: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PagePayload {
    pub fn fallback() -> Self {
        Self::default()
    }
}
