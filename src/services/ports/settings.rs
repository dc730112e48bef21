use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSettings {
    #[serde(default = "default_base_color_id")]
    pub base_color_id: String,
}

fn default_base_color_id() -> String {
    "yellow".to_string()
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            base_color_id: default_base_color_id(),
        }
    }
}
