//! Request DTOs.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub material_id: Option<String>,
}

impl PredictRequest {
    /// The identifier when present and non-empty.
    pub fn material_id(&self) -> Option<&str> {
        self.material_id.as_deref().filter(|id| !id.is_empty())
    }
}
