use serde::Serialize;

use super::generated_asset::GeneratedAsset;

/// `{ success: true, items }` or `{ success: false, error }`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<GeneratedAsset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationOutcome {
    pub fn succeeded(items: Vec<GeneratedAsset>) -> Self {
        Self {
            success: true,
            items: Some(items),
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            items: None,
            error: Some(error),
        }
    }
}
