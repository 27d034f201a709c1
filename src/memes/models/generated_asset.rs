use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedAsset {
    pub name: String,
    pub prompt: String,
    pub image_url: String,
    pub coin_icon_url: String,
}
