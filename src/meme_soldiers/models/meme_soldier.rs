use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    app::util::time, auth::jwt::models::claims::Claims,
    memes::models::generated_asset::GeneratedAsset,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemeSoldier {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub prompt: String,
    pub image_url: String,
    pub coin_icon_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    pub deployed_to_battlefield: bool,
    pub token_amount: f64,
    pub token_amount_deployed: f64,
    #[sqlx(try_from = "i64")]
    pub updated_at: u64,
    #[sqlx(try_from = "i64")]
    pub created_at: u64,
}

impl MemeSoldier {
    pub fn from_asset(asset: &GeneratedAsset, claims: &Claims) -> Self {
        let current_time = time::current_time_in_secs();

        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: claims.id.to_string(),
            name: asset.name.to_string(),
            prompt: asset.prompt.to_string(),
            image_url: asset.image_url.to_string(),
            coin_icon_url: asset.coin_icon_url.to_string(),
            token_id: None,
            contract_address: None,
            deployed_to_battlefield: false,
            token_amount: 0.0,
            token_amount_deployed: 0.0,
            updated_at: current_time,
            created_at: current_time,
        }
    }
}
