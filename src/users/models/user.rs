use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::app::util::time;

const NONCE_LENGTH: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub wallet_address: String,
    #[serde(skip_serializing)]
    pub nonce: String,
    pub is_active: bool,
    #[sqlx(try_from = "i64")]
    pub updated_at: u64,
    #[sqlx(try_from = "i64")]
    pub created_at: u64,
}

impl User {
    pub fn new(wallet_address: &str) -> Self {
        let current_time = time::current_time_in_secs();

        Self {
            id: Uuid::new_v4().to_string(),
            wallet_address: wallet_address.to_string(),
            nonce: generate_nonce(),
            is_active: true,
            updated_at: current_time,
            created_at: current_time,
        }
    }
}

pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}
