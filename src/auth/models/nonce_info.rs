use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct NonceInfo {
    pub wallet_address: String,
    pub nonce: String,
}
