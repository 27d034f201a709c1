use serde::Serialize;

/// Minting is not wired to a chain yet; this is what the endpoint answers.
#[derive(Debug, Serialize)]
pub struct MintResponse {
    pub success: bool,
    pub message: String,
    pub soldier_id: String,
    pub name: String,
}
