use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AccessInfo {
    pub access_token: String,
    pub token_type: String,
}

impl AccessInfo {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
