use std::time::Instant;

use reqwest::header;
use serde::Deserialize;

const AUTHORIZE_ACCOUNT_URL: &str = "https://api.backblazeb2.com/b2api/v2/b2_authorize_account";
// b2 authorization tokens are valid for 24 hours
const TOKEN_TTL_SECS: u64 = 43200;

#[derive(Debug, Clone)]
pub struct B2Config {
    pub key_id: String,
    pub app_key: String,
}

#[derive(Debug, Clone)]
pub struct B2 {
    pub token_time: Instant,
    pub config: B2Config,
    pub client: reqwest::Client,
    pub authorize_url: String,
    pub authorization_token: String,
    pub api_url: String,
    pub download_url: String,
    pub bucket_id: String,
}

impl B2 {
    pub fn new(config: B2Config, bucket_id: String, client: reqwest::Client) -> B2 {
        B2 {
            token_time: Instant::now(),
            config,
            client,
            authorize_url: AUTHORIZE_ACCOUNT_URL.to_string(),
            authorization_token: String::new(),
            api_url: String::new(),
            download_url: String::new(),
            bucket_id,
        }
    }

    pub async fn login(&mut self) -> Result<(), &'static str> {
        login(self).await
    }

    pub async fn check_token(&mut self) -> Result<(), &'static str> {
        let has_expired = self.authorization_token.is_empty()
            || self.token_time.elapsed().as_secs() > TOKEN_TTL_SECS;

        if !has_expired {
            return Ok(());
        }

        self.login().await
    }

    pub fn download_url_for(&self, file_id: &str) -> String {
        [
            &self.download_url,
            "/b2api/v1/b2_download_file_by_id?fileId=",
            file_id,
        ]
        .concat()
    }
}

async fn login(b2: &mut B2) -> Result<(), &'static str> {
    let credentials = base64::encode(format!("{}:{}", b2.config.key_id, b2.config.app_key));
    let Ok(authorization) = header::HeaderValue::from_str(&["Basic ", &credentials].concat())
    else {
        return Err("invalid b2 credentials");
    };

    let result = b2
        .client
        .get(&b2.authorize_url)
        .header(header::AUTHORIZATION, authorization)
        .send()
        .await;

    match result {
        Ok(res) => match res.text().await {
            Ok(text) => match serde_json::from_str::<B2AuthorizeAccountResponse>(&text) {
                Ok(b2_authorize_response) => {
                    b2.authorization_token = b2_authorize_response.authorization_token;
                    b2.api_url = b2_authorize_response.api_url;
                    b2.download_url = b2_authorize_response.download_url;
                    b2.token_time = Instant::now();

                    Ok(())
                }
                Err(_) => {
                    tracing::error!(%text);
                    Err("failed to login to b2")
                }
            },
            Err(e) => {
                tracing::error!(%e);
                Err("failed to login to b2")
            }
        },
        Err(e) => {
            tracing::error!(%e);
            Err("failed to login to b2")
        }
    }
}

#[derive(Debug, Deserialize)]
struct B2AuthorizeAccountResponse {
    #[serde(rename(deserialize = "authorizationToken"))]
    pub authorization_token: String,
    #[serde(rename(deserialize = "apiUrl"))]
    pub api_url: String,
    #[serde(rename(deserialize = "downloadUrl"))]
    pub download_url: String,
}
