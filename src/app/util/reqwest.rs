use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;

use crate::{app::models::api_error::ApiError, memes::apis::ByteFetcher};

pub async fn get_bytes(url: &str, client: &reqwest::Client) -> Result<Bytes, ApiError> {
    match client.get(url).send().await {
        Ok(res) => {
            if !res.status().is_success() {
                tracing::error!(status = %res.status(), %url, "unexpected status fetching bytes");
                return Err(ApiError {
                    code: StatusCode::BAD_GATEWAY,
                    message: ["Failed to get url response: ", res.status().as_str()].concat(),
                });
            }

            match res.bytes().await {
                Ok(bytes) => Ok(bytes),
                Err(e) => {
                    tracing::error!(%e);
                    Err(ApiError {
                        code: StatusCode::INTERNAL_SERVER_ERROR,
                        message: "Failed to get bytes from response.".to_string(),
                    })
                }
            }
        }
        Err(e) => {
            tracing::error!(%e);
            Err(ApiError {
                code: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Failed to get url response.".to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ByteFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, ApiError> {
        get_bytes(url, &self.client).await
    }
}
