use async_trait::async_trait;
use bytes::Bytes;

use crate::app::models::api_error::ApiError;

pub mod openai;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u16,
        temperature: Option<f32>,
    ) -> Result<String, ApiError>;
}

/// Generates one image and returns the locator the provider hands back.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str, size: &str, model: &str)
        -> Result<String, ApiError>;
}

#[async_trait]
pub trait ByteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, ApiError>;
}
