// https://platform.openai.com/docs/api-reference/chat/create
// https://platform.openai.com/docs/api-reference/images/create

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};

use crate::{
    app::{errors::DefaultApiError, models::api_error::ApiError},
    memes::apis::{ImageGenerator, TextGenerator},
};

use super::structs::{
    openai_chat_completion_response::OpenAiChatCompletionResponse,
    openai_generate_image_response::OpenAiGenerateImageResponse,
};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const IMAGE_GENERATIONS_URL: &str = "https://api.openai.com/v1/images/generations";

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    text_model: String,
}

impl OpenAiClient {
    pub fn new(client: reqwest::Client, api_key: &str, text_model: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            text_model: text_model.to_string(),
        }
    }

    fn headers(&self) -> Result<header::HeaderMap, ApiError> {
        let Ok(authorization) = header::HeaderValue::from_str(&["Bearer ", &self.api_key].concat())
        else {
            tracing::error!("openai api key is not a valid header value");
            return Err(DefaultApiError::InternalServerError.value());
        };

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(header::AUTHORIZATION, authorization);

        Ok(headers)
    }

    async fn post(&self, url: &str, body: Value) -> Result<String, ApiError> {
        let result = self
            .client
            .post(url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await;

        match result {
            Ok(res) => {
                let status = res.status();
                match res.text().await {
                    Ok(text) => {
                        if !status.is_success() {
                            tracing::error!(%status, %text);
                            return Err(ApiError {
                                code: StatusCode::BAD_GATEWAY,
                                message: ["OpenAI request failed with status ", status.as_str()]
                                    .concat(),
                            });
                        }

                        Ok(text)
                    }
                    Err(e) => {
                        tracing::error!(%e);
                        Err(DefaultApiError::InternalServerError.value())
                    }
                }
            }
            Err(e) => {
                tracing::error!(%e);
                Err(ApiError {
                    code: StatusCode::BAD_GATEWAY,
                    message: "Failed to reach OpenAI.".to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u16,
        temperature: Option<f32>,
    ) -> Result<String, ApiError> {
        let mut body = json!({
            "model": self.text_model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt }
            ],
            "max_tokens": max_tokens,
        });
        if let Some(temperature) = temperature {
            body["temperature"] = json!(temperature);
        }

        let text = self.post(CHAT_COMPLETIONS_URL, body).await?;
        parse_chat_completion(&text)
    }
}

#[async_trait]
impl ImageGenerator for OpenAiClient {
    async fn generate_image(
        &self,
        prompt: &str,
        size: &str,
        model: &str,
    ) -> Result<String, ApiError> {
        let body = json!({
            "model": model,
            "prompt": prompt,
            "n": 1,
            "size": size,
            "response_format": "url"
        });

        let text = self.post(IMAGE_GENERATIONS_URL, body).await?;
        parse_generate_image(&text)
    }
}

fn parse_chat_completion(text: &str) -> Result<String, ApiError> {
    let Ok(response) = serde_json::from_str::<OpenAiChatCompletionResponse>(text) else {
        tracing::error!(%text);
        return Err(DefaultApiError::InternalServerError.value());
    };

    match response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
    {
        Some(content) => Ok(content.trim().to_string()),
        None => Err(ApiError {
            code: StatusCode::BAD_GATEWAY,
            message: "OpenAI returned no completion.".to_string(),
        }),
    }
}

fn parse_generate_image(text: &str) -> Result<String, ApiError> {
    let Ok(response) = serde_json::from_str::<OpenAiGenerateImageResponse>(text) else {
        tracing::error!(%text);
        return Err(DefaultApiError::InternalServerError.value());
    };

    match response.data.into_iter().next() {
        Some(data) => Ok(data.url),
        None => Err(ApiError {
            code: StatusCode::BAD_GATEWAY,
            message: "OpenAI returned no image.".to_string(),
        }),
    }
}
