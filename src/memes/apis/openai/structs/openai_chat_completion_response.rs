use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct OpenAiChatCompletionResponse {
    pub choices: Vec<OpenAiChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiChatChoice {
    pub message: OpenAiChatMessage,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiChatMessage {
    pub content: Option<String>,
}
