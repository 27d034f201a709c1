use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct OpenAiGenerateImageResponse {
    #[serde(rename(deserialize = "data"))]
    pub data: Vec<OpenAiDataUrl>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiDataUrl {
    #[serde(rename(deserialize = "url"))]
    pub url: String,
}
