use bytes::Bytes;
use mime::Mime;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde_json::json;

use crate::app::{errors::DefaultApiError, models::api_error::ApiError};

use super::{
    b2::B2,
    structs::{
        backblaze_upload_file_response::BackblazeUploadFileResponse,
        backblaze_upload_url_response::BackblazeUploadUrlResponse,
    },
};

const MEMES_FOLDER: &str = "memes/";

/// Uploads one file into the bucket's `memes/` folder and returns its public
/// download url.
pub async fn upload_file(
    file_name: &str,
    mime_type: &Mime,
    data: Bytes,
    b2: &B2,
) -> Result<String, ApiError> {
    let upload_url_res = get_upload_url(b2).await?;
    let path = [MEMES_FOLDER, file_name].concat();

    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        header_value(&upload_url_res.authorization_token)?,
    );
    headers.insert("X-Bz-File-Name", header_value(&path)?);
    headers.insert(header::CONTENT_TYPE, header_value(mime_type.as_ref())?);
    headers.insert(
        "X-Bz-Content-Sha1",
        HeaderValue::from_static("do_not_verify"),
    );
    headers.insert("X-Bz-Info-Author", HeaderValue::from_static("unknown"));

    let result = b2
        .client
        .post(upload_url_res.upload_url)
        .headers(headers)
        .body(data)
        .send()
        .await;

    match result {
        Ok(res) => match res.text().await {
            Ok(text) => match serde_json::from_str::<BackblazeUploadFileResponse>(&text) {
                Ok(upload_file_res) => {
                    tracing::debug!(file_name = %upload_file_res.file_name, "uploaded to b2");
                    Ok(b2.download_url_for(&upload_file_res.file_id))
                }
                Err(_) => {
                    tracing::error!(%text);
                    Err(DefaultApiError::InternalServerError.value())
                }
            },
            Err(e) => {
                tracing::error!(%e);
                Err(DefaultApiError::InternalServerError.value())
            }
        },
        Err(e) => {
            tracing::error!(%e);
            Err(DefaultApiError::InternalServerError.value())
        }
    }
}

async fn get_upload_url(b2: &B2) -> Result<BackblazeUploadUrlResponse, ApiError> {
    let url = [&b2.api_url, "/b2api/v2/b2_get_upload_url"].concat();
    let result = b2
        .client
        .post(url)
        .header(header::AUTHORIZATION, header_value(&b2.authorization_token)?)
        .json(&json!({ "bucketId": b2.bucket_id }))
        .send()
        .await;

    match result {
        Ok(res) => match res.text().await {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(upload_url_res) => Ok(upload_url_res),
                Err(_) => {
                    tracing::error!(%text);
                    Err(DefaultApiError::InternalServerError.value())
                }
            },
            Err(e) => {
                tracing::error!(%e);
                Err(DefaultApiError::InternalServerError.value())
            }
        },
        Err(e) => {
            tracing::error!(%e);
            Err(DefaultApiError::InternalServerError.value())
        }
    }
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    match HeaderValue::from_str(value) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::error!(%e);
            Err(DefaultApiError::InternalServerError.value())
        }
    }
}
