use std::path::PathBuf;

use crate::app::{errors::DefaultApiError, models::api_error::ApiError};

pub const PUBLIC_IMAGES_PATH: &str = "/images";

#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Writes `data` under the storage root and returns the relative url it
    /// is served from.
    pub async fn write(&self, file_name: &str, data: &[u8]) -> Result<String, ApiError> {
        if file_name.contains(|c: char| c == '/' || c == '\\') || file_name.starts_with('.') {
            tracing::error!(%file_name, "refusing to write outside storage root");
            return Err(DefaultApiError::InternalServerError.value());
        }

        if let Err(e) = tokio::fs::create_dir_all(&self.root).await {
            tracing::error!(%e);
            return Err(DefaultApiError::InternalServerError.value());
        }

        match tokio::fs::write(self.root.join(file_name), data).await {
            Ok(_) => Ok([PUBLIC_IMAGES_PATH, "/", file_name].concat()),
            Err(e) => {
                tracing::error!(%e);
                Err(DefaultApiError::InternalServerError.value())
            }
        }
    }
}
