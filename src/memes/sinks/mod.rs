use std::sync::Arc;

use bytes::Bytes;
use mime::Mime;
use tokio::sync::Mutex;

use crate::app::{errors::DefaultApiError, models::api_error::ApiError};

use self::{backblaze::b2::B2, local::LocalStorage};

pub mod backblaze;
pub mod local;

/// Destination for generated image bytes, chosen once at startup.
#[derive(Clone)]
pub enum AssetSink {
    Local(LocalStorage),
    Backblaze(Arc<Mutex<B2>>),
    /// The provider's url is handed to the caller untouched.
    PassThrough,
}

impl AssetSink {
    pub fn persists_bytes(&self) -> bool {
        !matches!(self, Self::PassThrough)
    }

    pub async fn store(
        &self,
        file_name: &str,
        mime_type: &Mime,
        data: Bytes,
    ) -> Result<String, ApiError> {
        match self {
            Self::Local(storage) => storage.write(file_name, &data).await,
            Self::Backblaze(b2) => {
                // the lock only guards token refresh, uploads run on a snapshot
                let b2 = {
                    let mut b2 = b2.lock().await;
                    if let Err(e) = b2.check_token().await {
                        tracing::error!(%e);
                        return Err(DefaultApiError::InternalServerError.value());
                    }
                    b2.clone()
                };

                backblaze::service::upload_file(file_name, mime_type, data, &b2).await
            }
            Self::PassThrough => {
                tracing::error!(%file_name, "pass-through sink cannot store bytes");
                Err(DefaultApiError::InternalServerError.value())
            }
        }
    }
}
