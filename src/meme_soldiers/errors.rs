use axum::http::StatusCode;

use crate::app::models::api_error::ApiError;

#[derive(Debug)]
pub enum MemeSoldiersApiError {
    MemeSoldierNotFound,
}

impl MemeSoldiersApiError {
    pub fn value(&self) -> ApiError {
        match *self {
            Self::MemeSoldierNotFound => ApiError {
                code: StatusCode::NOT_FOUND,
                message: "Meme soldier not found or you don't have permission.".to_string(),
            },
        }
    }
}
