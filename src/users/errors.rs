use axum::http::StatusCode;

use crate::app::models::api_error::ApiError;

#[derive(Debug)]
pub enum UsersApiError {
    UserNotFound,
    UserInactive,
}

impl UsersApiError {
    pub fn value(&self) -> ApiError {
        match *self {
            Self::UserNotFound => ApiError {
                code: StatusCode::NOT_FOUND,
                message: "User not found.".to_string(),
            },
            Self::UserInactive => ApiError {
                code: StatusCode::FORBIDDEN,
                message: "This user is inactive.".to_string(),
            },
        }
    }
}
