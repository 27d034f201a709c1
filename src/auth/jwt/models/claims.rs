use axum::{
    headers::{authorization::Bearer, Authorization},
    http::StatusCode,
};
use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};

use crate::{app::models::api_error::ApiError, auth::jwt::util::decode_jwt};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub wallet_address: String,
    pub iat: u64,
    pub exp: u64,
}

impl Claims {
    pub fn from_header(
        authorization: Authorization<Bearer>,
        secret: &str,
    ) -> Result<Self, ApiError> {
        match decode_jwt(authorization.token(), secret) {
            Ok(claims) => Ok(claims),
            Err(ErrorKind::ExpiredSignature) => Err(ApiError {
                code: StatusCode::UNAUTHORIZED,
                message: "Token expired.".to_string(),
            }),
            Err(_) => Err(ApiError {
                code: StatusCode::UNAUTHORIZED,
                message: "Invalid token.".to_string(),
            }),
        }
    }
}
