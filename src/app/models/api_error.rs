use axum::{
    extract::rejection::{JsonRejection, TypedHeaderRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug)]
pub struct ApiError {
    pub code: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "code": self.code.as_u16(),
            "message": self.message,
        }));

        (self.code, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            code: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<TypedHeaderRejection> for ApiError {
    fn from(rejection: TypedHeaderRejection) -> Self {
        tracing::debug!(%rejection, "rejected authorization header");
        Self {
            code: StatusCode::UNAUTHORIZED,
            message: "Missing or invalid authorization header.".to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}
