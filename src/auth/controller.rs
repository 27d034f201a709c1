use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    app::models::{api_error::ApiError, json_from_request::JsonFromRequest},
    AppState,
};

use super::{
    dtos::verify_wallet_dto::VerifyWalletDto,
    models::{access_info::AccessInfo, nonce_info::NonceInfo},
    service,
};

pub async fn get_wallet_nonce(
    State(state): State<AppState>,
    Path(wallet_address): Path<String>,
) -> Result<Json<NonceInfo>, ApiError> {
    let wallet_address = wallet_address.trim();
    if wallet_address.is_empty() || wallet_address.len() > 128 {
        return Err(ApiError {
            code: StatusCode::BAD_REQUEST,
            message: "wallet_address must be between 1 and 128 characters.".to_string(),
        });
    }

    match service::get_wallet_nonce(wallet_address, &state).await {
        Ok(nonce_info) => Ok(Json(nonce_info)),
        Err(e) => Err(e),
    }
}

pub async fn verify_wallet(
    State(state): State<AppState>,
    JsonFromRequest(dto): JsonFromRequest<VerifyWalletDto>,
) -> Result<Json<AccessInfo>, ApiError> {
    match dto.validate() {
        Ok(_) => match service::verify_wallet(&dto, &state).await {
            Ok(access_info) => Ok(Json(access_info)),
            Err(e) => Err(e),
        },
        Err(e) => Err(ApiError {
            code: StatusCode::BAD_REQUEST,
            message: e.to_string(),
        }),
    }
}
