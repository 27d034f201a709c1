use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    app::models::{api_error::ApiError, bearer_from_request::BearerFromRequest},
    auth::jwt::models::claims::Claims,
    AppState,
};

use super::{
    models::{meme_soldier::MemeSoldier, mint_response::MintResponse},
    service,
};

pub async fn get_meme_soldiers(
    State(state): State<AppState>,
    BearerFromRequest(authorization): BearerFromRequest,
) -> Result<Json<Vec<MemeSoldier>>, ApiError> {
    match Claims::from_header(authorization, &state.envy.jwt_secret) {
        Ok(claims) => match service::get_meme_soldiers(&claims, &state.pool).await {
            Ok(soldiers) => Ok(Json(soldiers)),
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    }
}

pub async fn get_meme_soldier_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    BearerFromRequest(authorization): BearerFromRequest,
) -> Result<Json<MemeSoldier>, ApiError> {
    match Claims::from_header(authorization, &state.envy.jwt_secret) {
        Ok(claims) => match service::get_meme_soldier_by_id(&id, &claims, &state.pool).await {
            Ok(soldier) => Ok(Json(soldier)),
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    }
}

pub async fn mint_meme_soldier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    BearerFromRequest(authorization): BearerFromRequest,
) -> Result<Json<MintResponse>, ApiError> {
    match Claims::from_header(authorization, &state.envy.jwt_secret) {
        Ok(claims) => match service::mint_meme_soldier(&id, &claims, &state.pool).await {
            Ok(res) => Ok(Json(res)),
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    }
}
