use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use validator::Validate;

use crate::{
    app::models::{
        api_error::ApiError, bearer_from_request::BearerFromRequest,
        json_from_request::JsonFromRequest,
    },
    auth::jwt::models::claims::Claims,
    meme_soldiers::{self, models::meme_soldier::MemeSoldier},
    AppState,
};

use super::{
    dtos::generate_meme_dto::GenerateMemeDto,
    models::{generated_asset::GeneratedAsset, generation_outcome::GenerationOutcome},
};

#[derive(Debug, Serialize)]
pub struct GenerateMemeResponse {
    pub success: bool,
    pub items: Vec<MemeSoldier>,
}

pub async fn generate_meme(
    State(state): State<AppState>,
    BearerFromRequest(authorization): BearerFromRequest,
    JsonFromRequest(dto): JsonFromRequest<GenerateMemeDto>,
) -> Result<Json<GenerateMemeResponse>, ApiError> {
    let claims = Claims::from_header(authorization, &state.envy.jwt_secret)?;
    let dto = validated(dto)?;

    let outcome = state.meme_generator.generate_assets(&dto.prompt).await;
    let items = outcome_items(outcome)?;

    match meme_soldiers::service::create_meme_soldiers(&items, &claims, &state.pool).await {
        Ok(soldiers) => Ok(Json(GenerateMemeResponse {
            success: true,
            items: soldiers,
        })),
        Err(e) => Err(e),
    }
}

/// Same pipeline as `generate_meme` without auth or persistence.
pub async fn generate_meme_test(
    State(state): State<AppState>,
    JsonFromRequest(dto): JsonFromRequest<GenerateMemeDto>,
) -> Result<Json<GenerationOutcome>, ApiError> {
    let dto = validated(dto)?;

    let outcome = state.meme_generator.generate_assets(&dto.prompt).await;
    let items = outcome_items(outcome)?;

    Ok(Json(GenerationOutcome::succeeded(items)))
}

fn validated(dto: GenerateMemeDto) -> Result<GenerateMemeDto, ApiError> {
    let dto = dto.sanitized();
    match dto.validate() {
        Ok(_) => Ok(dto),
        Err(e) => Err(ApiError {
            code: StatusCode::BAD_REQUEST,
            message: e.to_string(),
        }),
    }
}

fn outcome_items(outcome: GenerationOutcome) -> Result<Vec<GeneratedAsset>, ApiError> {
    match (outcome.success, outcome.items) {
        (true, Some(items)) => Ok(items),
        _ => Err(ApiError {
            code: StatusCode::INTERNAL_SERVER_ERROR,
            message: outcome
                .error
                .unwrap_or_else(|| "Failed to generate images".to_string()),
        }),
    }
}
