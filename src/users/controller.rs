use axum::{extract::State, Json};

use crate::{
    app::models::{api_error::ApiError, bearer_from_request::BearerFromRequest},
    auth::jwt::models::claims::Claims,
    AppState,
};

use super::{models::user::User, service};

pub async fn get_user_from_request(
    State(state): State<AppState>,
    BearerFromRequest(authorization): BearerFromRequest,
) -> Result<Json<User>, ApiError> {
    let claims = Claims::from_header(authorization, &state.envy.jwt_secret)?;

    match service::get_user_by_id(&claims.id, &state.pool).await {
        Ok(user) => Ok(Json(user)),
        Err(e) => Err(e),
    }
}
