use crate::{app::models::api_error::ApiError, users, AppState};

use super::{
    dtos::verify_wallet_dto::VerifyWalletDto,
    jwt::util::sign_jwt,
    models::{access_info::AccessInfo, nonce_info::NonceInfo},
};

pub async fn get_wallet_nonce(
    wallet_address: &str,
    state: &AppState,
) -> Result<NonceInfo, ApiError> {
    let user =
        users::service::upsert_user_with_new_nonce_as_admin(wallet_address, &state.pool).await?;

    Ok(NonceInfo {
        wallet_address: user.wallet_address,
        nonce: user.nonce,
    })
}

/// Issues an access token for the wallet and rotates its nonce so the next
/// login signs a fresh message.
///
/// The signature is accepted as-is; no recovery against the nonce is done.
pub async fn verify_wallet(dto: &VerifyWalletDto, state: &AppState) -> Result<AccessInfo, ApiError> {
    let user =
        users::service::upsert_user_with_new_nonce_as_admin(&dto.wallet_address, &state.pool)
            .await?;

    if !user.is_active {
        return Err(users::errors::UsersApiError::UserInactive.value());
    }

    let access_token = sign_jwt(&user, &state.envy.jwt_secret)?;
    tracing::info!(wallet_address = %user.wallet_address, "issued access token");

    Ok(AccessInfo::bearer(access_token))
}
