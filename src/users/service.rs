use sqlx::PgPool;

use crate::app::{errors::DefaultApiError, models::api_error::ApiError};

use super::{errors::UsersApiError, models::user::User};

/// Creates the user on first contact, otherwise rotates its nonce.
pub async fn upsert_user_with_new_nonce_as_admin(
    wallet_address: &str,
    pool: &PgPool,
) -> Result<User, ApiError> {
    let user = User::new(wallet_address);

    let sqlx_result = sqlx::query_as::<_, User>(
        "
        INSERT INTO users (
            id, wallet_address, nonce, is_active, updated_at, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (wallet_address) DO UPDATE
        SET nonce = EXCLUDED.nonce, updated_at = EXCLUDED.updated_at
        RETURNING *
        ",
    )
    .bind(&user.id)
    .bind(&user.wallet_address)
    .bind(&user.nonce)
    .bind(user.is_active)
    .bind(user.updated_at as i64)
    .bind(user.created_at as i64)
    .fetch_one(pool)
    .await;

    match sqlx_result {
        Ok(user) => Ok(user),
        Err(e) => {
            tracing::error!(%e);
            Err(DefaultApiError::InternalServerError.value())
        }
    }
}

pub async fn get_user_by_id(id: &str, pool: &PgPool) -> Result<User, ApiError> {
    let sqlx_result = sqlx::query_as::<_, User>(
        "
        SELECT * FROM users WHERE id = $1
        ",
    )
    .bind(id)
    .fetch_optional(pool)
    .await;

    match sqlx_result {
        Ok(user) => match user {
            Some(user) => Ok(user),
            None => Err(UsersApiError::UserNotFound.value()),
        },
        Err(e) => {
            tracing::error!(%e);
            Err(DefaultApiError::InternalServerError.value())
        }
    }
}
