use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use crate::{
    app::{errors::DefaultApiError, models::api_error::ApiError, util::time},
    auth::jwt::models::claims::Claims,
    users::models::user::User,
};

use super::config::JWT_EXP;

pub fn sign_jwt(user: &User, secret: &str) -> Result<String, ApiError> {
    let iat = time::current_time_in_secs();
    let claims = Claims {
        id: user.id.to_string(),
        wallet_address: user.wallet_address.to_string(),
        iat,
        exp: iat + JWT_EXP,
    };

    encode_claims(&claims, secret)
}

fn encode_claims(claims: &Claims, secret: &str) -> Result<String, ApiError> {
    match encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_ref()),
    ) {
        Ok(token) => Ok(token),
        Err(e) => {
            tracing::error!(%e);
            Err(DefaultApiError::InternalServerError.value())
        }
    }
}

pub fn decode_jwt(jwt: &str, secret: &str) -> Result<Claims, ErrorKind> {
    let result = decode::<Claims>(
        jwt,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    );

    match result {
        Ok(data) => Ok(data.claims),
        Err(e) => Err(e.kind().to_owned()),
    }
}
