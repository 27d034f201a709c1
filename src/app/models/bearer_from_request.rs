use axum::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use axum_macros::FromRequestParts;

use super::api_error::ApiError;

#[derive(FromRequestParts)]
#[from_request(rejection(ApiError))]
pub struct BearerFromRequest(#[from_request(via(TypedHeader))] pub Authorization<Bearer>);
