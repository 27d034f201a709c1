use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyWalletDto {
    #[validate(length(
        min = 1,
        max = 128,
        message = "wallet_address must be between 1 and 128 characters."
    ))]
    pub wallet_address: String,
    #[validate(length(min = 1, message = "signature must not be empty."))]
    pub signature: String,
}
