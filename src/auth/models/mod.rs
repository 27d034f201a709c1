pub mod access_info;
pub mod nonce_info;
