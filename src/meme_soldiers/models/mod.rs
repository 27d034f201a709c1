pub mod meme_soldier;
pub mod mint_response;
