pub mod generate_meme_dto;
