pub mod coin_icon;
pub mod names;
pub mod prompt_parser;
