use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateMemeDto {
    #[validate(length(
        min = 5,
        max = 500,
        message = "prompt must be between 5 and 500 characters."
    ))]
    pub prompt: String,
}

impl GenerateMemeDto {
    pub fn sanitized(&self) -> Self {
        Self {
            prompt: self.prompt.trim().replace(|c: char| c == '\n' || c == '\r', " "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_length_is_bounded() {
        let short = GenerateMemeDto {
            prompt: "cat".to_string(),
        };
        let long = GenerateMemeDto {
            prompt: "a".repeat(501),
        };
        let ok = GenerateMemeDto {
            prompt: "Hot dog, taco".to_string(),
        };

        assert!(short.validate().is_err());
        assert!(long.validate().is_err());
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn sanitized_flattens_newlines() {
        let dto = GenerateMemeDto {
            prompt: "  Hot dog,\ntaco\r\n ".to_string(),
        };

        assert_eq!(dto.sanitized().prompt, "Hot dog, taco");
    }
}
