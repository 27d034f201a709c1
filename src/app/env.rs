use serde::Deserialize;

pub const DEFAULT_TEXT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-2";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MEME_STORAGE_PATH: &str = "./meme_images";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSinkKind {
    Local,
    Backblaze,
    Passthrough,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Envy {
    pub app_env: String,
    pub port: Option<u16>,

    pub database_url: String,

    pub jwt_secret: String,

    pub openai_api_key: String,
    pub openai_text_model: Option<String>,
    pub openai_image_model: Option<String>,
    pub ai_timeout_secs: Option<u64>,

    pub asset_sink: Option<AssetSinkKind>,
    pub meme_storage_path: Option<String>,

    pub backblaze_key_id: Option<String>,
    pub backblaze_app_key: Option<String>,
    pub backblaze_bucket_id: Option<String>,
}

impl Envy {
    pub fn text_model(&self) -> &str {
        self.openai_text_model.as_deref().unwrap_or(DEFAULT_TEXT_MODEL)
    }

    pub fn image_model(&self) -> &str {
        self.openai_image_model
            .as_deref()
            .unwrap_or(DEFAULT_IMAGE_MODEL)
    }

    pub fn ai_timeout_secs(&self) -> u64 {
        self.ai_timeout_secs.unwrap_or(DEFAULT_AI_TIMEOUT_SECS)
    }

    pub fn asset_sink_kind(&self) -> AssetSinkKind {
        self.asset_sink.unwrap_or(AssetSinkKind::Local)
    }

    pub fn meme_storage_path(&self) -> &str {
        self.meme_storage_path
            .as_deref()
            .unwrap_or(DEFAULT_MEME_STORAGE_PATH)
    }

    /// Returns the key id, app key and bucket id, or the name of the first
    /// missing variable.
    pub fn backblaze_credentials(&self) -> Result<(String, String, String), &'static str> {
        let Some(key_id) = &self.backblaze_key_id else {
            return Err("BACKBLAZE_KEY_ID");
        };
        let Some(app_key) = &self.backblaze_app_key else {
            return Err("BACKBLAZE_APP_KEY");
        };
        let Some(bucket_id) = &self.backblaze_bucket_id else {
            return Err("BACKBLAZE_BUCKET_ID");
        };

        Ok((key_id.to_string(), app_key.to_string(), bucket_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required() -> Vec<(String, String)> {
        vec![
            ("APP_ENV".to_string(), "test".to_string()),
            ("DATABASE_URL".to_string(), "postgres://localhost/memes".to_string()),
            ("JWT_SECRET".to_string(), "secret".to_string()),
            ("OPENAI_API_KEY".to_string(), "sk-test".to_string()),
        ]
    }

    #[test]
    fn defaults_apply_when_optional_vars_are_missing() {
        let envy = envy::from_iter::<_, Envy>(required()).unwrap();

        assert_eq!(envy.text_model(), "gpt-3.5-turbo");
        assert_eq!(envy.image_model(), "dall-e-2");
        assert_eq!(envy.ai_timeout_secs(), 60);
        assert_eq!(envy.asset_sink_kind(), AssetSinkKind::Local);
        assert_eq!(envy.meme_storage_path(), "./meme_images");
        assert_eq!(envy.backblaze_credentials(), Err("BACKBLAZE_KEY_ID"));
    }

    #[test]
    fn asset_sink_is_parsed_from_lowercase_name() {
        let mut vars = required();
        vars.push(("ASSET_SINK".to_string(), "passthrough".to_string()));

        let envy = envy::from_iter::<_, Envy>(vars).unwrap();

        assert_eq!(envy.asset_sink_kind(), AssetSinkKind::Passthrough);
    }

    #[test]
    fn unknown_asset_sink_is_rejected() {
        let mut vars = required();
        vars.push(("ASSET_SINK".to_string(), "ftp".to_string()));

        assert!(envy::from_iter::<_, Envy>(vars).is_err());
    }
}
