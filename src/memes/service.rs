use std::{sync::Arc, time::Duration};

use bytes::Bytes;
use futures::future::join_all;

use crate::app::util::time;

use super::{
    apis::{ByteFetcher, ImageGenerator, TextGenerator},
    models::{generated_asset::GeneratedAsset, generation_outcome::GenerationOutcome},
    sinks::AssetSink,
    util::{
        coin_icon::{coin_icon_file_name, derive_coin_icon},
        names::{generate_random_name, generate_soldier_name, RANDOM_NAME_PREFIX},
        prompt_parser::parse_prompt,
    },
};

pub const IMAGE_SIZE: &str = "1024x1024";
const IMAGE_EXTENSION: &str = "png";

pub fn icon_prompt(item: &str) -> String {
    format!(
        "Create a simple, clean, pixel art icon of {item}.
The image should:
- Be a single object or character with a simple background
- Have a clean, minimalist design suitable for an icon
- Use pixel art style with clear outlines and flat colors
- NOT be a comic panel, scene, or conversational image
- Contain no speech bubbles, captions or dialogue
- Centered composition with the subject taking up most of the frame
- Be suitable for use as a game character icon or token"
    )
}

/// `{unix_secs}_{ordinal}_{MemeSoldier_xxxxx}.png`
pub fn asset_file_name(ordinal: usize) -> String {
    format!(
        "{}_{}_{}.{}",
        time::current_time_in_secs(),
        ordinal,
        generate_random_name(RANDOM_NAME_PREFIX),
        IMAGE_EXTENSION
    )
}

/// Turns a prompt into up to two named meme assets.
///
/// Built once at startup from configuration and shared through `AppState`.
#[derive(Clone)]
pub struct MemeGenerator {
    pub text_generator: Arc<dyn TextGenerator>,
    pub image_generator: Arc<dyn ImageGenerator>,
    pub fetcher: Arc<dyn ByteFetcher>,
    pub sink: AssetSink,
    pub image_model: String,
    pub timeout: Duration,
}

impl MemeGenerator {
    pub async fn generate_assets(&self, prompt: &str) -> GenerationOutcome {
        let items = parse_prompt(prompt, self.text_generator.as_ref(), self.timeout).await;

        let results = join_all(
            items
                .iter()
                .enumerate()
                .map(|(ordinal, item)| self.generate_item(ordinal, item)),
        )
        .await;

        let mut assets = Vec::new();
        let mut failures = Vec::new();
        for (item, result) in items.iter().zip(results) {
            match result {
                Ok(asset) => assets.push(asset),
                Err(reason) => {
                    tracing::warn!(%item, %reason, "skipping item");
                    failures.push([item.as_str(), ": ", &reason].concat());
                }
            }
        }

        if assets.is_empty() {
            let error = ["Failed to generate any images. ", &failures.join("; ")].concat();
            tracing::error!(%prompt, %error);
            return GenerationOutcome::failed(error);
        }

        GenerationOutcome::succeeded(assets)
    }

    async fn generate_item(&self, ordinal: usize, item: &str) -> Result<GeneratedAsset, String> {
        let (image_url, coin_icon_url) = self.generate_asset(ordinal, item).await?;
        let name = generate_soldier_name(item, self.text_generator.as_ref(), self.timeout).await;

        Ok(GeneratedAsset {
            name,
            prompt: item.to_string(),
            image_url,
            coin_icon_url,
        })
    }

    /// Returns the image url and coin icon url for one item.
    pub async fn generate_asset(
        &self,
        ordinal: usize,
        item: &str,
    ) -> Result<(String, String), String> {
        let generation = tokio::time::timeout(
            self.timeout,
            self.image_generator
                .generate_image(&icon_prompt(item), IMAGE_SIZE, &self.image_model),
        )
        .await;

        let remote_url = match generation {
            Ok(Ok(url)) => url,
            Ok(Err(e)) => return Err(e.message),
            Err(_) => return Err("Image generation timed out.".to_string()),
        };

        if !self.sink.persists_bytes() {
            return Ok((remote_url.clone(), remote_url));
        }

        let data = match tokio::time::timeout(self.timeout, self.fetcher.fetch(&remote_url)).await
        {
            Ok(Ok(data)) => data,
            Ok(Err(e)) => return Err(e.message),
            Err(_) => return Err("Image download timed out.".to_string()),
        };

        let file_name = asset_file_name(ordinal);
        let image_url = match tokio::time::timeout(
            self.timeout,
            self.sink.store(&file_name, &mime::IMAGE_PNG, data.clone()),
        )
        .await
        {
            Ok(Ok(url)) => url,
            Ok(Err(e)) => return Err(e.message),
            Err(_) => return Err("Image upload timed out.".to_string()),
        };

        let coin_icon_url = self.store_coin_icon(&file_name, data).await;

        Ok((image_url.clone(), coin_icon_url.unwrap_or(image_url)))
    }

    async fn store_coin_icon(&self, file_name: &str, data: Bytes) -> Option<String> {
        let icon = match tokio::task::spawn_blocking(move || derive_coin_icon(&data)).await {
            Ok(Ok(icon)) => icon,
            Ok(Err(e)) => {
                tracing::warn!(%e, %file_name, "coin icon derivation failed");
                return None;
            }
            Err(e) => {
                tracing::warn!(%e, %file_name, "coin icon task failed");
                return None;
            }
        };

        let upload = tokio::time::timeout(
            self.timeout,
            self.sink.store(
                &coin_icon_file_name(file_name),
                &mime::IMAGE_PNG,
                Bytes::from(icon),
            ),
        )
        .await;

        match upload {
            Ok(Ok(url)) => Some(url),
            Ok(Err(e)) => {
                tracing::warn!(%e, %file_name, "coin icon upload failed");
                None
            }
            Err(_) => {
                tracing::warn!(%file_name, "coin icon upload timed out");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use async_trait::async_trait;
    use axum::http::StatusCode;
    use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};

    use super::*;
    use tokio::sync::Mutex;

    use crate::{
        app::models::api_error::ApiError,
        memes::sinks::{backblaze::stub_server, local::LocalStorage},
    };

    pub struct FakeText {
        pub items_reply: Option<String>,
        pub name_reply: Option<String>,
    }

    #[async_trait]
    impl TextGenerator for FakeText {
        async fn complete(
            &self,
            _system_prompt: &str,
            user_prompt: &str,
            _max_tokens: u16,
            _temperature: Option<f32>,
        ) -> Result<String, ApiError> {
            let reply = match user_prompt.starts_with("Parse this request") {
                true => &self.items_reply,
                false => &self.name_reply,
            };

            reply.clone().ok_or(ApiError {
                code: StatusCode::BAD_GATEWAY,
                message: "text model unavailable".to_string(),
            })
        }
    }

    /// Fails for any icon prompt mentioning one of `fail_for`.
    pub struct FakeImages {
        pub fail_for: Vec<&'static str>,
    }

    #[async_trait]
    impl ImageGenerator for FakeImages {
        async fn generate_image(
            &self,
            prompt: &str,
            size: &str,
            _model: &str,
        ) -> Result<String, ApiError> {
            assert_eq!(size, IMAGE_SIZE);

            if self.fail_for.iter().any(|item| prompt.contains(item)) {
                return Err(ApiError {
                    code: StatusCode::BAD_GATEWAY,
                    message: "OpenAI request failed with status 500".to_string(),
                });
            }

            Ok("https://images.test/generated.png".to_string())
        }
    }

    pub struct FakeFetcher(pub Option<Bytes>);

    #[async_trait]
    impl ByteFetcher for FakeFetcher {
        async fn fetch(&self, _url: &str) -> Result<Bytes, ApiError> {
            self.0.clone().ok_or(ApiError {
                code: StatusCode::BAD_GATEWAY,
                message: "Failed to get url response: 404".to_string(),
            })
        }
    }

    pub fn png_fixture(width: u32, height: u32) -> Bytes {
        let img: RgbImage = ImageBuffer::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        Bytes::from(buf)
    }

    pub fn generator(
        items_reply: Option<&str>,
        fail_for: Vec<&'static str>,
        fetched: Option<Bytes>,
        sink: AssetSink,
    ) -> MemeGenerator {
        MemeGenerator {
            text_generator: Arc::new(FakeText {
                items_reply: items_reply.map(str::to_string),
                name_reply: Some("\"Captain Crunch\"".to_string()),
            }),
            image_generator: Arc::new(FakeImages { fail_for }),
            fetcher: Arc::new(FakeFetcher(fetched)),
            sink,
            image_model: "dall-e-2".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    fn items(outcome: &GenerationOutcome) -> &[GeneratedAsset] {
        outcome.items.as_deref().unwrap_or_default()
    }

    #[test]
    fn icon_prompt_only_varies_by_item() {
        let prompt = icon_prompt("Bubble tea");

        assert!(prompt.starts_with("Create a simple, clean, pixel art icon of Bubble tea."));
        assert!(prompt.contains("NOT be a comic panel"));
        assert_eq!(
            icon_prompt("Hot pot").replace("Hot pot", "X"),
            prompt.replace("Bubble tea", "X")
        );
    }

    #[test]
    fn asset_file_names_are_unique_and_ordered() {
        let a = asset_file_name(0);
        let b = asset_file_name(1);

        assert_ne!(a, b);
        assert!(a.ends_with(".png"));
        assert!(a.contains("_0_MemeSoldier_"));
        assert!(b.contains("_1_MemeSoldier_"));
    }

    #[tokio::test]
    async fn pass_through_returns_remote_urls() {
        let generator = generator(
            Some(r#"["Bubble tea", "Hot pot"]"#),
            vec![],
            None,
            AssetSink::PassThrough,
        );

        let outcome = generator.generate_assets("A theme of taiwan food").await;

        assert!(outcome.success);
        let items = items(&outcome);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].prompt, "Bubble tea");
        assert_eq!(items[1].prompt, "Hot pot");
        for item in items {
            assert_eq!(item.name, "Captain Crunch");
            assert_eq!(item.image_url, "https://images.test/generated.png");
            assert_eq!(item.coin_icon_url, item.image_url);
        }
    }

    #[tokio::test]
    async fn one_failed_item_is_dropped() {
        let generator = generator(None, vec!["taco"], None, AssetSink::PassThrough);

        let outcome = generator.generate_assets("Hot dog, taco").await;

        assert!(outcome.success);
        let items = items(&outcome);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].prompt, "Hot dog");
    }

    #[tokio::test]
    async fn all_failed_items_report_failure() {
        let generator = generator(None, vec!["Hot dog"], None, AssetSink::PassThrough);

        let outcome = generator.generate_assets("Hot dog").await;

        assert!(!outcome.success);
        assert!(outcome.items.is_none());
        let error = outcome.error.unwrap();
        assert!(!error.is_empty());
        assert!(error.contains("Pixel art variant of Hot dog"));
    }

    #[tokio::test]
    async fn local_sink_writes_image_and_coin_icon() {
        let dir = tempfile::tempdir().unwrap();
        let fetched = png_fixture(320, 200);
        let generator = generator(
            Some(r#"["Bubble tea", "Hot pot"]"#),
            vec![],
            Some(fetched.clone()),
            AssetSink::Local(LocalStorage::new(dir.path())),
        );

        let outcome = generator.generate_assets("taiwan food").await;

        let items = items(&outcome);
        assert_eq!(items.len(), 2);
        for item in items {
            let file_name = item.image_url.strip_prefix("/images/").unwrap();
            assert_eq!(item.coin_icon_url, ["/images/coin_", file_name].concat());

            let stored = std::fs::read(dir.path().join(file_name)).unwrap();
            assert_eq!(stored, fetched.as_ref());

            let coin = std::fs::read(dir.path().join(["coin_", file_name].concat())).unwrap();
            let coin = image::load_from_memory(&coin).unwrap();
            assert_eq!((coin.width(), coin.height()), (256, 256));
        }
    }

    #[tokio::test]
    async fn coin_icon_failure_keeps_item() {
        let dir = tempfile::tempdir().unwrap();
        let generator = generator(
            None,
            vec![],
            Some(Bytes::from_static(b"not an image")),
            AssetSink::Local(LocalStorage::new(dir.path())),
        );

        let outcome = generator.generate_assets("Hot dog").await;

        assert!(outcome.success);
        for item in items(&outcome) {
            assert_eq!(item.coin_icon_url, item.image_url);
        }
    }

    #[tokio::test]
    async fn download_failure_skips_item() {
        let dir = tempfile::tempdir().unwrap();
        let generator = generator(
            None,
            vec![],
            None,
            AssetSink::Local(LocalStorage::new(dir.path())),
        );

        let outcome = generator.generate_assets("Hot dog, taco").await;

        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("404"));
    }

    #[tokio::test]
    async fn stalled_upload_becomes_item_failure() {
        let base = stub_server::stalled().await;
        let b2 = stub_server::logged_in_b2(&base);
        let mut generator = generator(
            None,
            vec![],
            Some(png_fixture(64, 64)),
            AssetSink::Backblaze(Arc::new(Mutex::new(b2))),
        );
        generator.timeout = Duration::from_secs(1);

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            generator.generate_assets("Hot dog, taco"),
        )
        .await
        .unwrap();

        assert!(!outcome.success);
        let error = outcome.error.unwrap();
        assert!(error.contains("Hot dog: Image upload timed out."));
        assert!(error.contains("taco: Image upload timed out."));
    }
}
