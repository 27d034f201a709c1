use std::time::Duration;

use rand::Rng;

use crate::memes::apis::TextGenerator;

pub const RANDOM_NAME_PREFIX: &str = "MemeSoldier";

const NAMER_SYSTEM_PROMPT: &str = "You are a creative meme name generator. Generate a short, catchy, memorable name for a meme character based on the prompt. The name should be 1-3 words only.";
const NAMER_MAX_TOKENS: u16 = 20;

pub fn generate_random_name(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..5).map(|_| rng.gen_range(b'a'..=b'z') as char).collect();

    [prefix, "_", &suffix].concat()
}

/// Asks the text model for a 1-3 word display name, falling back to a random
/// `MemeSoldier_xxxxx` name.
pub async fn generate_soldier_name(
    item: &str,
    text_generator: &dyn TextGenerator,
    timeout: Duration,
) -> String {
    let user_prompt = [
        "Generate a catchy meme soldier name based on this description: ",
        item,
    ]
    .concat();

    let completion = tokio::time::timeout(
        timeout,
        text_generator.complete(NAMER_SYSTEM_PROMPT, &user_prompt, NAMER_MAX_TOKENS, None),
    )
    .await;

    match completion {
        Ok(Ok(text)) => {
            let name = text
                .trim()
                .trim_matches(|c: char| c == '"' || c == '\'')
                .trim();
            if !name.is_empty() {
                return name.to_string();
            }
        }
        Ok(Err(e)) => tracing::warn!(%e, "name generation failed"),
        Err(_) => tracing::warn!("name generation timed out"),
    }

    generate_random_name(RANDOM_NAME_PREFIX)
}
