use std::time::Duration;

use crate::memes::apis::TextGenerator;

const PARSER_SYSTEM_PROMPT: &str = r#"You are a prompt parser for a meme image generation system. Your task is to identify exactly 2 distinct items from the user's input.

IMPORTANT RULE: When the user mentions a broad theme or category (e.g., "theme of taiwan food"), don't return the theme itself. Instead, identify 2 specific, concrete examples that represent that theme (e.g., "Bubble tea" and "Taiwanese hot pot").

If the user mentions more than 2 items, select the 2 most interesting or distinctive ones.
If the user mentions only 1 specific item, create a second related item that would pair well with it.

Examples:
- Input: "A theme of taiwan food" -> Output: ["Bubble tea", "Taiwanese hot pot"]
- Input: "Make memes about cats" -> Output: ["Cat knocking things off a table", "Cat sleeping in a weird position"]
- Input: "Anime character, superhero" -> Output: ["Anime character with big eyes", "Muscular superhero in colorful costume"]

Return ONLY a JSON array with exactly 2 strings, nothing else."#;

const PARSER_MAX_TOKENS: u16 = 100;
const PARSER_TEMPERATURE: f32 = 0.7;
const BLANK_PROMPT_SUBJECT: &str = "meme soldier";

/// Splits a free-text prompt into exactly two concrete items.
///
/// The text model is asked first. Its reply is read as a JSON array, then as
/// numbered `1.`/`2.` lines. When neither yields two items, or the model call
/// fails or times out, the prompt itself is split on commas. Both returned
/// strings are always non-empty.
pub async fn parse_prompt(
    prompt: &str,
    text_generator: &dyn TextGenerator,
    timeout: Duration,
) -> [String; 2] {
    let user_prompt = [
        "Parse this request and give me exactly 2 distinct items to generate: '",
        prompt,
        "'",
    ]
    .concat();

    let completion = tokio::time::timeout(
        timeout,
        text_generator.complete(
            PARSER_SYSTEM_PROMPT,
            &user_prompt,
            PARSER_MAX_TOKENS,
            Some(PARSER_TEMPERATURE),
        ),
    )
    .await;

    match completion {
        Ok(Ok(text)) => match parse_model_reply(&text) {
            Some(items) => return items,
            None => tracing::warn!(%text, "unusable prompt parser reply, splitting prompt"),
        },
        Ok(Err(e)) => tracing::warn!(%e, "prompt parser call failed, splitting prompt"),
        Err(_) => tracing::warn!("prompt parser call timed out, splitting prompt"),
    }

    fallback_items(prompt)
}

pub fn parse_model_reply(text: &str) -> Option<[String; 2]> {
    parse_json_items(text).or_else(|| parse_numbered_items(text))
}

fn parse_json_items(text: &str) -> Option<[String; 2]> {
    let text = text.trim();
    if !(text.starts_with('[') && text.ends_with(']')) {
        return None;
    }

    let items: Vec<String> = serde_json::from_str(text).ok()?;
    first_two(items)
}

fn parse_numbered_items(text: &str) -> Option<[String; 2]> {
    let items = text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("1.") || line.starts_with("2."))
        .filter_map(|line| line.split_once('.').map(|(_, item)| item.to_string()))
        .collect();

    first_two(items)
}

fn first_two(items: Vec<String>) -> Option<[String; 2]> {
    let mut items = items.into_iter().map(|item| item.trim().to_string());
    let first = items.next()?;
    let second = items.next()?;

    if first.is_empty() || second.is_empty() {
        return None;
    }

    Some([first, second])
}

/// Splits the prompt itself when the model gives nothing usable.
pub fn fallback_items(prompt: &str) -> [String; 2] {
    let prompt = match prompt.trim() {
        "" => BLANK_PROMPT_SUBJECT,
        trimmed => trimmed,
    };

    if prompt.contains(',') {
        let mut segments = prompt
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty());

        match (segments.next(), segments.next()) {
            (Some(first), Some(second)) => return [first.to_string(), second.to_string()],
            (Some(only), None) => {
                return [
                    only.to_string(),
                    ["Pixel art ", only, " in a different style"].concat(),
                ]
            }
            _ => {}
        }
    }

    [
        prompt.to_string(),
        ["Pixel art variant of ", prompt].concat(),
    ]
}
