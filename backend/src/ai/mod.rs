//! # AI Functions
//!
//! The remote functions the planner relies on: recipe generation, leftover
//! analysis and optional image generation. The domain only sees the
//! [`AiClient`] trait; [`openai_client::OpenAiClient`] talks to an
//! OpenAI-compatible HTTP API.

pub mod openai_client;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::models::recipe::GeneratedRecipe;

pub use openai_client::OpenAiClient;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("AI API key is not configured")]
    MissingApiKey,
    #[error("Network error calling AI service: {0}")]
    Network(#[from] reqwest::Error),
    #[error("AI service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Invalid AI response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait AiClient: Send + Sync {
    /// Run the recipe function; returns the raw assistant text
    async fn complete_recipes(&self, prompt: &str) -> Result<String, AiError>;

    /// Run the leftover analysis function over a prompt and photo URLs
    async fn analyze_leftovers(&self, prompt: &str, photo_urls: &[String]) -> Result<String, AiError>;

    /// Generate an image; `None` when image generation is disabled
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, AiError>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecipePayload {
    List(Vec<GeneratedRecipe>),
    Wrapped { recipes: Vec<GeneratedRecipe> },
}

/// Parse the recipe function's output.
///
/// Accepts a JSON array of recipes, an object with a `recipes` array, and
/// either of those inside a fenced code block or surrounded by prose.
pub fn parse_generated_recipes(raw: &str) -> Result<Vec<GeneratedRecipe>, AiError> {
    let body = strip_code_fence(raw.trim());

    if let Ok(payload) = serde_json::from_str::<RecipePayload>(body) {
        return Ok(payload.into_recipes());
    }

    // Fall back to the outermost JSON value embedded in the text
    let candidates = [('[', ']'), ('{', '}')];
    for (open, close) in candidates {
        if let (Some(start), Some(end)) = (body.find(open), body.rfind(close)) {
            if start < end {
                if let Ok(payload) = serde_json::from_str::<RecipePayload>(&body[start..=end]) {
                    return Ok(payload.into_recipes());
                }
            }
        }
    }

    Err(AiError::InvalidResponse(
        "expected a JSON array of recipe objects".to_string(),
    ))
}

impl RecipePayload {
    fn into_recipes(self) -> Vec<GeneratedRecipe> {
        match self {
            RecipePayload::List(recipes) => recipes,
            RecipePayload::Wrapped { recipes } => recipes,
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Skip the language tag on the opening line
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_array() {
        let recipes = parse_generated_recipes(r#"[{"title": "Soup"}, {"title": "Stew"}]"#).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[1].title, "Stew");
    }

    #[test]
    fn test_parse_wrapped_and_fenced() {
        let raw = "```json\n{\"recipes\": [{\"title\": \"Pasta\", \"meal_type\": \"dinner\"}]}\n```";
        let recipes = parse_generated_recipes(raw).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].meal_type.as_deref(), Some("dinner"));
    }

    #[test]
    fn test_parse_array_surrounded_by_prose() {
        let raw = "Here are your recipes:\n[{\"title\": \"Omelette\"}]\nEnjoy!";
        let recipes = parse_generated_recipes(raw).unwrap();
        assert_eq!(recipes[0].title, "Omelette");
    }

    #[test]
    fn test_parse_rejects_non_recipes() {
        assert!(matches!(
            parse_generated_recipes("I cannot help with that"),
            Err(AiError::InvalidResponse(_))
        ));
        assert!(parse_generated_recipes(r#"{"title": "Lonely"}"#).is_err());
    }

    #[test]
    fn test_parse_tolerates_null_fields() {
        let raw = r#"[
            {"title": "Soup", "ingredients": [{"item": "egg", "quantity": 2, "unit": null}]},
            {"title": "Stew", "description": null, "allergens": null, "nutritional_info": null},
            {"description": "no title"}
        ]"#;
        let recipes = parse_generated_recipes(raw).unwrap();
        assert_eq!(recipes.len(), 3);
        assert_eq!(recipes[0].ingredients[0].unit, "");
        assert_eq!(recipes[1].description, "");
        assert!(recipes[1].allergens.is_empty());
        // Left for the caller to drop
        assert_eq!(recipes[2].title, "");
    }
}
