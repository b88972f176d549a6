//! # Configuration
//!
//! Runtime settings read from the environment (a `.env` file is honoured).
//! Every value has a default except the AI API key; without a key the
//! backend still starts and only the AI endpoints fail.

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";
const DEFAULT_AI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_AI_TEXT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;

/// Settings for the remote AI functions
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub text_model: String,
    /// Image generation is disabled when no model is configured
    pub image_model: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
    /// Prefix used when building URLs for stored files
    pub public_url: String,
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match lookup("MEAL_PLANNER_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir(&lookup)?,
        };

        let bind_addr_raw =
            lookup("MEAL_PLANNER_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr_raw
            .parse()
            .with_context(|| format!("Invalid MEAL_PLANNER_BIND_ADDR: {}", bind_addr_raw))?;

        let cors_origin =
            lookup("MEAL_PLANNER_CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        let public_url = lookup("MEAL_PLANNER_PUBLIC_URL")
            .unwrap_or_else(|| format!("http://{}", bind_addr))
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match lookup("AI_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid AI_TIMEOUT_SECS: {}", raw))?,
            None => DEFAULT_AI_TIMEOUT_SECS,
        };

        let ai = AiConfig {
            base_url: lookup("AI_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key: lookup("AI_API_KEY").filter(|k| !k.trim().is_empty()),
            text_model: lookup("AI_TEXT_MODEL").unwrap_or_else(|| DEFAULT_AI_TEXT_MODEL.to_string()),
            image_model: lookup("AI_IMAGE_MODEL").filter(|m| !m.trim().is_empty()),
            timeout: Duration::from_secs(timeout_secs),
        };

        let config = AppConfig {
            data_dir,
            bind_addr,
            cors_origin,
            public_url,
            ai,
        };
        info!(
            "Loaded configuration: data_dir={}, bind_addr={}, ai_base_url={}, image_generation={}",
            config.data_dir.display(),
            config.bind_addr,
            config.ai.base_url,
            config.ai.image_model.is_some()
        );
        Ok(config)
    }
}

/// ~/Documents/Meal Planner
fn default_data_dir<F>(lookup: &F) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let home_dir = lookup("HOME")
        .or_else(|| lookup("USERPROFILE"))
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(PathBuf::from(home_dir).join("Documents").join("Meal Planner"))
}
