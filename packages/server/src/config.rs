use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub congress_api_key: String,
    /// Shared secret for the administrative sync/backfill endpoints
    pub cron_secret: String,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            congress_api_key: env::var("CONGRESS_API_KEY")
                .context("CONGRESS_API_KEY must be set")?,
            cron_secret: env::var("CRON_SECRET").context("CRON_SECRET must be set")?,
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok(),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
        })
    }
}
