use anyhow::{anyhow, Result};
use std::env;

use crate::models::SchemaVariant;
use crate::services::gemini::DEFAULT_BASE_URL;

/// Checked first.
pub const PRIMARY_API_KEY_ENV: &str = "VITE_API_KEY";
/// Older deployments only set this one.
pub const LEGACY_API_KEY_ENV: &str = "API_KEY";

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub schema: SchemaVariant,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(PRIMARY_API_KEY_ENV).or_else(|| {
            let legacy = get(LEGACY_API_KEY_ENV);
            if legacy.is_some() {
                log::debug!(
                    "🔑 {} not set, using {}",
                    PRIMARY_API_KEY_ENV,
                    LEGACY_API_KEY_ENV
                );
            }
            legacy
        });

        let schema = match get("ANALYSIS_SCHEMA") {
            Some(raw) => raw
                .parse::<SchemaVariant>()
                .map_err(|e| anyhow!("ANALYSIS_SCHEMA: {}", e))?,
            None => SchemaVariant::default(),
        };

        Ok(Self {
            api_key,
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            schema,
        })
    }
}
