//! Provider settings and credentials.
//!
//! Secrets come from the environment (optionally seeded from a `.env` file).
//! Everything else has a default and can be overridden by a TOML file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const MAP_API_KEY_VAR: &str = "BAIDU_MAP_AK";
pub const LLM_API_KEY_VAR: &str = "DEEPSEEK_API_KEY";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub map: MapConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Results requested from place search. Only the first page is fetched.
    pub page_size: u32,
    pub degrade: DegradeConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.map.baidu.com".to_string(),
            timeout_secs: 10,
            page_size: 20,
            degrade: DegradeConfig::default(),
        }
    }
}

/// Provider failures that make place search fall back to geocoding.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DegradeConfig {
    /// Substrings of the provider message ("disabled", "permission").
    pub phrases: Vec<String>,
    pub statuses: Vec<i64>,
}

impl Default for DegradeConfig {
    fn default() -> Self {
        Self {
            phrases: vec!["禁用".to_string(), "权限".to_string()],
            statuses: vec![200, 401],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.deepseek.com/v1/chat/completions".to_string(),
            model: "deepseek-chat".to_string(),
            timeout_secs: 30,
            temperature: 0.3,
            max_tokens: 500,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

/// API keys for the upstream providers.
///
/// NOTE: Do NOT derive `Debug`, the keys would end up in logs.
#[derive(Clone, Default)]
pub struct Credentials {
    pub map_api_key: Option<String>,
    pub llm_api_key: Option<String>,
}

impl Credentials {
    /// Read both keys from the process environment. Blank values count as absent.
    pub fn from_env() -> Self {
        Self {
            map_api_key: non_blank_var(MAP_API_KEY_VAR),
            llm_api_key: non_blank_var(LLM_API_KEY_VAR),
        }
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
