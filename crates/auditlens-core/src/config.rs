//! Audit configuration
//!
//! Loaded from TOML, with sources applied in this order (later wins):
//! 1. Built-in defaults
//! 2. Config file (`--config <path>` or `./auditlens.toml`)
//! 3. Environment variables
//! 4. Command line flags (applied by the caller)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::prioritize::DEFAULT_MAX_TASKS;

/// File name looked up in the working directory when no path is given
pub const CONFIG_FILE_NAME: &str = "auditlens.toml";

/// API key variables, in lookup order
pub const API_KEY_VARS: [&str; 2] = ["OPENROUTER_API_KEY", "DEEPSEEK_API_KEY"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Cap on the number of actionable tasks
    pub max_tasks: usize,
    /// Run the Local SEO category; when false it is skipped and the
    /// achievable overall score drops to 86
    pub include_local_seo: bool,
    /// Keywords the page should rank for. Empty means "derive from content".
    pub target_keywords: Vec<String>,
    pub crawl: CrawlSettings,
    pub ai: AiSettings,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            max_tasks: DEFAULT_MAX_TASKS,
            include_local_seo: true,
            target_keywords: Vec::new(),
            crawl: CrawlSettings::default(),
            ai: AiSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// HEAD-probe /robots.txt and /sitemap.xml
    pub probe_site_files: bool,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: format!(
                "Mozilla/5.0 (compatible; auditlens/{})",
                env!("CARGO_PKG_VERSION")
            ),
            probe_site_files: true,
        }
    }
}

impl CrawlSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub enabled: bool,
    /// OpenAI-compatible chat completions endpoint
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            model: "deepseek/deepseek-chat".to_string(),
            timeout_secs: 10,
            max_tokens: 2000,
            temperature: 0.3,
            api_key: None,
        }
    }
}

impl AiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AuditConfig {
    /// Read and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: AuditConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// `./auditlens.toml` if it exists
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        candidate.is_file().then_some(candidate)
    }

    /// Load from `path`, else from a discovered file in `dir`, else defaults.
    /// Environment overrides are applied on top.
    pub fn resolve(path: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        let mut config = match path.map(Path::to_path_buf).or_else(|| Self::discover(dir)) {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Apply overrides using `lookup` to read variables
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = API_KEY_VARS.iter().find_map(|&name| set(name)) {
            self.ai.api_key = Some(key);
        }
        if let Some(model) = set("AUDITLENS_AI_MODEL") {
            self.ai.model = model;
        }
        if let Some(endpoint) = set("AUDITLENS_AI_ENDPOINT") {
            self.ai.endpoint = endpoint;
        }
        if let Some(value) = set("AUDITLENS_MAX_TASKS").and_then(|v| v.trim().parse().ok()) {
            self.max_tasks = value;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tasks == 0 {
            return Err(ConfigError::Invalid(
                "max_tasks must be at least 1".to_string(),
            ));
        }
        if self.ai.enabled && self.ai.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "ai.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.crawl.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "crawl.timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
