//! Command line arguments

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use auditlens_core::AuditConfig;
use clap::{Parser, ValueEnum};
use serde::de::DeserializeOwned;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

fn parse_max_tasks(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if n == 0 {
        Err("max tasks must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// auditlens: a weighted SEO audit for a single page
#[derive(Parser, Debug)]
#[command(name = "auditlens")]
#[command(
    version,
    about = "auditlens: a weighted SEO audit for a single page",
    long_about = "Scores a page against 117 checks in five categories (technical, on-page, \
content, user experience, local SEO) and ranks the fixes that matter most.",
    after_help = "\
Examples:
  auditlens https://example.com                        Audit a live page
  auditlens page.html --html --url https://example.com Audit a saved page
  auditlens https://example.com -k \"emergency plumber\" Score against a target keyword
  auditlens https://example.com -f json -s reports/    JSON report, also saved to reports/

Developed by Pon Datalab"
)]
pub struct Cli {
    /// URL to audit, or a path to a local HTML file with --html
    pub target: String,

    /// Treat TARGET as a local HTML file
    #[arg(long, requires = "url")]
    pub html: bool,

    /// Page URL used when auditing a local file
    #[arg(long)]
    pub url: Option<String>,

    /// Config file (default: ./auditlens.toml if present)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Skip the Local SEO category
    #[arg(long)]
    pub no_local_seo: bool,

    /// Maximum number of actionable tasks
    #[arg(long, value_parser = parse_max_tasks)]
    pub max_tasks: Option<usize>,

    /// Disable AI task augmentation
    #[arg(long)]
    pub no_ai: bool,

    /// JSON file with Lighthouse-style performance metrics
    #[arg(long, value_name = "PATH")]
    pub performance: Option<PathBuf>,

    /// JSON file with the business profile
    #[arg(long, value_name = "PATH")]
    pub business: Option<PathBuf>,

    /// Target keyword (repeatable)
    #[arg(short = 'k', long = "keyword", value_name = "KW")]
    pub keywords: Vec<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the report to PATH (file or directory)
    #[arg(short = 's', long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply flags on top of file and environment configuration
    pub fn apply(&self, config: &mut AuditConfig) {
        if self.no_local_seo {
            config.include_local_seo = false;
        }
        if let Some(max_tasks) = self.max_tasks {
            config.max_tasks = max_tasks;
        }
        if self.no_ai {
            config.ai.enabled = false;
        }
        if !self.keywords.is_empty() {
            config.target_keywords = self.keywords.clone();
        }
    }

    /// URL of the audited page
    pub fn page_url(&self) -> Result<Url> {
        let raw = if self.html {
            self.url
                .as_deref()
                .ok_or_else(|| anyhow!("--html requires --url"))?
        } else {
            self.target.as_str()
        };

        let url = Url::parse(raw).with_context(|| format!("invalid URL: {raw}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("unsupported URL scheme '{}': use http or https", url.scheme());
        }
        Ok(url)
    }
}

/// Read a JSON enrichment file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditlens_core::facts::PerformanceMetrics;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["auditlens", "https://example.com"]).unwrap();
        assert_eq!(cli.target, "https://example.com");
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.html);
        assert!(cli.keywords.is_empty());

        let mut config = AuditConfig::default();
        cli.apply(&mut config);
        assert_eq!(config, AuditConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "auditlens",
            "https://example.com",
            "--no-local-seo",
            "--no-ai",
            "--max-tasks",
            "5",
            "-k",
            "emergency plumber",
            "--keyword",
            "blocked drains",
            "-f",
            "json",
        ])
        .unwrap();

        let mut config = AuditConfig::default();
        config.target_keywords = vec!["from file".to_string()];
        cli.apply(&mut config);

        assert!(!config.include_local_seo);
        assert!(!config.ai.enabled);
        assert_eq!(config.max_tasks, 5);
        assert_eq!(config.target_keywords, vec!["emergency plumber", "blocked drains"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_rejects_zero_max_tasks() {
        assert!(Cli::try_parse_from(["auditlens", "https://example.com", "--max-tasks", "0"]).is_err());
    }

    #[test]
    fn test_html_requires_url() {
        assert!(Cli::try_parse_from(["auditlens", "page.html", "--html"]).is_err());

        let cli = Cli::try_parse_from([
            "auditlens",
            "page.html",
            "--html",
            "--url",
            "https://example.com/about",
        ])
        .unwrap();
        assert_eq!(cli.page_url().unwrap().as_str(), "https://example.com/about");
    }

    #[test]
    fn test_page_url_validation() {
        let cli = Cli::try_parse_from(["auditlens", "ftp://example.com"]).unwrap();
        assert!(cli.page_url().is_err());

        let cli = Cli::try_parse_from(["auditlens", "example.com"]).unwrap();
        assert!(cli.page_url().is_err());
    }

    #[test]
    fn test_load_json_enrichment() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lighthouse.json");
        fs::write(&path, r#"{"lcp_ms": 2100, "cls": 0.05, "accessibility_score": 93}"#).unwrap();

        let metrics: PerformanceMetrics = load_json(&path).unwrap();
        assert_eq!(metrics.lcp_ms, 2100.0);
        assert_eq!(metrics.accessibility_score, 93);
        assert!(metrics.keyboard_ok);

        let missing = load_json::<PerformanceMetrics>(&dir.path().join("nope.json"));
        assert!(missing.is_err());
    }
}
