//! # auditlens-core
//!
//! Core library for scoring web pages against a weighted multi-category
//! audit catalog.
//!
//! This library provides:
//! - Page fact extraction from HTML (meta tags, headings, links, JSON-LD, ...)
//! - A catalog of 117 checks across five categories
//! - Weighted score aggregation and a ranked, capped remediation task list
//! - An async orchestrator with optional AI task augmentation and a
//!   deterministic fallback
//!
//! ## Features
//!
//! - `default`: Scoring pipeline and HTML extraction, no network access
//! - `fetch`: Live page crawling (`HttpCrawler`) and LLM task augmentation
//!   (`LlmAugmenter`) via reqwest
//!
//! ## Example
//!
//! ```no_run
//! use auditlens_core::{AuditConfig, Auditor, StaticPage};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let html = r#"<html><head><title>Example</title></head><body></body></html>"#;
//!
//! let auditor = Auditor::standard(AuditConfig::default())?;
//! let result = auditor
//!     .run(&StaticPage::new(html), "https://example.com/")
//!     .await;
//!
//! println!("{}/100", result.overall_score);
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod audit;
pub mod augment;
pub mod catalog;
pub mod config;
pub mod crawl;
pub mod error;
pub mod facts;
pub mod impact;
pub mod prioritize;
pub mod scoring;
pub mod types;

// Re-export commonly used types
pub use types::{
    AuditResult, AuditStage, Category, CategoryResult, CheckOutcome, CheckStatus, DataSources,
    Difficulty, Effort, EstimatedImpact, Priority, PrioritizedTask, TaskSource,
};

pub use analyzer::{analyze, analyze_all};
pub use audit::Auditor;
pub use augment::{AuditContext, Disabled, TaskAugmenter, merge_tasks};
pub use catalog::{Catalog, CheckDefinition, TaskProfile};
pub use config::AuditConfig;
pub use crawl::{Crawler, Enriched, StaticPage};
pub use error::{AugmentError, CatalogError, ConfigError};
pub use facts::{CrawlError, PageFacts};
pub use impact::estimate;
pub use prioritize::prioritize;
pub use scoring::aggregate;

#[cfg(feature = "fetch")]
pub use augment::LlmAugmenter;

#[cfg(feature = "fetch")]
pub use crawl::HttpCrawler;
