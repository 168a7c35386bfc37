//! Audit orchestrator
//!
//! Drives one audit through
//! `Pending -> Crawling -> Analyzing -> Prioritizing -> Estimating -> Done`.
//! A crawl failure ends in `Failed`, but the caller still gets a complete,
//! degraded [`AuditResult`]: runtime data problems never surface as errors.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::analyzer::analyze_all;
use crate::augment::{AuditContext, Disabled, TaskAugmenter, merge_tasks};
use crate::catalog::Catalog;
use crate::config::AuditConfig;
use crate::crawl::Crawler;
use crate::error::{AugmentError, CatalogError};
use crate::facts::{CrawlError, PageFacts};
use crate::impact::estimate;
use crate::prioritize::prioritize;
use crate::scoring::{aggregate, category_scores};
use crate::types::{
    AuditResult, AuditStage, AuditSummary, Category, CategoryResult, Priority, PrioritizedTask,
    TaskSource,
};

/// Runs audits against a validated catalog
///
/// Holds no per-audit state, so one `Auditor` can serve concurrent audits.
#[derive(Debug, Clone)]
pub struct Auditor<A = Disabled> {
    catalog: Catalog,
    config: AuditConfig,
    augmenter: A,
}

impl Auditor<Disabled> {
    pub fn new(catalog: Catalog, config: AuditConfig) -> Self {
        Self {
            catalog,
            config,
            augmenter: Disabled,
        }
    }

    /// Auditor over the built-in catalog
    pub fn standard(config: AuditConfig) -> Result<Self, CatalogError> {
        Ok(Self::new(Catalog::standard()?, config))
    }
}

impl<A: TaskAugmenter> Auditor<A> {
    pub fn with_augmenter<B: TaskAugmenter>(self, augmenter: B) -> Auditor<B> {
        Auditor {
            catalog: self.catalog,
            config: self.config,
            augmenter,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Crawl `url` and audit the result
    pub async fn run<C: Crawler>(&self, crawler: &C, url: &str) -> AuditResult {
        let mut history = vec![AuditStage::Pending];
        advance(&mut history, AuditStage::Crawling);
        let facts = crawler.crawl(url).await;
        self.finish(url, facts, history).await
    }

    /// Audit a crawl outcome obtained elsewhere
    ///
    /// The stage history is the same as for [`Auditor::run`], starting with
    /// `Pending` and `Crawling`.
    pub async fn audit_facts(
        &self,
        url: &str,
        facts: Result<PageFacts, CrawlError>,
    ) -> AuditResult {
        let mut history = vec![AuditStage::Pending];
        advance(&mut history, AuditStage::Crawling);
        self.finish(url, facts, history).await
    }

    async fn finish(
        &self,
        url: &str,
        mut facts: Result<PageFacts, CrawlError>,
        mut history: Vec<AuditStage>,
    ) -> AuditResult {
        if let Ok(page) = &mut facts {
            if page.target_keywords.is_empty() {
                page.target_keywords = self.config.target_keywords.clone();
            }
        }

        let data_sources = facts
            .as_ref()
            .map(PageFacts::data_sources)
            .unwrap_or_default();
        debug!(?data_sources, "audit inputs");

        let crawl_error = facts.as_ref().err().cloned();
        let degraded = crawl_error.is_some();
        if let Some(err) = &crawl_error {
            warn!(url, error = %err, status = ?err.status_code, "crawl failed, producing degraded audit");
            advance(&mut history, AuditStage::Failed);
        } else {
            advance(&mut history, AuditStage::Analyzing);
        }

        let analysis = analyze_all(&self.catalog, &facts, self.config.include_local_seo);
        let overall_score = aggregate(&analysis);

        if !degraded {
            advance(&mut history, AuditStage::Prioritizing);
        }
        let deterministic = prioritize(&analysis, &self.catalog, self.config.max_tasks);
        let (actionable_tasks, task_source) = if degraded {
            (deterministic, TaskSource::Fallback)
        } else {
            let keywords = facts
                .as_ref()
                .map(|page| page.target_keywords.clone())
                .unwrap_or_default();
            self.augment(url, &keywords, &analysis, deterministic).await
        };

        if !degraded {
            advance(&mut history, AuditStage::Estimating);
        }
        let estimated_impact = estimate(overall_score, &actionable_tasks);
        let summary = summarize(&analysis, &actionable_tasks);

        if !degraded {
            advance(&mut history, AuditStage::Done);
        }

        let stage = current(&history);
        info!(
            url,
            overall_score,
            tasks = actionable_tasks.len(),
            source = ?task_source,
            stage = ?stage,
            "audit complete"
        );

        AuditResult {
            url: url.to_string(),
            stage,
            stage_history: history,
            overall_score,
            category_scores: category_scores(&analysis),
            analysis,
            actionable_tasks,
            estimated_impact,
            task_source,
            summary,
            data_sources,
            crawl_error,
        }
    }

    /// Ask the augmenter for tasks, falling back to `deterministic` on any
    /// error or once the configured timeout elapses
    async fn augment(
        &self,
        url: &str,
        keywords: &[String],
        analysis: &BTreeMap<Category, CategoryResult>,
        deterministic: Vec<PrioritizedTask>,
    ) -> (Vec<PrioritizedTask>, TaskSource) {
        let settings = &self.config.ai;
        if !settings.enabled {
            debug!("task augmentation disabled by configuration");
            return (deterministic, TaskSource::Fallback);
        }

        let ctx = AuditContext::new(url, keywords, analysis);
        let outcome = tokio::time::timeout(settings.timeout(), self.augmenter.generate_tasks(&ctx))
            .await
            .unwrap_or(Err(AugmentError::Timeout(settings.timeout_secs)));

        match outcome {
            Ok(augmented) => {
                debug!(suggested = augmented.len(), "merging augmented tasks");
                (
                    merge_tasks(deterministic, augmented, self.config.max_tasks),
                    TaskSource::Augmented,
                )
            }
            Err(AugmentError::Disabled) => {
                debug!("no task augmenter configured");
                (deterministic, TaskSource::Fallback)
            }
            Err(err) => {
                warn!(error = %err, "task augmentation failed, using deterministic tasks");
                (deterministic, TaskSource::Fallback)
            }
        }
    }
}

fn current(history: &[AuditStage]) -> AuditStage {
    history.last().copied().unwrap_or(AuditStage::Pending)
}

fn advance(history: &mut Vec<AuditStage>, next: AuditStage) {
    let stage = current(history);
    debug_assert!(
        stage.can_advance_to(next),
        "invalid audit stage transition {stage:?} -> {next:?}"
    );
    debug!(from = ?stage, to = ?next, "audit stage");
    history.push(next);
}

fn summarize(
    analysis: &BTreeMap<Category, CategoryResult>,
    tasks: &[PrioritizedTask],
) -> AuditSummary {
    AuditSummary {
        checks_passed: analysis.values().map(|r| r.score).sum(),
        total_checks: analysis.values().map(|r| r.points.len() as u32).sum(),
        critical_tasks: tasks
            .iter()
            .filter(|t| t.priority == Priority::Critical)
            .count(),
    }
}
