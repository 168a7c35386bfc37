//! Common types used across auditlens

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

use crate::facts::CrawlError;

/// One of the five fixed check groupings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "technical")]
    Technical,
    #[serde(rename = "onPage")]
    OnPage,
    #[serde(rename = "content")]
    Content,
    #[serde(rename = "userExperience")]
    UserExperience,
    #[serde(rename = "localSEO")]
    LocalSeo,
}

impl Category {
    /// All categories in aggregation order
    pub const ALL: [Category; 5] = [
        Category::Technical,
        Category::OnPage,
        Category::Content,
        Category::UserExperience,
        Category::LocalSeo,
    ];

    /// Maximum raw score (number of checks) for the category
    pub const fn budget(self) -> u32 {
        match self {
            Category::Technical => 35,
            Category::OnPage => 28,
            Category::Content => 22,
            Category::UserExperience => 15,
            Category::LocalSeo => 17,
        }
    }

    /// Contribution out of 100 to the overall score
    pub const fn weight(self) -> u32 {
        match self {
            Category::Technical => 30,
            Category::OnPage => 24,
            Category::Content => 19,
            Category::UserExperience => 13,
            Category::LocalSeo => 14,
        }
    }

    /// Priority assigned to a failed check when the catalog does not override it
    pub const fn default_priority(self) -> Priority {
        match self {
            Category::Technical | Category::OnPage => Priority::Critical,
            Category::Content | Category::UserExperience => Priority::High,
            Category::LocalSeo => Priority::Medium,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Technical => "Technical SEO",
            Category::OnPage => "On-Page SEO",
            Category::Content => "Content Quality",
            Category::UserExperience => "User Experience",
            Category::LocalSeo => "Local SEO",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result status of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    Warning,
}

/// What a check produced for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub status: CheckStatus,
    pub value: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl CheckOutcome {
    pub fn pass(value: impl Into<JsonValue>) -> Self {
        Self {
            status: CheckStatus::Pass,
            value: value.into(),
            recommendation: None,
        }
    }

    pub fn fail(value: impl Into<JsonValue>, recommendation: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Fail,
            value: value.into(),
            recommendation: Some(recommendation.into()),
        }
    }

    pub fn warning(value: impl Into<JsonValue>, recommendation: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Warning,
            value: value.into(),
            recommendation: Some(recommendation.into()),
        }
    }

    /// Warning used when the facts a check needs were never collected
    pub fn not_available(recommendation: impl Into<String>) -> Self {
        Self::warning("Not available", recommendation)
    }

    /// Pass when `ok`, otherwise the given fallback status with a recommendation
    pub fn check(
        ok: bool,
        value: impl Into<JsonValue>,
        otherwise: CheckStatus,
        recommendation: &str,
    ) -> Self {
        let value = value.into();
        match (ok, otherwise) {
            (true, _) | (false, CheckStatus::Pass) => Self::pass(value),
            (false, CheckStatus::Fail) => Self::fail(value, recommendation),
            (false, CheckStatus::Warning) => Self::warning(value, recommendation),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.status == CheckStatus::Pass
    }
}

/// A check outcome tagged with the definition that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

/// All outcomes for one category plus its raw score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: Category,
    pub points: Vec<CheckResult>,
    /// Number of `Pass` outcomes
    pub score: u32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
}

impl CategoryResult {
    pub fn new(category: Category, points: Vec<CheckResult>) -> Self {
        let score = points.iter().filter(|p| p.outcome.is_pass()).count() as u32;
        Self {
            category,
            points,
            score,
            skipped: false,
        }
    }

    /// Result for a category disabled by configuration
    pub fn skipped(category: Category) -> Self {
        Self {
            category,
            points: Vec::new(),
            score: 0,
            skipped: true,
        }
    }

    pub fn count(&self, status: CheckStatus) -> usize {
        self.points
            .iter()
            .filter(|p| p.outcome.status == status)
            .count()
    }
}

/// Task priority tier. Ordering is `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effort {
    Quick,
    Moderate,
    Extensive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A ranked remediation item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizedTask {
    pub priority: Priority,
    pub category: Category,
    pub description: String,
    /// 0-100
    pub impact: u8,
    pub effort: Effort,
    pub estimated_time: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Originating check, when the task came from one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedImpact {
    pub traffic_increase: String,
    pub time_to_results: String,
    pub difficulty_level: Difficulty,
}

/// Where the final task list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskSource {
    Augmented,
    Fallback,
}

/// Orchestrator progress. `Failed` is only reachable from `Crawling`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditStage {
    Pending,
    Crawling,
    Analyzing,
    Prioritizing,
    Estimating,
    Done,
    Failed,
}

impl AuditStage {
    pub fn can_advance_to(self, next: AuditStage) -> bool {
        use AuditStage::*;
        matches!(
            (self, next),
            (Pending, Crawling)
                | (Crawling, Analyzing)
                | (Crawling, Failed)
                | (Analyzing, Prioritizing)
                | (Prioritizing, Estimating)
                | (Estimating, Done)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, AuditStage::Done | AuditStage::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub checks_passed: u32,
    pub total_checks: u32,
    pub critical_tasks: usize,
}

/// Inputs that were available to the checks
///
/// A `false` here explains the "Not available" warnings of the checks that
/// depend on that input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSources {
    /// The page itself was fetched and parsed
    pub page: bool,
    pub headers: bool,
    pub site_files: bool,
    pub performance: bool,
    pub business: bool,
}

/// Final product of one audit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub url: String,
    pub stage: AuditStage,
    /// Every stage the audit passed through, ending with `stage`
    pub stage_history: Vec<AuditStage>,
    pub overall_score: u8,
    pub category_scores: BTreeMap<Category, u32>,
    pub analysis: BTreeMap<Category, CategoryResult>,
    pub actionable_tasks: Vec<PrioritizedTask>,
    pub estimated_impact: EstimatedImpact,
    pub task_source: TaskSource,
    pub summary: AuditSummary,
    pub data_sources: DataSources,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crawl_error: Option<CrawlError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_and_budgets() {
        let weights: u32 = Category::ALL.iter().map(|c| c.weight()).sum();
        let budgets: u32 = Category::ALL.iter().map(|c| c.budget()).sum();
        assert_eq!(weights, 100);
        assert_eq!(budgets, 117);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn test_category_result_counts_only_passes() {
        let points = vec![
            CheckResult {
                id: "a".into(),
                name: "A".into(),
                outcome: CheckOutcome::pass(true),
            },
            CheckResult {
                id: "b".into(),
                name: "B".into(),
                outcome: CheckOutcome::warning("meh", "fix b"),
            },
            CheckResult {
                id: "c".into(),
                name: "C".into(),
                outcome: CheckOutcome::fail(false, "fix c"),
            },
        ];

        let result = CategoryResult::new(Category::Content, points);
        assert_eq!(result.score, 1);
        assert_eq!(result.count(CheckStatus::Warning), 1);
        assert_eq!(result.count(CheckStatus::Fail), 1);
    }

    #[test]
    fn test_check_helper_statuses() {
        assert!(CheckOutcome::check(true, 1, CheckStatus::Fail, "x").is_pass());

        let failed = CheckOutcome::check(false, 1, CheckStatus::Fail, "x");
        assert_eq!(failed.status, CheckStatus::Fail);
        assert_eq!(failed.recommendation.as_deref(), Some("x"));

        let warned = CheckOutcome::check(false, 1, CheckStatus::Warning, "y");
        assert_eq!(warned.status, CheckStatus::Warning);
    }

    #[test]
    fn test_stage_transitions() {
        assert!(AuditStage::Pending.can_advance_to(AuditStage::Crawling));
        assert!(AuditStage::Crawling.can_advance_to(AuditStage::Failed));
        assert!(!AuditStage::Pending.can_advance_to(AuditStage::Analyzing));
        assert!(!AuditStage::Analyzing.can_advance_to(AuditStage::Failed));
        assert!(!AuditStage::Done.can_advance_to(AuditStage::Pending));
        assert!(AuditStage::Failed.is_terminal());
    }

    #[test]
    fn test_category_serializes_as_map_key() {
        let mut scores = BTreeMap::new();
        scores.insert(Category::LocalSeo, 3u32);
        scores.insert(Category::Technical, 30u32);

        let json = serde_json::to_string(&scores).unwrap();
        assert_eq!(json, r#"{"technical":30,"localSEO":3}"#);
    }

    #[test]
    fn test_outcome_serialization() {
        let result = CheckResult {
            id: "tech_01".into(),
            name: "HTTPS Enabled".into(),
            outcome: CheckOutcome::fail(false, "Enable HTTPS"),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "fail");
        assert_eq!(json["recommendation"], "Enable HTTPS");
        assert_eq!(json["id"], "tech_01");
    }
}
