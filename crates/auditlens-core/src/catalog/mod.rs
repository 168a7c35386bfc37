//! Check catalog
//!
//! Every check is a plain function of [`PageFacts`] registered in a per-category
//! table. The tables are fixed-size arrays whose lengths are the category point
//! budgets, so the standard catalog cannot drift from the scoring contract.
//! Custom catalogs go through the same validation at construction time.

mod content;
mod local_seo;
mod on_page;
mod technical;
mod user_experience;

use std::collections::HashSet;
use std::fmt;

use crate::error::CatalogError;
use crate::facts::{BusinessProfile, PageFacts, PerformanceMetrics};
use crate::types::{Category, CheckOutcome, Effort, Priority};

/// Signature of a check evaluator
pub type Evaluate = fn(&PageFacts) -> CheckOutcome;

/// How a failed check turns into a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskProfile {
    /// `None` uses the category default
    pub priority: Option<Priority>,
    pub impact: u8,
    pub effort: Effort,
    pub estimated_time: &'static str,
}

impl TaskProfile {
    pub const DEFAULT: TaskProfile = TaskProfile {
        priority: None,
        impact: 50,
        effort: Effort::Moderate,
        estimated_time: "1-2 hours",
    };

    /// Always Critical, whatever the category
    pub const fn critical() -> Self {
        Self {
            priority: Some(Priority::Critical),
            impact: 90,
            ..Self::DEFAULT
        }
    }

    pub const fn high() -> Self {
        Self {
            impact: 70,
            ..Self::DEFAULT
        }
    }

    pub const fn medium() -> Self {
        Self::DEFAULT
    }

    /// Always Low, whatever the category
    pub const fn low() -> Self {
        Self {
            priority: Some(Priority::Low),
            impact: 30,
            ..Self::DEFAULT
        }
    }

    pub const fn quick(self, estimated_time: &'static str) -> Self {
        Self {
            effort: Effort::Quick,
            estimated_time,
            ..self
        }
    }

    pub const fn moderate(self, estimated_time: &'static str) -> Self {
        Self {
            effort: Effort::Moderate,
            estimated_time,
            ..self
        }
    }

    pub const fn extensive(self, estimated_time: &'static str) -> Self {
        Self {
            effort: Effort::Extensive,
            estimated_time,
            ..self
        }
    }

    /// Priority for a task raised in `category`
    pub fn priority_in(&self, category: Category) -> Priority {
        self.priority
            .unwrap_or_else(|| category.default_priority())
    }
}

impl Default for TaskProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A single registered check
#[derive(Clone, Copy)]
pub struct CheckDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub task: TaskProfile,
    pub evaluate: Evaluate,
}

impl CheckDefinition {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        category: Category,
        evaluate: Evaluate,
    ) -> Self {
        Self {
            id,
            name,
            category,
            task: TaskProfile::DEFAULT,
            evaluate,
        }
    }

    pub const fn with_task(self, task: TaskProfile) -> Self {
        Self { task, ..self }
    }
}

impl fmt::Debug for CheckDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckDefinition")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("task", &self.task)
            .finish_non_exhaustive()
    }
}

/// A validated set of checks
#[derive(Debug, Clone)]
pub struct Catalog {
    checks: Vec<CheckDefinition>,
}

impl Catalog {
    /// The built-in 117-check catalog
    pub fn standard() -> Result<Self, CatalogError> {
        let checks = technical::CHECKS
            .iter()
            .chain(on_page::CHECKS.iter())
            .chain(content::CHECKS.iter())
            .chain(user_experience::CHECKS.iter())
            .chain(local_seo::CHECKS.iter())
            .copied()
            .collect();

        Self::new(checks)
    }

    /// Validate a custom catalog: unique ids and one check per budget point
    pub fn new(checks: Vec<CheckDefinition>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for check in &checks {
            if !seen.insert(check.id) {
                return Err(CatalogError::DuplicateId(check.id.to_string()));
            }
        }

        for category in Category::ALL {
            let actual = checks.iter().filter(|c| c.category == category).count() as u32;
            if actual != category.budget() {
                return Err(CatalogError::BudgetMismatch {
                    category,
                    expected: category.budget(),
                    actual,
                });
            }
        }

        Ok(Self { checks })
    }

    pub fn checks(&self) -> &[CheckDefinition] {
        &self.checks
    }

    /// Checks of one category, in declaration order
    pub fn category(&self, category: Category) -> impl Iterator<Item = &CheckDefinition> {
        self.checks.iter().filter(move |c| c.category == category)
    }

    pub fn get(&self, id: &str) -> Option<&CheckDefinition> {
        self.checks.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

// Shared evaluation helpers

const NO_PERFORMANCE: &str =
    "Supply Lighthouse performance metrics for the page to evaluate this check";
const NO_BUSINESS: &str =
    "Supply the business profile (name, address, phone, listing data) to evaluate this check";

pub(crate) fn with_performance(
    facts: &PageFacts,
    evaluate: impl FnOnce(&PerformanceMetrics) -> CheckOutcome,
) -> CheckOutcome {
    match &facts.performance {
        Some(metrics) => evaluate(metrics),
        None => CheckOutcome::not_available(NO_PERFORMANCE),
    }
}

pub(crate) fn with_business(
    facts: &PageFacts,
    evaluate: impl FnOnce(&BusinessProfile) -> CheckOutcome,
) -> CheckOutcome {
    match &facts.business {
        Some(profile) => evaluate(profile),
        None => CheckOutcome::not_available(NO_BUSINESS),
    }
}

/// Pass below `good`, Warning below `poor`, Fail otherwise
pub(crate) fn grade_below(
    value: f64,
    good: f64,
    poor: f64,
    display: String,
    recommendation: &str,
) -> CheckOutcome {
    if value < good {
        CheckOutcome::pass(display)
    } else if value < poor {
        CheckOutcome::warning(display, recommendation)
    } else {
        CheckOutcome::fail(display, recommendation)
    }
}

/// Pass from `good` up, Warning from `poor` up, Fail otherwise
pub(crate) fn grade_at_least(
    value: f64,
    good: f64,
    poor: f64,
    display: String,
    recommendation: &str,
) -> CheckOutcome {
    if value >= good {
        CheckOutcome::pass(display)
    } else if value >= poor {
        CheckOutcome::warning(display, recommendation)
    } else {
        CheckOutcome::fail(display, recommendation)
    }
}

pub(crate) fn seconds(ms: f64) -> String {
    format!("{:.1} s", ms / 1000.0)
}

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "is",
    "was", "are", "were", "been", "be", "have", "has", "had", "do", "does", "did", "will",
    "would", "should", "could", "may", "might", "must", "can", "this", "that", "these", "those",
    "your", "from", "they", "them", "their", "there", "what", "which", "when", "where", "about",
];

/// Most frequent non-stop-words among the first 100 words of `text`
pub fn top_keywords(text: &str, count: usize) -> Vec<String> {
    let mut frequencies: Vec<(String, usize)> = Vec::new();

    for word in text.split_whitespace().take(100) {
        let clean: String = word
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            .collect();
        if clean.len() <= 3 || STOP_WORDS.contains(&clean.as_str()) {
            continue;
        }
        match frequencies.iter_mut().find(|(w, _)| *w == clean) {
            Some((_, n)) => *n += 1,
            None => frequencies.push((clean, 1)),
        }
    }

    // Stable: equal counts keep first-seen order
    frequencies.sort_by(|a, b| b.1.cmp(&a.1));
    frequencies
        .into_iter()
        .take(count)
        .map(|(word, _)| word)
        .collect()
}

/// Configured target keywords, else the page's own top keywords
pub(crate) fn page_keywords(facts: &PageFacts) -> Vec<String> {
    if facts.target_keywords.is_empty() {
        top_keywords(&facts.content.text, 5)
    } else {
        facts
            .target_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect()
    }
}

pub(crate) fn keyword_hits(keywords: &[String], haystack: Option<&str>) -> usize {
    let haystack = haystack.unwrap_or_default().to_lowercase();
    keywords
        .iter()
        .filter(|k| haystack.contains(k.as_str()))
        .count()
}
