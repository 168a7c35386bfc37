//! Category analyzer
//!
//! Runs the checks of one category against a page snapshot. Checks are pure
//! functions of the facts, so the five categories fan out over rayon and join
//! back into a map keyed by category.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::catalog::{Catalog, CheckDefinition};
use crate::facts::{CrawlError, PageFacts};
use crate::types::{Category, CategoryResult, CheckOutcome, CheckResult};

/// Evaluate every check of `category`
///
/// A crawl error resolves each check to `Fail` with a "data unavailable"
/// recommendation. A panicking check becomes a `Warning` carrying the panic
/// message; the remaining checks still run.
pub fn analyze(
    catalog: &Catalog,
    category: Category,
    facts: &Result<PageFacts, CrawlError>,
) -> CategoryResult {
    let points: Vec<CheckResult> = catalog
        .category(category)
        .map(|check| CheckResult {
            id: check.id.to_string(),
            name: check.name.to_string(),
            outcome: match facts {
                Ok(facts) => evaluate(check, facts),
                Err(err) => unavailable(check, err),
            },
        })
        .collect();

    let result = CategoryResult::new(category, points);
    debug!(
        category = %category,
        score = result.score,
        budget = category.budget(),
        "category analyzed"
    );
    result
}

/// Analyze all categories concurrently
///
/// When `include_local_seo` is false the Local SEO category is reported as
/// skipped and none of its checks run.
pub fn analyze_all(
    catalog: &Catalog,
    facts: &Result<PageFacts, CrawlError>,
    include_local_seo: bool,
) -> BTreeMap<Category, CategoryResult> {
    Category::ALL
        .par_iter()
        .map(|&category| {
            let result = if category == Category::LocalSeo && !include_local_seo {
                debug!(category = %category, "category skipped");
                CategoryResult::skipped(category)
            } else {
                analyze(catalog, category, facts)
            };
            (category, result)
        })
        .collect()
}

fn evaluate(check: &CheckDefinition, facts: &PageFacts) -> CheckOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| (check.evaluate)(facts))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(check = check.id, %message, "check panicked during evaluation");
            CheckOutcome::warning(
                message,
                format!("{} could not be evaluated; review the check implementation", check.name),
            )
        }
    }
}

fn unavailable(check: &CheckDefinition, err: &CrawlError) -> CheckOutcome {
    CheckOutcome::fail(
        "Data unavailable",
        format!(
            "{}: data unavailable ({}); re-run the audit once the page can be fetched",
            check.name, err.message
        ),
    )
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "check panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CheckStatus;

    fn exploding(_: &PageFacts) -> CheckOutcome {
        panic!("selector blew up")
    }

    fn with_exploding_check() -> Catalog {
        let mut checks = Catalog::standard().unwrap().checks().to_vec();
        let slot = checks.iter().position(|c| c.id == "content_03").unwrap();
        checks[slot].evaluate = exploding;
        Catalog::new(checks).unwrap()
    }

    #[test]
    fn test_analyze_counts_passes() {
        let catalog = Catalog::standard().unwrap();
        let facts = PageFacts::from_html(
            "https://example.com/",
            "<html><head><title>Example</title></head><body><h1>Hi</h1></body></html>",
        )
        .unwrap();

        let result = analyze(&catalog, Category::OnPage, &Ok(facts));
        assert_eq!(result.points.len(), 28);
        assert_eq!(
            result.score as usize,
            result.count(CheckStatus::Pass)
        );
        assert!(!result.skipped);
    }

    #[test]
    fn test_crawl_error_fails_every_check() {
        let catalog = Catalog::standard().unwrap();
        let facts = Err(CrawlError::with_status("HTTP 503", 503));

        let result = analyze(&catalog, Category::Technical, &facts);
        assert_eq!(result.score, 0);
        assert_eq!(result.count(CheckStatus::Fail), 35);

        let first = &result.points[0];
        assert_eq!(
            first.outcome.recommendation.as_deref(),
            Some("HTTPS Enabled: data unavailable (HTTP 503); re-run the audit once the page can be fetched")
        );
    }

    #[test]
    fn test_panicking_check_becomes_warning() {
        let catalog = with_exploding_check();
        let facts = Ok(PageFacts::default());

        let result = analyze(&catalog, Category::Content, &facts);
        assert_eq!(result.points.len(), 22);

        let broken = result.points.iter().find(|p| p.id == "content_03").unwrap();
        assert_eq!(broken.outcome.status, CheckStatus::Warning);
        assert_eq!(broken.outcome.value, "selector blew up");
    }

    #[test]
    fn test_analyze_all_skips_local_seo() {
        let catalog = Catalog::standard().unwrap();
        let results = analyze_all(&catalog, &Ok(PageFacts::default()), false);

        assert_eq!(results.len(), 5);
        let local = &results[&Category::LocalSeo];
        assert!(local.skipped);
        assert!(local.points.is_empty());
        assert_eq!(results[&Category::Technical].points.len(), 35);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let catalog = Catalog::standard().unwrap();
        let facts = Ok(PageFacts::from_html(
            "https://example.com/services",
            "<html><body><nav><a href='/a'>A</a></nav><p>Some words here.</p></body></html>",
        )
        .unwrap());

        assert_eq!(
            analyze_all(&catalog, &facts, true),
            analyze_all(&catalog, &facts, true)
        );
    }
}
