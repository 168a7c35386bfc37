//! Score aggregation
//!
//! Each category score is normalized against its point budget and scaled by
//! its weight:
//!
//! ```text
//! overall = round(Σ score(c) / budget(c) * weight(c))
//! ```
//!
//! A skipped or missing category contributes nothing and the remaining
//! weights are not re-normalized, so skipping Local SEO caps the overall
//! score at 86.

use std::collections::BTreeMap;

use tracing::debug;

use crate::types::{Category, CategoryResult};

/// Common denominator of every category budget
const DENOMINATOR: u64 = budget_lcm();

const fn budget_lcm() -> u64 {
    let mut lcm = 1;
    let mut i = 0;
    while i < Category::ALL.len() {
        let budget = Category::ALL[i].budget() as u64;
        lcm = lcm / gcd(lcm, budget) * budget;
        i += 1;
    }
    lcm
}

const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Weighted overall score in `[0, 100]`
///
/// The sum is kept as an exact fraction over the common denominator of the
/// budgets, so a total of exactly `x.5` always rounds up.
pub fn aggregate(results: &BTreeMap<Category, CategoryResult>) -> u8 {
    let numerator: u64 = Category::ALL
        .iter()
        .map(|&category| {
            let score = results
                .get(&category)
                .filter(|result| !result.skipped)
                .map_or(0, |result| result.score.min(category.budget()));
            weighted(category, score)
        })
        .sum();

    let overall = ((2 * numerator + DENOMINATOR) / (2 * DENOMINATOR)).min(100) as u8;
    debug!(numerator, denominator = DENOMINATOR, overall, "aggregated overall score");
    overall
}

/// Contribution of one category, scaled by the common budget denominator
fn weighted(category: Category, score: u32) -> u64 {
    let budget = u64::from(category.budget());
    u64::from(score) * u64::from(category.weight()) * (DENOMINATOR / budget)
}

/// Category scores as a plain map, for reporting
pub fn category_scores(results: &BTreeMap<Category, CategoryResult>) -> BTreeMap<Category, u32> {
    results
        .iter()
        .map(|(&category, result)| (category, result.score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CheckOutcome, CheckResult};

    fn result(category: Category, passed: u32) -> CategoryResult {
        let points = (0..category.budget())
            .map(|i| CheckResult {
                id: format!("{category:?}_{i}"),
                name: format!("Check {i}"),
                outcome: if i < passed {
                    CheckOutcome::pass(true)
                } else {
                    CheckOutcome::fail(false, "fix it")
                },
            })
            .collect();
        CategoryResult::new(category, points)
    }

    fn results(scores: [u32; 5]) -> BTreeMap<Category, CategoryResult> {
        Category::ALL
            .iter()
            .zip(scores)
            .map(|(&category, score)| (category, result(category, score)))
            .collect()
    }

    #[test]
    fn test_perfect_and_empty_scores() {
        assert_eq!(aggregate(&results([35, 28, 22, 15, 17])), 100);
        assert_eq!(aggregate(&results([0, 0, 0, 0, 0])), 0);
        assert_eq!(aggregate(&BTreeMap::new()), 0);
    }

    #[test]
    fn test_single_technical_failure() {
        // 34/35 * 30 + 70 = 99.14
        assert_eq!(aggregate(&results([34, 28, 22, 15, 17])), 99);
    }

    #[test]
    fn test_rounds_half_up() {
        // 11/22 * 19 = 9.5
        assert_eq!(aggregate(&results([0, 0, 11, 0, 0])), 10);
    }

    #[test]
    fn test_exact_half_across_categories_rounds_up() {
        // 4/35 * 30 + 17/28 * 24 + 11/22 * 19 = 27.5 exactly
        assert_eq!(aggregate(&results([4, 17, 11, 0, 0])), 28);
    }

    #[test]
    fn test_common_denominator() {
        assert_eq!(DENOMINATOR, 78_540);
        for category in Category::ALL {
            assert_eq!(DENOMINATOR % u64::from(category.budget()), 0);
        }
    }

    #[test]
    fn test_skipped_category_is_not_renormalized() {
        let mut all = results([35, 28, 22, 15, 17]);
        all.insert(Category::LocalSeo, CategoryResult::skipped(Category::LocalSeo));
        assert_eq!(aggregate(&all), 86);
    }

    #[test]
    fn test_monotonic_in_every_category() {
        let base = [20, 14, 10, 7, 9];
        let before = aggregate(&results(base));
        for i in 0..5 {
            let mut bumped = base;
            bumped[i] += 1;
            assert!(aggregate(&results(bumped)) >= before);
        }
    }

    #[test]
    fn test_category_scores_map() {
        let scores = category_scores(&results([1, 2, 3, 4, 5]));
        assert_eq!(scores[&Category::Technical], 1);
        assert_eq!(scores[&Category::LocalSeo], 5);
    }
}
