//! Coarse impact estimate for a finished audit

use crate::types::{Difficulty, Effort, EstimatedImpact, Priority, PrioritizedTask};

/// Bucketed traffic, timeline and difficulty estimate
pub fn estimate(overall_score: u8, tasks: &[PrioritizedTask]) -> EstimatedImpact {
    let traffic_increase = match overall_score {
        80.. => "10-20% increase",
        60..80 => "20-40% increase",
        40..60 => "40-80% increase",
        _ => "80-150% increase",
    };

    let critical = tasks
        .iter()
        .filter(|t| t.priority == Priority::Critical)
        .count();
    let time_to_results = match critical {
        6.. => "3-6 months",
        3..6 => "2-3 months",
        _ => "1-2 months",
    };

    let extensive = tasks
        .iter()
        .filter(|t| t.effort == Effort::Extensive)
        .count();
    let difficulty_level = match extensive {
        6.. => Difficulty::Hard,
        3..6 => Difficulty::Medium,
        _ => Difficulty::Easy,
    };

    EstimatedImpact {
        traffic_increase: traffic_increase.to_string(),
        time_to_results: time_to_results.to_string(),
        difficulty_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn tasks(critical: usize, extensive: usize) -> Vec<PrioritizedTask> {
        (0..critical.max(extensive))
            .map(|i| PrioritizedTask {
                priority: if i < critical { Priority::Critical } else { Priority::High },
                category: Category::Technical,
                description: format!("task {i}"),
                impact: 50,
                effort: if i < extensive { Effort::Extensive } else { Effort::Quick },
                estimated_time: "1 day".to_string(),
                dependencies: Vec::new(),
                check_id: None,
            })
            .collect()
    }

    #[test]
    fn test_traffic_buckets() {
        assert_eq!(estimate(100, &[]).traffic_increase, "10-20% increase");
        assert_eq!(estimate(80, &[]).traffic_increase, "10-20% increase");
        assert_eq!(estimate(79, &[]).traffic_increase, "20-40% increase");
        assert_eq!(estimate(60, &[]).traffic_increase, "20-40% increase");
        assert_eq!(estimate(40, &[]).traffic_increase, "40-80% increase");
        assert_eq!(estimate(39, &[]).traffic_increase, "80-150% increase");
        assert_eq!(estimate(0, &[]).traffic_increase, "80-150% increase");
    }

    #[test]
    fn test_time_to_results_counts_critical_tasks() {
        assert_eq!(estimate(50, &tasks(2, 0)).time_to_results, "1-2 months");
        assert_eq!(estimate(50, &tasks(3, 0)).time_to_results, "2-3 months");
        assert_eq!(estimate(50, &tasks(5, 0)).time_to_results, "2-3 months");
        assert_eq!(estimate(50, &tasks(6, 0)).time_to_results, "3-6 months");
    }

    #[test]
    fn test_difficulty_counts_extensive_tasks() {
        assert_eq!(estimate(50, &tasks(0, 0)).difficulty_level, Difficulty::Easy);
        assert_eq!(estimate(50, &tasks(0, 2)).difficulty_level, Difficulty::Easy);
        assert_eq!(estimate(50, &tasks(0, 3)).difficulty_level, Difficulty::Medium);
        assert_eq!(estimate(50, &tasks(0, 6)).difficulty_level, Difficulty::Hard);
    }
}
