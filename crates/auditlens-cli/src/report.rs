//! Report rendering

use std::fmt::Write as FmtWrite;

use anyhow::Result;
use auditlens_core::{
    AuditResult, Category, CheckStatus, DataSources, Difficulty, Effort, TaskSource,
};
use serde_json::Value as JsonValue;

use crate::cli::OutputFormat;

const DIVIDER: &str = "─────────────────────────────────────────────────────────────";
const LABEL_WIDTH: usize = 16;

pub fn render(result: &AuditResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(result)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(result)?;
            json.push('\n');
            Ok(json)
        }
    }
}

pub fn render_text(result: &AuditResult) -> String {
    let mut output = String::new();

    push_section_header(&mut output, "📊", "Audit Overview");
    push_key_value(&mut output, "URL", &result.url);
    push_key_value(
        &mut output,
        "Overall Score",
        &format!("{}/100 {}", result.overall_score, score_bar(result.overall_score)),
    );
    push_key_value(
        &mut output,
        "Checks Passed",
        &format!(
            "{}/{}",
            result.summary.checks_passed, result.summary.total_checks
        ),
    );
    push_key_value(
        &mut output,
        "Task Source",
        match result.task_source {
            TaskSource::Augmented => "AI-augmented",
            TaskSource::Fallback => "deterministic",
        },
    );
    let (available, missing) = data_source_lists(&result.data_sources);
    push_key_value(&mut output, "Data Sources", &available);
    push_key_value(&mut output, "Missing Data", &missing);
    if let Some(err) = &result.crawl_error {
        let status = err
            .status_code
            .map(|code| format!(" (HTTP {code})"))
            .unwrap_or_default();
        push_key_value(&mut output, "Crawl Error", &format!("{}{status}", err.message));
    }
    let _ = writeln!(&mut output);

    push_section_header(&mut output, "📂", "Category Scores");
    for category in Category::ALL {
        let Some(analysis) = result.analysis.get(&category) else {
            continue;
        };
        let value = if analysis.skipped {
            "skipped".to_string()
        } else {
            format!(
                "{}/{} ({}% weight)",
                analysis.score,
                category.budget(),
                category.weight()
            )
        };
        push_key_value(&mut output, category.label(), &value);
    }
    let _ = writeln!(&mut output);

    for (category, analysis) in &result.analysis {
        let issues: Vec<_> = analysis
            .points
            .iter()
            .filter(|p| p.outcome.status != CheckStatus::Pass)
            .collect();
        if issues.is_empty() {
            continue;
        }

        push_section_header(&mut output, "🔍", &format!("Issues: {category}"));
        for point in issues {
            let icon = match point.outcome.status {
                CheckStatus::Fail => "✗",
                _ => "⚠",
            };
            let _ = writeln!(
                output,
                "{icon} {} ({}): {}",
                point.name,
                point.id,
                json_value_display(&point.outcome.value)
            );
            if let Some(recommendation) = &point.outcome.recommendation {
                let _ = writeln!(output, "    → {recommendation}");
            }
        }
        let _ = writeln!(&mut output);
    }

    push_section_header(&mut output, "✅", "Actionable Tasks");
    if result.actionable_tasks.is_empty() {
        let _ = writeln!(output, "No failed checks. Nothing to fix.");
    }
    for (i, task) in result.actionable_tasks.iter().enumerate() {
        let _ = writeln!(
            output,
            "{}. [{:?}] {}",
            i + 1,
            task.priority,
            task.description
        );
        let _ = writeln!(
            output,
            "   {} · impact {} · {} · {}",
            task.category,
            task.impact,
            effort_label(task.effort),
            task.estimated_time
        );
        if !task.dependencies.is_empty() {
            let _ = writeln!(output, "   depends on: {}", task.dependencies.join(", "));
        }
    }
    let _ = writeln!(&mut output);

    push_section_header(&mut output, "📈", "Estimated Impact");
    let impact = &result.estimated_impact;
    push_key_value(&mut output, "Traffic", &impact.traffic_increase);
    push_key_value(&mut output, "Time to Results", &impact.time_to_results);
    push_key_value(
        &mut output,
        "Difficulty",
        match impact.difficulty_level {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        },
    );

    output
}

fn push_section_header(buf: &mut String, icon: &str, title: &str) {
    let _ = writeln!(buf, "{DIVIDER}");
    let _ = writeln!(buf, "{icon} {title}");
    let _ = writeln!(buf, "{DIVIDER}");
}

fn push_key_value(buf: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    let _ = writeln!(buf, "• {:<width$} : {}", label, value, width = LABEL_WIDTH);
}

/// Available and missing inputs as comma separated lists
fn data_source_lists(sources: &DataSources) -> (String, String) {
    let entries = [
        ("page", sources.page),
        ("headers", sources.headers),
        ("site files", sources.site_files),
        ("performance", sources.performance),
        ("business profile", sources.business),
    ];
    let pick = |present: bool| {
        entries
            .iter()
            .filter(|(_, available)| *available == present)
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    };
    (pick(true), pick(false))
}

fn score_bar(score: u8) -> String {
    let filled = usize::from(score.min(100)) / 5;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(20 - filled))
}

fn effort_label(effort: Effort) -> &'static str {
    match effort {
        Effort::Quick => "Quick",
        Effort::Moderate => "Moderate",
        Effort::Extensive => "Extensive",
    }
}

fn json_value_display(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Bool(true) => "yes".to_string(),
        JsonValue::Bool(false) => "no".to_string(),
        JsonValue::Null => "-".to_string(),
        other => other.to_string(),
    }
}
