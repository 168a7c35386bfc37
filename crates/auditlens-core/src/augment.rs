//! Optional AI task augmentation
//!
//! An augmenter sees the audit outcome and proposes tasks. Its answer is never
//! trusted as a replacement for the deterministic task list: [`merge_tasks`]
//! keeps every deterministic task, lets the augmenter reword the ones it
//! recognises by check id, and only uses new suggestions to fill free slots.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::future::Future;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{AugmentError, AugmentResult};
use crate::prioritize::rank;
use crate::types::{
    Category, CategoryResult, CheckStatus, Effort, Priority, PrioritizedTask,
};

static RE_JSON_ARRAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[\s\S]*\]").expect("invalid JSON array regex"));

/// Source of additional or reworded tasks
pub trait TaskAugmenter: Send + Sync {
    fn generate_tasks(
        &self,
        ctx: &AuditContext,
    ) -> impl Future<Output = AugmentResult<Vec<PrioritizedTask>>> + Send;
}

/// Augmenter that never answers; audits use the deterministic tasks only
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

impl TaskAugmenter for Disabled {
    async fn generate_tasks(&self, _ctx: &AuditContext) -> AugmentResult<Vec<PrioritizedTask>> {
        Err(AugmentError::Disabled)
    }
}

/// `None` behaves like [`Disabled`]
impl<A: TaskAugmenter> TaskAugmenter for Option<A> {
    async fn generate_tasks(&self, ctx: &AuditContext) -> AugmentResult<Vec<PrioritizedTask>> {
        match self {
            Some(augmenter) => augmenter.generate_tasks(ctx).await,
            None => Err(AugmentError::Disabled),
        }
    }
}

/// Score line for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub score: u32,
    pub budget: u32,
    pub skipped: bool,
}

/// A failed or warning check handed to the augmenter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub category: Category,
    pub id: String,
    pub name: String,
    pub status: CheckStatus,
    pub value: JsonValue,
    pub recommendation: Option<String>,
}

/// Everything an augmenter is told about the audit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditContext {
    pub url: String,
    pub target_keywords: Vec<String>,
    pub categories: Vec<CategorySummary>,
    pub issues: Vec<Issue>,
}

impl AuditContext {
    pub fn new(
        url: impl Into<String>,
        target_keywords: &[String],
        results: &BTreeMap<Category, CategoryResult>,
    ) -> Self {
        let categories = results
            .values()
            .map(|result| CategorySummary {
                category: result.category,
                score: result.score,
                budget: result.category.budget(),
                skipped: result.skipped,
            })
            .collect();

        let issues = results
            .values()
            .flat_map(|result| {
                result
                    .points
                    .iter()
                    .filter(|p| p.outcome.status != CheckStatus::Pass)
                    .map(|p| Issue {
                        category: result.category,
                        id: p.id.clone(),
                        name: p.name.clone(),
                        status: p.outcome.status,
                        value: p.outcome.value.clone(),
                        recommendation: p.outcome.recommendation.clone(),
                    })
            })
            .collect();

        Self {
            url: url.into(),
            target_keywords: target_keywords.to_vec(),
            categories,
            issues,
        }
    }
}

pub const SYSTEM_PROMPT: &str =
    "You are an expert SEO consultant. You answer with a JSON array only, no prose.";

/// User prompt describing the audit outcome
pub fn build_prompt(ctx: &AuditContext) -> String {
    let keywords = if ctx.target_keywords.is_empty() {
        "Not specified".to_string()
    } else {
        ctx.target_keywords.join(", ")
    };

    let mut prompt = format!(
        "Analyze the following SEO audit results and create a prioritized action plan.\n\n\
         Website: {}\nTarget Keywords: {}\n\nISSUES FOUND ({} total):\n",
        ctx.url,
        keywords,
        ctx.issues.len()
    );

    for (i, issue) in ctx.issues.iter().enumerate() {
        let status = match issue.status {
            CheckStatus::Fail => "FAIL",
            CheckStatus::Warning => "WARNING",
            CheckStatus::Pass => "PASS",
        };
        let _ = writeln!(
            prompt,
            "{}. [{}] {} (checkId: {}, category: {})\n   Value: {}",
            i + 1,
            status,
            issue.name,
            issue.id,
            category_key(issue.category),
            issue.value
        );
        if let Some(recommendation) = &issue.recommendation {
            let _ = writeln!(prompt, "   Recommendation: {recommendation}");
        }
    }

    prompt.push_str("\nCATEGORY SCORES:\n");
    for summary in &ctx.categories {
        if summary.skipped {
            let _ = writeln!(prompt, "- {}: skipped", summary.category);
        } else {
            let _ = writeln!(
                prompt,
                "- {}: {}/{} checks passed",
                summary.category, summary.score, summary.budget
            );
        }
    }

    prompt.push_str(
        r#"
Create a prioritized action plan with 8-12 specific, actionable tasks. For each task:
1. Assign priority: Critical, High, Medium, or Low
2. Specify category: Technical, OnPage, Content, UX, or Local
3. Provide a clear, actionable task description
4. Estimate impact (1-10)
5. Estimate effort: Quick (< 1 day), Moderate (1-3 days), or Extensive (> 3 days)
6. Estimate time to complete
7. When the task addresses a listed issue, copy its checkId

Return ONLY a valid JSON array:
[
  {
    "priority": "Critical",
    "category": "Technical",
    "task": "Fix HTTPS implementation and eliminate mixed content warnings",
    "impact": 9,
    "effort": "Quick",
    "estimatedTime": "2-4 hours",
    "checkId": "tech_01",
    "dependencies": []
  }
]"#,
    );
    prompt
}

fn category_key(category: Category) -> &'static str {
    match category {
        Category::Technical => "Technical",
        Category::OnPage => "OnPage",
        Category::Content => "Content",
        Category::UserExperience => "UX",
        Category::LocalSeo => "Local",
    }
}

/// Task as returned by a model. Every field is optional so one bad entry
/// does not reject the whole answer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiTask {
    priority: Option<String>,
    category: Option<String>,
    #[serde(alias = "description")]
    task: Option<String>,
    impact: Option<JsonValue>,
    effort: Option<String>,
    #[serde(alias = "estimated_time")]
    estimated_time: Option<String>,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(alias = "check_id")]
    check_id: Option<String>,
}

impl AiTask {
    fn impact(&self) -> Option<f64> {
        match self.impact.as_ref()? {
            JsonValue::Number(n) => n.as_f64(),
            JsonValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn into_task(self, rescale: bool) -> Option<PrioritizedTask> {
        let impact = self.impact()?;
        let impact = if rescale { impact * 10.0 } else { impact };
        let description = self.task?.trim().to_string();
        if description.is_empty() {
            return None;
        }
        let estimated_time = self.estimated_time?.trim().to_string();
        if estimated_time.is_empty() {
            return None;
        }

        Some(PrioritizedTask {
            priority: parse_priority(self.priority.as_deref()?)?,
            category: parse_category(self.category.as_deref()?)?,
            description,
            impact: impact.round().clamp(0.0, 100.0) as u8,
            effort: parse_effort(self.effort.as_deref()?)?,
            estimated_time,
            dependencies: self
                .dependencies
                .into_iter()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect(),
            check_id: self.check_id.filter(|id| !id.trim().is_empty()),
        })
    }
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn parse_priority(value: &str) -> Option<Priority> {
    match normalize(value).as_str() {
        "critical" => Some(Priority::Critical),
        "high" => Some(Priority::High),
        "medium" => Some(Priority::Medium),
        "low" => Some(Priority::Low),
        _ => None,
    }
}

fn parse_category(value: &str) -> Option<Category> {
    match normalize(value).as_str() {
        "technical" | "technicalseo" => Some(Category::Technical),
        "onpage" | "onpageseo" => Some(Category::OnPage),
        "content" | "contentquality" => Some(Category::Content),
        "ux" | "userexperience" => Some(Category::UserExperience),
        "local" | "localseo" => Some(Category::LocalSeo),
        _ => None,
    }
}

fn parse_effort(value: &str) -> Option<Effort> {
    match normalize(value).as_str() {
        "quick" => Some(Effort::Quick),
        "moderate" => Some(Effort::Moderate),
        "extensive" => Some(Effort::Extensive),
        _ => None,
    }
}

/// Extract tasks from a model reply
///
/// Takes the outermost JSON array in `content` (models like to wrap it in
/// markdown fences), drops entries with missing or unknown fields, and
/// rescales impacts to 0-100 when every impact is on a 1-10 scale.
pub fn parse_tasks(content: &str) -> AugmentResult<Vec<PrioritizedTask>> {
    let array = RE_JSON_ARRAY
        .find(content)
        .ok_or_else(|| AugmentError::ParseError("no JSON array in response".to_string()))?;

    let raw: Vec<AiTask> = serde_json::from_str(array.as_str())
        .map_err(|e| AugmentError::ParseError(e.to_string()))?;

    let rescale = raw
        .iter()
        .filter_map(AiTask::impact)
        .all(|impact| impact <= 10.0);

    let tasks: Vec<PrioritizedTask> = raw
        .into_iter()
        .filter_map(|task| task.into_task(rescale))
        .collect();

    if tasks.is_empty() {
        return Err(AugmentError::ParseError(
            "response contained no usable tasks".to_string(),
        ));
    }
    Ok(tasks)
}

/// Combine deterministic and augmented tasks
///
/// Every deterministic task survives. An augmented task with the same
/// `check_id` only replaces the wording and adds dependencies; other
/// augmented tasks fill the slots left under `max_tasks`.
pub fn merge_tasks(
    deterministic: Vec<PrioritizedTask>,
    augmented: Vec<PrioritizedTask>,
    max_tasks: usize,
) -> Vec<PrioritizedTask> {
    let mut merged = deterministic;
    let floor = merged.len();
    let mut reworded = vec![false; floor];
    let mut free_slots = max_tasks.saturating_sub(floor);

    for task in augmented {
        let matching = task.check_id.as_deref().and_then(|id| {
            merged[..floor]
                .iter()
                .position(|t| t.check_id.as_deref() == Some(id))
        });

        match matching {
            Some(index) => {
                if reworded[index] {
                    continue;
                }
                reworded[index] = true;
                let target = &mut merged[index];
                target.description = task.description;
                for dependency in task.dependencies {
                    if !target.dependencies.contains(&dependency) {
                        target.dependencies.push(dependency);
                    }
                }
            }
            None if free_slots > 0 => {
                free_slots -= 1;
                merged.push(task);
            }
            None => {}
        }
    }

    rank(&mut merged);
    merged.truncate(max_tasks);
    merged
}

#[cfg(feature = "fetch")]
pub use self::llm::LlmAugmenter;

#[cfg(feature = "fetch")]
mod llm {
    use serde::{Deserialize, Serialize};
    use tracing::debug;

    use super::{AuditContext, SYSTEM_PROMPT, TaskAugmenter, build_prompt, parse_tasks};
    use crate::config::{API_KEY_VARS, AiSettings};
    use crate::error::{AugmentError, AugmentResult};
    use crate::types::PrioritizedTask;

    /// Augmenter backed by an OpenAI-compatible chat completions API
    pub struct LlmAugmenter {
        client: reqwest::Client,
        settings: AiSettings,
        api_key: String,
    }

    impl LlmAugmenter {
        pub fn new(settings: &AiSettings) -> AugmentResult<Self> {
            let api_key = settings
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| AugmentError::MissingApiKey {
                    env_var: API_KEY_VARS.join(" or "),
                })?;

            let client = reqwest::Client::builder()
                .timeout(settings.timeout())
                .user_agent(concat!("auditlens/", env!("CARGO_PKG_VERSION")))
                .build()?;

            Ok(Self {
                client,
                settings: settings.clone(),
                api_key,
            })
        }

        pub fn model(&self) -> &str {
            &self.settings.model
        }
    }

    impl std::fmt::Debug for LlmAugmenter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("LlmAugmenter")
                .field("endpoint", &self.settings.endpoint)
                .field("model", &self.settings.model)
                .finish_non_exhaustive()
        }
    }

    impl TaskAugmenter for LlmAugmenter {
        async fn generate_tasks(
            &self,
            ctx: &AuditContext,
        ) -> AugmentResult<Vec<PrioritizedTask>> {
            let body = ChatRequest {
                model: &self.settings.model,
                messages: vec![
                    ChatMessage {
                        role: "system",
                        content: SYSTEM_PROMPT.to_string(),
                    },
                    ChatMessage {
                        role: "user",
                        content: build_prompt(ctx),
                    },
                ],
                max_tokens: self.settings.max_tokens,
                temperature: self.settings.temperature,
            };

            debug!(
                model = %self.settings.model,
                issues = ctx.issues.len(),
                "requesting task augmentation"
            );

            let response = self
                .client
                .post(&self.settings.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(AugmentError::ApiError {
                    status: status.as_u16(),
                    message,
                });
            }

            let reply: ChatResponse = response
                .json()
                .await
                .map_err(|e| AugmentError::ParseError(e.to_string()))?;

            let content = reply
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content)
                .ok_or_else(|| AugmentError::ParseError("No response choices".to_string()))?;

            parse_tasks(&content)
        }
    }

    #[derive(Serialize)]
    struct ChatRequest<'a> {
        model: &'a str,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
        temperature: f32,
    }

    #[derive(Serialize)]
    struct ChatMessage {
        role: &'static str,
        content: String,
    }

    #[derive(Deserialize)]
    struct ChatResponse {
        choices: Vec<ChatChoice>,
    }

    #[derive(Deserialize)]
    struct ChatChoice {
        message: ChatReply,
    }

    #[derive(Deserialize)]
    struct ChatReply {
        content: String,
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_missing_api_key() {
            let settings = AiSettings::default();
            let err = LlmAugmenter::new(&settings).unwrap_err();
            assert!(matches!(err, AugmentError::MissingApiKey { .. }));
            assert!(err.to_string().contains("OPENROUTER_API_KEY"));
        }

        #[test]
        fn test_builds_with_key() {
            let settings = AiSettings {
                api_key: Some("sk-test".to_string()),
                ..Default::default()
            };
            let augmenter = LlmAugmenter::new(&settings).unwrap();
            assert_eq!(augmenter.model(), "deepseek/deepseek-chat");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CheckOutcome, CheckResult};

    fn task(check_id: Option<&str>, priority: Priority, impact: u8) -> PrioritizedTask {
        PrioritizedTask {
            priority,
            category: Category::Technical,
            description: format!("deterministic {}", check_id.unwrap_or("none")),
            impact,
            effort: Effort::Moderate,
            estimated_time: "1-2 hours".to_string(),
            dependencies: Vec::new(),
            check_id: check_id.map(str::to_string),
        }
    }

    fn suggestion(check_id: Option<&str>, description: &str) -> PrioritizedTask {
        PrioritizedTask {
            priority: Priority::Low,
            category: Category::Content,
            description: description.to_string(),
            impact: 100,
            effort: Effort::Quick,
            estimated_time: "1 hour".to_string(),
            dependencies: vec!["Access to the CMS".to_string()],
            check_id: check_id.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_markdown_wrapped_array() {
        let reply = r#"Here is the plan:
```json
[
  {"priority": "Critical", "category": "Technical", "task": "Enable HTTPS",
   "impact": 9, "effort": "Quick", "estimatedTime": "2-4 hours", "checkId": "tech_01"},
  {"priority": "High", "category": "UX", "task": "Add breadcrumbs",
   "impact": 6, "effort": "Moderate", "estimatedTime": "1 day"}
]
```"#;
        let tasks = parse_tasks(reply).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].impact, 90);
        assert_eq!(tasks[0].check_id.as_deref(), Some("tech_01"));
        assert_eq!(tasks[1].category, Category::UserExperience);
        assert_eq!(tasks[1].impact, 60);
    }

    #[test]
    fn test_parse_keeps_percent_scale() {
        let reply = r#"[
          {"priority": "low", "category": "Local SEO", "description": "Post weekly updates",
           "impact": "35", "effort": "quick", "estimated_time": "30 minutes"},
          {"priority": "medium", "category": "content", "task": "Expand the page",
           "impact": 80, "effort": "extensive", "estimatedTime": "1 week"}
        ]"#;
        let tasks = parse_tasks(reply).unwrap();
        assert_eq!(tasks[0].impact, 35);
        assert_eq!(tasks[0].category, Category::LocalSeo);
        assert_eq!(tasks[1].impact, 80);
        assert_eq!(tasks[1].effort, Effort::Extensive);
    }

    #[test]
    fn test_parse_drops_incomplete_entries() {
        let reply = r#"[
          {"priority": "Urgent", "category": "Technical", "task": "x", "impact": 5,
           "effort": "Quick", "estimatedTime": "1h"},
          {"priority": "High", "category": "Technical", "task": "  ", "impact": 5,
           "effort": "Quick", "estimatedTime": "1h"},
          {"priority": "High", "category": "Technical", "task": "Compress images",
           "effort": "Quick", "estimatedTime": "1h"},
          {"priority": "High", "category": "Technical", "task": "Minify CSS",
           "impact": 5, "effort": "Quick", "estimatedTime": "1h"}
        ]"#;
        let tasks = parse_tasks(reply).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "Minify CSS");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_tasks("I cannot help with that"),
            Err(AugmentError::ParseError(_))
        ));
        assert!(matches!(
            parse_tasks("[not json]"),
            Err(AugmentError::ParseError(_))
        ));
        assert!(matches!(parse_tasks("[]"), Err(AugmentError::ParseError(_))));
    }

    #[test]
    fn test_merge_rewords_matching_tasks_only() {
        let deterministic = vec![
            task(Some("tech_01"), Priority::Critical, 90),
            task(Some("onpage_01"), Priority::Critical, 50),
        ];
        let augmented = vec![suggestion(Some("tech_01"), "Move the site to HTTPS with HSTS")];

        let merged = merge_tasks(deterministic, augmented, 2);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].description, "Move the site to HTTPS with HSTS");
        assert_eq!(merged[0].priority, Priority::Critical);
        assert_eq!(merged[0].impact, 90);
        assert_eq!(merged[0].category, Category::Technical);
        assert_eq!(merged[0].dependencies, vec!["Access to the CMS"]);
        assert_eq!(merged[1].description, "deterministic onpage_01");
    }

    #[test]
    fn test_merge_additions_fill_free_slots() {
        let deterministic = vec![task(Some("tech_01"), Priority::Critical, 90)];
        let augmented = vec![
            suggestion(None, "Start a blog"),
            suggestion(Some("content_99"), "Add FAQ"),
            suggestion(None, "Run a PR campaign"),
        ];

        let merged = merge_tasks(deterministic, augmented, 3);
        let descriptions: Vec<&str> = merged.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, ["deterministic tech_01", "Start a blog", "Add FAQ"]);
    }

    #[test]
    fn test_merge_never_drops_deterministic_tasks() {
        let deterministic: Vec<PrioritizedTask> = (0..10)
            .map(|i| task(Some(&format!("tech_{i:02}")), Priority::Medium, 10))
            .collect();
        let augmented = (0..5)
            .map(|i| PrioritizedTask {
                priority: Priority::Critical,
                ..suggestion(None, &format!("extra {i}"))
            })
            .collect();

        let merged = merge_tasks(deterministic.clone(), augmented, 10);
        assert_eq!(merged, deterministic);
    }

    #[test]
    fn test_context_collects_issues() {
        let mut results = BTreeMap::new();
        results.insert(
            Category::Technical,
            CategoryResult::new(
                Category::Technical,
                vec![
                    CheckResult {
                        id: "tech_01".into(),
                        name: "HTTPS Enabled".into(),
                        outcome: CheckOutcome::fail(false, "Enable HTTPS"),
                    },
                    CheckResult {
                        id: "tech_02".into(),
                        name: "HSTS".into(),
                        outcome: CheckOutcome::pass(true),
                    },
                    CheckResult {
                        id: "tech_03".into(),
                        name: "Compression".into(),
                        outcome: CheckOutcome::not_available("Supply metrics"),
                    },
                ],
            ),
        );
        results.insert(Category::LocalSeo, CategoryResult::skipped(Category::LocalSeo));

        let ctx = AuditContext::new("https://example.com/", &[], &results);
        assert_eq!(ctx.issues.len(), 2);
        assert_eq!(ctx.categories.len(), 2);
        assert!(ctx.categories[1].skipped);

        let prompt = build_prompt(&ctx);
        assert!(prompt.contains("Website: https://example.com/"));
        assert!(prompt.contains("Target Keywords: Not specified"));
        assert!(prompt.contains("[FAIL] HTTPS Enabled (checkId: tech_01, category: Technical)"));
        assert!(prompt.contains("Recommendation: Enable HTTPS"));
        assert!(prompt.contains("- Technical SEO: 1/35 checks passed"));
        assert!(prompt.contains("- Local SEO: skipped"));
    }

    #[tokio::test]
    async fn test_disabled_and_none_augmenters() {
        let ctx = AuditContext::new("https://example.com/", &[], &BTreeMap::new());
        assert!(matches!(
            Disabled.generate_tasks(&ctx).await,
            Err(AugmentError::Disabled)
        ));
        let none: Option<Disabled> = None;
        assert!(matches!(
            none.generate_tasks(&ctx).await,
            Err(AugmentError::Disabled)
        ));
    }
}
