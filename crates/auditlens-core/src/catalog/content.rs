//! Content quality: depth, readability, E-E-A-T signals, engagement

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{CheckDefinition, TaskProfile};
use crate::facts::PageFacts;
use crate::types::{Category, CheckOutcome, CheckStatus};

static RE_SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("invalid sentence regex"));
static RE_QUESTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\?|\bhow to\b|\bwhat is\b|\bwhy\b|\bwhen\b|\bwhere\b")
        .expect("invalid question regex")
});
static RE_AUTHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bwritten by\b|\bposted by\b|\bauthor\b|rel=["']author"#)
        .expect("invalid author regex")
});
static RE_PUBLISHED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(published|posted|updated)\b|datetime=|datePublished")
        .expect("invalid published regex")
});
static RE_UPDATED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(updated|modified|revised)\b|dateModified").expect("invalid updated regex")
});
static RE_CITATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(sources?|citations?|references?|study|studies|research)\b")
        .expect("invalid citation regex")
});
static RE_QUOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)"[^"]{50,}"|“[^”]{50,}”|\bsays\b|\baccording to\b|\bexperts?\b|\bprofessionals?\b"#)
        .expect("invalid quote regex")
});
static RE_CREDENTIALS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bcertified\b|\blicensed\b|years of experience|\bexperts?\b|\bprofessionals?\b|\bphd\b|\bdegree\b",
    )
    .expect("invalid credentials regex")
});
static RE_CTA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)call now|contact us|get started|learn more|sign up|subscribe|buy now|download|book now|get a quote",
    )
    .expect("invalid cta regex")
});
static RE_SHARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)addthis|sharethis|share on|share this|/sharer|intent/tweet")
        .expect("invalid share regex")
});
static RE_COMMENTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bcomments?\b|\bdiscussion\b|\bdisqus\b|\breply\b")
        .expect("invalid comments regex")
});
static RE_INTERACTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bcalculator\b|\bquiz\b|\btools?\b|\binteractive\b|\bslider\b")
        .expect("invalid interactive regex")
});

const fn check(id: &'static str, name: &'static str, evaluate: super::Evaluate) -> CheckDefinition {
    CheckDefinition::new(id, name, Category::Content, evaluate)
}

pub(super) const CHECKS: [CheckDefinition; Category::Content.budget() as usize] = [
    // Length and depth
    check("content_01", "Content Length", content_length)
        .with_task(TaskProfile::high().extensive("1-2 weeks")),
    check("content_02", "Topic Coverage", topic_coverage)
        .with_task(TaskProfile::high().extensive("1-2 weeks")),
    check("content_03", "Subtopic Coverage", subtopic_coverage)
        .with_task(TaskProfile::medium().moderate("2-4 hours")),
    check("content_04", "User Intent Coverage", user_intent)
        .with_task(TaskProfile::high().moderate("1-2 days")),
    check("content_05", "Content Originality", originality)
        .with_task(TaskProfile::critical().extensive("2-4 weeks")),
    // Readability
    check("content_06", "Reading Level", reading_level),
    check("content_07", "Paragraph Length", paragraph_length),
    check("content_08", "Lists & Bullet Points", lists)
        .with_task(TaskProfile::medium().quick("30-60 minutes")),
    check("content_09", "Subheading Frequency", subheading_frequency),
    check("content_10", "Multimedia Elements", multimedia)
        .with_task(TaskProfile::medium().moderate("1-2 days")),
    // E-E-A-T
    check("content_11", "Author Attribution", author_attribution)
        .with_task(TaskProfile::high().quick("30-60 minutes")),
    check("content_12", "Publication Date", publication_date)
        .with_task(TaskProfile::medium().quick("15-30 minutes")),
    check("content_13", "Last Updated Date", last_updated)
        .with_task(TaskProfile::low().quick("15-30 minutes")),
    check("content_14", "External Citations", external_citations)
        .with_task(TaskProfile::high()),
    check("content_15", "Expert Quotes", expert_quotes)
        .with_task(TaskProfile::medium().moderate("1-2 days")),
    check("content_16", "Credentials Mentioned", credentials)
        .with_task(TaskProfile::medium().quick("30-60 minutes")),
    // Engagement
    check("content_17", "Call-to-Action", call_to_action)
        .with_task(TaskProfile::high().quick("30-60 minutes")),
    check("content_18", "Internal Content Links", internal_content_links)
        .with_task(TaskProfile::high()),
    check("content_19", "Social Sharing", social_sharing)
        .with_task(TaskProfile::low().quick("30-60 minutes")),
    check("content_20", "Comments Enabled", comments)
        .with_task(TaskProfile::low().moderate("2-4 hours")),
    check("content_21", "Embedded Media", embedded_media),
    check("content_22", "Interactive Elements", interactive_elements)
        .with_task(TaskProfile::low().extensive("1-2 weeks")),
];

fn sentences(text: &str) -> Vec<String> {
    RE_SENTENCE_END
        .split(text)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn content_length(facts: &PageFacts) -> CheckOutcome {
    let words = facts.content.word_count;
    let value = format!("{words} words");
    let recommendation = "Expand the content to 1000+ words for comprehensive coverage";
    match words {
        1000.. => CheckOutcome::pass(value),
        500.. => CheckOutcome::warning(value, recommendation),
        _ => CheckOutcome::fail(value, recommendation),
    }
}

fn topic_coverage(facts: &PageFacts) -> CheckOutcome {
    let sections = facts.headings.h2.len() + facts.headings.h3.len();
    let value = format!("{sections} sections");
    let recommendation = "Cover the topic in 5 or more sections";
    match sections {
        5.. => CheckOutcome::pass(value),
        3.. => CheckOutcome::warning(value, recommendation),
        _ => CheckOutcome::fail(value, recommendation),
    }
}

fn subtopic_coverage(facts: &PageFacts) -> CheckOutcome {
    let h3 = facts.headings.h3.len();
    CheckOutcome::check(
        h3 >= 3,
        format!("{h3} subtopics"),
        CheckStatus::Warning,
        "Break the content into subtopics with H3 headings",
    )
}

fn user_intent(facts: &PageFacts) -> CheckOutcome {
    let answers = RE_QUESTION.is_match(&facts.content.text) || facts.headings.h2.len() >= 3;
    CheckOutcome::check(
        answers,
        if answers { "Addresses user questions" } else { "May not fully address user intent" },
        CheckStatus::Warning,
        "Structure the content to answer the questions searchers actually ask",
    )
}

fn originality(facts: &PageFacts) -> CheckOutcome {
    let sentences = sentences(&facts.content.text);
    if sentences.is_empty() {
        return CheckOutcome::warning(
            "No sentences found",
            "Publish original body copy on the page",
        );
    }
    let unique: HashSet<&String> = sentences.iter().collect();
    let ratio = unique.len() as f64 / sentences.len() as f64;

    CheckOutcome::check(
        ratio > 0.8,
        format!("{:.0}% unique sentences", ratio * 100.0),
        CheckStatus::Warning,
        "Remove duplicated or spun passages and keep the content original",
    )
}

fn reading_level(facts: &PageFacts) -> CheckOutcome {
    let sentences = sentences(&facts.content.text).len();
    let per_sentence = if sentences > 0 {
        facts.content.word_count as f64 / sentences as f64
    } else {
        0.0
    };
    CheckOutcome::check(
        (10.0..=20.0).contains(&per_sentence),
        format!("{per_sentence:.1} words/sentence"),
        CheckStatus::Warning,
        "Aim for 10-20 words per sentence",
    )
}

fn paragraph_length(facts: &PageFacts) -> CheckOutcome {
    let paragraphs = facts.content.paragraphs;
    let per_paragraph = if paragraphs > 0 {
        facts.content.word_count as f64 / paragraphs as f64
    } else {
        0.0
    };
    CheckOutcome::check(
        per_paragraph <= 150.0,
        format!("{per_paragraph:.0} words/paragraph"),
        CheckStatus::Warning,
        "Break the content into shorter paragraphs (under 150 words)",
    )
}

fn lists(facts: &PageFacts) -> CheckOutcome {
    let lists = facts.content.lists;
    CheckOutcome::check(
        lists > 0,
        format!("{lists} lists"),
        CheckStatus::Warning,
        "Use bullet points or numbered lists to break up the content",
    )
}

fn subheading_frequency(facts: &PageFacts) -> CheckOutcome {
    let h2 = facts.headings.h2.len();
    let words = facts.content.word_count as f64;
    let per_h2 = if h2 > 0 { words / h2 as f64 } else { words };
    CheckOutcome::check(
        per_h2 <= 300.0,
        format!("{per_h2:.0} words per H2"),
        CheckStatus::Warning,
        "Add a subheading every 200-300 words",
    )
}

fn multimedia(facts: &PageFacts) -> CheckOutcome {
    let media = facts.images.total + facts.content.videos;
    let words = facts.content.word_count;
    let ratio = if words > 0 {
        media as f64 / (words as f64 / 500.0)
    } else {
        0.0
    };
    let value = format!("{media} multimedia elements");
    let recommendation = "Add an image or video for every 500 words";

    if ratio >= 0.5 {
        CheckOutcome::pass(value)
    } else if media > 0 {
        CheckOutcome::warning(value, recommendation)
    } else {
        CheckOutcome::fail(value, recommendation)
    }
}

fn pattern_check(
    found: bool,
    present: &str,
    absent: &str,
    recommendation: &str,
) -> CheckOutcome {
    CheckOutcome::check(
        found,
        if found { present } else { absent },
        CheckStatus::Warning,
        recommendation,
    )
}

fn author_attribution(facts: &PageFacts) -> CheckOutcome {
    pattern_check(
        RE_AUTHOR.is_match(&facts.html),
        "Author shown",
        "No author attribution",
        "Add an author byline with credentials",
    )
}

fn publication_date(facts: &PageFacts) -> CheckOutcome {
    pattern_check(
        RE_PUBLISHED.is_match(&facts.html),
        "Date visible",
        "No publication date",
        "Display the publication date prominently",
    )
}

fn last_updated(facts: &PageFacts) -> CheckOutcome {
    pattern_check(
        RE_UPDATED.is_match(&facts.html),
        "Update date shown",
        "No update date",
        "Show a last-updated date to signal freshness",
    )
}

fn external_citations(facts: &PageFacts) -> CheckOutcome {
    let recommendation = "Cite authoritative external sources";
    if RE_CITATION.is_match(&facts.content.text) {
        CheckOutcome::pass("Citations present")
    } else if facts.links.external > 0 {
        CheckOutcome::warning("No clear citations", recommendation)
    } else {
        CheckOutcome::fail("No citations or external links", recommendation)
    }
}

fn expert_quotes(facts: &PageFacts) -> CheckOutcome {
    pattern_check(
        RE_QUOTE.is_match(&facts.content.text),
        "Expert quotes found",
        "No expert quotes",
        "Include quotes from industry experts",
    )
}

fn credentials(facts: &PageFacts) -> CheckOutcome {
    pattern_check(
        RE_CREDENTIALS.is_match(&facts.content.text),
        "Credentials mentioned",
        "No credentials",
        "Mention relevant credentials, licences and experience",
    )
}

fn call_to_action(facts: &PageFacts) -> CheckOutcome {
    pattern_check(
        RE_CTA.is_match(&facts.html),
        "CTA present",
        "No clear CTA",
        "Add a clear call-to-action",
    )
}

fn internal_content_links(facts: &PageFacts) -> CheckOutcome {
    let count = facts.links.internal;
    CheckOutcome::check(
        count >= 3,
        format!("{count} internal links"),
        CheckStatus::Warning,
        "Link to at least 3 related pages on the same site",
    )
}

fn social_sharing(facts: &PageFacts) -> CheckOutcome {
    pattern_check(
        facts.links.social > 0 || RE_SHARE.is_match(&facts.html),
        "Social sharing enabled",
        "No social sharing",
        "Add social sharing buttons to increase reach",
    )
}

fn comments(facts: &PageFacts) -> CheckOutcome {
    pattern_check(
        RE_COMMENTS.is_match(&facts.html),
        "Comments enabled",
        "No comments",
        "Enable comments to encourage discussion",
    )
}

fn embedded_media(facts: &PageFacts) -> CheckOutcome {
    let images = facts.images.total;
    let videos = facts.content.videos;
    CheckOutcome::check(
        images >= 2 || videos >= 1,
        format!("{images} images, {videos} videos"),
        CheckStatus::Warning,
        "Embed relevant images or videos",
    )
}

fn interactive_elements(facts: &PageFacts) -> CheckOutcome {
    pattern_check(
        facts.content.forms > 0 || RE_INTERACTIVE.is_match(&facts.html),
        "Interactive elements found",
        "No interactive elements",
        "Add interactive elements such as forms, calculators or quizzes",
    )
}
