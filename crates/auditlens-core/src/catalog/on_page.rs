//! On-page SEO: meta tags, headings, keyword use, links, images

use std::collections::HashSet;

use super::{CheckDefinition, TaskProfile, keyword_hits, page_keywords};
use crate::facts::PageFacts;
use crate::types::{Category, CheckOutcome, CheckStatus};

const fn check(id: &'static str, name: &'static str, evaluate: super::Evaluate) -> CheckDefinition {
    CheckDefinition::new(id, name, Category::OnPage, evaluate)
}

pub(super) const CHECKS: [CheckDefinition; Category::OnPage.budget() as usize] = [
    // Meta tags
    check("onpage_01", "Title Tag Present", title_present)
        .with_task(TaskProfile::critical().quick("15-30 minutes")),
    check("onpage_02", "Title Tag Length", title_length)
        .with_task(TaskProfile::high().quick("15-30 minutes")),
    check("onpage_03", "Meta Description Present", description_present)
        .with_task(TaskProfile::high().quick("15-30 minutes")),
    check("onpage_04", "Meta Description Length", description_length)
        .with_task(TaskProfile::medium().quick("15-30 minutes")),
    check("onpage_05", "Keywords in Title", keywords_in_title)
        .with_task(TaskProfile::high().quick("15-30 minutes")),
    check("onpage_06", "Keywords in Meta Description", keywords_in_description)
        .with_task(TaskProfile::medium().quick("15-30 minutes")),
    check("onpage_07", "Open Graph Tags", open_graph)
        .with_task(TaskProfile::low().quick("15-30 minutes")),
    check("onpage_08", "Meta Tag Consistency", meta_consistency)
        .with_task(TaskProfile::low().quick("15-30 minutes")),
    // Headings
    check("onpage_09", "H1 Tag Present", h1_present)
        .with_task(TaskProfile::critical().quick("15-30 minutes")),
    check("onpage_10", "Single H1 Tag", single_h1)
        .with_task(TaskProfile::medium().quick("30-60 minutes")),
    check("onpage_11", "Heading Hierarchy", heading_hierarchy),
    check("onpage_12", "Keywords in Headings", keywords_in_headings)
        .with_task(TaskProfile::high().quick("30-60 minutes")),
    check("onpage_13", "Heading Length", heading_length)
        .with_task(TaskProfile::low().quick("15-30 minutes")),
    check("onpage_14", "No Heading Skips", heading_skips)
        .with_task(TaskProfile::low().quick("30-60 minutes")),
    // Content optimization
    check("onpage_15", "Keyword Density", keyword_density),
    check("onpage_16", "LSI Keywords", vocabulary_richness)
        .with_task(TaskProfile::medium().moderate("2-4 hours")),
    check("onpage_17", "Internal Links", internal_links)
        .with_task(TaskProfile::high()),
    check("onpage_18", "External Links", external_links)
        .with_task(TaskProfile::medium().quick("30-60 minutes")),
    check("onpage_19", "Descriptive Anchor Text", descriptive_anchors),
    check("onpage_20", "Content-to-HTML Ratio", content_ratio)
        .with_task(TaskProfile::medium().moderate("1-2 days")),
    // Images
    check("onpage_21", "Image Alt Tags", image_alt_tags)
        .with_task(TaskProfile::high()),
    check("onpage_22", "Descriptive Alt Text", descriptive_alt_text),
    check("onpage_23", "Modern Image Formats", modern_image_formats)
        .with_task(TaskProfile::medium().moderate("2-4 hours")),
    check("onpage_24", "Image Lazy Loading", lazy_loading)
        .with_task(TaskProfile::medium().quick("30-60 minutes")),
    // Links
    check("onpage_25", "Link Text Quality", link_text_quality),
    check("onpage_26", "No Broken Links", broken_links)
        .with_task(TaskProfile::medium().moderate("2-4 hours")),
    check("onpage_27", "Link Attributes", link_attributes)
        .with_task(TaskProfile::low().quick("15-30 minutes")),
    check("onpage_28", "Internal Linking Strategy", internal_linking_strategy),
];

fn title_present(facts: &PageFacts) -> CheckOutcome {
    match &facts.meta.title {
        Some(title) => CheckOutcome::pass(title.as_str()),
        None => CheckOutcome::fail("No title tag", "Add a descriptive title tag to every page"),
    }
}

fn title_length(facts: &PageFacts) -> CheckOutcome {
    let length = facts
        .meta
        .title
        .as_deref()
        .map_or(0, |t| t.chars().count());
    let value = format!("{length} characters");
    let recommendation = "Keep the title between 50 and 60 characters for full SERP display";

    match length {
        50..=60 => CheckOutcome::pass(value),
        1..70 => CheckOutcome::warning(value, recommendation),
        _ => CheckOutcome::fail(value, recommendation),
    }
}

fn description_present(facts: &PageFacts) -> CheckOutcome {
    match &facts.meta.description {
        Some(description) => CheckOutcome::pass(description.as_str()),
        None => CheckOutcome::warning(
            "No meta description",
            "Add a compelling meta description (120-160 characters) to improve click-through",
        ),
    }
}

fn description_length(facts: &PageFacts) -> CheckOutcome {
    let length = facts
        .meta
        .description
        .as_deref()
        .map_or(0, |d| d.chars().count());
    CheckOutcome::check(
        (120..=160).contains(&length),
        format!("{length} characters"),
        CheckStatus::Warning,
        "Keep the meta description between 120 and 160 characters",
    )
}

fn keywords_in_title(facts: &PageFacts) -> CheckOutcome {
    let hits = keyword_hits(&page_keywords(facts), facts.meta.title.as_deref());
    CheckOutcome::check(
        hits >= 1,
        format!("{hits} relevant keywords"),
        CheckStatus::Warning,
        "Include the primary keyword in the title tag",
    )
}

fn keywords_in_description(facts: &PageFacts) -> CheckOutcome {
    let hits = keyword_hits(&page_keywords(facts), facts.meta.description.as_deref());
    CheckOutcome::check(
        hits >= 1,
        format!("{hits} relevant keywords"),
        CheckStatus::Warning,
        "Work target keywords naturally into the meta description",
    )
}

fn has_open_graph(facts: &PageFacts) -> bool {
    let meta = &facts.meta;
    meta.og_title.is_some() || meta.og_description.is_some() || meta.og_image.is_some()
}

fn open_graph(facts: &PageFacts) -> CheckOutcome {
    let present = has_open_graph(facts);
    CheckOutcome::check(
        present,
        if present { "OG tags present" } else { "No OG tags" },
        CheckStatus::Warning,
        "Add Open Graph tags for better social sharing",
    )
}

fn meta_consistency(facts: &PageFacts) -> CheckOutcome {
    let meta = &facts.meta;
    let consistent = !has_open_graph(facts)
        || (meta.og_title == meta.title && meta.og_description == meta.description);
    CheckOutcome::check(
        consistent,
        if consistent { "Meta tags consistent" } else { "OG tags differ from standard meta" },
        CheckStatus::Warning,
        "Make Open Graph title and description match or enhance the standard meta tags",
    )
}

fn h1_present(facts: &PageFacts) -> CheckOutcome {
    match facts.headings.h1.first() {
        Some(h1) => CheckOutcome::pass(h1.as_str()),
        None => CheckOutcome::fail("No H1 tag", "Add one H1 tag per page as the main heading"),
    }
}

fn single_h1(facts: &PageFacts) -> CheckOutcome {
    let count = facts.headings.h1.len();
    let value = format!("{count} H1 tags");
    let recommendation = "Use exactly one H1 tag per page";
    match count {
        1 => CheckOutcome::pass(value),
        0 => CheckOutcome::fail(value, recommendation),
        _ => CheckOutcome::warning(value, recommendation),
    }
}

fn heading_hierarchy(facts: &PageFacts) -> CheckOutcome {
    let h2 = facts.headings.h2.len();
    let h3 = facts.headings.h3.len();
    CheckOutcome::check(
        h2 > 0,
        format!("H2: {h2}, H3: {h3}"),
        CheckStatus::Warning,
        "Structure headings hierarchically (H1, then H2, then H3)",
    )
}

fn keywords_in_headings(facts: &PageFacts) -> CheckOutcome {
    let keywords = page_keywords(facts);
    let hits = keyword_hits(&keywords, facts.headings.h1.first().map(String::as_str));
    CheckOutcome::check(
        hits >= 1,
        format!("{hits} keywords in H1"),
        CheckStatus::Warning,
        "Include primary keywords in the H1 and H2 headings",
    )
}

fn heading_length(facts: &PageFacts) -> CheckOutcome {
    let length = facts
        .headings
        .h1
        .first()
        .map_or(0, |h| h.chars().count());
    CheckOutcome::check(
        (1..=70).contains(&length),
        format!("H1: {length} chars"),
        CheckStatus::Warning,
        "Keep the H1 concise (under 70 characters)",
    )
}

fn heading_skips(facts: &PageFacts) -> CheckOutcome {
    let headings = &facts.headings;
    let skipped = (!headings.h3.is_empty() && headings.h2.is_empty())
        || (!headings.h2.is_empty() && headings.h1.is_empty());
    CheckOutcome::check(
        !skipped,
        if skipped { "Heading levels skipped" } else { "Proper heading order" },
        CheckStatus::Warning,
        "Don't skip heading levels (e.g. H1 directly to H3)",
    )
}

fn keyword_density(facts: &PageFacts) -> CheckOutcome {
    let keywords = page_keywords(facts);
    let Some(keyword) = keywords.first() else {
        return CheckOutcome::warning(
            "No keywords detected",
            "Write enough body copy to establish a primary keyword",
        );
    };

    let words = facts.content.word_count;
    let occurrences = facts.content.text.to_lowercase().matches(keyword.as_str()).count();
    let density = if words > 0 {
        occurrences as f64 / words as f64 * 100.0
    } else {
        0.0
    };

    CheckOutcome::check(
        (1.0..=3.0).contains(&density),
        format!("{density:.2}% for \"{keyword}\""),
        CheckStatus::Warning,
        "Keep the primary keyword density between 1% and 3%",
    )
}

fn vocabulary_richness(facts: &PageFacts) -> CheckOutcome {
    let words: Vec<String> = facts
        .content
        .text
        .split_whitespace()
        .take(100)
        .map(str::to_lowercase)
        .collect();
    let unique: HashSet<&String> = words.iter().collect();
    let richness = if words.is_empty() {
        0.0
    } else {
        unique.len() as f64 / words.len() as f64
    };

    CheckOutcome::check(
        richness > 0.3,
        format!("{:.1}% vocabulary richness", richness * 100.0),
        CheckStatus::Warning,
        "Use semantic keywords and natural variations of the target keywords",
    )
}

fn internal_links(facts: &PageFacts) -> CheckOutcome {
    let count = facts.links.internal;
    CheckOutcome::check(
        count >= 3,
        format!("{count} internal links"),
        CheckStatus::Warning,
        "Add 3 or more internal links to related content",
    )
}

fn external_links(facts: &PageFacts) -> CheckOutcome {
    let count = facts.links.external;
    CheckOutcome::check(
        count >= 1,
        format!("{count} external links"),
        CheckStatus::Warning,
        "Link to 1-2 authoritative external sources",
    )
}

fn descriptive_ratio(facts: &PageFacts) -> f64 {
    let links = &facts.links;
    if links.total_anchors == 0 {
        1.0
    } else {
        1.0 - links.generic_anchors as f64 / links.total_anchors as f64
    }
}

fn descriptive_anchors(facts: &PageFacts) -> CheckOutcome {
    let ratio = descriptive_ratio(facts);
    CheckOutcome::check(
        ratio >= 0.8,
        format!("{:.0}% descriptive", ratio * 100.0),
        CheckStatus::Warning,
        "Replace generic anchors like \"click here\" with descriptive link text",
    )
}

fn content_ratio(facts: &PageFacts) -> CheckOutcome {
    let html_length = facts.html_length.max(1);
    let ratio = facts.content.text.len() as f64 / html_length as f64 * 100.0;
    CheckOutcome::check(
        ratio >= 25.0,
        format!("{ratio:.1}%"),
        CheckStatus::Warning,
        "Reduce HTML bloat and raise the text-to-HTML ratio to 25% or more",
    )
}

fn alt_coverage(facts: &PageFacts) -> f64 {
    let images = &facts.images;
    if images.total == 0 {
        100.0
    } else {
        images.with_alt as f64 / images.total as f64 * 100.0
    }
}

fn image_alt_tags(facts: &PageFacts) -> CheckOutcome {
    let images = &facts.images;
    let coverage = alt_coverage(facts);
    let value = format!("{}/{} images with alt", images.with_alt, images.total);
    let recommendation = "Add descriptive alt text to every image";

    if images.missing_alt == 0 {
        CheckOutcome::pass(value)
    } else if coverage >= 80.0 {
        CheckOutcome::warning(value, recommendation)
    } else {
        CheckOutcome::fail(value, recommendation)
    }
}

fn descriptive_alt_text(facts: &PageFacts) -> CheckOutcome {
    let filenames = facts.images.filename_alts;
    let descriptive = alt_coverage(facts) >= 80.0 && filenames == 0;
    let value = if filenames > 0 {
        format!("{filenames} alt texts are file names")
    } else if descriptive {
        "Alt text descriptive".to_string()
    } else {
        "Alt text needs improvement".to_string()
    };
    CheckOutcome::check(
        descriptive,
        value,
        CheckStatus::Warning,
        "Write alt text that describes the image, not its file name",
    )
}

fn modern_image_formats(facts: &PageFacts) -> CheckOutcome {
    let images = &facts.images;
    let modern = images.total == 0 || images.modern_format > 0;
    CheckOutcome::check(
        modern,
        if modern { "Using WebP/AVIF" } else { "Using legacy formats" },
        CheckStatus::Warning,
        "Convert images to WebP or AVIF",
    )
}

fn lazy_loading(facts: &PageFacts) -> CheckOutcome {
    let images = &facts.images;
    let lazy = images.total == 0 || images.lazy_loaded > 0;
    CheckOutcome::check(
        lazy,
        format!("{}/{} images lazy loaded", images.lazy_loaded, images.total),
        CheckStatus::Warning,
        "Lazy load below-the-fold images with loading=\"lazy\"",
    )
}

fn link_text_quality(facts: &PageFacts) -> CheckOutcome {
    let ratio = descriptive_ratio(facts);
    CheckOutcome::check(
        ratio >= 0.8,
        format!("{:.0}% quality anchors", ratio * 100.0),
        CheckStatus::Warning,
        "Improve link anchor text so each link says where it goes",
    )
}

fn broken_links(facts: &PageFacts) -> CheckOutcome {
    let Some(broken) = facts.links.broken else {
        return CheckOutcome::not_available("Run a link check to find broken links");
    };
    let value = format!("{broken} broken links");
    let recommendation = format!("Fix {broken} broken links");
    match broken {
        0 => CheckOutcome::pass(value),
        1..3 => CheckOutcome::warning(value, recommendation),
        _ => CheckOutcome::fail(value, recommendation),
    }
}

// Informational
fn link_attributes(facts: &PageFacts) -> CheckOutcome {
    let links = &facts.links;
    CheckOutcome::pass(format!(
        "{} follow, {} nofollow",
        links.total_anchors.saturating_sub(links.nofollow),
        links.nofollow
    ))
}

fn internal_linking_strategy(facts: &PageFacts) -> CheckOutcome {
    let count = facts.links.internal;
    CheckOutcome::check(
        (3..=20).contains(&count),
        format!("{count} internal links"),
        CheckStatus::Warning,
        "Keep internal links between 3 and 20 per page",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> PageFacts {
        let mut facts = PageFacts::default();
        facts.meta.title = Some(title.to_string());
        facts
    }

    #[test]
    fn test_title_length_bands() {
        let pass = titled(&"a".repeat(55));
        assert!(title_length(&pass).is_pass());

        let short = title_length(&titled("Short title"));
        assert_eq!(short.status, CheckStatus::Warning);
        assert_eq!(short.value, "11 characters");

        assert_eq!(
            title_length(&titled(&"a".repeat(75))).status,
            CheckStatus::Fail
        );
        assert_eq!(
            title_length(&PageFacts::default()).status,
            CheckStatus::Fail
        );
    }

    #[test]
    fn test_single_h1() {
        let mut facts = PageFacts::default();
        assert_eq!(single_h1(&facts).status, CheckStatus::Fail);
        facts.headings.h1 = vec!["One".into()];
        assert!(single_h1(&facts).is_pass());
        facts.headings.h1.push("Two".into());
        assert_eq!(single_h1(&facts).status, CheckStatus::Warning);
    }

    #[test]
    fn test_keywords_from_target_list() {
        let mut facts = titled("Emergency Plumber Brisbane | Acme");
        facts.target_keywords = vec!["emergency plumber".into()];
        assert!(keywords_in_title(&facts).is_pass());
        assert_eq!(keywords_in_description(&facts).status, CheckStatus::Warning);
    }

    #[test]
    fn test_keyword_density_band() {
        let mut facts = PageFacts::default();
        facts.target_keywords = vec!["plumber".into()];
        facts.content.text = format!("plumber {}", "word ".repeat(49));
        facts.content.word_count = 50;
        // 1 of 50 words
        let outcome = keyword_density(&facts);
        assert!(outcome.is_pass(), "{:?}", outcome);

        facts.content.text = "plumber plumber plumber filler".to_string();
        facts.content.word_count = 4;
        assert_eq!(keyword_density(&facts).status, CheckStatus::Warning);
    }

    #[test]
    fn test_heading_skips() {
        let mut facts = PageFacts::default();
        facts.headings.h1 = vec!["Title".into()];
        facts.headings.h3 = vec!["Deep".into()];
        assert_eq!(heading_skips(&facts).status, CheckStatus::Warning);
        facts.headings.h2 = vec!["Section".into()];
        assert!(heading_skips(&facts).is_pass());
    }

    #[test]
    fn test_image_alt_coverage() {
        let mut facts = PageFacts::default();
        assert!(image_alt_tags(&facts).is_pass());

        facts.images.total = 10;
        facts.images.with_alt = 9;
        facts.images.missing_alt = 1;
        assert_eq!(image_alt_tags(&facts).status, CheckStatus::Warning);

        facts.images.with_alt = 5;
        facts.images.missing_alt = 5;
        assert_eq!(image_alt_tags(&facts).status, CheckStatus::Fail);
    }

    #[test]
    fn test_filename_alt_text_flagged() {
        let mut facts = PageFacts::default();
        facts.images.total = 2;
        facts.images.with_alt = 2;
        facts.images.filename_alts = 1;
        let outcome = descriptive_alt_text(&facts);
        assert_eq!(outcome.status, CheckStatus::Warning);
        assert_eq!(outcome.value, "1 alt texts are file names");
    }

    #[test]
    fn test_generic_anchor_ratio() {
        let mut facts = PageFacts::default();
        facts.links.total_anchors = 10;
        facts.links.generic_anchors = 3;
        assert_eq!(descriptive_anchors(&facts).status, CheckStatus::Warning);
        facts.links.generic_anchors = 2;
        assert!(descriptive_anchors(&facts).is_pass());
    }

    #[test]
    fn test_internal_linking_strategy_range() {
        let mut facts = PageFacts::default();
        facts.links.internal = 21;
        assert!(internal_links(&facts).is_pass());
        assert_eq!(
            internal_linking_strategy(&facts).status,
            CheckStatus::Warning
        );
    }
}
