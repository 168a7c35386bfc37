//! User experience: web vitals, navigation, design, accessibility

use once_cell::sync::Lazy;
use regex::Regex;

use super::{CheckDefinition, TaskProfile, grade_at_least, grade_below, seconds, with_performance};
use crate::facts::PageFacts;
use crate::types::{Category, CheckOutcome, CheckStatus};

static RE_POPUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(modal|popup|overlay|newsletter)\b").expect("invalid popup regex")
});
static RE_POPUP_TRIGGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bonload\b|\bimmediate\b|\binstant\b").expect("invalid trigger regex")
});

const fn check(id: &'static str, name: &'static str, evaluate: super::Evaluate) -> CheckDefinition {
    CheckDefinition::new(id, name, Category::UserExperience, evaluate)
}

pub(super) const CHECKS: [CheckDefinition; Category::UserExperience.budget() as usize] = [
    // Core web vitals
    check("ux_01", "LCP (UX Perspective)", largest_contentful_paint)
        .with_task(TaskProfile::critical().extensive("1-2 weeks")),
    check("ux_02", "FID/Interactivity", interactivity)
        .with_task(TaskProfile::critical().extensive("1-2 weeks")),
    check("ux_03", "CLS (UX Perspective)", layout_stability)
        .with_task(TaskProfile::critical().moderate("1-2 days")),
    check("ux_04", "INP (Responsiveness)", responsiveness)
        .with_task(TaskProfile::high().extensive("1-2 weeks")),
    check("ux_05", "TTFB (Server Response)", server_response)
        .with_task(TaskProfile::high().moderate("1-2 days")),
    // Navigation
    check("ux_06", "Clear Navigation", navigation)
        .with_task(TaskProfile::high().moderate("1-2 days")),
    check("ux_07", "Breadcrumbs", breadcrumbs)
        .with_task(TaskProfile::medium().moderate("2-4 hours")),
    check("ux_08", "Search Functionality", search)
        .with_task(TaskProfile::low().extensive("1-2 weeks")),
    check("ux_09", "Footer Navigation", footer_navigation)
        .with_task(TaskProfile::medium().moderate("2-4 hours")),
    // Design
    check("ux_10", "Color Contrast", color_contrast),
    check("ux_11", "Readable Font Sizes", font_sizes),
    check("ux_12", "No Intrusive Popups", intrusive_popups)
        .with_task(TaskProfile::medium().quick("30-60 minutes")),
    // Accessibility
    check("ux_13", "ARIA Labels", aria_labels),
    check("ux_14", "Keyboard Navigation", keyboard_navigation)
        .with_task(TaskProfile::high().moderate("1-2 days")),
    check("ux_15", "Screen Reader Compatibility", screen_reader)
        .with_task(TaskProfile::high().moderate("1-2 days")),
];

fn largest_contentful_paint(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        grade_below(
            perf.lcp_ms,
            2500.0,
            4000.0,
            seconds(perf.lcp_ms),
            "Get the main content on screen within 2.5s",
        )
    })
}

fn interactivity(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        grade_below(
            perf.tbt_ms,
            200.0,
            600.0,
            format!("{:.0} ms TBT", perf.tbt_ms),
            "Reduce blocking time so the page reacts to input quickly (TBT under 200ms)",
        )
    })
}

fn layout_stability(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        grade_below(
            perf.cls,
            0.1,
            0.25,
            format!("{:.3}", perf.cls),
            "Keep the layout visually stable while loading (CLS under 0.1)",
        )
    })
}

// INP needs field data; TBT stands in for it
fn responsiveness(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        CheckOutcome::check(
            perf.tbt_ms < 200.0,
            format!("Estimated from TBT: {:.0} ms", perf.tbt_ms),
            CheckStatus::Warning,
            "Optimize JavaScript execution for faster responses to interaction",
        )
    })
}

fn server_response(facts: &PageFacts) -> CheckOutcome {
    let ttfb = match (&facts.performance, facts.response_time_ms) {
        (Some(perf), _) => perf.ttfb_ms,
        (None, Some(measured)) => measured as f64,
        (None, None) => {
            return CheckOutcome::not_available(
                "Audit the live URL or supply Lighthouse metrics to measure server response",
            );
        }
    };
    grade_below(
        ttfb,
        600.0,
        1000.0,
        format!("{ttfb:.0} ms"),
        "Improve server response time to under 600ms",
    )
}

fn navigation(facts: &PageFacts) -> CheckOutcome {
    let items = facts.links.nav_links;
    let has_nav = facts.landmarks.has_nav || items > 0;
    let recommendation = "Provide clear navigation with 3-15 menu items";

    if has_nav && (3..=15).contains(&items) {
        CheckOutcome::pass(format!("{items} nav items"))
    } else if has_nav {
        CheckOutcome::warning(format!("{items} nav items"), recommendation)
    } else {
        CheckOutcome::fail("No navigation found", recommendation)
    }
}

fn breadcrumbs(facts: &PageFacts) -> CheckOutcome {
    let present = facts.landmarks.has_breadcrumbs;
    CheckOutcome::check(
        present,
        if present { "Breadcrumbs present" } else { "No breadcrumbs" },
        CheckStatus::Warning,
        "Add breadcrumb navigation to help visitors orient themselves",
    )
}

fn search(facts: &PageFacts) -> CheckOutcome {
    let present = facts.landmarks.has_search;
    CheckOutcome::check(
        present,
        if present { "Search available" } else { "No search" },
        CheckStatus::Warning,
        "Add site search for larger sites",
    )
}

fn footer_navigation(facts: &PageFacts) -> CheckOutcome {
    let links = facts.links.footer_links;
    let recommendation = "Add a comprehensive footer linking to key pages";
    if !facts.landmarks.has_footer {
        CheckOutcome::fail("No footer", recommendation)
    } else if links >= 5 {
        CheckOutcome::pass(format!("{links} footer links"))
    } else {
        CheckOutcome::warning(format!("{links} footer links"), recommendation)
    }
}

fn color_contrast(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        CheckOutcome::check(
            perf.color_contrast_ok,
            if perf.color_contrast_ok { "Good contrast" } else { "Contrast issues detected" },
            CheckStatus::Warning,
            "Improve color contrast to at least 4.5:1 (WCAG AA)",
        )
    })
}

fn font_sizes(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        CheckOutcome::check(
            perf.font_sizes_ok,
            if perf.font_sizes_ok { "Font sizes adequate" } else { "Font sizes too small" },
            CheckStatus::Warning,
            "Increase body text to at least 16px",
        )
    })
}

fn intrusive_popups(facts: &PageFacts) -> CheckOutcome {
    let intrusive = RE_POPUP.is_match(&facts.html) && RE_POPUP_TRIGGER.is_match(&facts.html);
    CheckOutcome::check(
        !intrusive,
        if intrusive { "Intrusive popups detected" } else { "No intrusive popups" },
        CheckStatus::Warning,
        "Avoid popups that cover the content as soon as the page loads",
    )
}

fn aria_labels(facts: &PageFacts) -> CheckOutcome {
    let labels = facts.content.aria_labels;
    with_performance(facts, |perf| {
        CheckOutcome::check(
            perf.aria_ok,
            format!("{labels} ARIA labels"),
            CheckStatus::Warning,
            "Add the required ARIA attributes to interactive elements",
        )
    })
}

fn keyboard_navigation(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        CheckOutcome::check(
            perf.keyboard_ok,
            if perf.keyboard_ok { "Keyboard accessible" } else { "Keyboard issues detected" },
            CheckStatus::Warning,
            "Make every interactive element reachable and usable from the keyboard",
        )
    })
}

fn screen_reader(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        grade_at_least(
            f64::from(perf.accessibility_score),
            90.0,
            70.0,
            format!("{}/100 accessibility score", perf.accessibility_score),
            "Improve screen reader support with alt text, labels and semantic HTML",
        )
    })
}
