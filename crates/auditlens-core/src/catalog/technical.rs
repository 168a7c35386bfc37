//! Technical SEO: security, performance, crawlability, mobile, structured data

use url::Url;

use super::{
    CheckDefinition, TaskProfile, grade_at_least, grade_below, seconds, with_performance,
};
use crate::facts::PageFacts;
use crate::types::{Category, CheckOutcome, CheckStatus};

const fn check(id: &'static str, name: &'static str, evaluate: super::Evaluate) -> CheckDefinition {
    CheckDefinition::new(id, name, Category::Technical, evaluate)
}

pub(super) const CHECKS: [CheckDefinition; Category::Technical.budget() as usize] = [
    // Security
    check("tech_01", "HTTPS Enabled", https_enabled)
        .with_task(TaskProfile::critical().moderate("2-4 hours")),
    check("tech_02", "Mixed Content Check", mixed_content)
        .with_task(TaskProfile::high().moderate("1-2 hours")),
    check("tech_03", "Security Headers", security_headers)
        .with_task(TaskProfile::high().quick("30-60 minutes")),
    check("tech_04", "HSTS Enabled", hsts_enabled)
        .with_task(TaskProfile::medium().quick("15-30 minutes")),
    check("tech_05", "JavaScript Console Errors", console_errors)
        .with_task(TaskProfile::medium().moderate("2-4 hours")),
    // Performance
    check("tech_06", "LCP (Largest Contentful Paint)", largest_contentful_paint)
        .with_task(TaskProfile::critical().extensive("1-2 weeks")),
    check("tech_07", "CLS (Cumulative Layout Shift)", cumulative_layout_shift)
        .with_task(TaskProfile::critical().moderate("1-2 days")),
    check("tech_08", "FCP (First Contentful Paint)", first_contentful_paint)
        .with_task(TaskProfile::high().extensive("1-2 weeks")),
    check("tech_09", "TBT (Total Blocking Time)", total_blocking_time)
        .with_task(TaskProfile::high().extensive("1-2 weeks")),
    check("tech_10", "Speed Index", speed_index)
        .with_task(TaskProfile::high().extensive("1-2 weeks")),
    check("tech_11", "TTI (Time to Interactive)", time_to_interactive)
        .with_task(TaskProfile::high().extensive("1-2 weeks")),
    check("tech_12", "Text Compression", text_compression)
        .with_task(TaskProfile::medium().quick("30-60 minutes")),
    check("tech_13", "Modern Image Formats", modern_image_audit)
        .with_task(TaskProfile::medium().moderate("1-2 days")),
    // Crawlability
    check("tech_14", "Robots.txt Present", robots_txt)
        .with_task(TaskProfile::medium().quick("15-30 minutes")),
    check("tech_15", "XML Sitemap Present", sitemap_xml)
        .with_task(TaskProfile::high().quick("30-60 minutes")),
    check("tech_16", "Canonical Tag Present", canonical_tag)
        .with_task(TaskProfile::high().quick("15-30 minutes")),
    check("tech_17", "Clean URL Structure", clean_url),
    check("tech_18", "No Redirect Chains", redirect_chains),
    check("tech_19", "Indexability", indexability)
        .with_task(TaskProfile::critical().quick("15-30 minutes")),
    check("tech_20", "URL Depth", url_depth).with_task(TaskProfile::low()),
    check("tech_21", "No Broken Links", broken_links)
        .with_task(TaskProfile::medium().moderate("2-4 hours")),
    // Mobile
    check("tech_22", "Mobile Viewport", mobile_viewport)
        .with_task(TaskProfile::critical().quick("15-30 minutes")),
    check("tech_23", "Mobile Usability", mobile_usability)
        .with_task(TaskProfile::critical().moderate("1-2 days")),
    check("tech_24", "Touch Target Size", touch_targets)
        .with_task(TaskProfile::high().moderate("2-4 hours")),
    check("tech_25", "Readable Font Sizes", font_sizes),
    check("tech_26", "Content Fits Screen", content_width),
    check("tech_27", "No Horizontal Scroll", horizontal_scroll),
    check("tech_28", "Mobile Page Speed", mobile_speed)
        .with_task(TaskProfile::high().extensive("1-2 weeks")),
    // Structured data
    check("tech_29", "Schema.org Markup", schema_markup)
        .with_task(TaskProfile::high().moderate("2-4 hours")),
    check("tech_30", "Organization Schema", organization_schema)
        .with_task(TaskProfile::medium().quick("30-60 minutes")),
    check("tech_31", "Breadcrumb Schema", breadcrumb_schema)
        .with_task(TaskProfile::low().quick("30-60 minutes")),
    check("tech_32", "LocalBusiness Schema", local_business_schema)
        .with_task(TaskProfile::medium().quick("30-60 minutes")),
    check("tech_33", "Article Schema", article_schema)
        .with_task(TaskProfile::low().quick("30-60 minutes")),
    check("tech_34", "Product Schema", product_schema)
        .with_task(TaskProfile::low().quick("30-60 minutes")),
    check("tech_35", "Schema Validation", schema_validation)
        .with_task(TaskProfile::low().quick("30-60 minutes")),
];

fn https_enabled(facts: &PageFacts) -> CheckOutcome {
    let https = facts.is_https();
    CheckOutcome::check(
        https,
        https,
        CheckStatus::Fail,
        "Enable HTTPS with an SSL certificate and redirect all HTTP traffic",
    )
}

fn mixed_content(facts: &PageFacts) -> CheckOutcome {
    let insecure = facts.resources.insecure_references;
    if !facts.is_https() || insecure == 0 {
        return CheckOutcome::pass("No mixed content");
    }
    CheckOutcome::warning(
        format!("{insecure} HTTP resources on an HTTPS page"),
        "Update all resources (images, scripts, stylesheets) to load over HTTPS",
    )
}

fn security_headers(facts: &PageFacts) -> CheckOutcome {
    if facts.headers.is_none() {
        return CheckOutcome::not_available(
            "Audit the live URL so response headers can be inspected",
        );
    }

    let present = [
        "content-security-policy",
        "x-frame-options",
        "x-content-type-options",
    ]
    .iter()
    .filter(|name| facts.header(name).is_some())
    .count();

    let value = format!("{present}/3 headers present");
    let recommendation = "Add Content-Security-Policy, X-Frame-Options and X-Content-Type-Options headers";
    match present {
        2.. => CheckOutcome::pass(value),
        1 => CheckOutcome::warning(value, recommendation),
        _ => CheckOutcome::fail(value, recommendation),
    }
}

fn hsts_enabled(facts: &PageFacts) -> CheckOutcome {
    if facts.headers.is_none() {
        return CheckOutcome::not_available(
            "Audit the live URL so response headers can be inspected",
        );
    }
    let hsts = facts.header("strict-transport-security").is_some();
    CheckOutcome::check(
        hsts,
        if hsts { "HSTS header present" } else { "HSTS not detected" },
        CheckStatus::Warning,
        "Enable the HTTP Strict-Transport-Security (HSTS) header",
    )
}

fn console_errors(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        let errors = perf.console_errors;
        let value = format!("{errors} errors");
        let recommendation = format!("Fix {errors} console errors affecting site reliability");
        match errors {
            0 => CheckOutcome::pass(value),
            1..5 => CheckOutcome::warning(value, recommendation),
            _ => CheckOutcome::fail(value, recommendation),
        }
    })
}

fn largest_contentful_paint(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        grade_below(
            perf.lcp_ms,
            2500.0,
            4000.0,
            seconds(perf.lcp_ms),
            "Bring LCP under 2.5s: improve server response, optimize hero images, remove render-blocking resources",
        )
    })
}

fn cumulative_layout_shift(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        grade_below(
            perf.cls,
            0.1,
            0.25,
            format!("{:.3}", perf.cls),
            "Reduce layout shifts: set size attributes on images and videos, avoid inserting content above existing content",
        )
    })
}

fn first_contentful_paint(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        grade_below(
            perf.fcp_ms,
            1800.0,
            3000.0,
            seconds(perf.fcp_ms),
            "Bring FCP under 1.8s by optimizing the critical rendering path",
        )
    })
}

fn total_blocking_time(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        grade_below(
            perf.tbt_ms,
            200.0,
            600.0,
            format!("{:.0} ms", perf.tbt_ms),
            "Reduce Total Blocking Time under 200ms: split bundles and defer non-critical JavaScript",
        )
    })
}

fn speed_index(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        grade_below(
            perf.speed_index_ms,
            3400.0,
            5800.0,
            seconds(perf.speed_index_ms),
            "Improve Speed Index to under 3.4s by prioritizing above-the-fold content",
        )
    })
}

fn time_to_interactive(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        grade_below(
            perf.tti_ms,
            3800.0,
            7300.0,
            seconds(perf.tti_ms),
            "Reduce Time to Interactive under 3.8s by minimizing main-thread work",
        )
    })
}

fn text_compression(facts: &PageFacts) -> CheckOutcome {
    let compressed = match (&facts.performance, &facts.headers) {
        (Some(perf), _) => perf.text_compression,
        (None, Some(_)) => facts
            .header("content-encoding")
            .is_some_and(|enc| ["gzip", "br", "deflate", "zstd"].iter().any(|e| enc.contains(e))),
        (None, None) => {
            return CheckOutcome::not_available(
                "Audit the live URL or supply Lighthouse metrics to check compression",
            );
        }
    };

    CheckOutcome::check(
        compressed,
        if compressed { "Text compression enabled" } else { "Text compression missing" },
        CheckStatus::Warning,
        "Enable Gzip or Brotli compression for text resources",
    )
}

fn modern_image_audit(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        CheckOutcome::check(
            perf.modern_images,
            if perf.modern_images { "Images use modern formats" } else { "Images need optimization" },
            CheckStatus::Warning,
            "Serve images as WebP or AVIF for better compression",
        )
    })
}

fn robots_txt(facts: &PageFacts) -> CheckOutcome {
    match facts.site_files {
        Some(files) => CheckOutcome::check(
            files.robots_txt,
            if files.robots_txt { "robots.txt found" } else { "robots.txt missing" },
            CheckStatus::Warning,
            "Create a robots.txt file to guide search engine crawlers",
        ),
        None => CheckOutcome::not_available("Probe /robots.txt on the live site"),
    }
}

fn sitemap_xml(facts: &PageFacts) -> CheckOutcome {
    match facts.site_files {
        Some(files) => CheckOutcome::check(
            files.sitemap_xml,
            if files.sitemap_xml { "sitemap.xml found" } else { "sitemap.xml missing" },
            CheckStatus::Warning,
            "Publish an XML sitemap so search engines can discover every page",
        ),
        None => CheckOutcome::not_available("Probe /sitemap.xml on the live site"),
    }
}

fn canonical_tag(facts: &PageFacts) -> CheckOutcome {
    match &facts.meta.canonical {
        Some(canonical) => CheckOutcome::pass(canonical.as_str()),
        None => CheckOutcome::warning(
            "No canonical tag",
            "Add a canonical tag to prevent duplicate content issues",
        ),
    }
}

fn clean_url(facts: &PageFacts) -> CheckOutcome {
    let clean = Url::parse(&facts.url)
        .map(|url| url.query().is_none() && url.fragment().is_none())
        .unwrap_or(false);
    CheckOutcome::check(
        clean,
        if clean { "Clean URL" } else { "URL contains query parameters or fragments" },
        CheckStatus::Warning,
        "Use clean, descriptive URLs without query parameters",
    )
}

fn redirect_chains(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        CheckOutcome::check(
            !perf.redirect_chains,
            if perf.redirect_chains { "Redirect chains detected" } else { "No redirect chains" },
            CheckStatus::Warning,
            "Eliminate redirect chains so the page loads in a single hop",
        )
    })
}

fn indexability(facts: &PageFacts) -> CheckOutcome {
    let meta = facts.meta.robots.as_deref().unwrap_or("index, follow");
    let header = facts.header("x-robots-tag").unwrap_or_default();
    let indexable = !meta.to_lowercase().contains("noindex") && !header.to_lowercase().contains("noindex");

    CheckOutcome::check(
        indexable,
        meta,
        CheckStatus::Fail,
        "Remove the noindex directive if this page should appear in search results",
    )
}

fn url_depth(facts: &PageFacts) -> CheckOutcome {
    let depth = Url::parse(&facts.url)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .map(|segments| segments.filter(|s| !s.is_empty()).count())
        })
        .unwrap_or(0);

    CheckOutcome::check(
        depth <= 3,
        format!("{depth} levels deep"),
        CheckStatus::Warning,
        "Keep the URL hierarchy shallow (3 levels or less)",
    )
}

fn broken_links(facts: &PageFacts) -> CheckOutcome {
    let Some(broken) = facts.links.broken else {
        return CheckOutcome::not_available("Run a link check to find broken links");
    };
    let value = format!("{broken} broken links detected");
    let recommendation = format!("Fix {broken} broken links");
    match broken {
        0 => CheckOutcome::pass(value),
        1..5 => CheckOutcome::warning(value, recommendation),
        _ => CheckOutcome::fail(value, recommendation),
    }
}

fn mobile_viewport(facts: &PageFacts) -> CheckOutcome {
    let recommendation =
        r#"Add <meta name="viewport" content="width=device-width, initial-scale=1">"#;
    match &facts.meta.viewport {
        Some(viewport) if viewport.contains("width=device-width") => {
            CheckOutcome::pass(viewport.as_str())
        }
        Some(viewport) => CheckOutcome::warning(viewport.as_str(), recommendation),
        None => CheckOutcome::fail("No viewport tag", recommendation),
    }
}

fn mobile_usability(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        grade_at_least(
            f64::from(perf.accessibility_score),
            90.0,
            70.0,
            format!("{}/100", perf.accessibility_score),
            "Improve mobile usability: tap targets, font sizes and viewport configuration",
        )
    })
}

fn touch_targets(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        CheckOutcome::check(
            perf.tap_targets_ok,
            if perf.tap_targets_ok { "Touch targets adequate" } else { "Touch targets too small" },
            CheckStatus::Warning,
            "Increase touch targets to at least 48x48px",
        )
    })
}

fn font_sizes(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        CheckOutcome::check(
            perf.font_sizes_ok,
            if perf.font_sizes_ok { "Font sizes readable" } else { "Font sizes too small" },
            CheckStatus::Warning,
            "Use at least 16px for body text on mobile",
        )
    })
}

fn content_width(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        CheckOutcome::check(
            perf.content_width_ok,
            if perf.content_width_ok { "Content fits viewport" } else { "Content wider than screen" },
            CheckStatus::Warning,
            "Make content width match the viewport width",
        )
    })
}

fn horizontal_scroll(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        CheckOutcome::check(
            perf.content_width_ok,
            if perf.content_width_ok { "No horizontal scrolling" } else { "Horizontal scrolling required" },
            CheckStatus::Warning,
            "Remove horizontal scrolling on mobile devices",
        )
    })
}

fn mobile_speed(facts: &PageFacts) -> CheckOutcome {
    with_performance(facts, |perf| {
        grade_below(
            perf.lcp_ms,
            2500.0,
            4000.0,
            format!("LCP {}", seconds(perf.lcp_ms)),
            "Optimize for mobile speed: reduce payload, compress images, minimize JavaScript",
        )
    })
}

fn schema_markup(facts: &PageFacts) -> CheckOutcome {
    let blocks = facts.structured_data.blocks;
    if blocks > 0 {
        CheckOutcome::pass(format!("{blocks} schema blocks found"))
    } else {
        CheckOutcome::warning(
            "No schema markup",
            "Add Schema.org structured data (Organization, LocalBusiness, etc.)",
        )
    }
}

fn schema_type(found: bool, label: &str, recommendation: &str) -> CheckOutcome {
    if found {
        CheckOutcome::pass(format!("{label} schema present"))
    } else {
        CheckOutcome::warning(format!("No {label} schema"), recommendation)
    }
}

fn organization_schema(facts: &PageFacts) -> CheckOutcome {
    schema_type(
        facts.structured_data.has_type("Organization"),
        "Organization",
        "Add Organization schema for brand identity",
    )
}

fn breadcrumb_schema(facts: &PageFacts) -> CheckOutcome {
    schema_type(
        facts.structured_data.has_type("BreadcrumbList"),
        "BreadcrumbList",
        "Add BreadcrumbList schema for navigation",
    )
}

fn local_business_schema(facts: &PageFacts) -> CheckOutcome {
    schema_type(
        facts.structured_data.has_type_containing("Business"),
        "LocalBusiness",
        "Add LocalBusiness schema for local search visibility",
    )
}

fn article_schema(facts: &PageFacts) -> CheckOutcome {
    let data = &facts.structured_data;
    schema_type(
        ["Article", "NewsArticle", "BlogPosting"]
            .iter()
            .any(|t| data.has_type(t)),
        "Article",
        "Add Article or BlogPosting schema to content pages",
    )
}

fn product_schema(facts: &PageFacts) -> CheckOutcome {
    schema_type(
        facts.structured_data.has_type("Product"),
        "Product",
        "Add Product schema if the page sells products",
    )
}

fn schema_validation(facts: &PageFacts) -> CheckOutcome {
    let data = &facts.structured_data;
    match (data.blocks, data.invalid_blocks) {
        (0, _) => CheckOutcome::warning(
            "No schema to validate",
            "Add structured data and validate it with the Rich Results Test",
        ),
        (blocks, 0) => CheckOutcome::pass(format!("{blocks} blocks parsed")),
        (blocks, invalid) => CheckOutcome::fail(
            format!("{invalid} of {blocks} JSON-LD blocks are not valid JSON"),
            "Fix the malformed JSON-LD blocks and re-validate with the Rich Results Test",
        ),
    }
}
