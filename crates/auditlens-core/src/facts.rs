//! Page facts: the read-only snapshot every check evaluates against
//!
//! A crawler produces either a [`PageFacts`] value or a [`CrawlError`].
//! [`PageFacts::from_html`] fills the document-level facts from raw HTML;
//! response-level facts (status, headers, timing) and the optional
//! enrichments (site files, performance metrics, business profile) are
//! attached by whoever fetched the page.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::collections::BTreeMap;
use url::Url;

use crate::types::DataSources;

/// The crawler could not produce facts for the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct CrawlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl CrawlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code: Some(status_code),
        }
    }
}

/// Everything the check catalog knows about one crawled page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFacts {
    /// Final page URL (after redirects)
    pub url: String,
    pub status_code: u16,
    /// Lower-cased response headers; `None` when the page did not come over HTTP
    pub headers: Option<BTreeMap<String, String>>,
    pub response_time_ms: Option<u64>,
    /// Raw document, kept for pattern checks
    #[serde(skip_serializing)]
    pub html: String,
    pub html_length: usize,
    pub meta: MetaTags,
    pub headings: Headings,
    pub images: ImageStats,
    pub links: LinkStats,
    pub structured_data: StructuredData,
    pub resources: ResourceStats,
    pub content: ContentStats,
    pub landmarks: Landmarks,
    pub site_files: Option<SiteFiles>,
    pub performance: Option<PerformanceMetrics>,
    pub business: Option<BusinessProfile>,
    /// Keywords the page should rank for; empty means derive them from the text
    pub target_keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaTags {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub canonical: Option<String>,
    pub robots: Option<String>,
    pub viewport: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageStats {
    pub total: usize,
    /// Images with non-empty alt text
    pub with_alt: usize,
    pub missing_alt: usize,
    /// Alt text that is just a file name
    pub filename_alts: usize,
    pub lazy_loaded: usize,
    /// WebP/AVIF sources
    pub modern_format: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkStats {
    pub total_anchors: usize,
    pub internal: usize,
    pub external: usize,
    pub nofollow: usize,
    /// Anchors reading "click here", "read more" and the like
    pub generic_anchors: usize,
    pub nav_links: usize,
    pub footer_links: usize,
    pub social: usize,
    /// Broken link count, when a link checker ran
    pub broken: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredData {
    /// JSON-LD script blocks found
    pub blocks: usize,
    /// Blocks that failed to parse as JSON
    pub invalid_blocks: usize,
    /// Every `@type` seen, including `@graph` members
    pub types: Vec<String>,
}

impl StructuredData {
    pub fn has_type(&self, wanted: &str) -> bool {
        self.types.iter().any(|t| t == wanted)
    }

    pub fn has_type_containing(&self, fragment: &str) -> bool {
        self.types.iter().any(|t| t.contains(fragment))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceStats {
    pub scripts: usize,
    pub inline_scripts: usize,
    pub external_scripts: usize,
    pub stylesheets: usize,
    pub inline_styles: usize,
    /// `http://` subresources referenced from the page
    pub insecure_references: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentStats {
    /// Visible body text, whitespace collapsed
    pub text: String,
    pub word_count: usize,
    pub paragraphs: usize,
    pub lists: usize,
    pub forms: usize,
    pub videos: usize,
    pub map_embeds: usize,
    pub aria_labels: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Landmarks {
    pub has_header: bool,
    pub has_nav: bool,
    pub has_footer: bool,
    pub has_search: bool,
    pub has_breadcrumbs: bool,
}

/// Results of probing well-known site files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteFiles {
    pub robots_txt: bool,
    pub sitemap_xml: bool,
}

/// Lighthouse-style lab metrics for the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceMetrics {
    pub lcp_ms: f64,
    pub cls: f64,
    pub fcp_ms: f64,
    pub tbt_ms: f64,
    pub speed_index_ms: f64,
    pub tti_ms: f64,
    pub ttfb_ms: f64,
    /// 0-100
    pub accessibility_score: u8,
    pub console_errors: u32,
    pub text_compression: bool,
    pub modern_images: bool,
    pub redirect_chains: bool,
    pub tap_targets_ok: bool,
    pub font_sizes_ok: bool,
    pub content_width_ok: bool,
    pub color_contrast_ok: bool,
    pub aria_ok: bool,
    pub keyboard_ok: bool,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            lcp_ms: 0.0,
            cls: 0.0,
            fcp_ms: 0.0,
            tbt_ms: 0.0,
            speed_index_ms: 0.0,
            tti_ms: 0.0,
            ttfb_ms: 0.0,
            accessibility_score: 0,
            console_errors: 0,
            // Audits that were not reported count as passing
            text_compression: true,
            modern_images: true,
            redirect_chains: false,
            tap_targets_ok: true,
            font_sizes_ok: true,
            content_width_ok: true,
            color_contrast_ok: true,
            aria_ok: true,
            keyboard_ok: true,
        }
    }
}

/// Business listing data (Google Business Profile or similar)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessProfile {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub verified: bool,
    /// 0-100
    pub completeness: u8,
    pub photos: u32,
    /// Posts in the last 30 days
    pub recent_posts: u32,
    pub total_reviews: u32,
    pub responded_reviews: u32,
    pub local_backlinks: Option<u32>,
}

const GENERIC_ANCHORS: &[&str] = &["click here", "here", "read more", "link", "more"];
const SOCIAL_HOSTS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "x.com",
    "linkedin.com",
    "instagram.com",
];

impl PageFacts {
    pub fn data_sources(&self) -> DataSources {
        DataSources {
            page: true,
            headers: self.headers.is_some(),
            site_files: self.site_files.is_some(),
            performance: self.performance.is_some(),
            business: self.business.is_some(),
        }
    }

    /// Extract document-level facts from raw HTML
    pub fn from_html(url: &str, html: &str) -> Result<Self> {
        let base = Url::parse(url).with_context(|| format!("invalid page URL: {url}"))?;
        let document = Html::parse_document(html);

        let meta = extract_meta(&document);
        let headings = Headings {
            h1: element_texts(&document, "h1"),
            h2: element_texts(&document, "h2"),
            h3: element_texts(&document, "h3"),
        };
        let structured_data = extract_structured_data(&document);
        let landmarks = Landmarks {
            has_header: select_exists(&document, "header, [role='banner']"),
            has_nav: select_exists(&document, "nav, [role='navigation']"),
            has_footer: select_exists(&document, "footer, [role='contentinfo']"),
            has_search: select_exists(
                &document,
                "input[type='search'], [role='search'], form[action*='search']",
            ),
            has_breadcrumbs: select_exists(
                &document,
                "[class*='breadcrumb'], [aria-label*='breadcrumb'], [aria-label*='Breadcrumb']",
            ) || structured_data.has_type("BreadcrumbList"),
        };

        Ok(Self {
            url: base.to_string(),
            status_code: 200,
            headers: None,
            response_time_ms: None,
            html: html.to_string(),
            html_length: html.len(),
            meta,
            headings,
            images: extract_images(&document),
            links: extract_links(&document, &base),
            structured_data,
            resources: extract_resources(&document, &base),
            content: extract_content(html, &document),
            landmarks,
            site_files: None,
            performance: None,
            business: None,
            target_keywords: Vec::new(),
        })
    }

    pub fn is_https(&self) -> bool {
        self.url.starts_with("https://")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|h| h.get(&name.to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// Lower-cased raw HTML for pattern checks
    pub fn html_lower(&self) -> String {
        self.html.to_lowercase()
    }
}

fn extract_meta(document: &Html) -> MetaTags {
    MetaTags {
        title: first_text(document, "title"),
        description: first_attr(document, "meta[name='description']", "content"),
        keywords: first_attr(document, "meta[name='keywords']", "content"),
        canonical: first_attr(document, "link[rel='canonical']", "href"),
        robots: first_attr(document, "meta[name='robots']", "content"),
        viewport: first_attr(document, "meta[name='viewport']", "content"),
        og_title: first_attr(document, "meta[property='og:title']", "content"),
        og_description: first_attr(document, "meta[property='og:description']", "content"),
        og_image: first_attr(document, "meta[property='og:image']", "content"),
    }
}

fn extract_images(document: &Html) -> ImageStats {
    static RE_FILENAME_ALT: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)^\S+\.(jpe?g|png|gif|webp|avif|svg)$")
            .expect("invalid filename alt regex")
    });

    let mut stats = ImageStats::default();

    for img in select_all(document, "img") {
        stats.total += 1;
        let attrs = img.value();
        if let Some(alt) = attrs.attr("alt").map(str::trim).filter(|alt| !alt.is_empty()) {
            stats.with_alt += 1;
            if RE_FILENAME_ALT.is_match(alt) {
                stats.filename_alts += 1;
            }
        }
        if attrs.attr("loading") == Some("lazy") || attrs.attr("data-lazy").is_some() {
            stats.lazy_loaded += 1;
        }
        let src = attrs.attr("src").unwrap_or_default().to_ascii_lowercase();
        if src.ends_with(".webp") || src.ends_with(".avif") {
            stats.modern_format += 1;
        }
    }

    stats.modern_format += count_elements(
        document,
        "source[type='image/webp'], source[type='image/avif']",
    );
    stats.missing_alt = stats.total.saturating_sub(stats.with_alt);
    stats
}

fn extract_links(document: &Html, base: &Url) -> LinkStats {
    let mut stats = LinkStats {
        nav_links: count_elements(
            document,
            "nav a, [role='navigation'] a, .menu a, .navigation a",
        ),
        footer_links: count_elements(document, "footer a"),
        ..Default::default()
    };

    for anchor in select_all(document, "a") {
        stats.total_anchors += 1;

        let text = anchor.text().collect::<String>().trim().to_lowercase();
        if GENERIC_ANCHORS.contains(&text.as_str()) {
            stats.generic_anchors += 1;
        }

        let attrs = anchor.value();
        if attrs
            .attr("rel")
            .is_some_and(|rel| rel.to_ascii_lowercase().contains("nofollow"))
        {
            stats.nofollow += 1;
        }

        let Some(href) = attrs.attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
            || href.starts_with("javascript:")
        {
            continue;
        }

        let Ok(target) = base.join(href) else {
            continue;
        };
        if !matches!(target.scheme(), "http" | "https") {
            continue;
        }

        let target_host = target.host_str().unwrap_or_default();
        if target_host == base.host_str().unwrap_or_default() {
            stats.internal += 1;
        } else {
            stats.external += 1;
            if SOCIAL_HOSTS
                .iter()
                .any(|social| target_host == *social || target_host.ends_with(&format!(".{social}")))
            {
                stats.social += 1;
            }
        }
    }

    stats
}

fn extract_resources(document: &Html, base: &Url) -> ResourceStats {
    let insecure_references = if base.scheme() == "https" {
        select_all(
            document,
            "img[src], script[src], iframe[src], source[src], video[src], audio[src], link[rel='stylesheet'][href]",
        )
        .filter(|element| {
            let attrs = element.value();
            attrs
                .attr("src")
                .or_else(|| attrs.attr("href"))
                .is_some_and(|value| value.trim().starts_with("http://"))
        })
        .count()
    } else {
        0
    };

    ResourceStats {
        scripts: count_elements(document, "script"),
        inline_scripts: count_elements(document, "script:not([src])"),
        external_scripts: count_elements(document, "script[src]"),
        stylesheets: count_elements(document, "link[rel='stylesheet']"),
        inline_styles: count_elements(document, "style"),
        insecure_references,
    }
}

fn extract_content(html: &str, document: &Html) -> ContentStats {
    static RE_WHITESPACE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

    let visible = Html::parse_document(&visible_markup(html));
    let raw_text = select_all(&visible, "body")
        .next()
        .map(|body| body.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    let text = RE_WHITESPACE.replace_all(&raw_text, " ").trim().to_string();
    let word_count = text.split_whitespace().count();

    ContentStats {
        text,
        word_count,
        paragraphs: count_elements(document, "p"),
        lists: count_elements(document, "ul, ol"),
        forms: count_elements(document, "form"),
        videos: count_elements(
            document,
            "video, iframe[src*='youtube'], iframe[src*='vimeo']",
        ),
        map_embeds: count_elements(
            document,
            "iframe[src*='google.com/maps'], iframe[src*='maps.google']",
        ),
        aria_labels: count_elements(document, "[aria-label]"),
    }
}

fn extract_structured_data(document: &Html) -> StructuredData {
    let blocks = json_ld_blocks(document);
    let mut data = StructuredData {
        blocks: blocks.len(),
        ..Default::default()
    };

    for block in &blocks {
        match serde_json::from_str::<JsonValue>(block) {
            Ok(value) => collect_types(&value, &mut data.types),
            Err(_) => data.invalid_blocks += 1,
        }
    }

    data.types.sort();
    data.types.dedup();
    data
}

fn collect_types(value: &JsonValue, types: &mut Vec<String>) {
    match value {
        JsonValue::Array(items) => {
            for item in items {
                collect_types(item, types);
            }
        }
        JsonValue::Object(obj) => {
            match obj.get("@type") {
                Some(JsonValue::String(t)) => types.push(shorten_type(t)),
                Some(JsonValue::Array(ts)) => {
                    types.extend(ts.iter().filter_map(|t| t.as_str()).map(shorten_type));
                }
                _ => {}
            }
            if let Some(graph) = obj.get("@graph") {
                collect_types(graph, types);
            }
        }
        _ => {}
    }
}

fn shorten_type(iri: &str) -> String {
    match iri.rfind(['/', '#']) {
        Some(pos) => iri[pos + 1..].to_string(),
        None => iri.to_string(),
    }
}

/// Non-empty JSON-LD payloads of `document`, in document order
///
/// Any `type` containing `ld+json` counts, so parameters such as
/// `; charset=utf-8` do not hide a block.
pub fn json_ld_blocks(document: &Html) -> Vec<String> {
    static SCRIPT: Lazy<Selector> =
        Lazy::new(|| Selector::parse("script[type]").expect("invalid script selector"));

    document
        .select(&SCRIPT)
        .filter(|script| {
            script
                .value()
                .attr("type")
                .is_some_and(|t| t.to_ascii_lowercase().contains("ld+json"))
        })
        .map(|script| script.text().collect::<String>().trim().to_string())
        .filter(|payload| !payload.is_empty())
        .collect()
}

/// Markup with comments and never-rendered blocks (scripts, styles,
/// noscript, templates) cut out, for visible text extraction
fn visible_markup(html: &str) -> Cow<'_, str> {
    static RE_INVISIBLE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"(?is)<!--.*?-->|<script\b.*?</script\s*>|<style\b.*?</style\s*>|<noscript\b.*?</noscript\s*>|<template\b.*?</template\s*>",
        )
        .expect("invalid invisible markup regex")
    });
    RE_INVISIBLE.replace_all(html, "")
}

// Helper functions
fn select_all<'a>(document: &'a Html, selector_str: &str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    let selector = Selector::parse(selector_str).ok();
    let matches: Vec<ElementRef<'a>> = match selector {
        Some(selector) => document.select(&selector).collect(),
        None => Vec::new(),
    };
    matches.into_iter()
}

fn select_exists(document: &Html, selector_str: &str) -> bool {
    select_all(document, selector_str).next().is_some()
}

fn count_elements(document: &Html, selector_str: &str) -> usize {
    select_all(document, selector_str).count()
}

fn element_texts(document: &Html, selector_str: &str) -> Vec<String> {
    select_all(document, selector_str)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect()
}

fn first_text(document: &Html, selector_str: &str) -> Option<String> {
    select_all(document, selector_str)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

fn first_attr(document: &Html, selector_str: &str, attr: &str) -> Option<String> {
    select_all(document, selector_str)
        .find_map(|el| el.value().attr(attr).map(|v| v.trim().to_string()))
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Emergency Plumbing in Brisbane | Acme Plumbing Co</title>
            <meta name="description" content="Fast, licensed plumbers available around the clock.">
            <meta name="viewport" content="width=device-width, initial-scale=1">
            <link rel="canonical" href="https://acme.example/plumbing">
            <meta property="og:title" content="Emergency Plumbing in Brisbane | Acme Plumbing Co">
            <script type="application/ld+json">
            {"@context": "https://schema.org", "@graph": [{"@type": "LocalBusiness"}, {"@type": "BreadcrumbList"}]}
            </script>
            <script type="application/ld+json">{"@type": "Organization",</script>
            <script>console.log('tracking')</script>
            <style>body { color: red; }</style>
        </head>
        <body>
            <header><nav><a href="/">Home</a><a href="/services">Services</a><a href="https://acme.example/contact">Contact</a></nav></header>
            <main>
                <h1>Emergency Plumbing</h1>
                <h2>Burst pipes</h2>
                <h3>What to do first</h3>
                <p>Turn off the water at the mains and call us.</p>
                <ul><li>Licensed</li><li>Insured</li></ul>
                <img src="/van.webp" alt="Our van" loading="lazy">
                <img src="http://cdn.example/logo.png">
                <a href="https://www.facebook.com/acme" rel="nofollow">Facebook</a>
                <a href="https://other.example/guide">click here</a>
                <a href="mailto:hi@acme.example">Email</a>
            </main>
            <footer><a href="/privacy">Privacy</a></footer>
        </body>
        </html>
    "#;

    fn facts() -> PageFacts {
        PageFacts::from_html("https://acme.example/plumbing", PAGE).unwrap()
    }

    #[test]
    fn test_meta_extraction() {
        let facts = facts();
        assert_eq!(
            facts.meta.title.as_deref(),
            Some("Emergency Plumbing in Brisbane | Acme Plumbing Co")
        );
        assert!(facts.meta.description.is_some());
        assert!(facts.meta.viewport.as_deref().unwrap().contains("device-width"));
        assert_eq!(facts.meta.canonical.as_deref(), Some("https://acme.example/plumbing"));
        assert!(facts.meta.og_title.is_some());
        assert!(facts.meta.og_image.is_none());
        assert!(facts.meta.robots.is_none());
    }

    #[test]
    fn test_headings_and_content() {
        let facts = facts();
        assert_eq!(facts.headings.h1, vec!["Emergency Plumbing"]);
        assert_eq!(facts.headings.h2.len(), 1);
        assert_eq!(facts.headings.h3.len(), 1);
        assert_eq!(facts.content.paragraphs, 1);
        assert_eq!(facts.content.lists, 1);
        assert!(facts.content.text.contains("Turn off the water"));
        assert!(!facts.content.text.contains("tracking"));
        assert!(!facts.content.text.contains("color: red"));
    }

    #[test]
    fn test_image_stats() {
        let facts = facts();
        assert_eq!(facts.images.total, 2);
        assert_eq!(facts.images.with_alt, 1);
        assert_eq!(facts.images.missing_alt, 1);
        assert_eq!(facts.images.lazy_loaded, 1);
        assert_eq!(facts.images.modern_format, 1);
    }

    #[test]
    fn test_link_classification() {
        let facts = facts();
        assert_eq!(facts.links.total_anchors, 7);
        assert_eq!(facts.links.internal, 4);
        assert_eq!(facts.links.external, 2);
        assert_eq!(facts.links.social, 1);
        assert_eq!(facts.links.nofollow, 1);
        assert_eq!(facts.links.generic_anchors, 1);
        assert_eq!(facts.links.nav_links, 3);
        assert_eq!(facts.links.footer_links, 1);
    }

    #[test]
    fn test_structured_data_types() {
        let facts = facts();
        assert_eq!(facts.structured_data.blocks, 2);
        assert_eq!(facts.structured_data.invalid_blocks, 1);
        assert!(facts.structured_data.has_type("LocalBusiness"));
        assert!(facts.structured_data.has_type("BreadcrumbList"));
        assert!(facts.landmarks.has_breadcrumbs);
    }

    #[test]
    fn test_resources_and_landmarks() {
        let facts = facts();
        assert_eq!(facts.resources.scripts, 3);
        assert_eq!(facts.resources.inline_scripts, 3);
        assert_eq!(facts.resources.inline_styles, 1);
        assert_eq!(facts.resources.insecure_references, 1);
        assert!(facts.landmarks.has_header);
        assert!(facts.landmarks.has_nav);
        assert!(facts.landmarks.has_footer);
        assert!(!facts.landmarks.has_search);
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(PageFacts::from_html("not a url", "<html></html>").is_err());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut facts = PageFacts::default();
        let mut headers = BTreeMap::new();
        headers.insert("strict-transport-security".to_string(), "max-age=63072000".to_string());
        facts.headers = Some(headers);

        assert_eq!(
            facts.header("Strict-Transport-Security"),
            Some("max-age=63072000")
        );
        assert_eq!(facts.header("content-security-policy"), None);
    }

    #[test]
    fn test_type_iris_are_shortened() {
        let mut types = Vec::new();
        collect_types(
            &serde_json::json!([{"@type": "https://schema.org/Product"}, {"@type": ["Organization", "Brand"]}]),
            &mut types,
        );
        assert_eq!(types, vec!["Product", "Organization", "Brand"]);
    }

    #[test]
    fn test_hidden_markup_stays_out_of_page_text() {
        let facts = facts();
        assert!(facts.content.text.contains("Turn off the water at the mains"));
        assert!(!facts.content.text.contains("tracking"));
        assert!(!facts.content.text.contains("color: red"));
        assert!(!facts.content.text.contains("LocalBusiness"));
    }

    #[test]
    fn test_visible_markup_drops_comments_and_templates() {
        let html = "<p>Call 07 5555 0100</p><!-- old number 07 5555 0199 --><template><p>Quote form</p></template><noscript>Enable JS</noscript>";
        assert_eq!(visible_markup(html), "<p>Call 07 5555 0100</p>");
    }

    #[test]
    fn test_json_ld_blocks_with_parameters_and_empty_scripts() {
        let document = Html::parse_document(
            r#"<head>
            <script type="Application/LD+JSON; charset=utf-8">{"@type": "Plumber", "name": "Acme"}</script>
            <script type="application/ld+json">   </script>
            <script type="text/javascript">var schema = "ld+json";</script>
            </head>"#,
        );

        let blocks = json_ld_blocks(&document);
        assert_eq!(blocks, vec![r#"{"@type": "Plumber", "name": "Acme"}"#]);
    }

    #[test]
    fn test_facts_deserialize_with_defaults() {
        let facts: PageFacts = serde_json::from_str(
            r#"{"url": "https://example.com/", "performance": {"lcp_ms": 1800}}"#,
        )
        .unwrap();
        assert_eq!(facts.url, "https://example.com/");
        let perf = facts.performance.unwrap();
        assert_eq!(perf.lcp_ms, 1800.0);
        assert!(perf.text_compression);
        assert!(!perf.redirect_chains);
    }
}
