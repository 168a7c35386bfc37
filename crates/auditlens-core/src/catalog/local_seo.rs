//! Local SEO: NAP consistency, business profile, local signals, citations

use once_cell::sync::Lazy;
use regex::Regex;

use super::{CheckDefinition, TaskProfile, grade_at_least, with_business};
use crate::facts::{BusinessProfile, PageFacts};
use crate::types::{Category, CheckOutcome, CheckStatus};

static RE_CITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(brisbane|sydney|melbourne|adelaide|perth|hobart|darwin|canberra|gold coast|sunshine coast)\b",
    )
    .expect("invalid city regex")
});
const REGION_CODES: &str = "QLD|NSW|VIC|ACT|TAS|SA|WA|NT|\
    AL|AK|AZ|AR|CA|CO|CT|DE|FL|GA|HI|ID|IL|IN|IA|KS|KY|LA|ME|MD|MA|MI|MN|MS|MO|MT|NE|NV|NH|NJ|NM|\
    NY|NC|ND|OH|OK|OR|PA|RI|SC|SD|TN|TX|UT|VT|VA|WV|WI|WY";
// Distinctive state codes anywhere, or any known code in address form
// ("Austin, TX" or "NSW 2000")
static RE_REGION_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(QLD|NSW|VIC|TAS)\b|,\s*({REGION_CODES})\b|\b({REGION_CODES})\s+\d{{4,5}}\b"
    ))
    .expect("invalid region regex")
});
static RE_MAP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)google\.com/maps|maps\.google|googlemap").expect("invalid map regex")
});

const LOCAL_KEYWORDS: &[&str] = &[
    "near me",
    "local",
    "city",
    "area",
    "brisbane",
    "sydney",
    "melbourne",
    "adelaide",
    "perth",
];
const TOP_DIRECTORIES: &[&str] = &[
    "yelp",
    "yellowpages",
    "facebook",
    "linkedin",
    "tripadvisor",
    "foursquare",
];
const INDUSTRY_DIRECTORIES: &[&str] = &[
    "angi.com",
    "angieslist",
    "houzz",
    "thumbtack",
    "homeadvisor",
    "porch",
    "buildzoom",
];

const fn check(id: &'static str, name: &'static str, evaluate: super::Evaluate) -> CheckDefinition {
    CheckDefinition::new(id, name, Category::LocalSeo, evaluate)
}

pub(super) const CHECKS: [CheckDefinition; Category::LocalSeo.budget() as usize] = [
    // NAP consistency
    check("local_01", "Business Name Consistency", name_consistency)
        .with_task(TaskProfile::high().quick("30-60 minutes")),
    check("local_02", "Address Consistency", address_consistency)
        .with_task(TaskProfile::high().quick("30-60 minutes")),
    check("local_03", "Phone Number Consistency", phone_consistency)
        .with_task(TaskProfile::high().quick("30-60 minutes")),
    check("local_04", "NAP Placement", nap_placement)
        .with_task(TaskProfile::medium().quick("30-60 minutes")),
    // Business profile
    check("local_05", "GBP Verification", profile_verification)
        .with_task(TaskProfile::critical().moderate("1-2 weeks")),
    check("local_06", "GBP Completeness", profile_completeness)
        .with_task(TaskProfile::high().moderate("2-4 hours")),
    check("local_07", "GBP Photos", profile_photos)
        .with_task(TaskProfile::high().moderate("2-4 hours")),
    check("local_08", "GBP Posts", profile_posts),
    check("local_09", "Review Response Rate", review_response_rate)
        .with_task(TaskProfile::high().moderate("2-4 hours")),
    // Local signals
    check("local_10", "Location in Title", location_in_title)
        .with_task(TaskProfile::high().quick("15-30 minutes")),
    check("local_11", "LocalBusiness Schema", local_business_schema)
        .with_task(TaskProfile::critical().moderate("1-2 hours")),
    check("local_12", "Embedded Map", embedded_map)
        .with_task(TaskProfile::medium().quick("15-30 minutes")),
    check("local_13", "Local Keywords", local_keywords)
        .with_task(TaskProfile::high().moderate("2-4 hours")),
    // Citations
    check("local_14", "Directory Listings", directory_listings)
        .with_task(TaskProfile::medium().extensive("2-4 weeks")),
    check("local_15", "NAP Directory Consistency", directory_consistency)
        .with_task(TaskProfile::high().extensive("2-4 weeks")),
    check("local_16", "Industry Directories", industry_directories)
        .with_task(TaskProfile::low().extensive("1-2 weeks")),
    check("local_17", "Local Backlinks", local_backlinks)
        .with_task(TaskProfile::medium().extensive("2-4 weeks")),
];

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn name_on_page(facts: &PageFacts, profile: &BusinessProfile) -> bool {
    profile
        .name
        .as_deref()
        .is_some_and(|name| !name.is_empty() && facts.html.contains(name))
}

fn address_on_page(facts: &PageFacts, profile: &BusinessProfile) -> bool {
    profile
        .address
        .as_deref()
        .is_some_and(|address| !address.is_empty() && facts.html.contains(address))
}

fn phone_on_page(facts: &PageFacts, profile: &BusinessProfile) -> bool {
    let Some(wanted) = profile.phone.as_deref().map(digits).filter(|d| !d.is_empty()) else {
        return false;
    };
    // Compare with formatting characters stripped from the page
    let page: String = facts
        .html
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.' | '\u{a0}'))
        .collect();
    page.contains(&wanted)
}

fn consistency(
    field: Option<&str>,
    found: bool,
    recommendation: &str,
) -> CheckOutcome {
    match field {
        Some(value) if found => CheckOutcome::pass(value),
        Some(value) => CheckOutcome::warning(value, recommendation),
        None => CheckOutcome::not_available(recommendation),
    }
}

fn name_consistency(facts: &PageFacts) -> CheckOutcome {
    with_business(facts, |profile| {
        consistency(
            profile.name.as_deref(),
            name_on_page(facts, profile),
            "Use the exact business name from the business profile on the website",
        )
    })
}

fn address_consistency(facts: &PageFacts) -> CheckOutcome {
    with_business(facts, |profile| {
        consistency(
            profile.address.as_deref(),
            address_on_page(facts, profile),
            "Display the same address as the business profile",
        )
    })
}

fn phone_consistency(facts: &PageFacts) -> CheckOutcome {
    with_business(facts, |profile| {
        consistency(
            profile.phone.as_deref(),
            phone_on_page(facts, profile),
            "Display the same phone number as the business profile",
        )
    })
}

fn nap_placement(facts: &PageFacts) -> CheckOutcome {
    with_business(facts, |profile| {
        let on_page = phone_on_page(facts, profile) || address_on_page(facts, profile);
        let landmarks = &facts.landmarks;
        let value = match (on_page, landmarks.has_header, landmarks.has_footer) {
            (true, true, _) => "In header",
            (true, false, true) => "In footer",
            _ => "Not in header/footer",
        };
        CheckOutcome::check(
            on_page && (landmarks.has_header || landmarks.has_footer),
            value,
            CheckStatus::Warning,
            "Show name, address and phone in the site header or footer",
        )
    })
}

fn profile_verification(facts: &PageFacts) -> CheckOutcome {
    with_business(facts, |profile| {
        CheckOutcome::check(
            profile.verified,
            if profile.verified { "Verified" } else { "Not verified" },
            CheckStatus::Warning,
            "Claim and verify the Google Business Profile",
        )
    })
}

fn profile_completeness(facts: &PageFacts) -> CheckOutcome {
    with_business(facts, |profile| {
        grade_at_least(
            f64::from(profile.completeness),
            100.0,
            80.0,
            format!("{}% complete", profile.completeness),
            "Complete every section of the Google Business Profile",
        )
    })
}

fn profile_photos(facts: &PageFacts) -> CheckOutcome {
    with_business(facts, |profile| {
        let photos = profile.photos;
        let value = format!("{photos} photos");
        let recommendation = "Upload at least 5 high-quality photos to the business profile";
        match photos {
            5.. => CheckOutcome::pass(value),
            1.. => CheckOutcome::warning(value, recommendation),
            0 => CheckOutcome::fail(value, recommendation),
        }
    })
}

fn profile_posts(facts: &PageFacts) -> CheckOutcome {
    with_business(facts, |profile| {
        let posts = profile.recent_posts;
        let value = format!("{posts} posts (last 30 days)");
        let recommendation = "Publish a business profile post every week";
        match posts {
            4.. => CheckOutcome::pass(value),
            1.. => CheckOutcome::warning(value, recommendation),
            0 => CheckOutcome::fail(value, recommendation),
        }
    })
}

fn review_response_rate(facts: &PageFacts) -> CheckOutcome {
    with_business(facts, |profile| {
        let total = profile.total_reviews;
        let responded = profile.responded_reviews.min(total);
        let rate = if total > 0 {
            f64::from(responded) / f64::from(total) * 100.0
        } else {
            0.0
        };
        grade_at_least(
            rate,
            80.0,
            50.0,
            format!("{rate:.0}% ({responded}/{total})"),
            "Respond to at least 80% of reviews",
        )
    })
}

fn location_in_title(facts: &PageFacts) -> CheckOutcome {
    let title = facts.meta.title.as_deref().unwrap_or_default();
    let found = RE_CITY.is_match(title) || RE_REGION_CODE.is_match(title);
    CheckOutcome::check(
        found,
        if found { "Location in title" } else { "No location in title" },
        CheckStatus::Warning,
        "Include the city or region in the title tag",
    )
}

fn local_business_schema(facts: &PageFacts) -> CheckOutcome {
    let data = &facts.structured_data;
    let found = data.has_type_containing("Business") || data.has_type("Organization");
    CheckOutcome::check(
        found,
        if found { "LocalBusiness schema present" } else { "No LocalBusiness schema" },
        CheckStatus::Fail,
        "Add LocalBusiness schema with name, address, phone, opening hours and geo coordinates",
    )
}

fn embedded_map(facts: &PageFacts) -> CheckOutcome {
    let found = facts.content.map_embeds > 0 || RE_MAP.is_match(&facts.html);
    CheckOutcome::check(
        found,
        if found { "Google Map embedded" } else { "No embedded map" },
        CheckStatus::Warning,
        "Embed a Google Map showing the business location",
    )
}

fn local_keywords(facts: &PageFacts) -> CheckOutcome {
    let text = facts.content.text.to_lowercase();
    let found = LOCAL_KEYWORDS.iter().any(|kw| text.contains(kw));
    CheckOutcome::check(
        found,
        if found { "Local keywords found" } else { "No local keywords" },
        CheckStatus::Warning,
        "Use local keywords such as city names and \"near me\" phrasing",
    )
}

fn directory_listings(facts: &PageFacts) -> CheckOutcome {
    let html = facts.html_lower();
    let found = if facts.links.external > 0 {
        TOP_DIRECTORIES.iter().filter(|dir| html.contains(*dir)).count()
    } else {
        0
    };
    CheckOutcome::check(
        found >= 3,
        format!("{found} major directories"),
        CheckStatus::Warning,
        "Get listed in the major directories (Yelp, Yellow Pages, Facebook) and link them",
    )
}

fn directory_consistency(facts: &PageFacts) -> CheckOutcome {
    with_business(facts, |profile| {
        let consistent = profile.verified && profile.completeness >= 90;
        CheckOutcome::check(
            consistent,
            if consistent { "Likely consistent" } else { "Verify manually" },
            CheckStatus::Warning,
            "Keep name, address and phone identical across every directory listing",
        )
    })
}

fn industry_directories(facts: &PageFacts) -> CheckOutcome {
    let html = facts.html_lower();
    let found = INDUSTRY_DIRECTORIES.iter().any(|dir| html.contains(dir));
    CheckOutcome::check(
        found,
        if found { "Industry directories found" } else { "No industry directories" },
        CheckStatus::Warning,
        "Get listed in industry-specific directories",
    )
}

fn local_backlinks(facts: &PageFacts) -> CheckOutcome {
    let backlinks = facts.business.as_ref().and_then(|profile| profile.local_backlinks);
    let Some(backlinks) = backlinks else {
        return CheckOutcome::not_available(
            "Supply a local backlink count from your search console or link index",
        );
    };
    CheckOutcome::check(
        backlinks >= 5,
        format!("{backlinks} local backlinks"),
        CheckStatus::Warning,
        "Earn backlinks from local websites, news outlets and chambers of commerce",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn business_page(html: &str) -> PageFacts {
        PageFacts {
            html: html.to_string(),
            business: Some(BusinessProfile {
                name: Some("Acme Plumbing".into()),
                address: Some("12 Queen St, Brisbane".into()),
                phone: Some("(07) 3000 1234".into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_nap_matching() {
        let facts = business_page(
            "<footer>Acme Plumbing, 12 Queen St, Brisbane. Call 07-3000-1234</footer>",
        );
        assert!(name_consistency(&facts).is_pass());
        assert!(address_consistency(&facts).is_pass());
        assert!(phone_consistency(&facts).is_pass());

        let facts = business_page("<p>Another company</p>");
        let outcome = phone_consistency(&facts);
        assert_eq!(outcome.status, CheckStatus::Warning);
        assert_eq!(outcome.value, "(07) 3000 1234");
    }

    #[test]
    fn test_nap_placement_needs_landmark() {
        let mut facts = business_page("<p>Call (07) 3000 1234</p>");
        assert_eq!(nap_placement(&facts).status, CheckStatus::Warning);
        facts.landmarks.has_footer = true;
        let outcome = nap_placement(&facts);
        assert!(outcome.is_pass());
        assert_eq!(outcome.value, "In footer");
    }

    #[test]
    fn test_without_business_profile() {
        let facts = PageFacts::default();
        for evaluate in [
            name_consistency as super::super::Evaluate,
            profile_verification,
            local_backlinks,
        ] {
            let outcome = evaluate(&facts);
            assert_eq!(outcome.status, CheckStatus::Warning);
            assert_eq!(outcome.value, "Not available");
        }
    }

    #[test]
    fn test_review_response_rate() {
        let mut facts = PageFacts::default();
        facts.business = Some(BusinessProfile {
            total_reviews: 10,
            responded_reviews: 6,
            ..Default::default()
        });
        let outcome = review_response_rate(&facts);
        assert_eq!(outcome.status, CheckStatus::Warning);
        assert_eq!(outcome.value, "60% (6/10)");
    }

    #[test]
    fn test_location_in_title() {
        let mut facts = PageFacts::default();
        facts.meta.title = Some("Emergency plumbing in Brisbane".into());
        assert!(location_in_title(&facts).is_pass());

        facts.meta.title = Some("Plumbers in Austin, TX".into());
        assert!(location_in_title(&facts).is_pass());

        facts.meta.title = Some("Licensed Plumbers QLD".into());
        assert!(location_in_title(&facts).is_pass());

        facts.meta.title = Some("Fast plumbing in your home".into());
        assert_eq!(location_in_title(&facts).status, CheckStatus::Warning);
    }

    #[test]
    fn test_acronyms_are_not_locations() {
        let mut facts = PageFacts::default();
        for title in [
            "SEO FAQ for Plumbers",
            "HVAC and CCTV Installers | ABC Services",
            "OK, IT works",
        ] {
            facts.meta.title = Some(title.into());
            assert_eq!(location_in_title(&facts).status, CheckStatus::Warning, "{title}");
        }
    }

    #[test]
    fn test_local_business_schema_fails_hard() {
        let mut facts = PageFacts::default();
        assert_eq!(local_business_schema(&facts).status, CheckStatus::Fail);
        facts.structured_data.types = vec!["Plumber".into(), "LocalBusiness".into()];
        assert!(local_business_schema(&facts).is_pass());
    }

    #[test]
    fn test_directory_listings_need_external_links() {
        let mut facts = PageFacts::default();
        facts.html = "yelp facebook linkedin".to_string();
        assert_eq!(directory_listings(&facts).status, CheckStatus::Warning);
        facts.links.external = 3;
        assert!(directory_listings(&facts).is_pass());
    }
}
