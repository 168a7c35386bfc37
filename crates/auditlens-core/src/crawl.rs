//! Page acquisition
//!
//! A [`Crawler`] turns a URL into [`PageFacts`] or a [`CrawlError`]. The
//! orchestrator never assumes success: a failed crawl still yields a
//! (degraded) audit result.

use std::future::Future;

use crate::facts::{BusinessProfile, CrawlError, PageFacts, PerformanceMetrics};

pub trait Crawler: Send + Sync {
    fn crawl(&self, url: &str) -> impl Future<Output = Result<PageFacts, CrawlError>> + Send;
}

/// Serves HTML that was obtained elsewhere, e.g. read from disk
#[derive(Debug, Clone)]
pub struct StaticPage {
    html: String,
}

impl StaticPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

impl Crawler for StaticPage {
    async fn crawl(&self, url: &str) -> Result<PageFacts, CrawlError> {
        PageFacts::from_html(url, &self.html).map_err(|e| CrawlError::new(format!("{e:#}")))
    }
}

/// Attaches externally supplied enrichments to whatever `inner` crawls
///
/// Enrichments given here replace any the inner crawler produced.
#[derive(Debug, Clone)]
pub struct Enriched<C> {
    inner: C,
    performance: Option<PerformanceMetrics>,
    business: Option<BusinessProfile>,
}

impl<C: Crawler> Enriched<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            performance: None,
            business: None,
        }
    }

    pub fn performance(mut self, metrics: Option<PerformanceMetrics>) -> Self {
        self.performance = metrics;
        self
    }

    pub fn business(mut self, profile: Option<BusinessProfile>) -> Self {
        self.business = profile;
        self
    }
}

impl<C: Crawler> Crawler for Enriched<C> {
    async fn crawl(&self, url: &str) -> Result<PageFacts, CrawlError> {
        let mut facts = self.inner.crawl(url).await?;
        if self.performance.is_some() {
            facts.performance = self.performance.clone();
        }
        if self.business.is_some() {
            facts.business = self.business.clone();
        }
        Ok(facts)
    }
}

#[cfg(feature = "fetch")]
pub use self::http::HttpCrawler;

#[cfg(feature = "fetch")]
mod http {
    use std::collections::BTreeMap;
    use std::time::{Duration, Instant};

    use tracing::{debug, info};
    use url::Url;

    use super::Crawler;
    use crate::config::CrawlSettings;
    use crate::facts::{CrawlError, PageFacts, SiteFiles};

    const MAX_REDIRECTS: usize = 5;
    const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Fetches live pages with reqwest
    #[derive(Debug, Clone)]
    pub struct HttpCrawler {
        client: reqwest::Client,
        timeout_secs: u64,
        probe_site_files: bool,
    }

    impl HttpCrawler {
        pub fn new(settings: &CrawlSettings) -> Result<Self, CrawlError> {
            let client = reqwest::Client::builder()
                .timeout(settings.timeout())
                .user_agent(settings.user_agent.as_str())
                .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
                .build()
                .map_err(|e| CrawlError::new(format!("Failed to create HTTP client: {e}")))?;

            Ok(Self {
                client,
                timeout_secs: settings.timeout_secs,
                probe_site_files: settings.probe_site_files,
            })
        }

        fn describe(&self, err: &reqwest::Error) -> String {
            if err.is_timeout() {
                format!("Request timed out after {}s", self.timeout_secs)
            } else if err.is_redirect() {
                format!("Too many redirects (limit {MAX_REDIRECTS})")
            } else {
                format!("Request failed: {err}")
            }
        }

        /// HEAD-probe /robots.txt and /sitemap.xml on the page's origin
        async fn probe(&self, page: &Url) -> SiteFiles {
            let (robots_txt, sitemap_xml) =
                tokio::join!(self.exists(page, "/robots.txt"), self.exists(page, "/sitemap.xml"));
            SiteFiles {
                robots_txt,
                sitemap_xml,
            }
        }

        async fn exists(&self, page: &Url, path: &str) -> bool {
            let Ok(url) = page.join(path) else {
                return false;
            };
            match self.client.head(url.clone()).timeout(PROBE_TIMEOUT).send().await {
                Ok(response) => {
                    debug!(%url, status = response.status().as_u16(), "site file probe");
                    response.status().is_success()
                }
                Err(err) => {
                    debug!(%url, error = %err, "site file probe failed");
                    false
                }
            }
        }
    }

    impl Crawler for HttpCrawler {
        async fn crawl(&self, url: &str) -> Result<PageFacts, CrawlError> {
            let parsed = Url::parse(url)
                .map_err(|e| CrawlError::new(format!("Invalid URL {url}: {e}")))?;

            let started = Instant::now();
            let response = self
                .client
                .get(parsed)
                .send()
                .await
                .map_err(|e| CrawlError::new(self.describe(&e)))?;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let status = response.status();
            if !status.is_success() {
                return Err(CrawlError::with_status(
                    format!("HTTP {status}"),
                    status.as_u16(),
                ));
            }

            let final_url = response.url().clone();
            let headers: BTreeMap<String, String> = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
                })
                .collect();

            let html = response
                .text()
                .await
                .map_err(|e| CrawlError::with_status(self.describe(&e), status.as_u16()))?;

            let mut facts = PageFacts::from_html(final_url.as_str(), &html)
                .map_err(|e| CrawlError::new(format!("{e:#}")))?;
            facts.status_code = status.as_u16();
            facts.headers = Some(headers);
            facts.response_time_ms = Some(elapsed_ms);

            if self.probe_site_files {
                facts.site_files = Some(self.probe(&final_url).await);
            }

            info!(
                url = %final_url,
                status = status.as_u16(),
                elapsed_ms,
                bytes = facts.html_length,
                "page fetched"
            );
            Ok(facts)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_invalid_url_is_crawl_error() {
            let crawler = HttpCrawler::new(&CrawlSettings::default()).unwrap();
            let err = crawler.crawl("not a url").await.unwrap_err();
            assert!(err.message.starts_with("Invalid URL not a url"));
            assert_eq!(err.status_code, None);
        }
    }
}
