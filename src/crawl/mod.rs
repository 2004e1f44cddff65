//! Concurrent page fetching for ingestion
//!
//! This module provides:
//! - Link list loading
//! - Fan-out fetching of all configured URLs over one shared client
//! - Raw page persistence for auditability
//! - Per-URL failure isolation: one bad page never aborts the batch

use crate::config::CrawlConfig;
use crate::error::{Error, Result};
use crate::extract::extract_text;
use futures::future::join_all;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// One crawled page: text is absent when fetch or extraction failed
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub url: String,
    pub text: Option<String>,
}

/// Web crawler over a fixed URL list
pub struct Crawler {
    client: Client,
    raw_dir: PathBuf,
}

impl Crawler {
    /// Create a new crawler persisting raw pages under `raw_dir`
    pub fn new(config: &CrawlConfig, raw_dir: &Path) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| Error::Crawl(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            raw_dir: raw_dir.to_path_buf(),
        })
    }

    /// Fetch every URL concurrently.
    ///
    /// Returns one record per input URL, in input order. Failures are logged
    /// and recorded as absent text; they never affect sibling fetches.
    pub async fn crawl_all(&self, urls: &[String]) -> Vec<PageRecord> {
        let fetches = urls.iter().map(|url| self.fetch_record(url));
        let records = join_all(fetches).await;

        let ok = records.iter().filter(|r| r.text.is_some()).count();
        info!("Crawled {} pages, {} with text", records.len(), ok);
        records
    }

    async fn fetch_record(&self, url: &str) -> PageRecord {
        match self.fetch(url).await {
            Ok(body) => PageRecord {
                url: url.to_string(),
                text: extract_text(&body),
            },
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                PageRecord {
                    url: url.to_string(),
                    text: None,
                }
            }
        }
    }

    /// Fetch one URL and persist the raw body
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Crawl(format!("HTTP {}: {}", status, url)));
        }

        let body = response.text().await?;

        let raw_path = self.raw_dir.join(raw_page_filename(url));
        tokio::fs::write(&raw_path, &body).await?;
        debug!("Saved raw page to {}", raw_path.display());

        Ok(body)
    }
}

/// Load the link list: one URL per line, blank lines and `#` comments ignored
pub fn load_links(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Crawl(format!("Failed to read link list {}: {}", path.display(), e))
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Derive a raw-storage filename from a URL: scheme stripped, filesystem-unsafe
/// characters replaced with `_`
pub fn raw_page_filename(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    let safe: String = without_scheme
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("{}.html", safe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page_body(marker: &str) -> String {
        let filler: String = (0..20)
            .map(|i| format!("<p>Paragraph {} about {} with enough words.</p>", i, marker))
            .collect();
        format!("<html><body><article>{}</article></body></html>", filler)
    }

    #[test]
    fn test_raw_page_filename() {
        assert_eq!(
            raw_page_filename("https://example.com/docs/intro?v=2"),
            "example.com_docs_intro_v_2.html"
        );
        assert_eq!(
            raw_page_filename("http://example.com/"),
            "example.com_.html"
        );
    }

    #[test]
    fn test_load_links_skips_blanks_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.txt");
        std::fs::write(
            &path,
            "https://a.example/one\n\n# comment\n  https://a.example/two  \n",
        )
        .unwrap();

        let links = load_links(&path).unwrap();
        assert_eq!(links, vec!["https://a.example/one", "https://a.example/two"]);
    }

    #[tokio::test]
    async fn test_failures_do_not_affect_siblings() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/good"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(page_body("gardens"), "text/html"),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/also-good"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(page_body("harbors"), "text/html"),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let crawler = Crawler::new(&CrawlConfig::default(), dir.path()).unwrap();

        let urls = vec![
            format!("{}/good", server.uri()),
            format!("{}/missing", server.uri()),
            format!("{}/also-good", server.uri()),
        ];
        let records = crawler.crawl_all(&urls).await;

        // Exactly one record per input URL, in input order
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].url, urls[0]);
        assert_eq!(records[1].url, urls[1]);
        assert_eq!(records[2].url, urls[2]);

        assert!(records[0].text.as_deref().unwrap().contains("gardens"));
        assert!(records[1].text.is_none());
        assert!(records[2].text.as_deref().unwrap().contains("harbors"));
    }

    #[tokio::test]
    async fn test_raw_body_is_persisted_verbatim() {
        let server = MockServer::start().await;
        let body = page_body("lighthouses");

        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body.clone(), "text/html"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let crawler = Crawler::new(&CrawlConfig::default(), dir.path()).unwrap();

        let url = format!("{}/page", server.uri());
        let records = crawler.crawl_all(std::slice::from_ref(&url)).await;
        assert!(records[0].text.is_some());

        let raw_path = dir.path().join(raw_page_filename(&url));
        let saved = std::fs::read_to_string(raw_path).unwrap();
        assert_eq!(saved, body);
    }

    #[tokio::test]
    async fn test_extraction_failure_yields_absent_text() {
        let server = MockServer::start().await;

        // Fetch succeeds but the page has nothing extractable
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "<html><body><div>tiny</div></body></html>",
                "text/html",
            ))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let crawler = Crawler::new(&CrawlConfig::default(), dir.path()).unwrap();

        let url = format!("{}/empty", server.uri());
        let records = crawler.crawl_all(std::slice::from_ref(&url)).await;

        assert_eq!(records.len(), 1);
        assert!(records[0].text.is_none());
        // Raw body is still persisted for auditing
        assert!(dir.path().join(raw_page_filename(&url)).exists());
    }
}
