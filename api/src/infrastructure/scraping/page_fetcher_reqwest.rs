use std::collections::HashSet;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::application::ports::page_fetcher::PageFetcher;
use crate::domain::scraping::page::{ScrapedLink, ScrapedPage};
use crate::domain::scraping::records::{NAME_MAX_CHARS, truncate_chars};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const UNTITLED: &str = "Untitled Page";

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

pub struct ReqwestPageFetcher {
    client: reqwest::Client,
}

impl ReqwestPageFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }

    async fn fetch_html(&self, address: &str) -> anyhow::Result<String> {
        let resp = self
            .client
            .get(address)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to fetch URL: {e}"))?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("Failed to fetch URL: upstream returned status {status}");
        }
        resp.text()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to fetch URL: {e}"))
    }
}

#[async_trait]
impl PageFetcher for ReqwestPageFetcher {
    async fn fetch(&self, address: &str) -> anyhow::Result<ScrapedPage> {
        let html = self.fetch_html(address).await?;
        let base = Url::parse(address).map_err(|e| anyhow::anyhow!("Scraping failed: {e}"))?;
        Ok(parse_page(&html, &base))
    }
}

/// Pulls the title and every http(s) anchor with visible text out of `html`.
/// Relative hrefs resolve against `base`; repeated targets keep their first
/// occurrence.
pub fn parse_page(html: &str, base: &Url) -> ScrapedPage {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for anchor in document.select(&ANCHOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let text = anchor.text().collect::<String>();
        let text = text.trim();
        if href.trim().is_empty() || text.is_empty() {
            continue;
        }
        let Ok(absolute) = base.join(href.trim()) else {
            continue;
        };
        if !matches!(absolute.scheme(), "http" | "https") {
            continue;
        }
        let absolute = absolute.to_string();
        if !seen.insert(absolute.clone()) {
            continue;
        }
        links.push(ScrapedLink {
            link: absolute,
            name: truncate_chars(text, NAME_MAX_CHARS),
        });
    }

    ScrapedPage {
        title: truncate_chars(&title, NAME_MAX_CHARS),
        links,
    }
}
