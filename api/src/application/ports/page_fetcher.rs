use async_trait::async_trait;

use crate::domain::scraping::page::ScrapedPage;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, address: &str) -> anyhow::Result<ScrapedPage>;
}
