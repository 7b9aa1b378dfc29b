use tracing::{debug, info};
use uuid::Uuid;

use crate::application::ports::page_fetcher::PageFetcher;
use crate::application::ports::scrape_unit_of_work::{
    CreateUrlError, ScrapeTransaction, ScrapeUnitOfWork,
};
use crate::application::ports::url_repository::UrlRepository;
use crate::domain::scraping::records::{LinkRecord, NewLink, UrlRecord};

#[derive(thiserror::Error, Debug)]
pub enum ScrapeUrlError {
    // Carries the fetcher's message unchanged.
    #[error("{0}")]
    Fetch(anyhow::Error),
    #[error("failed to store scraped links")]
    Storage(#[source] anyhow::Error),
}

impl From<anyhow::Error> for ScrapeUrlError {
    fn from(err: anyhow::Error) -> Self {
        ScrapeUrlError::Storage(err)
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub url: UrlRecord,
    pub links: Vec<LinkRecord>,
    pub total_links: usize,
}

/// Fetches a page and replaces every stored link for its address with the
/// freshly scraped batch.
pub struct ScrapeUrl<'a, R, U, F>
where
    R: UrlRepository + ?Sized,
    U: ScrapeUnitOfWork + ?Sized,
    F: PageFetcher + ?Sized,
{
    pub urls: &'a R,
    pub store: &'a U,
    pub fetcher: &'a F,
}

impl<'a, R, U, F> ScrapeUrl<'a, R, U, F>
where
    R: UrlRepository + ?Sized,
    U: ScrapeUnitOfWork + ?Sized,
    F: PageFetcher + ?Sized,
{
    pub async fn execute(&self, address: &str) -> Result<ScrapeOutcome, ScrapeUrlError> {
        let existing = self.urls.find_by_url(address).await?;

        // Nothing is written until the page has been fetched and parsed.
        let page = self
            .fetcher
            .fetch(address)
            .await
            .map_err(ScrapeUrlError::Fetch)?;
        debug!(url = %address, links = page.links.len(), "page_fetched");

        let mut tx = self.store.begin().await?;
        let record = match existing {
            Some(record) => clear_links(tx.as_mut(), record.id).await?,
            None => match tx.create_url(&page.title, address).await {
                Ok(record) => record,
                Err(CreateUrlError::Conflict(_)) => {
                    // Another request stored this address after our lookup.
                    let winner = tx.find_by_url(address).await?.ok_or_else(|| {
                        anyhow::anyhow!("url {address} missing after unique conflict")
                    })?;
                    info!(url = %address, url_id = %winner.id, "scrape_lost_create_race");
                    clear_links(tx.as_mut(), winner.id).await?
                }
                Err(CreateUrlError::Storage(err)) => return Err(ScrapeUrlError::Storage(err)),
            },
        };

        let batch: Vec<NewLink> = page
            .links
            .into_iter()
            .enumerate()
            .map(|(idx, l)| NewLink {
                url_id: record.id,
                link: l.link,
                name: l.name,
                position: idx as i32,
            })
            .collect();
        let links = tx.create_many_links(&batch).await?;
        tx.commit().await?;

        info!(url = %address, url_id = %record.id, links = links.len(), "url_scraped");
        Ok(ScrapeOutcome {
            total_links: links.len(),
            url: record,
            links,
        })
    }
}

async fn clear_links(tx: &mut dyn ScrapeTransaction, url_id: Uuid) -> anyhow::Result<UrlRecord> {
    tx.delete_links_by_url_id(url_id).await?;
    tx.touch_url(url_id).await
}
