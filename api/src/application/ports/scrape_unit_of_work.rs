use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::scraping::records::{LinkRecord, NewLink, UrlRecord};

#[derive(thiserror::Error, Debug)]
pub enum CreateUrlError {
    #[error("url already exists: {0}")]
    Conflict(String),
    #[error("failed to persist url")]
    Storage(#[source] anyhow::Error),
}

/// Opens write transactions over the url/link tables.
#[async_trait]
pub trait ScrapeUnitOfWork: Send + Sync {
    async fn begin(&self) -> anyhow::Result<Box<dyn ScrapeTransaction>>;
}

/// Writes issued through one transaction become visible together on
/// `commit`. Dropping the transaction without committing discards them.
#[async_trait]
pub trait ScrapeTransaction: Send {
    async fn find_by_url(&mut self, address: &str) -> anyhow::Result<Option<UrlRecord>>;

    async fn create_url(&mut self, name: &str, address: &str)
    -> Result<UrlRecord, CreateUrlError>;

    /// Bumps `updated_at`; `id` and `created_at` never change.
    async fn touch_url(&mut self, id: Uuid) -> anyhow::Result<UrlRecord>;

    // No-op when the url has no links.
    async fn delete_links_by_url_id(&mut self, url_id: Uuid) -> anyhow::Result<()>;

    async fn create_many_links(&mut self, links: &[NewLink]) -> anyhow::Result<Vec<LinkRecord>>;

    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
}
