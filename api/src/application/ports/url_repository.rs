use async_trait::async_trait;

use crate::application::pagination::{PageRequest, Paginated};
use crate::domain::scraping::records::{UrlRecord, UrlWithLinkCount};

#[async_trait]
pub trait UrlRepository: Send + Sync {
    async fn find_by_url(&self, address: &str) -> anyhow::Result<Option<UrlRecord>>;

    // Newest first, each row carrying its link count.
    async fn find_all_with_link_counts(
        &self,
        page: PageRequest,
    ) -> anyhow::Result<Paginated<UrlWithLinkCount>>;
}
