use async_trait::async_trait;

use crate::application::pagination::{PageRequest, Paginated};
use crate::domain::scraping::records::LinkRecord;

#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Links stored for the page at `address`. An unknown address yields an
    /// empty page with a zero total.
    async fn find_by_url(
        &self,
        address: &str,
        page: PageRequest,
    ) -> anyhow::Result<Paginated<LinkRecord>>;
}
