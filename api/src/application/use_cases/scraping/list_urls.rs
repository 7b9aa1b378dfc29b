use crate::application::pagination::{PageRequest, PaginationMeta};
use crate::application::ports::url_repository::UrlRepository;
use crate::domain::scraping::records::UrlWithLinkCount;

pub const DEFAULT_URLS_LIMIT: i64 = 5;

#[derive(Debug, Clone)]
pub struct UrlListing {
    pub urls: Vec<UrlWithLinkCount>,
    pub pagination: PaginationMeta,
}

pub struct ListUrls<'a, R: UrlRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UrlRepository + ?Sized> ListUrls<'a, R> {
    pub async fn execute(&self, page: PageRequest) -> anyhow::Result<UrlListing> {
        let result = self.repo.find_all_with_link_counts(page).await?;
        Ok(UrlListing {
            pagination: PaginationMeta::calculate(page, result.total),
            urls: result.items,
        })
    }
}
