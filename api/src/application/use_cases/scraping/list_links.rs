use crate::application::pagination::{PageRequest, PaginationMeta};
use crate::application::ports::link_repository::LinkRepository;
use crate::domain::scraping::records::LinkRecord;

pub const DEFAULT_LINKS_LIMIT: i64 = 10;

#[derive(Debug, Clone)]
pub struct LinkListing {
    pub links: Vec<LinkRecord>,
    pub pagination: PaginationMeta,
}

pub struct ListLinks<'a, R: LinkRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: LinkRepository + ?Sized> ListLinks<'a, R> {
    pub async fn execute(&self, address: &str, page: PageRequest) -> anyhow::Result<LinkListing> {
        let result = self.repo.find_by_url(address, page).await?;
        Ok(LinkListing {
            pagination: PaginationMeta::calculate(page, result.total),
            links: result.items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::testing::MemoryScrapeStore;

    #[tokio::test]
    async fn unknown_address_is_an_empty_page() {
        let store = MemoryScrapeStore::new();

        let listing = ListLinks { repo: &store }
            .execute("https://nowhere.example", PageRequest::new(1, DEFAULT_LINKS_LIMIT))
            .await
            .unwrap();

        assert!(listing.links.is_empty());
        assert_eq!(listing.pagination.total_items, 0);
        assert_eq!(listing.pagination.total_pages, 0);
        assert!(!listing.pagination.has_next_page);
        assert!(!listing.pagination.has_previous_page);
    }

    #[tokio::test]
    async fn pages_through_links_of_one_url() {
        let store = MemoryScrapeStore::new();
        let url = store.seed_url("https://example.com", "Example", 0);
        let other = store.seed_url("https://other.example", "Other", 0);
        let links: Vec<String> = (0..10).map(|i| format!("https://example.com/{i}")).collect();
        let refs: Vec<&str> = links.iter().map(String::as_str).collect();
        store.seed_links(url.id, &refs);
        store.seed_links(other.id, &["https://other.example/x"]);

        let listing = ListLinks { repo: &store }
            .execute("https://example.com", PageRequest::new(1, 3))
            .await
            .unwrap();

        assert_eq!(listing.links.len(), 3);
        assert!(listing.links.iter().all(|l| l.url_id == url.id));
        assert_eq!(listing.pagination.total_items, 10);
        assert_eq!(listing.pagination.total_pages, 4);
        assert!(listing.pagination.has_next_page);
        assert!(!listing.pagination.has_previous_page);
    }
}
