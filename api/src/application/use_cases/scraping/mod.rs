pub mod list_links;
pub mod list_urls;
pub mod scrape_url;
