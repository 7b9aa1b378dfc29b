pub mod link_repository;
pub mod page_fetcher;
pub mod scrape_unit_of_work;
pub mod url_repository;
pub mod user_repository;

#[cfg(test)]
pub mod testing;
