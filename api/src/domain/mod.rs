pub mod scraping;
pub mod users;
