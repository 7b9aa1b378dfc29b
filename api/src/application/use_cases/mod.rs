pub mod auth;
pub mod scraping;
