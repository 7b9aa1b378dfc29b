pub mod db;
pub mod scraping;
