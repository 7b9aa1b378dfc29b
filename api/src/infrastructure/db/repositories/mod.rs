pub mod link_repository_sqlx;
pub mod scrape_unit_of_work_sqlx;
pub mod url_repository_sqlx;
pub mod user_repository_sqlx;
