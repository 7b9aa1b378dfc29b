pub mod page_fetcher_reqwest;
