use std::sync::Arc;
use std::time::Instant;

use crate::application::ports::link_repository::LinkRepository;
use crate::application::ports::page_fetcher::PageFetcher;
use crate::application::ports::scrape_unit_of_work::ScrapeUnitOfWork;
use crate::application::ports::url_repository::UrlRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    pub started_at: Instant,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    url_repo: Arc<dyn UrlRepository>,
    link_repo: Arc<dyn LinkRepository>,
    scrape_store: Arc<dyn ScrapeUnitOfWork>,
    page_fetcher: Arc<dyn PageFetcher>,
    user_repo: Arc<dyn UserRepository>,
}

impl AppServices {
    pub fn new(
        url_repo: Arc<dyn UrlRepository>,
        link_repo: Arc<dyn LinkRepository>,
        scrape_store: Arc<dyn ScrapeUnitOfWork>,
        page_fetcher: Arc<dyn PageFetcher>,
        user_repo: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            url_repo,
            link_repo,
            scrape_store,
            page_fetcher,
            user_repo,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            started_at: Instant::now(),
            services: Arc::new(services),
        }
    }

    pub fn url_repo(&self) -> Arc<dyn UrlRepository> {
        self.services.url_repo.clone()
    }

    pub fn link_repo(&self) -> Arc<dyn LinkRepository> {
        self.services.link_repo.clone()
    }

    pub fn scrape_store(&self) -> Arc<dyn ScrapeUnitOfWork> {
        self.services.scrape_store.clone()
    }

    pub fn page_fetcher(&self) -> Arc<dyn PageFetcher> {
        self.services.page_fetcher.clone()
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }
}
