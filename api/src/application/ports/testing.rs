//! In-memory port implementations for use-case and route tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::pagination::{PageRequest, Paginated};
use crate::application::ports::link_repository::LinkRepository;
use crate::application::ports::page_fetcher::PageFetcher;
use crate::application::ports::scrape_unit_of_work::{
    CreateUrlError, ScrapeTransaction, ScrapeUnitOfWork,
};
use crate::application::ports::url_repository::UrlRepository;
use crate::application::ports::user_repository::{CreateUserError, UserRepository};
use crate::domain::scraping::page::{ScrapedLink, ScrapedPage};
use crate::domain::scraping::records::{LinkRecord, NewLink, UrlRecord, UrlWithLinkCount};
use crate::domain::users::user::User;

type Timestamp = chrono::DateTime<chrono::Utc>;

#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub urls: Vec<UrlRecord>,
    pub links: Vec<LinkRecord>,
    /// Stored `position` of each link, keyed by link id.
    pub positions: HashMap<Uuid, i32>,
}

/// Url/link storage backed by a mutex. Transactions work on a copy of the
/// state and swap it in on commit.
#[derive(Clone, Default)]
pub struct MemoryScrapeStore {
    state: Arc<Mutex<StoreState>>,
    calls: Arc<Mutex<Vec<String>>>,
    fail_link_insert: Arc<Mutex<bool>>,
    // Url inserted by a "concurrent" writer right before our create_url runs.
    race_winner: Arc<Mutex<Option<UrlRecord>>>,
}

impl MemoryScrapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_link_insert(&self) {
        *self.fail_link_insert.lock().unwrap() = true;
    }

    pub fn lose_race_to(&self, winner: UrlRecord) {
        *self.race_winner.lock().unwrap() = Some(winner);
    }

    pub fn seed_url(&self, address: &str, name: &str, minutes_ago: i64) -> UrlRecord {
        let at = chrono::Utc::now() - chrono::Duration::minutes(minutes_ago);
        let record = UrlRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            url: address.to_string(),
            created_at: at,
            updated_at: at,
        };
        self.state.lock().unwrap().urls.push(record.clone());
        record
    }

    pub fn seed_links(&self, url_id: Uuid, links: &[&str]) -> Vec<LinkRecord> {
        let mut state = self.state.lock().unwrap();
        let now = chrono::Utc::now();
        let created: Vec<LinkRecord> = links
            .iter()
            .map(|l| link_record(url_id, l, l, now))
            .collect();
        for (idx, link) in created.iter().enumerate() {
            state.positions.insert(link.id, idx as i32);
        }
        state.links.extend(created.iter().cloned());
        created
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

fn link_record(url_id: Uuid, link: &str, name: &str, now: Timestamp) -> LinkRecord {
    LinkRecord {
        id: Uuid::new_v4(),
        url_id,
        link: link.to_string(),
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn page_of<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    items
        .iter()
        .skip(page.offset().max(0) as usize)
        .take(page.limit as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl UrlRepository for MemoryScrapeStore {
    async fn find_by_url(&self, address: &str) -> anyhow::Result<Option<UrlRecord>> {
        self.record("find_by_url");
        let state = self.state.lock().unwrap();
        Ok(state.urls.iter().find(|u| u.url == address).cloned())
    }

    async fn find_all_with_link_counts(
        &self,
        page: PageRequest,
    ) -> anyhow::Result<Paginated<UrlWithLinkCount>> {
        let state = self.state.lock().unwrap();
        let mut urls: Vec<UrlWithLinkCount> = state
            .urls
            .iter()
            .map(|u| UrlWithLinkCount {
                id: u.id,
                name: u.name.clone(),
                url: u.url.clone(),
                links_count: state.links.iter().filter(|l| l.url_id == u.id).count() as i64,
                created_at: u.created_at,
                updated_at: u.updated_at,
            })
            .collect();
        urls.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Paginated {
            total: urls.len() as i64,
            items: page_of(&urls, page),
        })
    }
}

#[async_trait]
impl LinkRepository for MemoryScrapeStore {
    async fn find_by_url(
        &self,
        address: &str,
        page: PageRequest,
    ) -> anyhow::Result<Paginated<LinkRecord>> {
        let state = self.state.lock().unwrap();
        let Some(url) = state.urls.iter().find(|u| u.url == address) else {
            return Ok(Paginated::empty());
        };
        let mut links: Vec<LinkRecord> = state
            .links
            .iter()
            .filter(|l| l.url_id == url.id)
            .cloned()
            .collect();
        links.sort_by_key(|l| (l.created_at, state.positions.get(&l.id).copied(), l.id));
        Ok(Paginated {
            total: links.len() as i64,
            items: page_of(&links, page),
        })
    }
}

pub struct MemoryTransaction {
    store: MemoryScrapeStore,
    working: StoreState,
}

#[async_trait]
impl ScrapeUnitOfWork for MemoryScrapeStore {
    async fn begin(&self) -> anyhow::Result<Box<dyn ScrapeTransaction>> {
        self.record("begin");
        Ok(Box::new(MemoryTransaction {
            store: self.clone(),
            working: self.snapshot(),
        }))
    }
}

#[async_trait]
impl ScrapeTransaction for MemoryTransaction {
    async fn find_by_url(&mut self, address: &str) -> anyhow::Result<Option<UrlRecord>> {
        self.store.record("tx.find_by_url");
        Ok(self.working.urls.iter().find(|u| u.url == address).cloned())
    }

    async fn create_url(
        &mut self,
        name: &str,
        address: &str,
    ) -> Result<UrlRecord, CreateUrlError> {
        self.store.record("tx.create_url");
        if let Some(winner) = self.store.race_winner.lock().unwrap().take() {
            self.store.state.lock().unwrap().urls.push(winner.clone());
            self.working.urls.push(winner);
        }
        if self.working.urls.iter().any(|u| u.url == address) {
            return Err(CreateUrlError::Conflict(address.to_string()));
        }
        let now = chrono::Utc::now();
        let record = UrlRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            url: address.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.working.urls.push(record.clone());
        Ok(record)
    }

    async fn touch_url(&mut self, id: Uuid) -> anyhow::Result<UrlRecord> {
        self.store.record("tx.touch_url");
        let url = self
            .working
            .urls
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| anyhow::anyhow!("url {id} not found"))?;
        url.updated_at = chrono::Utc::now();
        Ok(url.clone())
    }

    async fn delete_links_by_url_id(&mut self, url_id: Uuid) -> anyhow::Result<()> {
        self.store.record("tx.delete_links_by_url_id");
        let working = &mut self.working;
        working.links.retain(|l| l.url_id != url_id);
        let kept: Vec<Uuid> = working.links.iter().map(|l| l.id).collect();
        working.positions.retain(|id, _| kept.contains(id));
        Ok(())
    }

    async fn create_many_links(&mut self, links: &[NewLink]) -> anyhow::Result<Vec<LinkRecord>> {
        self.store.record("tx.create_many_links");
        if *self.store.fail_link_insert.lock().unwrap() {
            anyhow::bail!("insert into links failed");
        }
        // Stored in reverse so listings only come out right by `position`.
        // One statement, one `now()`.
        let now = chrono::Utc::now();
        let mut created = Vec::with_capacity(links.len());
        for l in links.iter().rev() {
            let record = link_record(l.url_id, &l.link, &l.name, now);
            self.working.positions.insert(record.id, l.position);
            self.working.links.push(record.clone());
            created.push(record);
        }
        created.reverse();
        Ok(created)
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        self.store.record("tx.commit");
        *self.store.state.lock().unwrap() = self.working;
        Ok(())
    }
}

/// Serves canned pages keyed by address; anything else fails like a
/// network error.
#[derive(Clone, Default)]
pub struct StaticPageFetcher {
    pages: Arc<Mutex<HashMap<String, ScrapedPage>>>,
}

impl StaticPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, address: &str, title: &str, links: &[(&str, &str)]) {
        let page = ScrapedPage {
            title: title.to_string(),
            links: links
                .iter()
                .map(|(link, name)| ScrapedLink {
                    link: link.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        };
        self.pages
            .lock()
            .unwrap()
            .insert(address.to_string(), page);
    }
}

#[async_trait]
impl PageFetcher for StaticPageFetcher {
    async fn fetch(&self, address: &str) -> anyhow::Result<ScrapedPage> {
        self.pages
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Failed to fetch URL: connection refused"))
    }
}

#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, CreateUserError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.email == email || u.username == username)
        {
            return Err(CreateUserError::Conflict);
        }
        let now = chrono::Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: Some(password_hash.to_string()),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user.without_secret())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .map(User::without_secret))
    }
}
