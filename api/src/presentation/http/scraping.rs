use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::pagination::{PageQuery, PageRequest, PaginationMeta};
use crate::application::use_cases::scraping::list_links::{DEFAULT_LINKS_LIMIT, ListLinks};
use crate::application::use_cases::scraping::list_urls::{DEFAULT_URLS_LIMIT, ListUrls};
use crate::application::use_cases::scraping::scrape_url::{ScrapeUrl, ScrapeUrlError};
use crate::bootstrap::app_context::AppContext;
use crate::domain::scraping::records::{LinkRecord, UrlRecord, UrlWithLinkCount};
use crate::presentation::http::error::{ApiError, ErrorBody};
use crate::presentation::http::validation;

type DateTime = chrono::DateTime<chrono::Utc>;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScrapeUrlRequest {
    /// Address of the page to scrape
    #[serde(default)]
    #[schema(example = "https://www.example.com")]
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UrlItem {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScrapedLinkItem {
    pub link: String,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    pub url: UrlItem,
    pub links: Vec<ScrapedLinkItem>,
    pub total_links: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScrapeUrlResponse {
    pub message: String,
    pub data: ScrapeResult,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UrlWithLinksCountItem {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub links_count: i64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UrlList {
    pub urls: Vec<UrlWithLinksCountItem>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UrlListResponse {
    pub message: String,
    pub data: UrlList,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    pub id: Uuid,
    pub url_id: Uuid,
    pub link: String,
    pub name: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LinkList {
    pub links: Vec<LinkItem>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LinkListResponse {
    pub message: String,
    pub data: LinkList,
}

#[derive(Debug, Deserialize)]
pub struct LinksQuery {
    pub url: Option<String>,
}

impl From<UrlRecord> for UrlItem {
    fn from(u: UrlRecord) -> Self {
        Self {
            id: u.id,
            name: u.name,
            url: u.url,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

impl From<UrlWithLinkCount> for UrlWithLinksCountItem {
    fn from(u: UrlWithLinkCount) -> Self {
        Self {
            id: u.id,
            name: u.name,
            url: u.url,
            links_count: u.links_count,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

impl From<LinkRecord> for LinkItem {
    fn from(l: LinkRecord) -> Self {
        Self {
            id: l.id,
            url_id: l.url_id,
            link: l.link,
            name: l.name,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/scrape-url", post(scrape_url))
        .route("/urls", get(list_urls))
        .route("/links", get(list_links))
        .with_state(ctx)
}

fn page_from(
    query: Result<Query<PageQuery>, QueryRejection>,
    default_limit: i64,
    errors: &mut Vec<String>,
) -> PageRequest {
    match query {
        Ok(Query(q)) => {
            let page = q.resolve(default_limit);
            errors.extend(page.validate());
            page
        }
        Err(_) => {
            errors.push("page and limit must be integers".into());
            PageRequest::normalized(None, None, default_limit)
        }
    }
}

#[utoipa::path(post, path = "/scraping/scrape-url", tag = "Scraping", request_body = ScrapeUrlRequest,
    responses(
        (status = 201, body = ScrapeUrlResponse),
        (status = 400, body = ErrorBody),
        (status = 500, body = ErrorBody)
    ))]
pub async fn scrape_url(
    State(ctx): State<AppContext>,
    body: Result<Json<ScrapeUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ScrapeUrlResponse>), ApiError> {
    let Json(req) = body.map_err(|rej| ApiError::validation(rej.body_text()))?;
    let mut errors = Vec::new();
    validation::check_url("url", &req.url, &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    let address = req.url.trim();

    let urls = ctx.url_repo();
    let store = ctx.scrape_store();
    let fetcher = ctx.page_fetcher();
    let uc = ScrapeUrl {
        urls: urls.as_ref(),
        store: store.as_ref(),
        fetcher: fetcher.as_ref(),
    };
    let outcome = uc.execute(address).await.map_err(|err| {
        tracing::error!(error = ?err, url = %address, "scrape_failed");
        match err {
            ScrapeUrlError::Fetch(e) => ApiError::Internal(e.to_string()),
            ScrapeUrlError::Storage(_) => ApiError::Internal("Failed to scrape URL".into()),
        }
    })?;

    let data = ScrapeResult {
        url: outcome.url.into(),
        links: outcome
            .links
            .into_iter()
            .map(|l| ScrapedLinkItem {
                link: l.link,
                name: l.name,
            })
            .collect(),
        total_links: outcome.total_links,
    };
    Ok((
        StatusCode::CREATED,
        Json(ScrapeUrlResponse {
            message: "URL scraped successfully".into(),
            data,
        }),
    ))
}

#[utoipa::path(get, path = "/scraping/urls", tag = "Scraping",
    params(PageQuery),
    responses((status = 200, body = UrlListResponse), (status = 400, body = ErrorBody)))]
pub async fn list_urls(
    State(ctx): State<AppContext>,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<UrlListResponse>, ApiError> {
    let mut errors = Vec::new();
    let page = page_from(page, DEFAULT_URLS_LIMIT, &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let repo = ctx.url_repo();
    let uc = ListUrls {
        repo: repo.as_ref(),
    };
    let listing = uc.execute(page).await.map_err(|err| {
        tracing::error!(error = ?err, "list_urls_failed");
        ApiError::internal()
    })?;

    Ok(Json(UrlListResponse {
        message: "URLs retrieved successfully".into(),
        data: UrlList {
            urls: listing.urls.into_iter().map(Into::into).collect(),
            pagination: listing.pagination,
        },
    }))
}

#[utoipa::path(get, path = "/scraping/links", tag = "Scraping",
    params(
        ("url" = String, Query, description = "Address whose links are listed"),
        PageQuery
    ),
    responses((status = 200, body = LinkListResponse), (status = 400, body = ErrorBody)))]
pub async fn list_links(
    State(ctx): State<AppContext>,
    query: Result<Query<LinksQuery>, QueryRejection>,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<LinkListResponse>, ApiError> {
    let mut errors = Vec::new();
    let address = query
        .ok()
        .and_then(|Query(q)| q.url)
        .unwrap_or_default();
    validation::check_url("url", &address, &mut errors);
    let page = page_from(page, DEFAULT_LINKS_LIMIT, &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let repo = ctx.link_repo();
    let uc = ListLinks {
        repo: repo.as_ref(),
    };
    let listing = uc.execute(address.trim(), page).await.map_err(|err| {
        tracing::error!(error = ?err, url = %address, "list_links_failed");
        ApiError::internal()
    })?;

    Ok(Json(LinkListResponse {
        message: "Links retrieved successfully".into(),
        data: LinkList {
            links: listing.links.into_iter().map(Into::into).collect(),
            pagination: listing.pagination,
        },
    }))
}
