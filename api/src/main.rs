use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use api::bootstrap::app_context::{AppContext, AppServices};
use api::bootstrap::config::Config;
use api::infrastructure::db::repositories::{
    link_repository_sqlx::SqlxLinkRepository, scrape_unit_of_work_sqlx::SqlxScrapeUnitOfWork,
    url_repository_sqlx::SqlxUrlRepository, user_repository_sqlx::SqlxUserRepository,
};
use api::infrastructure::scraping::page_fetcher_reqwest::ReqwestPageFetcher;
use api::presentation::http::health::HealthState;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        info(title = "Link Scraper API", description = "Scrapes pages and stores their outgoing links"),
        paths(
            api::presentation::http::scraping::scrape_url,
            api::presentation::http::scraping::list_urls,
            api::presentation::http::scraping::list_links,
            api::presentation::http::auth::register,
            api::presentation::http::auth::login,
            api::presentation::http::auth::me,
            api::presentation::http::health::health,
            api::presentation::http::health::ping,
        ),
        components(schemas(
            api::presentation::http::scraping::ScrapeUrlRequest,
            api::presentation::http::scraping::UrlItem,
            api::presentation::http::scraping::ScrapedLinkItem,
            api::presentation::http::scraping::ScrapeResult,
            api::presentation::http::scraping::ScrapeUrlResponse,
            api::presentation::http::scraping::UrlWithLinksCountItem,
            api::presentation::http::scraping::UrlList,
            api::presentation::http::scraping::UrlListResponse,
            api::presentation::http::scraping::LinkItem,
            api::presentation::http::scraping::LinkList,
            api::presentation::http::scraping::LinkListResponse,
            api::application::pagination::PaginationMeta,
            api::presentation::http::auth::RegisterRequest,
            api::presentation::http::auth::RegisterResponse,
            api::presentation::http::auth::LoginRequest,
            api::presentation::http::auth::LoginData,
            api::presentation::http::auth::LoginResponse,
            api::presentation::http::auth::UserResponse,
            api::presentation::http::error::ErrorBody,
            api::presentation::http::health::HealthResp,
            api::presentation::http::health::PingResp,
        )),
        modifiers(&BearerAuth),
        tags(
            (name = "Scraping", description = "URL scraping and stored links"),
            (name = "Auth", description = "Authentication"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "api=debug,axum=info,tower_http=info,sqlx=warn".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        port = cfg.api_port,
        environment = %cfg.environment,
        "Starting link scraper backend"
    );

    // Database
    let pool =
        api::infrastructure::db::connect_pool(&cfg.database_url, cfg.database_max_connections)
            .await?;
    api::infrastructure::db::migrate(&pool).await?;

    let url_repo = Arc::new(SqlxUrlRepository::new(pool.clone()));
    let link_repo = Arc::new(SqlxLinkRepository::new(pool.clone()));
    let scrape_store = Arc::new(SqlxScrapeUnitOfWork::new(pool.clone()));
    let page_fetcher = Arc::new(ReqwestPageFetcher::new(Duration::from_secs(
        cfg.scrape_timeout_secs,
    ))?);
    let user_repo = Arc::new(SqlxUserRepository::new(pool.clone()));

    let services = AppServices::new(url_repo, link_repo, scrape_store, page_fetcher, user_repo);
    let ctx = AppContext::new(cfg.clone(), services);

    let methods = [
        http::Method::GET,
        http::Method::POST,
        http::Method::PUT,
        http::Method::DELETE,
        http::Method::PATCH,
        http::Method::OPTIONS,
    ];
    let headers = [http::header::CONTENT_TYPE, http::header::AUTHORIZATION];
    let cors = match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
        _ if cfg.is_production => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(HeaderValue::from_static(
                "http://invalid",
            )))
            .allow_methods(methods)
            .allow_headers(headers),
        // Development convenience
        _ => CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
    };

    let health_state = HealthState {
        pool: pool.clone(),
        started_at: ctx.started_at,
        environment: cfg.environment.clone(),
    };

    let app = Router::new()
        .nest(
            "/scraping",
            api::presentation::http::scraping::routes(ctx.clone()),
        )
        .nest("/auth", api::presentation::http::auth::routes(ctx.clone()))
        .nest(
            "/health",
            api::presentation::http::health::routes(health_state),
        )
        .merge(SwaggerUi::new("/docs").url("/docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    info!("Swagger UI available at http://localhost:{}/docs", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(?e, "API server failed");
        return Err(e.into());
    }
    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(?e, "failed to listen for shutdown signal");
    }
}
