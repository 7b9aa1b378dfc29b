use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::pagination::{PageRequest, Paginated};
use crate::application::ports::url_repository::UrlRepository;
use crate::domain::scraping::records::{UrlRecord, UrlWithLinkCount};
use crate::infrastructure::db::PgPool;

pub struct SqlxUrlRepository {
    pub pool: PgPool,
}

impl SqlxUrlRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn url_from_row(r: &PgRow) -> UrlRecord {
    UrlRecord {
        id: r.get("id"),
        name: r.get("name"),
        url: r.get("url"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

#[async_trait]
impl UrlRepository for SqlxUrlRepository {
    async fn find_by_url(&self, address: &str) -> anyhow::Result<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"SELECT id, name, url, created_at, updated_at FROM urls WHERE url = $1"#,
        )
        .bind(address)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(url_from_row))
    }

    async fn find_all_with_link_counts(
        &self,
        page: PageRequest,
    ) -> anyhow::Result<Paginated<UrlWithLinkCount>> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls")
            .fetch_one(&self.pool)
            .await?;
        let rows = sqlx::query(
            r#"SELECT u.id, u.name, u.url, u.created_at, u.updated_at,
                      COUNT(l.id) AS links_count
               FROM urls u
               LEFT JOIN links l ON l.url_id = u.id
               GROUP BY u.id
               ORDER BY u.created_at DESC, u.id
               LIMIT $1 OFFSET $2"#,
        )
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(|r| UrlWithLinkCount {
                id: r.get("id"),
                name: r.get("name"),
                url: r.get("url"),
                links_count: r.get("links_count"),
                created_at: r.get("created_at"),
                updated_at: r.get("updated_at"),
            })
            .collect();
        Ok(Paginated { items, total })
    }
}
