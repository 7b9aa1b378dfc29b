use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::pagination::{PageRequest, Paginated};
use crate::application::ports::link_repository::LinkRepository;
use crate::domain::scraping::records::LinkRecord;
use crate::infrastructure::db::PgPool;

pub struct SqlxLinkRepository {
    pub pool: PgPool,
}

impl SqlxLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn link_from_row(r: &PgRow) -> LinkRecord {
    LinkRecord {
        id: r.get("id"),
        url_id: r.get("url_id"),
        link: r.get("link"),
        name: r.get("name"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

#[async_trait]
impl LinkRepository for SqlxLinkRepository {
    async fn find_by_url(
        &self,
        address: &str,
        page: PageRequest,
    ) -> anyhow::Result<Paginated<LinkRecord>> {
        let url_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM urls WHERE url = $1")
            .bind(address)
            .fetch_optional(&self.pool)
            .await?;
        let Some(url_id) = url_id else {
            return Ok(Paginated::empty());
        };

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM links WHERE url_id = $1")
            .bind(url_id)
            .fetch_one(&self.pool)
            .await?;
        let rows = sqlx::query(
            r#"SELECT id, url_id, link, name, created_at, updated_at
               FROM links
               WHERE url_id = $1
               ORDER BY created_at ASC, position ASC, id
               LIMIT $2 OFFSET $3"#,
        )
        .bind(url_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Paginated {
            items: rows.iter().map(link_from_row).collect(),
            total,
        })
    }
}
