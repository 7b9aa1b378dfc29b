use async_trait::async_trait;
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use crate::application::ports::scrape_unit_of_work::{
    CreateUrlError, ScrapeTransaction, ScrapeUnitOfWork,
};
use crate::domain::scraping::records::{LinkRecord, NewLink, UrlRecord};
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::link_repository_sqlx::link_from_row;
use crate::infrastructure::db::repositories::url_repository_sqlx::url_from_row;

pub struct SqlxScrapeUnitOfWork {
    pub pool: PgPool,
}

impl SqlxScrapeUnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScrapeUnitOfWork for SqlxScrapeUnitOfWork {
    async fn begin(&self) -> anyhow::Result<Box<dyn ScrapeTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqlxScrapeTransaction { tx }))
    }
}

/// Column arrays for the `UNNEST` bulk insert, one entry per link.
#[derive(Debug, Default, PartialEq)]
struct BatchColumns {
    url_ids: Vec<Uuid>,
    links: Vec<String>,
    names: Vec<String>,
    positions: Vec<i32>,
}

impl BatchColumns {
    fn from_links(batch: &[NewLink]) -> Self {
        let mut cols = Self::default();
        for l in batch {
            cols.url_ids.push(l.url_id);
            cols.links.push(l.link.clone());
            cols.names.push(l.name.clone());
            cols.positions.push(l.position);
        }
        cols
    }
}

/// Rolls back on drop unless `commit` ran.
pub struct SqlxScrapeTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ScrapeTransaction for SqlxScrapeTransaction {
    async fn find_by_url(&mut self, address: &str) -> anyhow::Result<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"SELECT id, name, url, created_at, updated_at FROM urls WHERE url = $1"#,
        )
        .bind(address)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row.as_ref().map(url_from_row))
    }

    async fn create_url(
        &mut self,
        name: &str,
        address: &str,
    ) -> Result<UrlRecord, CreateUrlError> {
        // DO NOTHING keeps the transaction usable after a conflict.
        let row = sqlx::query(
            r#"INSERT INTO urls (name, url) VALUES ($1, $2)
               ON CONFLICT (url) DO NOTHING
               RETURNING id, name, url, created_at, updated_at"#,
        )
        .bind(name)
        .bind(address)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| {
            if crate::infrastructure::db::is_unique_violation(&e) {
                CreateUrlError::Conflict(address.to_string())
            } else {
                CreateUrlError::Storage(e.into())
            }
        })?;
        row.as_ref()
            .map(url_from_row)
            .ok_or_else(|| CreateUrlError::Conflict(address.to_string()))
    }

    async fn touch_url(&mut self, id: Uuid) -> anyhow::Result<UrlRecord> {
        let row = sqlx::query(
            r#"UPDATE urls SET updated_at = now() WHERE id = $1
               RETURNING id, name, url, created_at, updated_at"#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.as_ref()
            .map(url_from_row)
            .ok_or_else(|| anyhow::anyhow!("url {id} not found"))
    }

    async fn delete_links_by_url_id(&mut self, url_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM links WHERE url_id = $1")
            .bind(url_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn create_many_links(&mut self, links: &[NewLink]) -> anyhow::Result<Vec<LinkRecord>> {
        if links.is_empty() {
            return Ok(Vec::new());
        }
        let cols = BatchColumns::from_links(links);
        let mut rows = sqlx::query(
            r#"INSERT INTO links (url_id, link, name, position)
               SELECT * FROM UNNEST($1::uuid[], $2::text[], $3::text[], $4::int4[])
               RETURNING id, url_id, link, name, position, created_at, updated_at"#,
        )
        .bind(cols.url_ids)
        .bind(cols.links)
        .bind(cols.names)
        .bind(cols.positions)
        .fetch_all(&mut *self.tx)
        .await?;
        // RETURNING order is unspecified.
        rows.sort_by_key(|r| r.get::<i32, _>("position"));
        Ok(rows.iter().map(link_from_row).collect())
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
