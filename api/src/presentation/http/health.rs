use std::time::Instant;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct HealthState {
    pub pool: PgPool,
    pub started_at: Instant,
    pub environment: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResp {
    pub status: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Seconds since the process started.
    pub uptime: f64,
    pub environment: String,
    pub version: &'static str,
    pub database: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PingResp {
    pub message: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, body = HealthResp))
)]
pub async fn health(State(state): State<HealthState>) -> Json<HealthResp> {
    let db_ok = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .is_ok();
    if !db_ok {
        tracing::warn!("health_database_unreachable");
    }
    Json(HealthResp {
        status: "ok",
        timestamp: chrono::Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        environment: state.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
        database: if db_ok { "ok" } else { "degraded" },
    })
}

#[utoipa::path(
    get,
    path = "/health/ping",
    tag = "Health",
    responses((status = 200, body = PingResp))
)]
pub async fn ping() -> Json<PingResp> {
    Json(PingResp { message: "pong" })
}

pub fn routes(state: HealthState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/ping", get(ping))
        .with_state(state)
}
