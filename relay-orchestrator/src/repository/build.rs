//! Build record repository
//!
//! Stores build lifecycle records. Both writes are upserts keyed by the
//! record id, so replaying either of them is harmless.

use anyhow::{Context, Result};
use async_trait::async_trait;
use relay_core::domain::build::{BuildRecord, BuildStatus};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Repository trait for build lifecycle records
#[async_trait]
pub trait BuildRepository: Send + Sync {
    /// Stores a freshly opened (pending) record
    async fn save_build_started(&self, record: &BuildRecord) -> Result<()>;

    /// Stores a closed record
    async fn save_build_ended(&self, record: &BuildRecord) -> Result<()>;
}

/// PostgreSQL implementation of BuildRepository
pub struct PgBuildRepository {
    pool: PgPool,
}

impl PgBuildRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert(&self, record: &BuildRecord) -> Result<()> {
        let build_number =
            i64::try_from(record.build_number).context("Build number does not fit in BIGINT")?;

        sqlx::query(
            r#"
            INSERT INTO builds (id, job_id, requester_id, build_number, status, started_at, ended_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET status = EXCLUDED.status, ended_at = EXCLUDED.ended_at
            "#,
        )
        .bind(record.id)
        .bind(&record.job_id)
        .bind(&record.requester_id)
        .bind(build_number)
        .bind(record.status.as_str())
        .bind(record.started_at)
        .bind(record.ended_at)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to upsert build {}", record.id))?;

        Ok(())
    }

    /// Find a build record by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BuildRecord>> {
        let row = sqlx::query_as::<_, BuildRow>(
            r#"
            SELECT id, job_id, requester_id, build_number, status, started_at, ended_at
            FROM builds
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to load build {}", id))?;

        row.map(BuildRecord::try_from).transpose()
    }
}

#[async_trait]
impl BuildRepository for PgBuildRepository {
    async fn save_build_started(&self, record: &BuildRecord) -> Result<()> {
        self.upsert(record).await?;
        tracing::debug!("Build {} stored as started", record.id);
        Ok(())
    }

    async fn save_build_ended(&self, record: &BuildRecord) -> Result<()> {
        self.upsert(record).await?;
        tracing::debug!("Build {} stored as {}", record.id, record.status);
        Ok(())
    }
}

/// In-memory implementation of BuildRepository
///
/// Used when no database is configured. Records live as long as the process.
#[derive(Clone, Default)]
pub struct InMemoryBuildRepository {
    records: Arc<Mutex<HashMap<Uuid, BuildRecord>>>,
}

impl InMemoryBuildRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<BuildRecord> {
        self.records.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn upsert(&self, record: &BuildRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
    }
}

#[async_trait]
impl BuildRepository for InMemoryBuildRepository {
    async fn save_build_started(&self, record: &BuildRecord) -> Result<()> {
        self.upsert(record);
        Ok(())
    }

    async fn save_build_ended(&self, record: &BuildRecord) -> Result<()> {
        self.upsert(record);
        Ok(())
    }
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct BuildRow {
    id: Uuid,
    job_id: String,
    requester_id: String,
    build_number: i64,
    status: String,
    started_at: chrono::DateTime<chrono::Utc>,
    ended_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl TryFrom<BuildRow> for BuildRecord {
    type Error = anyhow::Error;

    fn try_from(row: BuildRow) -> Result<Self> {
        let status = row
            .status
            .parse::<BuildStatus>()
            .map_err(|e| anyhow::anyhow!(e))?;

        Ok(BuildRecord {
            id: row.id,
            job_id: row.job_id,
            requester_id: row.requester_id,
            build_number: u64::try_from(row.build_number).context("Negative build number")?,
            status,
            started_at: row.started_at,
            ended_at: row.ended_at,
        })
    }
}
