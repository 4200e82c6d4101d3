//! Job Store: the durable source of truth the resolver falls back to.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::jobs::repo;
use crate::models::job::JobRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Loads a job with all six criteria collections. `Ok(None)` when no job
    /// has this id.
    async fn fetch_job_by_id(&self, job_id: i64) -> Result<Option<JobRecord>, StoreError>;
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn fetch_job_by_id(&self, job_id: i64) -> Result<Option<JobRecord>, StoreError> {
        Ok(repo::fetch_job(&self.pool, job_id).await?)
    }
}
