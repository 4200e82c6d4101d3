//! Job resolution: a read-through cache in front of the job store.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{job_key, Cache};
use crate::jobs::store::{JobStore, StoreError};
use crate::models::job::JobRecord;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("job {0} does not exist")]
    NotFound(i64),

    #[error("job store lookup failed: {0}")]
    Store(#[from] StoreError),
}

pub struct JobResolver {
    cache: Arc<dyn Cache>,
    store: Arc<dyn JobStore>,
    ttl: Duration,
}

impl JobResolver {
    pub fn new(cache: Arc<dyn Cache>, store: Arc<dyn JobStore>, ttl: Duration) -> Self {
        Self { cache, store, ttl }
    }

    /// Cache first; on a miss (or any cache failure) the store is consulted
    /// and the cache repopulated. Only store failures surface as errors.
    pub async fn resolve(&self, job_id: i64) -> Result<JobRecord, ResolveError> {
        let key = job_key(job_id);

        match self.cache.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<JobRecord>(&raw) {
                Ok(job) => {
                    debug!(job_id, "job cache hit");
                    return Ok(job);
                }
                Err(e) => warn!(job_id, "ignoring undecodable cached job: {e}"),
            },
            Ok(None) => debug!(job_id, "job cache miss"),
            Err(e) => warn!(job_id, "job cache lookup failed, using store: {e}"),
        }

        let job = self
            .store
            .fetch_job_by_id(job_id)
            .await?
            .ok_or(ResolveError::NotFound(job_id))?;

        self.populate(&key, &job).await;
        Ok(job)
    }

    /// Failures here only cost a future cache miss.
    async fn populate(&self, key: &str, job: &JobRecord) {
        let raw = match serde_json::to_string(job) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(job_id = job.id, "could not serialize job for cache: {e}");
                return;
            }
        };
        if let Err(e) = self.cache.put(key, &raw, self.ttl).await {
            warn!(job_id = job.id, "job cache population failed: {e}");
        }
    }
}
