//! Cache Lookup: a best-effort, time-bounded key/value store.
//!
//! Two backends: Redis (deployment) and an in-process map (single node,
//! tests). Expiry is the backend's job; callers only ever see a miss.

mod memory;
mod redis_cache;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryCache;
pub use redis_cache::RedisCache;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the stored value, or `None` on a miss or an expired entry.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Removes the entry if and only if it currently holds `expected`, as one
    /// atomic step. Returns whether it was removed, so at most one caller
    /// can win a given value.
    async fn consume(&self, key: &str, expected: &str) -> Result<bool, CacheError>;
}

pub fn job_key(job_id: i64) -> String {
    format!("job:{job_id}")
}

pub fn otp_key(email: &str) -> String {
    format!("otp:{}", email.to_lowercase())
}
