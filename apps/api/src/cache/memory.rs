use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::{Cache, CacheError};

/// In-process cache with per-entry expiry. Expired entries are dropped on
/// read and swept on every write.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, (String, Instant)>>, CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Unavailable("memory cache lock poisoned".to_string()))
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.lock()?;
        let expired = match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => {
                return Ok(Some(value.clone()))
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        // Keys that are never read again would otherwise stay forever.
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }

    async fn consume(&self, key: &str, expected: &str) -> Result<bool, CacheError> {
        let mut entries = self.lock()?;
        let live_match = matches!(
            entries.get(key),
            Some((value, expires_at)) if value == expected && *expires_at > Instant::now()
        );
        if live_match {
            entries.remove(key);
        }
        Ok(live_match)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_put_then_get_hits() {
        let cache = MemoryCache::new();
        cache.put("job:1", "{}", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get("job:1").await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new();
        cache.put("job:1", "{}", Duration::from_secs(900)).await.unwrap();

        tokio::time::advance(Duration::from_secs(899)).await;
        assert!(cache.get("job:1").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("job:1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_consume_removes_only_a_matching_value() {
        let cache = MemoryCache::new();
        cache.put("otp:a@b.c", "x1y2z3", Duration::from_secs(60)).await.unwrap();

        assert!(!cache.consume("otp:a@b.c", "wrong1").await.unwrap());
        assert!(cache.get("otp:a@b.c").await.unwrap().is_some());

        assert!(cache.consume("otp:a@b.c", "x1y2z3").await.unwrap());
        assert!(cache.get("otp:a@b.c").await.unwrap().is_none());
        assert!(!cache.consume("otp:a@b.c", "x1y2z3").await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_consumers_have_one_winner() {
        let cache = Arc::new(MemoryCache::new());
        cache.put("otp:a@b.c", "x1y2z3", Duration::from_secs(60)).await.unwrap();

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.consume("otp:a@b.c", "x1y2z3").await.unwrap() })
            })
            .collect();

        let mut winners = 0;
        for attempt in attempts {
            if attempt.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_code_cannot_be_consumed() {
        let cache = MemoryCache::new();
        cache.put("otp:a@b.c", "x1y2z3", Duration::from_secs(300)).await.unwrap();
        tokio::time::advance(Duration::from_secs(301)).await;
        assert!(!cache.consume("otp:a@b.c", "x1y2z3").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_sweeps_expired_entries() {
        let cache = MemoryCache::new();
        cache.put("job:1", "{}", Duration::from_secs(10)).await.unwrap();
        cache.put("job:2", "{}", Duration::from_secs(60)).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;
        cache.put("job:3", "{}", Duration::from_secs(60)).await.unwrap();

        let entries = cache.entries.lock().unwrap();
        assert!(!entries.contains_key("job:1"));
        assert_eq!(entries.len(), 2);
    }
}
