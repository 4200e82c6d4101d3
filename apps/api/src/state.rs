use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::TokenKeys;
use crate::cache::Cache;
use crate::config::Config;
use crate::jobs::store::PgJobStore;
use crate::matching::batch::BatchMatcher;
use crate::matching::resolver::JobResolver;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Job entries and password reset codes.
    pub cache: Arc<dyn Cache>,
    pub resolver: Arc<JobResolver>,
    pub matcher: Arc<BatchMatcher>,
    pub tokens: TokenKeys,
    pub config: Config,
}

impl AppState {
    /// Wires the resolver and the batch matcher over the Postgres job store.
    pub fn new(db: PgPool, cache: Arc<dyn Cache>, config: Config) -> Self {
        let store = Arc::new(PgJobStore::new(db.clone()));
        let resolver = Arc::new(JobResolver::new(
            Arc::clone(&cache),
            store,
            config.job_cache_ttl,
        ));
        let matcher = Arc::new(BatchMatcher::new(
            Arc::clone(&resolver),
            config.match_workers,
        ));
        let tokens = TokenKeys::new(&config.jwt_secret, config.token_ttl);

        Self {
            db,
            cache,
            resolver,
            matcher,
            tokens,
            config,
        }
    }
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
