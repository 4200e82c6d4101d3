//! Fixtures and store doubles shared by the matching tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::jobs::store::{JobStore, StoreError};
use crate::models::application::{Application, ApplicationCriteria};
use crate::models::job::JobRecord;

fn ids(values: &[i64]) -> BTreeSet<i64> {
    values.iter().copied().collect()
}

/// notice 10..=60, experience 2.0..=6.0, locations {1,2}, skills {1},
/// qualifications {1}, shifts {2}, job types {1}.
pub fn reference_job(id: i64) -> JobRecord {
    JobRecord {
        id,
        company_id: 1,
        job_title: "backend engineer".to_string(),
        salary: "10,000".to_string(),
        budget: 12_000.0,
        job_description: "build services".to_string(),
        min_notice_period: 10,
        max_notice_period: 60,
        min_experience: 2.0,
        max_experience: 6.0,
        created_at: Utc::now(),
        location_ids: ids(&[1, 2]),
        skill_ids: ids(&[1]),
        qualification_ids: ids(&[1]),
        shift_ids: ids(&[2]),
        work_mode_ids: ids(&[1]),
        job_type_ids: ids(&[1]),
    }
}

/// Satisfies all seven checks against [`reference_job`].
pub fn perfect_candidate() -> ApplicationCriteria {
    ApplicationCriteria {
        notice_period: 25,
        experience: 2.5,
        location_ids: ids(&[1]),
        skill_ids: ids(&[1]),
        qualification_ids: ids(&[1]),
        shift_ids: ids(&[2]),
        work_mode_ids: ids(&[1]),
        job_type_ids: ids(&[1]),
    }
}

/// Satisfies none of the checks against [`reference_job`].
pub fn hopeless_candidate() -> ApplicationCriteria {
    ApplicationCriteria {
        notice_period: 90,
        experience: 20.0,
        location_ids: ids(&[9]),
        skill_ids: ids(&[9]),
        qualification_ids: ids(&[9]),
        shift_ids: ids(&[9]),
        work_mode_ids: ids(&[9]),
        job_type_ids: ids(&[9]),
    }
}

pub fn application(name: &str, job_id: i64, criteria: ApplicationCriteria) -> Application {
    Application {
        name: name.to_string(),
        job_id,
        criteria,
    }
}

/// Job store double that counts lookups and tracks peak concurrency.
#[derive(Default)]
pub struct InMemoryStore {
    jobs: Mutex<HashMap<i64, JobRecord>>,
    latency: Option<Duration>,
    fail: bool,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
}

impl InMemoryStore {
    pub fn with_jobs(jobs: impl IntoIterator<Item = JobRecord>) -> Self {
        let store = Self::default();
        {
            let mut map = store.jobs.lock().unwrap();
            for job in jobs {
                map.insert(job.id, job);
            }
        }
        store
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobStore for InMemoryStore {
    async fn fetch_job_by_id(&self, job_id: i64) -> Result<Option<JobRecord>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.fail {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.jobs.lock().unwrap().get(&job_id).cloned())
    }
}
