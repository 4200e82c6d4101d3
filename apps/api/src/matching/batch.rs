//! Batch orchestration: fans a batch of applications out over a bounded
//! worker pool and collects one outcome per application.
//!
//! Each unit resolves the target job and scores the application. Outcomes
//! go through one `mpsc` channel drained by a single collector task; the
//! batch returns only after every unit has finished and the collector has
//! drained. Collection order follows completion order, not input order.
//!
//! A unit that cannot resolve its job is reported as `Unresolved` and never
//! fails the batch.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::matching::criteria::{self, MatchScore};
use crate::matching::resolver::{JobResolver, ResolveError};
use crate::models::application::Application;

const STORE_UNAVAILABLE: &str = "job store unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Matched,
    Unmatched,
    Unresolved,
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationOutcome {
    /// Position of the application in the submitted batch.
    pub index: usize,
    pub name: String,
    pub job_id: i64,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_criteria: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_criteria: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip)]
    pub application: Application,
}

impl ApplicationOutcome {
    fn new(index: usize, application: Application, outcome: Outcome) -> Self {
        Self {
            index,
            name: application.name.clone(),
            job_id: application.job_id,
            outcome,
            matched_criteria: None,
            total_criteria: None,
            reason: None,
            application,
        }
    }

    fn scored(index: usize, application: Application, matched: bool, score: MatchScore) -> Self {
        let outcome = if matched {
            Outcome::Matched
        } else {
            Outcome::Unmatched
        };
        Self {
            matched_criteria: Some(score.matched),
            total_criteria: Some(score.total),
            ..Self::new(index, application, outcome)
        }
    }

    fn unresolved(index: usize, application: Application, reason: String) -> Self {
        Self {
            reason: Some(reason),
            ..Self::new(index, application, Outcome::Unresolved)
        }
    }

    fn cancelled(index: usize, application: Application) -> Self {
        Self::new(index, application, Outcome::Cancelled)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub unresolved: usize,
    pub cancelled: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[ApplicationOutcome]) -> Self {
        outcomes.iter().fold(
            BatchSummary {
                total: outcomes.len(),
                ..Default::default()
            },
            |mut summary, o| {
                match o.outcome {
                    Outcome::Matched => summary.matched += 1,
                    Outcome::Unmatched => summary.unmatched += 1,
                    Outcome::Unresolved => summary.unresolved += 1,
                    Outcome::Cancelled => summary.cancelled += 1,
                }
                summary
            },
        )
    }
}

pub struct BatchMatcher {
    resolver: Arc<JobResolver>,
    workers: usize,
}

impl BatchMatcher {
    /// `workers` bounds how many units run at once; at least one always runs.
    pub fn new(resolver: Arc<JobResolver>, workers: usize) -> Self {
        Self {
            resolver,
            workers: workers.max(1),
        }
    }

    /// Runs the whole batch and returns one outcome per application, in
    /// completion order.
    ///
    /// Once `cancel` fires no further units start and in-flight units stop
    /// waiting on the resolver; those applications come back as `Cancelled`.
    pub async fn process(
        &self,
        applications: Vec<Application>,
        cancel: CancellationToken,
    ) -> Vec<ApplicationOutcome> {
        let total = applications.len();
        let (tx, mut rx) = mpsc::channel::<ApplicationOutcome>(self.workers);

        let collector = tokio::spawn(async move {
            let mut outcomes = Vec::with_capacity(total);
            while let Some(outcome) = rx.recv().await {
                outcomes.push(outcome);
            }
            outcomes
        });

        let permits = Arc::new(Semaphore::new(self.workers));
        let mut units = JoinSet::new();
        let mut queue = applications.into_iter().enumerate();

        while let Some((index, application)) = queue.next() {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                permit = Arc::clone(&permits).acquire_owned() => permit.ok(),
            };

            let Some(permit) = permit else {
                // Nothing more gets spawned; report the rest as cancelled.
                let skipped = std::iter::once((index, application)).chain(queue.by_ref());
                for (index, application) in skipped {
                    let _ = tx
                        .send(ApplicationOutcome::cancelled(index, application))
                        .await;
                }
                break;
            };

            let resolver = Arc::clone(&self.resolver);
            let tx = tx.clone();
            let cancel = cancel.clone();
            units.spawn(async move {
                let _permit = permit;
                let outcome = evaluate(&resolver, index, application, &cancel).await;
                // The collector outlives every sender.
                let _ = tx.send(outcome).await;
            });
        }

        drop(tx);
        while let Some(joined) = units.join_next().await {
            if let Err(e) = joined {
                error!("matching unit aborted: {e}");
            }
        }

        let outcomes = collector.await.unwrap_or_else(|e| {
            error!("outcome collector failed: {e}");
            Vec::new()
        });

        let summary = BatchSummary::from_outcomes(&outcomes);
        info!(
            total = summary.total,
            matched = summary.matched,
            unmatched = summary.unmatched,
            unresolved = summary.unresolved,
            cancelled = summary.cancelled,
            "application batch processed"
        );
        outcomes
    }

    /// The applications that cleared the threshold. Unresolved and cancelled
    /// applications are left out, same as unmatched ones.
    pub async fn matched(
        &self,
        applications: Vec<Application>,
        cancel: CancellationToken,
    ) -> Vec<Application> {
        self.process(applications, cancel)
            .await
            .into_iter()
            .filter(|o| o.outcome == Outcome::Matched)
            .map(|o| o.application)
            .collect()
    }
}

async fn evaluate(
    resolver: &JobResolver,
    index: usize,
    application: Application,
    cancel: &CancellationToken,
) -> ApplicationOutcome {
    let resolved = tokio::select! {
        biased;
        _ = cancel.cancelled() => return ApplicationOutcome::cancelled(index, application),
        resolved = resolver.resolve(application.job_id) => resolved,
    };

    match resolved {
        Ok(job) => {
            let matched = criteria::matches(&application, &job);
            let score = criteria::score(&application.criteria, &job);
            ApplicationOutcome::scored(index, application, matched, score)
        }
        Err(e) => {
            warn!(
                job_id = application.job_id,
                applicant = %application.name,
                "application unresolved: {e}"
            );
            ApplicationOutcome::unresolved(index, application, public_reason(&e))
        }
    }
}

/// Reason shown to callers. Store failures stay in the log.
fn public_reason(err: &ResolveError) -> String {
    match err {
        ResolveError::NotFound(_) => err.to_string(),
        ResolveError::Store(_) => STORE_UNAVAILABLE.to_string(),
    }
}
