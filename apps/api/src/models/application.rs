use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A submitted application targeting one job.
///
/// Applications only live for the duration of one batch call; they are
/// filtered, never mutated or stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Application {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Identifier of the job applied to.
    pub job_id: i64,
    #[validate(nested)]
    pub criteria: ApplicationCriteria,
}

/// What the candidate brings, shaped like a job's criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ApplicationCriteria {
    #[validate(range(min = 0, message = "notice_period cannot be negative"))]
    pub notice_period: i32,
    #[validate(range(min = 0.0, message = "experience cannot be negative"))]
    pub experience: f64,
    #[serde(default)]
    pub location_ids: BTreeSet<i64>,
    #[serde(default)]
    pub skill_ids: BTreeSet<i64>,
    #[serde(default)]
    pub qualification_ids: BTreeSet<i64>,
    #[serde(default)]
    pub shift_ids: BTreeSet<i64>,
    #[serde(default)]
    pub work_mode_ids: BTreeSet<i64>,
    #[serde(default)]
    pub job_type_ids: BTreeSet<i64>,
}
