use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// The six ID collections a job (and an application) is described by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionKind {
    Location,
    Skill,
    Qualification,
    Shift,
    WorkMode,
    JobType,
}

impl CriterionKind {
    pub const ALL: [CriterionKind; 6] = [
        CriterionKind::Location,
        CriterionKind::Skill,
        CriterionKind::Qualification,
        CriterionKind::Shift,
        CriterionKind::WorkMode,
        CriterionKind::JobType,
    ];

    /// Value stored in `job_criteria.kind`.
    pub fn as_str(self) -> &'static str {
        match self {
            CriterionKind::Location => "location",
            CriterionKind::Skill => "skill",
            CriterionKind::Qualification => "qualification",
            CriterionKind::Shift => "shift",
            CriterionKind::WorkMode => "work_mode",
            CriterionKind::JobType => "job_type",
        }
    }
}

/// Flat row produced by the job store query; criteria arrive as arrays.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub company_id: i64,
    pub job_title: String,
    pub salary: String,
    pub budget: f64,
    pub job_description: String,
    pub min_notice_period: i32,
    pub max_notice_period: i32,
    pub min_experience: f64,
    pub max_experience: f64,
    pub created_at: DateTime<Utc>,
    pub location_ids: Vec<i64>,
    pub skill_ids: Vec<i64>,
    pub qualification_ids: Vec<i64>,
    pub shift_ids: Vec<i64>,
    pub work_mode_ids: Vec<i64>,
    pub job_type_ids: Vec<i64>,
}

/// A job posting with all of its criteria collections loaded.
///
/// This is also the cached representation: the resolver stores it as JSON
/// under the job id. Callers must supply `min <= max` for both ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: i64,
    pub company_id: i64,
    pub job_title: String,
    pub salary: String,
    pub budget: f64,
    pub job_description: String,
    pub min_notice_period: i32,
    pub max_notice_period: i32,
    pub min_experience: f64,
    pub max_experience: f64,
    pub created_at: DateTime<Utc>,
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

impl From<JobRow> for JobRecord {
    fn from(row: JobRow) -> Self {
        JobRecord {
            id: row.id,
            company_id: row.company_id,
            job_title: row.job_title,
            salary: row.salary,
            budget: row.budget,
            job_description: row.job_description,
            min_notice_period: row.min_notice_period,
            max_notice_period: row.max_notice_period,
            min_experience: row.min_experience,
            max_experience: row.max_experience,
            created_at: row.created_at,
            location_ids: row.location_ids.into_iter().collect(),
            skill_ids: row.skill_ids.into_iter().collect(),
            qualification_ids: row.qualification_ids.into_iter().collect(),
            shift_ids: row.shift_ids.into_iter().collect(),
            work_mode_ids: row.work_mode_ids.into_iter().collect(),
            job_type_ids: row.job_type_ids.into_iter().collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_job_ranges"))]
pub struct NewJobRequest {
    #[validate(length(min = 1, message = "job_title is required"))]
    pub job_title: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "budget cannot be negative"))]
    pub budget: f64,
    #[serde(default)]
    pub job_description: String,
    #[validate(range(min = 0, message = "min_notice_period cannot be negative"))]
    pub min_notice_period: i32,
    pub max_notice_period: i32,
    #[validate(range(min = 0.0, message = "min_experience cannot be negative"))]
    pub min_experience: f64,
    pub max_experience: f64,
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

impl NewJobRequest {
    pub fn criteria(&self, kind: CriterionKind) -> &BTreeSet<i64> {
        match kind {
            CriterionKind::Location => &self.location_ids,
            CriterionKind::Skill => &self.skill_ids,
            CriterionKind::Qualification => &self.qualification_ids,
            CriterionKind::Shift => &self.shift_ids,
            CriterionKind::WorkMode => &self.work_mode_ids,
            CriterionKind::JobType => &self.job_type_ids,
        }
    }
}

fn validate_job_ranges(req: &NewJobRequest) -> Result<(), ValidationError> {
    if req.min_notice_period > req.max_notice_period {
        let mut err = ValidationError::new("notice_period_range");
        err.message = Some("min_notice_period must not exceed max_notice_period".into());
        return Err(err);
    }
    if req.min_experience > req.max_experience {
        let mut err = ValidationError::new("experience_range");
        err.message = Some("min_experience must not exceed max_experience".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobCreated {
    pub id: i64,
}
