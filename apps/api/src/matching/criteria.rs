//! Criteria matching: pure comparison of one application against one job.
//!
//! Seven independent checks, one point each:
//! 1. notice period within `[min_notice_period, max_notice_period]`
//! 2. experience within `[min_experience, max_experience]`
//! 3. locations intersect
//! 4. skills intersect
//! 5. qualifications intersect
//! 6. shifts intersect
//! 7. job types intersect
//!
//! An application matches when `matched * 2 >= total`, i.e. 4 of 7.
//! Work modes are carried on both sides but are not scored.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::application::{Application, ApplicationCriteria};
use crate::models::job::JobRecord;

pub const TOTAL_CRITERIA: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchScore {
    pub matched: u32,
    pub total: u32,
}

impl MatchScore {
    /// Ties go to acceptance: exactly half is a match.
    pub fn is_match(&self) -> bool {
        self.matched * 2 >= self.total
    }
}

pub fn score(candidate: &ApplicationCriteria, job: &JobRecord) -> MatchScore {
    let checks = [
        (job.min_notice_period..=job.max_notice_period).contains(&candidate.notice_period),
        candidate.experience >= job.min_experience && candidate.experience <= job.max_experience,
        intersects(&candidate.location_ids, &job.location_ids),
        intersects(&candidate.skill_ids, &job.skill_ids),
        intersects(&candidate.qualification_ids, &job.qualification_ids),
        intersects(&candidate.shift_ids, &job.shift_ids),
        intersects(&candidate.job_type_ids, &job.job_type_ids),
    ];

    MatchScore {
        matched: checks.iter().filter(|passed| **passed).count() as u32,
        total: TOTAL_CRITERIA,
    }
}

/// The match decision for one application against its job.
pub fn matches(application: &Application, job: &JobRecord) -> bool {
    score(&application.criteria, job).is_match()
}

/// One shared id is enough; an empty side never intersects.
fn intersects(candidate: &BTreeSet<i64>, required: &BTreeSet<i64>) -> bool {
    !candidate.is_disjoint(required)
}
