use sqlx::PgPool;
use tracing::info;

use crate::models::job::{CriterionKind, JobRecord, JobRow, NewJobRequest};

/// Job columns plus every criteria collection, aggregated per job so a single
/// statement loads the full record.
const JOB_SELECT: &str = r#"
    SELECT j.id, j.company_id, j.job_title, j.salary, j.budget, j.job_description,
           j.min_notice_period, j.max_notice_period, j.min_experience, j.max_experience,
           j.created_at,
           ARRAY(SELECT c.criterion_id FROM job_criteria c
                 WHERE c.job_id = j.id AND c.kind = 'location' ORDER BY 1) AS location_ids,
           ARRAY(SELECT c.criterion_id FROM job_criteria c
                 WHERE c.job_id = j.id AND c.kind = 'skill' ORDER BY 1) AS skill_ids,
           ARRAY(SELECT c.criterion_id FROM job_criteria c
                 WHERE c.job_id = j.id AND c.kind = 'qualification' ORDER BY 1) AS qualification_ids,
           ARRAY(SELECT c.criterion_id FROM job_criteria c
                 WHERE c.job_id = j.id AND c.kind = 'shift' ORDER BY 1) AS shift_ids,
           ARRAY(SELECT c.criterion_id FROM job_criteria c
                 WHERE c.job_id = j.id AND c.kind = 'work_mode' ORDER BY 1) AS work_mode_ids,
           ARRAY(SELECT c.criterion_id FROM job_criteria c
                 WHERE c.job_id = j.id AND c.kind = 'job_type' ORDER BY 1) AS job_type_ids
    FROM jobs j
"#;

/// Inserts a job and its criteria in one transaction. Returns the new job id.
pub async fn insert_job(
    pool: &PgPool,
    company_id: i64,
    req: &NewJobRequest,
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let job_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO jobs
            (company_id, job_title, salary, budget, job_description,
             min_notice_period, max_notice_period, min_experience, max_experience)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(company_id)
    .bind(&req.job_title)
    .bind(&req.salary)
    .bind(req.budget)
    .bind(&req.job_description)
    .bind(req.min_notice_period)
    .bind(req.max_notice_period)
    .bind(req.min_experience)
    .bind(req.max_experience)
    .fetch_one(&mut *tx)
    .await?;

    for kind in CriterionKind::ALL {
        let ids: Vec<i64> = req.criteria(kind).iter().copied().collect();
        if ids.is_empty() {
            continue;
        }
        sqlx::query(
            "INSERT INTO job_criteria (job_id, kind, criterion_id) SELECT $1, $2, UNNEST($3::BIGINT[])",
        )
        .bind(job_id)
        .bind(kind.as_str())
        .bind(&ids)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!("Inserted job {job_id} for company {company_id}");
    Ok(job_id)
}

pub async fn fetch_job(pool: &PgPool, job_id: i64) -> Result<Option<JobRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, JobRow>(&format!("{JOB_SELECT} WHERE j.id = $1"))
        .bind(job_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(JobRecord::from))
}

pub async fn list_jobs_for_company(
    pool: &PgPool,
    company_id: i64,
) -> Result<Vec<JobRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, JobRow>(&format!(
        "{JOB_SELECT} WHERE j.company_id = $1 ORDER BY j.id"
    ))
    .bind(company_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(JobRecord::from).collect())
}

pub async fn list_jobs(pool: &PgPool) -> Result<Vec<JobRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, JobRow>(&format!("{JOB_SELECT} ORDER BY j.id"))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(JobRecord::from).collect())
}
