use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::auth::AuthUser;
use crate::companies::repo::get_company;
use crate::errors::AppError;
use crate::jobs::repo;
use crate::matching::resolver::ResolveError;
use crate::models::job::{JobCreated, JobRecord, NewJobRequest};
use crate::state::AppState;

/// POST /companies/:company_id/jobs
pub async fn handle_post_job(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(company_id): Path<i64>,
    Json(req): Json<NewJobRequest>,
) -> Result<Json<JobCreated>, AppError> {
    req.validate()?;

    if get_company(&state.db, company_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Company {company_id} not found")));
    }

    let id = repo::insert_job(&state.db, company_id, &req).await?;
    Ok(Json(JobCreated { id }))
}

/// GET /companies/:company_id/jobs
pub async fn handle_list_company_jobs(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(company_id): Path<i64>,
) -> Result<Json<Vec<JobRecord>>, AppError> {
    Ok(Json(repo::list_jobs_for_company(&state.db, company_id).await?))
}

/// GET /jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<JobRecord>>, AppError> {
    Ok(Json(repo::list_jobs(&state.db).await?))
}

/// GET /jobs/:job_id
///
/// Served through the resolver, so repeated reads hit the job cache.
pub async fn handle_get_job(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(job_id): Path<i64>,
) -> Result<Json<JobRecord>, AppError> {
    match state.resolver.resolve(job_id).await {
        Ok(job) => Ok(Json(job)),
        Err(ResolveError::NotFound(id)) => Err(AppError::NotFound(format!("Job {id} not found"))),
        Err(ResolveError::Store(e)) => Err(AppError::Internal(e.into())),
    }
}
