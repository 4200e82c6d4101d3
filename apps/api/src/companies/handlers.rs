use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::companies::repo;
use crate::errors::AppError;
use crate::models::company::{Company, NewCompany};
use crate::state::AppState;

/// POST /companies
pub async fn handle_create_company(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<NewCompany>,
) -> Result<Json<Company>, AppError> {
    req.validate()?;
    let company = repo::create_company(&state.db, &req).await?;
    info!(
        "User {} created company {} ({})",
        user.user_id, company.id, company.company_name
    );
    Ok(Json(company))
}

/// GET /companies
pub async fn handle_list_companies(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<Company>>, AppError> {
    Ok(Json(repo::list_companies(&state.db).await?))
}

/// GET /companies/:company_id
pub async fn handle_get_company(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(company_id): Path<i64>,
) -> Result<Json<Company>, AppError> {
    let company = repo::get_company(&state.db, company_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Company {company_id} not found")))?;
    Ok(Json(company))
}
