use axum::{extract::State, Json};
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::matching::batch::ApplicationOutcome;
use crate::models::application::Application;
use crate::state::AppState;

fn validate_batch(applications: &[Application]) -> Result<(), AppError> {
    for (index, application) in applications.iter().enumerate() {
        application
            .validate()
            .map_err(|e| AppError::Validation(format!("application {index}: {e}")))?;
    }
    Ok(())
}

/// POST /process/applications
///
/// Returns the subset of submitted applications that match their job.
/// Order is not meaningful. The batch is cancelled if the client goes away.
pub async fn handle_process_applications(
    State(state): State<AppState>,
    user: AuthUser,
    Json(applications): Json<Vec<Application>>,
) -> Result<Json<Vec<Application>>, AppError> {
    validate_batch(&applications)?;
    tracing::debug!(
        "User {} submitted {} applications",
        user.user_id,
        applications.len()
    );

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    let matched = state.matcher.matched(applications, cancel).await;
    Ok(Json(matched))
}

/// POST /process/applications/outcomes
///
/// Same input as above; reports matched / unmatched / unresolved / cancelled
/// for every application instead of filtering.
pub async fn handle_application_outcomes(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(applications): Json<Vec<Application>>,
) -> Result<Json<Vec<ApplicationOutcome>>, AppError> {
    validate_batch(&applications)?;

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    let mut outcomes = state.matcher.process(applications, cancel).await;
    outcomes.sort_by_key(|o| o.index);
    Ok(Json(outcomes))
}
