use std::time::Duration;

use axum::{extract::State, Json};
use rand::{distr::Alphanumeric, Rng};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::accounts::repo;
use crate::auth::password::{hash_password, verify_dummy_password, verify_password, HASH_COST};
use crate::cache::{otp_key, Cache};
use crate::errors::{is_unique_violation, AppError};
use crate::models::user::{ForgotPassword, Login, NewUser, ResetPassword, User};
use crate::state::AppState;

const OTP_LENGTH: usize = 6;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<NewUser>,
) -> Result<Json<User>, AppError> {
    req.validate()?;

    let password_hash = hash_password(&req.password, HASH_COST).await?;
    let user = repo::create_user(&state.db, &req.name, &req.dob, &req.email, &password_hash)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("An account for {} already exists", req.email))
            } else {
                AppError::Database(e)
            }
        })?;

    info!("Registered user {}", user.id);
    Ok(Json(user))
}

/// POST /login
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<Login>,
) -> Result<Json<TokenResponse>, AppError> {
    req.validate()?;

    let Some(user) = repo::find_user_by_email(&state.db, &req.email).await? else {
        // Same bcrypt cost as a real account.
        verify_dummy_password(&req.password).await?;
        return Err(AppError::Unauthorized(format!(
            "unknown email {}",
            req.email
        )));
    };

    if !verify_password(&req.password, &user.password_hash).await? {
        return Err(AppError::Unauthorized(format!(
            "wrong password for user {}",
            user.id
        )));
    }

    let token = state
        .tokens
        .issue(user.id)
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(Json(TokenResponse { token }))
}

/// POST /forgot-password
///
/// Issues a one-time reset code for the account, valid for `OTP_TTL_SECS`.
/// A newer code replaces an older one. The response does not reveal whether
/// the email and dob matched an account.
pub async fn handle_forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPassword>,
) -> Result<Json<Value>, AppError> {
    req.validate()?;

    let ack = Json(json!({ "message": "if the account exists a reset code was issued" }));

    let Some(user) = repo::find_user_by_email(&state.db, &req.email)
        .await?
        .filter(|user| user.dob == req.dob)
    else {
        debug!("No account matches reset request for {}", req.email);
        return Ok(ack);
    };

    issue_reset_code(state.cache.as_ref(), &user, state.config.otp_ttl).await;
    Ok(ack)
}

/// POST /reset-password
///
/// A code works once; a wrong guess leaves it in place until it expires.
pub async fn handle_reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPassword>,
) -> Result<Json<Value>, AppError> {
    req.validate()?;

    if req.password != req.confirm_password {
        return Err(AppError::Validation(
            "password and confirm_password do not match".into(),
        ));
    }

    // Consumed before any slow work so two requests cannot share one code.
    let consumed = state
        .cache
        .consume(&otp_key(&req.email), &req.otp)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if !consumed {
        return Err(AppError::Unauthorized(format!(
            "reset code mismatch for {}",
            req.email
        )));
    }

    let user = repo::find_user_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| AppError::NotFound("No account matches that email".into()))?;

    let password_hash = hash_password(&req.password, HASH_COST).await?;
    if !repo::update_password_hash(&state.db, user.id, &password_hash).await? {
        return Err(AppError::NotFound(format!("User {} not found", user.id)));
    }

    info!("Password updated for user {}", user.id);
    Ok(Json(json!({ "message": "password updated" })))
}

/// Stores a fresh code for `user`. A cache failure is logged, never surfaced,
/// so the caller's response does not depend on it.
async fn issue_reset_code(cache: &dyn Cache, user: &User, ttl: Duration) -> Option<String> {
    let otp = generate_otp();
    if let Err(e) = cache.put(&otp_key(&user.email), &otp, ttl).await {
        warn!("Could not store reset code for user {}: {e}", user.id);
        return None;
    }

    // No delivery channel; operators read the code from the log.
    debug!("Reset code for user {}: {otp}", user.id);
    info!("Issued password reset code for user {}", user.id);
    Some(otp)
}

fn generate_otp() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(OTP_LENGTH)
        .map(char::from)
        .collect()
}
