use anyhow::Result;
use tokio::sync::OnceCell;

/// Cost used for stored hashes.
pub const HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// Hashes a password on the blocking pool; bcrypt is deliberately slow.
pub async fn hash_password(password: &str, cost: u32) -> Result<String> {
    if password.is_empty() {
        anyhow::bail!("password cannot be empty");
    }
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

/// Returns `false` for a wrong password and for a malformed stored hash.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await?;
    Ok(verified.unwrap_or(false))
}

static DUMMY_HASH: OnceCell<String> = OnceCell::const_new();

/// Verifies against a throwaway hash and discards the result. Used when no
/// account exists, so the response takes as long as a real check.
pub async fn verify_dummy_password(password: &str) -> Result<()> {
    let hash = DUMMY_HASH
        .get_or_try_init(|| hash_password("no-such-account", HASH_COST))
        .await?;
    verify_password(password, hash).await?;
    Ok(())
}
