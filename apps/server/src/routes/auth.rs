//! Login endpoint.
//!
//! Email/password sign-in. A successful login returns a session token;
//! the screens send it as a bearer header on every other request.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Seconds until the token expires; the screens schedule re-login.
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
}

/// POST /api/auth/login
///
/// The response never distinguishes "no such account" from "wrong
/// password".
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let email = request.email.trim().to_lowercase();

    let user = state
        .db
        .users()
        .find_by_email(&email)
        .await?
        .ok_or_else(|| {
            warn!(email = %email, "Login attempt for unknown account");
            ApiError::unauthorized("Invalid email or password")
        })?;

    if !verify_password(&request.password, &user.password_hash)? {
        warn!(email = %email, "Login attempt with wrong password");
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = state.jwt.generate_token(&user.id, &user.email)?;

    info!(email = %email, "Login successful");

    Ok(Json(LoginResponse {
        token,
        expires_in: state.jwt.lifetime_secs(),
        user: UserInfo {
            id: user.id,
            email: user.email,
        },
    }))
}

/// Hashes a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))
}

/// Verifies a password against a stored PHC hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ApiError::internal(format!("Corrupt password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_password("s3cret", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
