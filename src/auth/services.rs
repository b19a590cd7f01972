use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::auth::dto::RegisterRequest;
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::error::ApiError;
use crate::users::repo::{self, User};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
    }
    let len = username.chars().count();
    (3..=50).contains(&len) && USERNAME_RE.is_match(username)
}

fn validate_registration(req: &RegisterRequest) -> Result<(), ApiError> {
    if !is_valid_email(&req.email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if !is_valid_username(&req.username) {
        return Err(ApiError::Validation(
            "Username must be 3-50 characters of letters, numbers, and underscores".into(),
        ));
    }
    if req.password.chars().count() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}

/// Registers a new user. The duplicate pre-checks keep the email-before-
/// username error ordering; the insert itself is the authoritative uniqueness
/// check and catches concurrent registrations the pre-checks miss.
pub async fn register_user(db: &PgPool, req: RegisterRequest) -> Result<User, ApiError> {
    validate_registration(&req)?;

    if repo::find_by_email(db, &req.email).await?.is_some() {
        warn!(email = %req.email, "email already registered");
        return Err(ApiError::DuplicateIdentity { field: "email" });
    }
    if repo::find_by_username(db, &req.username).await?.is_some() {
        warn!(username = %req.username, "username already taken");
        return Err(ApiError::DuplicateIdentity { field: "username" });
    }

    let hash = hash_password(&req.password)?;
    repo::create(db, &req.email, &req.username, &hash).await
}

/// Authenticates by email or username (email tried first) and issues a token.
/// An unknown identifier and a wrong password are indistinguishable.
pub async fn login(
    db: &PgPool,
    keys: &JwtKeys,
    identifier: &str,
    password: &str,
) -> Result<String, ApiError> {
    let user = match repo::find_by_email(db, identifier).await? {
        Some(u) => Some(u),
        None => repo::find_by_username(db, identifier).await?,
    };

    let Some(user) = user else {
        warn!("login with unknown identifier");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash) {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    Ok(keys.sign(user.id)?)
}

/// Resolves a validated token subject to a live user. A subject that no
/// longer exists is an authentication failure, not a missing resource.
pub async fn resolve_identity(db: &PgPool, user_id: Uuid) -> Result<User, ApiError> {
    repo::find_by_id(db, user_id)
        .await?
        .ok_or(ApiError::Unauthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses_and_rejects_junk() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("user@nodot"));
    }

    #[test]
    fn username_shape_is_enforced() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("a_1_B"));
        assert!(is_valid_username(&"x".repeat(50)));
        assert!(!is_valid_username("ab")); // too short
        assert!(!is_valid_username(&"x".repeat(51))); // too long
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("dash-ed"));
        assert!(!is_valid_username(""));
    }

    fn req(email: &str, username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    #[test]
    fn registration_validation_covers_each_field() {
        assert!(validate_registration(&req("a@b.co", "alice", "secret1")).is_ok());
        assert!(matches!(
            validate_registration(&req("bad", "alice", "secret1")),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            validate_registration(&req("a@b.co", "a", "secret1")),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            validate_registration(&req("a@b.co", "alice", "short")),
            Err(ApiError::Validation(_))
        ));
    }
}
