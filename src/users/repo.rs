use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub created_at: OffsetDateTime,
}

/// Insert a new user. Uniqueness of email and username is enforced by the
/// store's unique indexes; the violated constraint tells us which field
/// collided, so a concurrent insert racing past the service-level pre-check
/// still fails cleanly.
pub async fn create(
    db: &PgPool,
    email: &str,
    username: &str,
    password_hash: &str,
) -> Result<User, ApiError> {
    let res = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, username, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, email, username, password_hash, created_at
        "#,
    )
    .bind(email)
    .bind(username)
    .bind(password_hash)
    .fetch_one(db)
    .await;

    match res {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(ApiError::DuplicateIdentity {
                field: duplicate_field(e.constraint()),
            })
        }
        Err(e) => Err(e.into()),
    }
}

fn duplicate_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(c) if c.contains("username") => "username",
        _ => "email",
    }
}

pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, username, password_hash, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await
}

pub async fn find_by_username(db: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, username, password_hash, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, username, password_hash, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn list(
    db: &PgPool,
    username: Option<&str>,
    skip: i64,
    limit: i64,
) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, username, password_hash, created_at
        FROM users
        WHERE ($1::text IS NULL OR username = $1)
        ORDER BY created_at
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(username)
    .bind(limit)
    .bind(skip)
    .fetch_all(db)
    .await
}

/// Batch lookup of usernames for author display. Ids absent from the result
/// are dangling references and render as "Unknown" at the call site.
pub async fn usernames_by_ids(
    db: &PgPool,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, String>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = sqlx::query_as::<_, (Uuid, String)>(
        r#"
        SELECT id, username
        FROM users
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_field_maps_constraint_names() {
        assert_eq!(duplicate_field(Some("users_email_key")), "email");
        assert_eq!(duplicate_field(Some("users_username_key")), "username");
        // Unknown constraints default to the field checked first.
        assert_eq!(duplicate_field(None), "email");
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@example.com".into(),
            username: "alice".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }
}
