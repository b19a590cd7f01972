use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::repo::User;

/// Public part of a user returned to clients.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    pub username: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

impl ListUsersParams {
    /// Clamps pagination to sane bounds: skip >= 0, 1 <= limit <= 100.
    pub fn page(&self) -> (i64, i64) {
        (self.skip.max(0), self.limit.clamp(1, 100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_is_clamped() {
        let p: ListUsersParams = serde_json::from_str(r#"{"skip": -5, "limit": 1000}"#).unwrap();
        assert_eq!(p.page(), (0, 100));
        let p: ListUsersParams = serde_json::from_str(r#"{"limit": 0}"#).unwrap();
        assert_eq!(p.page(), (0, 1));
        let p: ListUsersParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p.page(), (0, 10));
    }

    #[test]
    fn user_response_carries_no_credential_material() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@example.com".into(),
            username: "alice".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(json.contains("alice"));
        assert!(!json.contains("argon2id"));
    }
}
