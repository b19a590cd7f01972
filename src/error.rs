use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

/// Failure kinds surfaced by the service layer. Each maps to one status code;
/// everything the client sees goes through `IntoResponse` below.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{field} already in use")]
    DuplicateIdentity { field: &'static str },

    #[error("Incorrect email/username or password")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid id format")]
    InvalidId,

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::DuplicateIdentity { field } => {
                let msg = match *field {
                    "email" => "Email already registered",
                    _ => "Username already taken",
                };
                (StatusCode::CONFLICT, msg.to_string())
            }
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::InvalidId => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Database(e) => {
                error!(error = %e, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn error_kinds_map_to_expected_status_codes() {
        assert_eq!(
            status_of(ApiError::Validation("too short".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::DuplicateIdentity { field: "email" }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApiError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(ApiError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(ApiError::Forbidden("You can only update your own blogs")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_of(ApiError::NotFound("Blog")), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ApiError::InvalidId), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(ApiError::Database(sqlx::Error::PoolClosed)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn duplicate_identity_names_the_colliding_field() {
        let email = ApiError::DuplicateIdentity { field: "email" };
        let username = ApiError::DuplicateIdentity { field: "username" };
        assert_eq!(email.to_string(), "email already in use");
        assert_eq!(username.to_string(), "username already in use");
    }

    #[test]
    fn store_errors_never_leak_detail_to_the_client() {
        let res = ApiError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
