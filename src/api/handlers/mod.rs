//! Route handlers for the load target API.
//!
//! Every failure a handler can produce is a [`ServiceError`]; all of them map
//! to a plain-text `400` so nothing escapes as a `5xx`.

pub mod auth;
pub mod multi;
pub mod new_user;
pub mod not_found;

pub use self::auth::auth;
pub use self::multi::multi;
pub use self::new_user::new_user;
pub use self::not_found::not_found;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    InsufficientArguments,
    UserExists,
    UnsupportedPassword,
    UnknownUser,
    AuthorizationFailed,
    BadArguments,
}

impl ServiceError {
    #[must_use]
    pub const fn body(self) -> &'static str {
        match self {
            Self::InsufficientArguments => "Creating a new user failed -> Insufficient arguments\n",
            Self::UserExists => "Creating a new user failed -> User already exists\n",
            Self::UnsupportedPassword => {
                "Creating a new user failed -> Password contains unsupported characters\n"
            }
            Self::UnknownUser => "Unknown User",
            Self::AuthorizationFailed => "Authorization failed!",
            Self::BadArguments => "Server error bad arguments",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.body()).into_response()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn service_errors_are_plain_400() -> Result<()> {
        for error in [
            ServiceError::InsufficientArguments,
            ServiceError::UserExists,
            ServiceError::UnsupportedPassword,
            ServiceError::UnknownUser,
            ServiceError::AuthorizationFailed,
            ServiceError::BadArguments,
        ] {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = to_bytes(response.into_body(), usize::MAX).await?;
            assert_eq!(body, error.body().as_bytes());
        }
        Ok(())
    }
}
