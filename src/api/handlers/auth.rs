use super::ServiceError;
use crate::api::{ServerContext, params::QueryParams};
use crate::directory::{obfuscate, sanitize};
use axum::extract::Extension;
use std::sync::Arc;
use tracing::{debug, instrument};

#[utoipa::path(
    method(get, post, put, delete, patch, options, trace),
    path = "/auth",
    params(
        ("username" = Option<String>, Query, description = "Username; `!@#$%^&*` are stripped"),
        ("password" = Option<String>, Query, description = "Password to check"),
    ),
    responses (
        (status = 200, description = "Authorized; body holds the running authorization count and a millisecond timestamp", body = String, content_type = "text/plain"),
        (status = 400, description = "Unknown user or wrong password", body = String, content_type = "text/plain"),
    ),
    tag = "users",
)]
// No lockout, no rate limiting and no constant-time comparison.
#[instrument(skip(ctx, params))]
pub async fn auth(
    Extension(ctx): Extension<Arc<ServerContext>>,
    params: QueryParams,
) -> Result<String, ServiceError> {
    let username = sanitize(params.value_or_empty("username"));
    let password = params.value_or_empty("password");

    if username.is_empty() || password.is_empty() {
        return Err(ServiceError::UnknownUser);
    }

    let Some(stored) = ctx.directory().get(&username) else {
        return Err(ServiceError::UnknownUser);
    };

    match obfuscate(password) {
        Ok(supplied) if supplied == stored => {
            let authorization = ctx.record_authorization();
            debug!(
                username = %username,
                count = authorization.count,
                "Authorized user"
            );
            Ok(format!(
                "{:>7} This user was authorized at {}\n",
                authorization.count, authorization.timestamp_ms
            ))
        }
        _ => Err(ServiceError::AuthorizationFailed),
    }
}
