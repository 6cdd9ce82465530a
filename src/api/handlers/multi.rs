use super::ServiceError;
use crate::api::{ServerContext, params::QueryParams};
use axum::extract::Extension;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{debug, instrument};

const PAYLOAD_UNIT: &str = "This is a simple dummy load that is meant to generate some load";
const PAYLOAD_UNIT_REPEAT: usize = 10;

/// Upper bound on a `/multi` body, whatever the configured maximum multiplier.
pub const MAX_RESPONSE_BYTES: usize = 64 * 1024 * 1024;

/// Amplification unit served by `/multi`.
pub static PAYLOAD: Lazy<String> = Lazy::new(|| PAYLOAD_UNIT.repeat(PAYLOAD_UNIT_REPEAT));

#[utoipa::path(
    method(get, post, put, delete, patch, options, trace),
    path = "/multi",
    params(
        ("multiplier" = i64, Query, description = "How many times the payload template is repeated; 0 yields an empty body"),
    ),
    responses (
        (status = 200, description = "Payload template repeated `multiplier` times", body = String, content_type = "text/plain"),
        (status = 400, description = "Multiplier missing, not an integer, negative or above the configured maximum", body = String, content_type = "text/plain"),
    ),
    tag = "load",
)]
#[instrument(skip(ctx, params))]
pub async fn multi(
    Extension(ctx): Extension<Arc<ServerContext>>,
    params: QueryParams,
) -> Result<String, ServiceError> {
    let raw = params.value_or_empty("multiplier");
    let multiplier = raw.parse::<i64>().map_err(|err| {
        debug!("Invalid multiplier {raw:?}: {err}");
        ServiceError::BadArguments
    })?;

    let count = repeat_count(multiplier, ctx.max_multiplier(), PAYLOAD.len()).ok_or_else(|| {
        debug!(
            multiplier,
            max = ctx.max_multiplier(),
            "Multiplier out of range"
        );
        ServiceError::BadArguments
    })?;

    Ok(PAYLOAD.repeat(count))
}

/// Accept `0..=max` as long as the body stays within [`MAX_RESPONSE_BYTES`].
fn repeat_count(multiplier: i64, max: u64, unit_len: usize) -> Option<usize> {
    u64::try_from(multiplier)
        .ok()
        .filter(|count| *count <= max)
        .and_then(|count| usize::try_from(count).ok())
        .filter(|count| {
            unit_len
                .checked_mul(*count)
                .is_some_and(|bytes| bytes <= MAX_RESPONSE_BYTES)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::{get, test_app};
    use crate::api::{ServerContext, app};
    use crate::directory::UserDirectory;
    use anyhow::Result;
    use axum::http::StatusCode;

    #[test]
    fn payload_template() {
        assert_eq!(PAYLOAD.len(), PAYLOAD_UNIT.len() * 10);
        assert!(PAYLOAD.starts_with(PAYLOAD_UNIT));
        assert!(PAYLOAD.ends_with("generate some load"));
    }

    #[test]
    fn repeat_count_bounds() {
        assert_eq!(repeat_count(0, 10, 630), Some(0));
        assert_eq!(repeat_count(10, 10, 630), Some(10));
        assert_eq!(repeat_count(11, 10, 630), None);
        assert_eq!(repeat_count(-1, 10, 630), None);
        assert_eq!(repeat_count(i64::MIN, u64::MAX, 630), None);
    }

    #[test]
    fn repeat_count_respects_body_cap() {
        let fits = i64::try_from(MAX_RESPONSE_BYTES / 630).unwrap_or(i64::MAX);
        assert_eq!(repeat_count(fits, u64::MAX, 630), usize::try_from(fits).ok());
        assert_eq!(repeat_count(fits + 1, u64::MAX, 630), None);
        assert_eq!(repeat_count(i64::MAX, u64::MAX, 630), None);
        assert_eq!(repeat_count(i64::MAX, u64::MAX, usize::MAX), None);
    }

    #[tokio::test]
    async fn repeats_payload() -> Result<()> {
        let (_ctx, app) = test_app();

        let (status, body) = get(&app, "/multi?multiplier=3").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.len(), PAYLOAD.len() * 3);
        assert_eq!(body, PAYLOAD.repeat(3));

        let (status, body) = get(&app, "/multi?multiplier=%2B2").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.len(), PAYLOAD.len() * 2);
        Ok(())
    }

    #[tokio::test]
    async fn zero_yields_empty_body() -> Result<()> {
        let (_ctx, app) = test_app();

        let (status, body) = get(&app, "/multi?multiplier=0").await?;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn bad_arguments() -> Result<()> {
        let (_ctx, app) = test_app();

        for uri in [
            "/multi",
            "/multi?multiplier=",
            "/multi?multiplier=abc",
            "/multi?multiplier=1.5",
            "/multi?multiplier=-1",
            "/multi?multiplier=99999999999999999999999",
        ] {
            let (status, body) = get(&app, uri).await?;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body, "Server error bad arguments");
        }
        Ok(())
    }

    #[tokio::test]
    async fn unbounded_maximum_cannot_exceed_body_cap() -> Result<()> {
        let ctx = Arc::new(ServerContext::new(UserDirectory::new()).with_max_multiplier(u64::MAX));
        let app = app(ctx);

        let over_cap = MAX_RESPONSE_BYTES / PAYLOAD.len() + 1;
        for uri in [
            "/multi?multiplier=9223372036854775807".to_string(),
            format!("/multi?multiplier={over_cap}"),
        ] {
            let (status, body) = get(&app, &uri).await?;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body, "Server error bad arguments");
        }
        Ok(())
    }

    #[test]
    fn command_line_limit_fits_body_cap() {
        let limit = usize::try_from(crate::api::MULTIPLIER_LIMIT).unwrap_or(usize::MAX);
        assert!(PAYLOAD.len().saturating_mul(limit) <= MAX_RESPONSE_BYTES);
    }

    #[tokio::test]
    async fn above_maximum_is_rejected() -> Result<()> {
        let ctx = Arc::new(ServerContext::new(UserDirectory::new()).with_max_multiplier(5));
        let app = app(ctx);

        let (status, _) = get(&app, "/multi?multiplier=5").await?;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get(&app, "/multi?multiplier=6").await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Server error bad arguments");
        Ok(())
    }
}
