use axum::{http::StatusCode, response::IntoResponse};

pub const NOT_FOUND_BODY: &str = "There is nothing to do here\r\n";

// Fallback for every unmatched path and method.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

#[cfg(test)]
mod tests {
    use super::NOT_FOUND_BODY;
    use crate::api::handlers::test_support::{get, test_app};
    use anyhow::Result;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn unknown_paths_are_404() -> Result<()> {
        let (_ctx, app) = test_app();

        for uri in [
            "/",
            "/foo",
            "/foo?username=matt&password=password",
            "/newUser/extra",
            "/NEWUSER",
            "/multi/",
        ] {
            let (status, body) = get(&app, uri).await?;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body, NOT_FOUND_BODY);
        }
        Ok(())
    }

    #[tokio::test]
    async fn other_methods_fall_through() -> Result<()> {
        let (ctx, app) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/foo")
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(body, NOT_FOUND_BODY.as_bytes());
        assert!(ctx.directory().is_empty());
        Ok(())
    }
}
