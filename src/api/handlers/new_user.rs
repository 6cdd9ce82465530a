use super::ServiceError;
use crate::api::{AUDIT_TARGET, ServerContext, params::QueryParams};
use crate::directory::{DirectoryError, obfuscate, sanitize};
use axum::extract::Extension;
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[utoipa::path(
    method(get, post, put, delete, patch, options, trace),
    path = "/newUser",
    params(
        ("username" = Option<String>, Query, description = "Requested username; `!@#$%^&*` are stripped"),
        ("password" = Option<String>, Query, description = "Printable ASCII password"),
    ),
    responses (
        (status = 200, description = "User created", body = String, content_type = "text/plain"),
        (status = 400, description = "Insufficient arguments, user already exists or unsupported password characters", body = String, content_type = "text/plain"),
    ),
    tag = "users",
)]
#[instrument(skip(ctx, params))]
pub async fn new_user(
    Extension(ctx): Extension<Arc<ServerContext>>,
    params: QueryParams,
) -> Result<String, ServiceError> {
    let username = sanitize(params.value_or_empty("username"));
    let password = params.value_or_empty("password");

    let exists = ctx.directory().contains(&username);
    if username.is_empty() || password.is_empty() || exists {
        return Err(if exists {
            ServiceError::UserExists
        } else {
            ServiceError::InsufficientArguments
        });
    }

    let stored = obfuscate(password).map_err(|err| {
        debug!("Rejected password for {username}: {err}");
        ServiceError::UnsupportedPassword
    })?;

    ctx.directory()
        .insert_new(&username, stored.clone())
        .map_err(|DirectoryError::AlreadyExists(_)| ServiceError::UserExists)?;

    // Only the obfuscated form is ever logged.
    info!(target: AUDIT_TARGET, "Created User -> {username}:{stored}");

    Ok(format!("Created new user `{username}`\n"))
}

#[cfg(test)]
mod tests {
    use crate::api::handlers::test_support::{CapturedLogs, get, test_app};
    use crate::cli::telemetry::fixed_directives;
    use anyhow::Result;
    use axum::http::StatusCode;
    use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

    #[tokio::test]
    async fn audit_line_is_logged_at_default_level() -> Result<()> {
        let logs = CapturedLogs::default();
        let subscriber = Registry::default()
            .with(fmt::layer().with_ansi(false).with_writer(logs.clone()))
            .with(fixed_directives(EnvFilter::new("error"))?);
        let _guard = tracing::subscriber::set_default(subscriber);

        let (_ctx, app) = test_app();
        let (status, _) = get(&app, "/newUser?username=matt&password=secret").await?;
        assert_eq!(status, StatusCode::OK);

        let output = logs.contents();
        assert!(output.contains("Created User -> matt:D64C6E"), "{output}");
        assert!(!output.contains("secret"), "{output}");
        Ok(())
    }

    #[tokio::test]
    async fn creates_user_and_stores_obfuscated_password() -> Result<()> {
        let (ctx, app) = test_app();

        let (status, body) = get(&app, "/newUser?username=matt&password=password").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Created new user `matt`\n");
        assert_eq!(ctx.directory().get("matt").as_deref(), Some("A2DDH@C5"));
        Ok(())
    }

    #[tokio::test]
    async fn sanitizes_username_before_storing() -> Result<()> {
        let (ctx, app) = test_app();

        let (status, body) = get(&app, "/newUser?username=a%40%23%24b&password=pw").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Created new user `ab`\n");
        assert!(ctx.directory().contains("ab"));

        let (status, body) = get(&app, "/newUser?username=ab&password=other").await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Creating a new user failed -> User already exists\n");
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_is_rejected_regardless_of_password() -> Result<()> {
        let (ctx, app) = test_app();
        get(&app, "/newUser?username=matt&password=password").await?;

        for uri in [
            "/newUser?username=matt&password=password",
            "/newUser?username=matt&password=different",
            "/newUser?username=matt",
            "/newUser?username=m!a*tt&password=x",
        ] {
            let (status, body) = get(&app, uri).await?;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body, "Creating a new user failed -> User already exists\n");
        }
        assert_eq!(ctx.directory().get("matt").as_deref(), Some("A2DDH@C5"));
        Ok(())
    }

    #[tokio::test]
    async fn missing_arguments_are_insufficient() -> Result<()> {
        let (ctx, app) = test_app();

        for uri in [
            "/newUser",
            "/newUser?username=matt",
            "/newUser?password=password",
            "/newUser?username=&password=password",
            "/newUser?username=%40%23%24&password=password",
        ] {
            let (status, body) = get(&app, uri).await?;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body, "Creating a new user failed -> Insufficient arguments\n");
        }
        assert!(ctx.directory().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn unsupported_password_characters_are_rejected() -> Result<()> {
        let (ctx, app) = test_app();

        let (status, body) = get(&app, "/newUser?username=matt&password=pass+word").await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            "Creating a new user failed -> Password contains unsupported characters\n"
        );
        assert!(!ctx.directory().contains("matt"));
        Ok(())
    }

    #[tokio::test]
    async fn first_repeated_value_is_used() -> Result<()> {
        let (ctx, app) = test_app();

        let (status, _) = get(
            &app,
            "/newUser?username=first&username=second&password=password",
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        assert!(ctx.directory().contains("first"));
        assert!(!ctx.directory().contains("second"));
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_distinct_creates_all_succeed() -> Result<()> {
        let (ctx, app) = test_app();

        let tasks: Vec<_> = (0..64)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move {
                    get(&app, &format!("/newUser?username=user{i}&password=pw{i}")).await
                })
            })
            .collect();

        for task in tasks {
            let (status, _) = task.await??;
            assert_eq!(status, StatusCode::OK);
        }
        assert_eq!(ctx.directory().len(), 64);
        Ok(())
    }
}
