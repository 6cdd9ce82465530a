use anyhow::{Context, Result};
use axum::{
    Extension, Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request, header::CONNECTION},
};
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer,
    set_header::{SetRequestHeaderLayer, SetResponseHeaderLayer},
    trace::TraceLayer,
};
use tracing::{Span, info, info_span};
use ulid::Ulid;
use utoipa_axum::router::OpenApiRouter;

mod context;
pub(crate) mod handlers;
mod openapi;
pub(crate) mod params;

pub use context::{Authorization, DEFAULT_MAX_MULTIPLIER, MULTIPLIER_LIMIT, ServerContext};
pub use handlers::multi::{MAX_RESPONSE_BYTES, PAYLOAD};
pub use handlers::not_found::NOT_FOUND_BODY;
pub use openapi::openapi;

const KEEP_ALIVE: &str = "timeout=5";

/// Target for events printed at every verbosity: server start and created users.
pub const AUDIT_TARGET: &str = "loadtarget::audit";

/// Build the API router with all documented routes registered.
#[must_use]
pub fn router() -> OpenApiRouter {
    openapi::api_router()
}

/// Full application: documented routes, the 404 fallback and the shared layers.
pub fn app(ctx: Arc<ServerContext>) -> Router {
    let (router, _openapi) = router().split_for_parts();
    router
        .fallback(handlers::not_found)
        // Methods with no route on a known path (CONNECT) answer like unknown paths.
        .method_not_allowed_fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("keep-alive"),
                    HeaderValue::from_static(KEEP_ALIVE),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    CONNECTION,
                    HeaderValue::from_static("keep-alive"),
                ))
                .layer(Extension(ctx)),
        )
}

/// Start the server
/// # Errors
/// Return error if the listener cannot be bound or the server fails
pub async fn new(listen: IpAddr, port: u16, ctx: Arc<ServerContext>) -> Result<()> {
    let addr = SocketAddr::new(listen, port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(target: AUDIT_TARGET, "Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app(ctx).into_make_service())
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Gracefully shutdown");
            }
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
