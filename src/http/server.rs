//! HTTP server setup and the proxy handler.
//!
//! # Responsibilities
//! - Create the Axum router with the handler on every path and method
//! - Wire up middleware (CORS origin, request ID, tracing, optional timeout)
//! - Answer preflights and reject unsupported methods locally
//! - Forward GETs to the Neople API with the server key injected
//! - Serve until the shutdown signal fires

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ApiKey, ProxyConfig, UpstreamConfig};
use crate::error::ProxyError;
use crate::http::request::{upstream_path, UpstreamUrl};
use crate::http::response;
use crate::observability::metrics;
use crate::security::headers;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub upstream: Arc<UpstreamConfig>,
    pub mount_depth: usize,
    pub api_key: ApiKey,
}

impl AppState {
    /// Build the shared upstream client and freeze the settings handlers need.
    pub fn new(config: &ProxyConfig, api_key: ApiKey) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeouts.upstream_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if !config.upstream.system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            upstream: Arc::new(config.upstream.clone()),
            mount_depth: config.listener.mount_depth,
            api_key,
        })
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &ProxyConfig, state: AppState) -> Router {
    let mut router = Router::new()
        .route("/{*path}", any(proxy_handler))
        .route("/", any(proxy_handler))
        .with_state(state);

    if let Some(secs) = config.timeouts.request_secs {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(secs)));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(headers::allow_any_origin())
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and key.
    pub fn new(config: ProxyConfig, api_key: ApiKey) -> Result<Self, reqwest::Error> {
        let state = AppState::new(&config, api_key)?;
        let router = build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests
    /// for at most `timeouts.shutdown_drain_secs`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            mount_depth = self.config.listener.mount_depth,
            "HTTP server starting"
        );

        let drain = Duration::from_secs(self.config.timeouts.shutdown_drain_secs);
        let mut drain_signal = shutdown.resubscribe();

        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .into_future();

        // Upstream calls carry no timeout by default, so a hung one would
        // otherwise hold the drain open forever.
        let drain_deadline = async move {
            let _ = drain_signal.recv().await;
            tokio::time::sleep(drain).await;
        };

        tokio::select! {
            result = serve => result?,
            _ = drain_deadline => {
                tracing::warn!(
                    drain_secs = drain.as_secs(),
                    "Drain deadline elapsed, dropping in-flight requests"
                );
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler.
/// Answers preflights, rejects non-GET methods, forwards everything else.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %uri.path(),
        "Inbound request"
    );

    let response = if method == Method::OPTIONS {
        headers::preflight_response()
    } else if method != Method::GET {
        (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response()
    } else {
        match forward(&state, &uri, &request_id).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Neople API call failed");
                metrics::record_upstream_error(e.kind());
                e.into_response()
            }
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start_time);
    response
}

async fn forward(state: &AppState, uri: &Uri, request_id: &str) -> Result<Response, ProxyError> {
    let suffix = upstream_path(uri.path(), state.mount_depth);
    let url = UpstreamUrl::build(&state.upstream, &state.api_key, &suffix, uri.query());

    tracing::info!(request_id = %request_id, url = %url, "Proxying request");

    let upstream = state.client.get(url.as_str()).send().await?;
    tracing::debug!(request_id = %request_id, status = %upstream.status(), "Upstream responded");

    response::relay(upstream).await
}
