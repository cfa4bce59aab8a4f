use crate::config::GatewayConfig;
use crate::proxy::{GatewayError, InboundRequest, ProxyHandler};
use crate::routes::RouteTable;
use crate::REQUEST_ID_HEADER;
use anyhow::{Context, Result};
use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

pub struct GatewayServer {
    config: Arc<GatewayConfig>,
    handler: Arc<ProxyHandler>,
}

impl GatewayServer {
    /// Create a server using the configured route table.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let routes = config.load_routes()?;
        Self::with_routes(config, routes)
    }

    pub fn with_routes(config: GatewayConfig, routes: RouteTable) -> Result<Self> {
        let handler = Arc::new(
            ProxyHandler::new(config.clone(), routes).context("Failed to create proxy handler")?,
        );

        Ok(Self {
            config: Arc::new(config),
            handler,
        })
    }

    pub fn router(&self) -> Router {
        let middleware = ServiceBuilder::new().layer(TraceLayer::new_for_http());

        Router::new()
            .route("/health", get(health_check))
            .fallback(dispatch)
            .with_state(Arc::clone(&self.handler))
            .layer(middleware)
    }

    /// Bind the configured address and serve until the task is dropped.
    pub async fn run(self) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .listen_addr()
            .parse()
            .context("Invalid listen address")?;

        let listener = TcpListener::bind(&addr)
            .await
            .context(format!("Failed to bind to {}", addr))?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let addr = listener.local_addr().context("Listener has no local address")?;
        info!(
            "Gateway listening on {} ({} routes)",
            addr,
            self.handler.routes().len()
        );

        axum::serve(listener, self.router())
            .await
            .context("Server error")
    }
}

async fn health_check() -> &'static str {
    "ok"
}

/// Entry point for every non-health request.
async fn dispatch(State(handler): State<Arc<ProxyHandler>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers);

    let body = match read_body(body, handler.max_body_size()).await {
        Ok(body) => body,
        Err(e) => return e.to_response(&request_id),
    };

    let mut inbound = InboundRequest::new(parts.method, parts.uri.path())
        .with_request_id(request_id.clone())
        .with_body(body);
    if let Some(query) = parts.uri.query() {
        inbound = inbound.with_query(query);
    }
    inbound.headers = parts.headers;

    match handler.dispatch(inbound).await {
        Ok(payload) => payload.into_response(&request_id),
        Err(e) => e.to_response(&request_id),
    }
}

/// The caller's `X-Request-Id` when usable, otherwise a fresh one.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

async fn read_body(body: Body, limit: usize) -> Result<Bytes, GatewayError> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            warn!(limit, "Request body exceeds limit");
            Err(GatewayError::BodyTooLarge { limit })
        }
        Err(e) => Err(GatewayError::InvalidRequest(format!(
            "failed to read request body: {}",
            e
        ))),
    }
}
