mod error;
pub(crate) mod handler;
mod inbound;
pub mod normalizer;
mod payload;
mod upstream;

pub use error::GatewayError;
pub use handler::ProxyHandler;
pub use inbound::InboundRequest;
pub use normalizer::{error_message, normalize, transport_failure};
pub use payload::BackendPayload;
pub use upstream::{BackendResponse, OutboundRequest, UpstreamClient};

use crate::auth::CredentialExtractor;
use crate::config::GatewayConfig;
use crate::routes::RouteTable;
use std::sync::Arc;

/// Outcome of forwarding one request.
pub type NormalizedResult = Result<BackendPayload, GatewayError>;

#[derive(Clone)]
pub struct ProxyState {
    pub config: Arc<GatewayConfig>,
    pub routes: Arc<RouteTable>,
    pub credentials: Arc<CredentialExtractor>,
    pub upstream: Arc<UpstreamClient>,
}

impl ProxyState {
    pub fn new(config: GatewayConfig, routes: RouteTable) -> anyhow::Result<Self> {
        use anyhow::Context;

        let locator = config.locator().context("Invalid backend address")?;
        let upstream = Arc::new(UpstreamClient::new(locator, config.request_timeout_secs)?);

        Ok(Self {
            config: Arc::new(config),
            routes: Arc::new(routes),
            credentials: Arc::new(CredentialExtractor::new()),
            upstream,
        })
    }
}
