use super::{normalizer, GatewayError};
use bytes::Bytes;
use clinic_api_client::BackendLocator;
use http::{HeaderMap, Method, StatusCode};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// A fully resolved call to the backend.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// What the backend sent back, before normalization.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub struct UpstreamClient {
    http_client: Client,
    locator: BackendLocator,
}

impl UpstreamClient {
    pub fn new(locator: BackendLocator, timeout_secs: u64) -> anyhow::Result<Self> {
        // Redirects are answered to the caller, not followed
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(Policy::none())
            .pool_max_idle_per_host(20)
            .build()?;

        Ok(Self {
            http_client,
            locator,
        })
    }

    pub fn locator(&self) -> &BackendLocator {
        &self.locator
    }

    /// Issue exactly one call. Any failure to obtain a status line is a
    /// transport failure; a body that cannot be read is treated as empty.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.url.path()))]
    pub async fn send(&self, request: OutboundRequest) -> Result<BackendResponse, GatewayError> {
        debug!(upstream_url = %request.url, "Forwarding request to backend");

        let mut builder = self
            .http_client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, timeout = e.is_timeout(), "Backend request failed");
            normalizer::transport_failure(e)
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                warn!(status = status.as_u16(), error = %e, "Failed to read backend body");
                Bytes::new()
            }
        };

        Ok(BackendResponse {
            status,
            headers,
            body,
        })
    }
}
