use super::{
    normalizer, GatewayError, InboundRequest, NormalizedResult, OutboundRequest, ProxyState,
};
use crate::config::GatewayConfig;
use crate::routes::{RouteLookup, RouteSpec, RouteTable};
use crate::REQUEST_ID_HEADER;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// The single forwarding unit. Every route goes through [`ProxyHandler::forward`];
/// routes differ only by their [`RouteSpec`].
pub struct ProxyHandler {
    state: ProxyState,
}

impl ProxyHandler {
    pub fn new(config: GatewayConfig, routes: RouteTable) -> anyhow::Result<Self> {
        let state = ProxyState::new(config, routes)?;
        Ok(Self { state })
    }

    pub fn routes(&self) -> &RouteTable {
        &self.state.routes
    }

    pub fn max_body_size(&self) -> usize {
        self.state.config.max_body_size_bytes
    }

    /// Look up the route for an inbound request and forward it.
    #[instrument(
        skip(self, inbound),
        fields(request_id = %inbound.request_id, method = %inbound.method, path = %inbound.path)
    )]
    pub async fn dispatch(&self, mut inbound: InboundRequest) -> NormalizedResult {
        let route = match self.state.routes.lookup(&inbound.method, &inbound.path) {
            RouteLookup::Matched { route, params } => {
                inbound.params = params;
                route
            }
            RouteLookup::MethodNotAllowed => {
                debug!("Path known but method not declared");
                return Err(GatewayError::MethodNotAllowed);
            }
            RouteLookup::NotFound => {
                debug!("No route for path");
                return Err(GatewayError::RouteNotFound);
            }
        };

        self.forward(route, &inbound).await
    }

    /// Check the route's preconditions, call the backend once and normalize
    /// the outcome. Precondition failures never reach the network.
    pub async fn forward(&self, route: &RouteSpec, inbound: &InboundRequest) -> NormalizedResult {
        let start = Instant::now();

        // Steps 1-4: Check preconditions and build the outbound call
        let outbound = match self.prepare(route, inbound) {
            Ok(outbound) => outbound,
            Err(e) => {
                info!(
                    request_id = %inbound.request_id,
                    route = %route.name,
                    status = e.status_code().as_u16(),
                    error = %e,
                    "Request rejected before dispatch"
                );
                return Err(e);
            }
        };

        // Step 5: Call the backend once, bounded by the request timeout
        debug!("Step 5: Sending request to backend");
        let upstream_start = Instant::now();
        let response = tokio::time::timeout(
            self.state.config.request_timeout(),
            self.state.upstream.send(outbound),
        )
        .await;
        let upstream_latency = upstream_start.elapsed();

        // Step 6: Normalize the backend outcome
        debug!("Step 6: Normalizing backend response");
        let result = match response {
            Ok(Ok(response)) => {
                debug!(
                    status = response.status.as_u16(),
                    content_type = ?response.headers.get(CONTENT_TYPE),
                    body_len = response.body.len(),
                    "Backend responded"
                );
                normalizer::normalize(response.status, &response.body, &route.default_error)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                warn!(route = %route.name, "Backend call exceeded the request timeout");
                Err(normalizer::transport_failure("request timed out"))
            }
        };

        // Step 7: Log the outcome
        let status = match &result {
            Ok(payload) => payload.status(),
            Err(e) => e.status_code(),
        };
        info!(
            request_id = %inbound.request_id,
            route = %route.name,
            method = %route.method,
            status = status.as_u16(),
            upstream_latency_ms = upstream_latency.as_millis(),
            total_latency_ms = start.elapsed().as_millis(),
            "Request completed"
        );

        result
    }

    fn prepare(
        &self,
        route: &RouteSpec,
        inbound: &InboundRequest,
    ) -> Result<OutboundRequest, GatewayError> {
        // Step 1: Extract the caller's credential
        debug!("Step 1: Extracting credential");
        let credential = if route.requires_credential {
            Some(self.state.credentials.require(&inbound.headers)?)
        } else {
            self.state.credentials.extract(&inbound.headers)
        };

        // Step 2: Substitute path parameters into the backend template
        debug!("Step 2: Resolving backend path");
        let mut path = route.resolve_backend_path(&inbound.params)?;

        // Step 3: Check required query keys
        debug!("Step 3: Checking required query parameters");
        if let Some(key) = route
            .required_query
            .iter()
            .find(|key| !inbound.has_query_value(key))
        {
            return Err(GatewayError::MissingQuery(key.clone()));
        }

        // Step 4: Build the outbound request
        debug!("Step 4: Building outbound request");
        if let Some(query) = &inbound.query {
            path.push('?');
            path.push_str(query);
        }

        let url = self
            .state
            .upstream
            .locator()
            .join(&path)
            .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;

        let mut headers = HeaderMap::new();
        if let Some(credential) = credential {
            headers.insert(AUTHORIZATION, credential.header_value().clone());
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&inbound.request_id) {
            headers.insert(REQUEST_ID_HEADER, value);
        }

        let body = if route.forwards_body && !inbound.body.is_empty() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            Some(inbound.body.clone())
        } else {
            None
        };

        Ok(OutboundRequest {
            method: route.method.as_method(),
            url,
            headers,
            body,
        })
    }
}
