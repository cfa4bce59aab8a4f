use anyhow::{Context, Result};
use clinic_gateway_http::config::GatewayConfig;
use clinic_gateway_http::server::GatewayServer;
use clinic_session_guard::{FileTokenStore, SessionContext, TokenStore};
use std::path::PathBuf;
use std::sync::{Arc, Once};
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

pub use clinic_api_client;
pub use clinic_gateway_http;
pub use clinic_session_guard;

static TRACING: Once = Once::new();

/// Install a test-friendly subscriber once per process. `RUST_LOG` wins over
/// the `warn` default.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .compact()
            .try_init();
    });
}

/// Gateway configuration pointing at `backend_url`, listening on loopback.
pub fn gateway_config(backend_url: &str) -> GatewayConfig {
    GatewayConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        backend_url: Some(backend_url.to_string()),
        request_timeout_secs: 2,
        max_body_size_bytes: 64 * 1024,
        routes_file: None,
        log_level: "warn".to_string(),
    }
}

/// A gateway running in-process on an ephemeral port.
pub struct GatewayFixture {
    base_url: String,
    handle: JoinHandle<Result<()>>,
}

impl GatewayFixture {
    pub async fn start(backend_url: &str) -> Result<Self> {
        Self::start_with(gateway_config(backend_url)).await
    }

    pub async fn start_with(config: GatewayConfig) -> Result<Self> {
        config.validate().context("invalid fixture configuration")?;

        let listener = TcpListener::bind((config.host.as_str(), 0))
            .await
            .context("binding fixture listener")?;
        let addr = listener.local_addr()?;
        let server = GatewayServer::new(config).context("building fixture gateway")?;
        let handle = tokio::spawn(async move { server.serve(listener).await });

        info!(%addr, "Gateway fixture started");
        Ok(Self {
            base_url: format!("http://{}", addr),
            handle,
        })
    }

    /// Origin of the gateway, usable as the front end's origin in tests.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }
}

/// A session context backed by a token file in a private temp directory.
pub struct SessionFixture {
    pub context: SessionContext,
    pub store: Arc<FileTokenStore>,
    pub temp_dir: TempDir,
}

impl SessionFixture {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("creating session tempdir")?;
        let store = Arc::new(FileTokenStore::new(temp_dir.path().join("session.json")));
        let context = SessionContext::new(store.clone() as Arc<dyn TokenStore>);
        Ok(Self {
            context,
            store,
            temp_dir,
        })
    }

    pub fn signed_in(token: &str) -> Result<Self> {
        let fixture = Self::new()?;
        fixture.context.sign_in(token).context("storing fixture token")?;
        Ok(fixture)
    }

    pub fn token_path(&self) -> PathBuf {
        self.store.path().to_path_buf()
    }
}

/// Client timeout used by tests and benches talking to a fixture.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(5);
