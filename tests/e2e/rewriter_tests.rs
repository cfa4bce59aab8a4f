use anyhow::Result;
use clinic_gateway::bench_support::clinic_api_client::{ApiClient, BackendLocator, RequestRewriter};
use clinic_gateway::bench_support::{init_tracing, GatewayFixture, CLIENT_TIMEOUT};
use reqwest::{Method, StatusCode};
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "Bearer rewriter-token";

fn direct_client(frontend_origin: &str, backend: &MockServer) -> Result<ApiClient> {
    let origin = Url::parse(frontend_origin)?;
    let mut client = ApiClient::new(origin.clone(), CLIENT_TIMEOUT)?;
    let locator = BackendLocator::new(Some(&backend.uri()))?;
    assert!(client.install(RequestRewriter::new(origin, locator)));
    Ok(client)
}

#[tokio::test(flavor = "multi_thread")]
async fn direct_and_proxied_calls_agree() -> Result<()> {
    init_tracing();
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/doctors/d-1"))
        .and(header("authorization", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "d-1",
            "specialty": "cardiology"
        })))
        .expect(2)
        .mount(&backend)
        .await;

    let gateway = GatewayFixture::start(&backend.uri()).await?;

    let proxied = ApiClient::new(Url::parse(gateway.base_url())?, CLIENT_TIMEOUT)?
        .send_json(Method::GET, "/api/doctors/d-1", Some(TOKEN), None)
        .await?;
    let direct = direct_client(gateway.base_url(), &backend)?
        .send_json(Method::GET, "/api/doctors/d-1", Some(TOKEN), None)
        .await?;

    assert_eq!(proxied, direct);
    assert_eq!(direct.status, StatusCode::OK);

    gateway.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn second_install_is_ignored() -> Result<()> {
    init_tracing();
    let backend = MockServer::start().await;
    let other = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rooms"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "r-1" })))
        .expect(1)
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&other)
        .await;

    let origin = "http://clinic.localhost:5173";
    let mut client = direct_client(origin, &backend)?;
    let again = RequestRewriter::new(
        Url::parse(origin)?,
        BackendLocator::new(Some(&other.uri()))?,
    );
    assert!(!client.install(again));

    let response = client
        .send_json(
            Method::POST,
            "/api/rooms",
            Some(TOKEN),
            Some(&json!({ "number": "101" })),
        )
        .await?;
    assert_eq!(response.status, StatusCode::CREATED);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn paths_outside_namespace_stay_on_frontend() -> Result<()> {
    init_tracing();
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;

    // The gateway plays the front end's origin here.
    let gateway = GatewayFixture::start(&backend.uri()).await?;
    let client = direct_client(gateway.base_url(), &backend)?;

    let health = client.request(Method::GET, "/health")?.send().await?;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(health.text().await?, "ok");

    let lookalike = client
        .send_json(Method::GET, "/apiary", Some(TOKEN), None)
        .await?;
    assert_eq!(lookalike.status, StatusCode::NOT_FOUND);
    assert_eq!(lookalike.error_message(), Some("Route not found"));

    gateway.shutdown().await;
    Ok(())
}
