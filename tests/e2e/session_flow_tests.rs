use anyhow::Result;
use clinic_gateway::bench_support::{init_tracing, GatewayFixture, SessionFixture, CLIENT_TIMEOUT};
use clinic_gateway::bench_support::clinic_api_client::ApiClient;
use clinic_gateway::bench_support::clinic_session_guard::{
    HistoryNavigator, SessionGuard, SessionState,
};
use reqwest::{Method, StatusCode};
use serde_json::json;
use url::Url;
use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn frontend_client(gateway: &GatewayFixture) -> Result<ApiClient> {
    Ok(ApiClient::new(Url::parse(gateway.base_url())?, CLIENT_TIMEOUT)?)
}

#[tokio::test(flavor = "multi_thread")]
async fn signed_in_view_loads_data_through_gateway() -> Result<()> {
    init_tracing();
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/patients"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "p-1", "name": "Ada Lovelace" }
        ])))
        .expect(1)
        .mount(&backend)
        .await;

    let gateway = GatewayFixture::start(&backend.uri()).await?;
    let session = SessionFixture::signed_in("tok-1")?;
    let navigator = HistoryNavigator::new();

    let guard = SessionGuard::mount(&session.context, &navigator).for_path("/patients");
    let authorization = guard.render(|session| session.authorization());
    let authorization = authorization.expect("signed-in view renders");
    assert!(navigator.history().is_empty());

    let response = frontend_client(&gateway)?
        .send_json(Method::GET, "/api/patients", Some(&authorization), None)
        .await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        Some(json!([{ "id": "p-1", "name": "Ada Lovelace" }]))
    );

    gateway.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_token_sends_next_navigation_to_login() -> Result<()> {
    init_tracing();
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })))
        .mount(&backend)
        .await;

    let gateway = GatewayFixture::start(&backend.uri()).await?;
    let session = SessionFixture::signed_in("stale-token")?;
    let navigator = HistoryNavigator::new();

    let authorization = SessionGuard::mount(&session.context, &navigator)
        .for_path("/profile")
        .render(|session| session.authorization())
        .expect("token still stored, view renders");

    let response = frontend_client(&gateway)?
        .send_json(Method::GET, "/api/auth/me", Some(&authorization), None)
        .await?;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_message(), Some("Token expired"));

    assert!(session.context.observe_status(response.status.as_u16()));
    assert!(session.context.session().is_none());

    let mut guard = SessionGuard::mount(&session.context, &navigator).for_path("/profile");
    assert_eq!(guard.check(), SessionState::Unauthenticated);
    assert_eq!(navigator.history(), vec!["/login?next=%2Fprofile".to_string()]);
    assert!(guard.render(|_| ()).is_none());
    assert_eq!(navigator.history().len(), 1);

    gateway.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn signed_out_visit_redirects_without_calling_backend() -> Result<()> {
    init_tracing();
    let backend = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;

    let gateway = GatewayFixture::start(&backend.uri()).await?;
    let session = SessionFixture::new()?;
    let navigator = HistoryNavigator::new();

    let rendered = SessionGuard::mount(&session.context, &navigator)
        .for_path("/admissions")
        .render(|_| "admissions view");
    assert!(rendered.is_none());
    assert_eq!(
        navigator.current().as_deref(),
        Some("/login?next=%2Fadmissions")
    );

    // Without a token the front end has nothing to send; the gateway refuses.
    let response = frontend_client(&gateway)?
        .send_json(Method::GET, "/api/admissions", None, None)
        .await?;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.error_message(),
        Some("Authorization header is required")
    );

    gateway.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn sign_out_is_seen_by_the_next_mount() -> Result<()> {
    init_tracing();
    let session = SessionFixture::signed_in("tok-2")?;
    assert!(session.token_path().exists());
    let navigator = HistoryNavigator::new();

    let mut first = SessionGuard::mount(&session.context, &navigator).for_path("/rooms");
    assert_eq!(first.check(), SessionState::Authenticated);

    session.context.sign_out()?;

    let mut second = SessionGuard::mount(&session.context, &navigator).for_path("/rooms");
    assert_eq!(second.check(), SessionState::Unauthenticated);
    assert_eq!(navigator.history().len(), 1);
    Ok(())
}
