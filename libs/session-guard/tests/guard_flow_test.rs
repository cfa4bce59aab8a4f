use std::sync::Arc;

use clinic_session_guard::{
    FileTokenStore, HistoryNavigator, SessionContext, SessionGuard, SessionState,
};
use tempfile::TempDir;

fn file_context(dir: &TempDir) -> SessionContext {
    SessionContext::new(Arc::new(FileTokenStore::new(dir.path().join("session.json"))))
}

#[test]
fn logout_elsewhere_is_seen_on_next_navigation() {
    let dir = TempDir::new().expect("tempdir");
    let dashboard = file_context(&dir);
    let settings = file_context(&dir);
    let navigator = HistoryNavigator::new();

    dashboard.sign_in("doctor-token").expect("sign in");

    let first = SessionGuard::mount(&dashboard, &navigator)
        .for_path("/dashboard")
        .render(|session| session.authorization());
    assert_eq!(first.as_deref(), Some("Bearer doctor-token"));

    settings.sign_out().expect("sign out");

    let mut guard = SessionGuard::mount(&dashboard, &navigator).for_path("/dashboard");
    assert_eq!(guard.check(), SessionState::Unauthenticated);
    assert!(guard.render(|_| ()).is_none());
    assert_eq!(
        navigator.history(),
        vec!["/login?next=%2Fdashboard".to_string()]
    );
}

#[test]
fn corrupt_storage_counts_as_signed_out() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("session.json"), "garbage").expect("write");
    let context = file_context(&dir).with_login_route("/sign-in");
    let navigator = HistoryNavigator::new();

    let rendered = SessionGuard::mount(&context, &navigator).render(|_| "protected");
    assert!(rendered.is_none());
    assert_eq!(navigator.current().as_deref(), Some("/sign-in"));
}

#[test]
fn rejected_call_sends_next_navigation_to_login() {
    let dir = TempDir::new().expect("tempdir");
    let context = file_context(&dir);
    let navigator = HistoryNavigator::new();
    context.sign_in("expired-token").expect("sign in");

    let mut guard = SessionGuard::mount(&context, &navigator).for_path("/admissions");
    assert_eq!(guard.check(), SessionState::Authenticated);

    // The view's first backend call comes back 401.
    assert!(context.observe_status(401));

    let mut next = SessionGuard::mount(&context, &navigator).for_path("/admissions");
    assert_eq!(next.check(), SessionState::Unauthenticated);
    assert_eq!(navigator.history().len(), 1);
}
