//! Sign-in, persistence of the session and the bearer header.

#![allow(clippy::unwrap_used)]

use axum::http::Method;
use storedesk_client::routes::{Navigation, Route};
use storedesk_client::session::View;
use storedesk_client::{App, AppError};
use storedesk_core::Role;
use storedesk_integration_tests::{FakeBackend, VALID_PASSWORD};

#[tokio::test]
async fn test_login_persists_across_restart_and_sends_bearer() {
    let backend = FakeBackend::start().await;
    let dir = tempfile::tempdir().unwrap();

    let mut app = App::open(backend.config(dir.path())).await.unwrap();
    let signed_in = app
        .auth()
        .login("admin@shop.in", VALID_PASSWORD)
        .await
        .unwrap();
    assert_eq!(signed_in.role, Role::Admin);
    assert_eq!(signed_in.landing, Route::Dashboard);
    assert_eq!(signed_in.greeting, "Welcome back, admin!");
    drop(app);

    // A new process picks the session up from disk
    let app = App::open(backend.config(dir.path())).await.unwrap();
    assert_eq!(app.session().view(), View::Private);
    assert_eq!(app.session().role(), Role::Admin);
    assert_eq!(
        app.session().current_user().map(|u| u.email.as_str()),
        Some("admin@shop.in")
    );

    app.categories().fetch().await.unwrap();
    let last = backend.requests().pop().unwrap();
    assert_eq!(last.path, "/categories");
    assert_eq!(last.authorization.as_deref(), Some("Bearer tok-admin"));
    assert!(last.request_id.is_some());
}

#[tokio::test]
async fn test_rejected_login_shows_server_error() {
    let backend = FakeBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::open(backend.config(dir.path())).await.unwrap();

    let err = app
        .auth()
        .login("someone@shop.in", "wrong-password")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::LoginFailed(ref m) if m == "Invalid credentials"));
    assert_eq!(app.session().view(), View::Public);
}

#[tokio::test]
async fn test_invalid_login_form_never_reaches_server() {
    let backend = FakeBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::open(backend.config(dir.path())).await.unwrap();

    let err = app.auth().login("not-an-email", "123").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(backend.count(&Method::POST, "/auth/login"), 0);
}

#[tokio::test]
async fn test_logout_then_restart_is_signed_out_user() {
    let backend = FakeBackend::start().await;
    let dir = tempfile::tempdir().unwrap();

    let mut app = App::open(backend.config(dir.path())).await.unwrap();
    app.auth().login("admin@shop.in", VALID_PASSWORD).await.unwrap();
    app.auth().logout().await.unwrap();
    assert!(!app.api().has_token().await);
    drop(app);

    let app = App::open(backend.config(dir.path())).await.unwrap();
    assert_eq!(app.session().view(), View::Public);
    assert_eq!(app.session().role(), Role::User);
    assert_eq!(
        app.session().navigate("/Dashboard", None),
        Navigation::Redirect(Route::Login)
    );
}

#[tokio::test]
async fn test_unknown_role_lands_on_default_route() {
    let backend = FakeBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::open(backend.config(dir.path())).await.unwrap();

    let signed_in = app
        .auth()
        .login("owner@shop.in", VALID_PASSWORD)
        .await
        .unwrap();
    assert_eq!(signed_in.landing, Route::Dashboard);
    assert_eq!(signed_in.role, Role::User);
    assert_eq!(app.session().role(), Role::User);
}
