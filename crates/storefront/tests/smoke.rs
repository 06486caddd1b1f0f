//! In-process smoke tests for the storefront router.
//!
//! The backend origin points at a closed port, so catalog pages exercise
//! the showcase fallback while session-backed cart behavior runs for real.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use tower::ServiceExt;

use nextgen_storefront::config::{BackendConfig, StorefrontConfig};
use nextgen_storefront::state::AppState;

/// Router wired to an unreachable backend.
fn test_app() -> Router {
    // Discard port; connections are refused immediately
    test_app_with("http://127.0.0.1:9".to_string())
}

fn test_app_with(api_url: String) -> Router {
    let config = StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("kX9#mP2$vQ7!nR4@wT8%yU3^zA6&bC1*"),
        backend: BackendConfig {
            api_url,
            uploads_path: "/uploads".to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };

    nextgen_storefront::app(AppState::new(config))
}

/// Serve a stub of the backend's login endpoint on an ephemeral port.
async fn spawn_stub_backend() -> String {
    let stub = Router::new().route(
        "/api/customer/login",
        axum::routing::post(|| async {
            axum::Json(serde_json::json!({
                "token": "test-token",
                "customer": {"id": 7, "name": "Asha", "email": "asha@example.com"}
            }))
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub).await.unwrap();
    });
    format!("http://{addr}")
}

fn session_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response must establish a session")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let app = test_app();
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn home_renders_from_fallback_when_backend_is_down() {
    let app = test_app();
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Nextgen Food Court"));
    assert!(body.contains("Addis Kitchen"));
}

#[tokio::test]
async fn outlet_directory_filters_by_cuisine() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::get("/outlets?cuisine=Nigerian")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Lagos Grill"));
    assert!(!body.contains("Addis Kitchen"));
}

#[tokio::test]
async fn outlet_menu_renders_and_unknown_outlet_is_404() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(Request::get("/outlets/1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Doro Wat"));

    let response = app
        .oneshot(Request::get("/outlets/999").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cart_add_sets_session_and_count_persists() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::post("/cart/add")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("outlet_id=1&entry_id=101"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("HX-Trigger").unwrap(),
        "cart-updated"
    );
    let cookie = session_cookie(&response);
    assert!(body_text(response).await.contains("1"));

    // Same session sees the count; a fresh one does not
    let response = app
        .clone()
        .oneshot(
            Request::get("/cart/count")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(body_text(response).await.contains(">1<"));

    let response = app
        .oneshot(Request::get("/cart/count").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(body_text(response).await.contains(">0<"));
}

#[tokio::test]
async fn cart_page_drops_unresolvable_lines() {
    let app = test_app();

    // Entry 101 resolves against the fallback menu; 9999 does not
    let response = app
        .clone()
        .oneshot(
            Request::post("/cart/add")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("outlet_id=1&entry_id=101"))
                .unwrap(),
        )
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    let response = app
        .clone()
        .oneshot(
            Request::post("/cart/add")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(header::COOKIE, &cookie)
                .body(Body::from("outlet_id=1&entry_id=9999"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::get("/cart")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Doro Wat"));
    assert!(!body.contains("9999"));
    // The subtotal label counts rendered lines, not the dropped one
    assert!(body.contains("(1 items)"));
}

#[tokio::test]
async fn protected_pages_redirect_to_login() {
    let app = test_app();

    for path in [
        "/orders",
        "/dashboard/customer",
        "/dashboard/owner",
        "/dashboard/owner/outlets/1",
    ] {
        let response = app
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/auth/login",
            "{path}"
        );
    }
}

#[tokio::test]
async fn security_headers_are_applied() {
    let app = test_app();
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert!(headers.contains_key("content-security-policy"));
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn login_rotates_the_session_id_and_keeps_the_cart() {
    let app = test_app_with(spawn_stub_backend().await);

    // Establish a pre-login session through a cart mutation
    let response = app
        .clone()
        .oneshot(
            Request::post("/cart/add")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("outlet_id=1&entry_id=101"))
                .unwrap(),
        )
        .await
        .unwrap();
    let anon_cookie = session_cookie(&response);

    let response = app
        .clone()
        .oneshot(
            Request::post("/auth/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(header::COOKIE, &anon_cookie)
                .body(Body::from(
                    "role=customer&email=asha%40example.com&password=secret1",
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

    // The authenticated session rides a fresh id
    let auth_cookie = session_cookie(&response);
    assert_ne!(auth_cookie, anon_cookie);

    // The old id is dead, and the cart moved over with the new one
    let response = app
        .clone()
        .oneshot(
            Request::get("/cart/count")
                .header(header::COOKIE, &anon_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(body_text(response).await.contains(">0<"));

    let response = app
        .clone()
        .oneshot(
            Request::get("/cart/count")
                .header(header::COOKIE, &auth_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(body_text(response).await.contains(">1<"));

    // And the page greets the logged-in customer
    let response = app
        .oneshot(
            Request::get("/")
                .header(header::COOKIE, &auth_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(body_text(response).await.contains("Asha"));
}

#[tokio::test]
async fn login_page_renders_role_toggle() {
    let app = test_app();
    let response = app
        .oneshot(Request::get("/auth/login").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("name=\"role\""));
    assert!(body.contains("value=\"owner\""));
}
