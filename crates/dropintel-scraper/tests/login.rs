//! Integration tests for `PortalSession` using wiremock HTTP mocks.

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dropintel_core::Credentials;
use dropintel_scraper::{PortalError, PortalSession};

fn test_credentials() -> Credentials {
    Credentials {
        username: "spy@example.com".to_string(),
        password: "hunter2".to_string(),
    }
}

fn login_page() -> String {
    r#"
        <html><body>
        <form action="/auth/session" method="post">
            <input type="hidden" name="_token" value="csrf-abc">
            <input type="email" name="email" placeholder="Correo">
            <input type="password" name="password" placeholder="Contraseña">
            <button type="submit">Ingresar</button>
        </form>
        </body></html>
    "#
    .to_string()
}

#[tokio::test]
async fn login_posts_credentials_to_the_form_action() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_page()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/session"))
        .and(body_string_contains("email=spy%40example.com"))
        .and(body_string_contains("password=hunter2"))
        .and(body_string_contains("_token=csrf-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>bienvenido</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let session = PortalSession::new(30, "dropintel-test/0.1").expect("client construction");
    let login_url = format!("{}/auth/login", server.uri());
    session
        .login(&login_url, &test_credentials())
        .await
        .expect("login should succeed");
}

#[tokio::test]
async fn login_fails_with_element_not_found_when_the_form_is_missing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>mantenimiento</body></html>"),
        )
        .mount(&server)
        .await;

    let session = PortalSession::new(30, "dropintel-test/0.1").expect("client construction");
    let login_url = format!("{}/auth/login", server.uri());
    let err = session
        .login(&login_url, &test_credentials())
        .await
        .expect_err("login should fail");
    assert!(
        matches!(err, PortalError::ElementNotFound { .. }),
        "expected ElementNotFound, got: {err:?}"
    );
}

#[tokio::test]
async fn login_surfaces_a_rejected_submission() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_page()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/session"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let session = PortalSession::new(30, "dropintel-test/0.1").expect("client construction");
    let login_url = format!("{}/auth/login", server.uri());
    let err = session
        .login(&login_url, &test_credentials())
        .await
        .expect_err("login should fail");
    assert!(
        matches!(err, PortalError::UnexpectedStatus { status: 401, .. }),
        "expected UnexpectedStatus(401), got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_listing_returns_the_page_html() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<div class="product-card"><h3>Mouse</h3></div>"#),
        )
        .mount(&server)
        .await;

    let session = PortalSession::new(30, "dropintel-test/0.1").expect("client construction");
    let html = session
        .fetch_listing(&format!("{}/products", server.uri()))
        .await
        .expect("listing fetch should succeed");
    assert!(html.contains("product-card"));
}

#[tokio::test]
async fn fetch_listing_maps_non_2xx_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let session = PortalSession::new(30, "dropintel-test/0.1").expect("client construction");
    let err = session
        .fetch_listing(&format!("{}/products", server.uri()))
        .await
        .expect_err("listing fetch should fail");
    assert!(
        matches!(err, PortalError::UnexpectedStatus { status: 503, .. }),
        "expected UnexpectedStatus(503), got: {err:?}"
    );
}
