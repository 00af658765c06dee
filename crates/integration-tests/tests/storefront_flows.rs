//! End-to-end shopping flows against an in-process storefront.

#![allow(clippy::unwrap_used)]

use reqwest::{StatusCode, header::LOCATION};
use ubermelon_integration_tests::{TestServer, test_config, write_temp_file};

const CHECKOUT_NOTICE: &str = "Sorry! Checkout will be implemented in a future version.";
const LOGIN_FAILED_NOTICE: &str = "Incorrect email or password.";

async fn body(client: &reqwest::Client, url: &str) -> (StatusCode, String) {
    let response = client.get(url).send().await.unwrap();
    let status = response.status();
    (status, response.text().await.unwrap())
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let (status, text) = body(&server.client(), &server.url("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "ok");
}

#[tokio::test]
async fn test_crenshaw_twice_costs_eighteen_dollars() {
    let server = TestServer::start().await;
    let client = server.client();

    for _ in 0..2 {
        let response = client
            .get(server.url("/add_to_cart/cran"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/cart");
    }

    let (status, text) = body(&client, &server.url("/cart")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains(r#"<td class="quantity">2</td>"#));
    assert!(text.contains(r#"<td class="line-total">$18.00</td>"#));
    assert!(text.contains(r#"<td class="cart-total">$18.00</td>"#));
}

#[tokio::test]
async fn test_carts_are_per_visitor() {
    let server = TestServer::start().await;
    let shopper = server.client();
    let browser = server.client();

    shopper
        .get(server.url("/add_to_cart/cran"))
        .send()
        .await
        .unwrap();

    let (_, text) = body(&browser, &server.url("/cart")).await;
    assert!(text.contains(r#"<td class="cart-total">$0.00</td>"#));
}

#[tokio::test]
async fn test_flash_notice_is_shown_once() {
    let server = TestServer::start().await;
    let client = server.client();

    client
        .get(server.url("/add_to_cart/cran"))
        .send()
        .await
        .unwrap();

    let (_, first) = body(&client, &server.url("/cart")).await;
    assert!(first.contains("You successfully added the Crenshaw to your cart!"));

    let (_, second) = body(&client, &server.url("/cart")).await;
    assert!(!second.contains("You successfully added"));
}

#[tokio::test]
async fn test_unknown_melon_is_not_found() {
    let server = TestServer::start().await;
    let (status, text) = body(&server.client(), &server.url("/melon/doesnotexist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(text.to_lowercase().contains("not found"));
}

#[tokio::test]
async fn test_checkout_redirects_to_melons() {
    let server = TestServer::start().await;
    let client = server.client();

    let response = client.get(server.url("/checkout")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/melons");

    let (_, text) = body(&client, &server.url("/melons")).await;
    assert!(text.contains(CHECKOUT_NOTICE));
}

#[tokio::test]
async fn test_login_and_logout() {
    let server = TestServer::start().await;
    let client = server.client();

    let response = client
        .post(server.url("/login"))
        .form(&[("email", "mel@ubermelon.com"), ("password", "melon-patch-42")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/melons");

    let (_, text) = body(&client, &server.url("/melons")).await;
    assert!(text.contains("Welcome back, Mel!"));
    assert!(text.contains("Hello, Mel"));

    let response = client.post(server.url("/logout")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (_, text) = body(&client, &server.url("/melons")).await;
    assert!(!text.contains("Hello, Mel"));
}

#[tokio::test]
async fn test_login_failure_message_is_uniform() {
    let server = TestServer::start().await;

    for (email, password) in [
        ("mel@ubermelon.com", "not-the-password"),
        ("stranger@ubermelon.com", "melon-patch-42"),
    ] {
        let client = server.client();
        let response = client
            .post(server.url("/login"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/login");

        let (_, text) = body(&client, &server.url("/login")).await;
        assert!(text.contains(LOGIN_FAILED_NOTICE));
    }
}

#[tokio::test]
async fn test_file_backed_catalog_and_customers() {
    let catalog = write_temp_file(
        "melons.txt",
        "# id|melon_type|common_name|price|image_url|color|seedless\n\
         gala|Cantaloupe|Galia|4.20||green|false\n",
    );
    let customers = write_temp_file("customers.txt", "Ada|Rind|ada@example.com|seeds-everywhere\n");

    let mut config = test_config();
    config.catalog_path = Some(catalog);
    config.customers_path = Some(customers);

    let server = TestServer::start_with(config).await;
    let client = server.client();

    let (_, text) = body(&client, &server.url("/melons")).await;
    assert!(text.contains("Galia"));
    assert!(!text.contains("Crenshaw"));

    client
        .post(server.url("/login"))
        .form(&[("email", "ada@example.com"), ("password", "seeds-everywhere")])
        .send()
        .await
        .unwrap();
    let (_, text) = body(&client, &server.url("/melons")).await;
    assert!(text.contains("Welcome back, Ada!"));
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let server = TestServer::start().await;
    let response = server
        .client()
        .get(server.url("/melons"))
        .send()
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.contains_key("x-request-id"));
}
