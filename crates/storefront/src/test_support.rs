//! Router-level test harness.
//!
//! Drives the full application through `tower::ServiceExt::oneshot`, carrying
//! the session cookie between requests like a browser would.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use secrecy::SecretString;
use tower::ServiceExt;

use crate::config::StorefrontConfig;
use crate::state::AppState;
use crate::store::{Catalog, CustomerDirectory};

pub const TEST_SECRET: &str =
    "q7F!m2Zr9@Lk4#Wp8$Tx3%Vb6^Nc1&Hd5*Gs0(Jy2)Ke7-Ra4+Uf9=Oi3~Pl8_Mw6";

pub fn test_state() -> AppState {
    let config = StorefrontConfig::new(SecretString::from(TEST_SECRET)).unwrap();
    let customers =
        CustomerDirectory::parse("Mel|Melitas|mel@ubermelon.com|melon-patch-42").unwrap();
    AppState::new(config, Catalog::builtin(), customers)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// A cookie-carrying client for one visitor.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    pub fn new() -> Self {
        Self {
            app: crate::app(test_state()).unwrap(),
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::builder().uri(uri);
        self.send(request, Body::empty()).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(request, Body::from(body)).await
    }

    async fn send(&mut self, mut request: axum::http::request::Builder, body: Body) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = self
            .app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}
