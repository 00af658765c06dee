//! End-to-end test harness for the Ubermelon storefront.
//!
//! Each [`TestServer`] binds the real application to an ephemeral port on
//! 127.0.0.1 and talks to it over HTTP with a cookie-keeping client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ubermelon-integration-tests
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::{Client, redirect::Policy};
use secrecy::SecretString;
use ubermelon_storefront::{config::StorefrontConfig, state::AppState};

/// Session secret used by every test server.
pub const TEST_SECRET: &str =
    "q7F!m2Zr9@Lk4#Wp8$Tx3%Vb6^Nc1&Hd5*Gs0(Jy2)Ke7-Ra4+Uf9=Oi3~Pl8_Mw6";

/// A storefront running in-process for the duration of a test.
pub struct TestServer {
    addr: SocketAddr,
}

impl TestServer {
    /// Start a server with the built-in catalog and demo customers.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn start() -> Self {
        Self::start_with(test_config()).await
    }

    /// Start a server from an explicit configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configured data cannot be loaded or the port cannot be
    /// bound.
    pub async fn start_with(config: StorefrontConfig) -> Self {
        let state = AppState::from_config(config).expect("Failed to load storefront data");
        let app = ubermelon_storefront::app(state).expect("Failed to build app");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to ephemeral port");
        let addr = listener.local_addr().expect("Listener has no address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self { addr }
    }

    /// Absolute URL for a path on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A fresh visitor: own cookie jar, redirects not followed.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client")
    }
}

/// Configuration with defaults and the test secret.
///
/// # Panics
///
/// Panics if the test secret is rejected.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig::new(SecretString::from(TEST_SECRET)).expect("Test secret rejected")
}

/// Write `contents` to a uniquely named file in the temp directory.
///
/// # Panics
///
/// Panics if the file cannot be written.
#[must_use]
pub fn write_temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ubermelon-{}-{name}", uuid::Uuid::new_v4()));
    std::fs::write(&path, contents).expect("Failed to write temp file");
    path
}
