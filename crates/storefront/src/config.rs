//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `UBERMELON_SESSION_SECRET` - Session cookie signing secret (min 64 chars, high entropy)
//!
//! ## Optional
//! - `UBERMELON_HOST` - Bind address (default: 127.0.0.1)
//! - `UBERMELON_PORT` - Listen port (default: 5000)
//! - `UBERMELON_BASE_URL` - Public URL for the storefront (default: `http://localhost:5000`)
//! - `UBERMELON_CATALOG_PATH` - Pipe-delimited melon catalog file (default: built-in catalog)
//! - `UBERMELON_CUSTOMERS_PATH` - Pipe-delimited customer file (default: built-in customers)
//! - `UBERMELON_STATIC_DIR` - Directory served under `/static` (default: crates/storefront/static)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// The cookie signing key needs at least 64 bytes of material.
const MIN_SESSION_SECRET_LENGTH: usize = 64;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_STATIC_DIR: &str = "crates/storefront/static";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "coolstory",
    "xxx",
    "todo",
    "fixme",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session cookie signing secret
    pub session_secret: SecretString,
    /// Melon catalog file; `None` uses the built-in catalog
    pub catalog_path: Option<PathBuf>,
    /// Customer directory file; `None` uses the built-in customers
    pub customers_path: Option<PathBuf>,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Build a configuration with defaults for everything except the secret.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InsecureSecret` if the secret is too short, looks
    /// like a placeholder, or has too little entropy.
    pub fn new(session_secret: SecretString) -> Result<Self, ConfigError> {
        validate_session_secret(&session_secret, "UBERMELON_SESSION_SECRET")?;

        Ok(Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            base_url: format!("http://localhost:{DEFAULT_PORT}"),
            session_secret,
            catalog_path: None,
            customers_path: None,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            sentry_dsn: None,
            sentry_environment: None,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the session secret fails validation (length, placeholder detection,
    /// entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let session_secret = get_required_secret("UBERMELON_SESSION_SECRET")?;
        let mut config = Self::new(session_secret)?;

        if let Some(host) = get_optional_env("UBERMELON_HOST") {
            config.host = host.parse::<IpAddr>().map_err(|e| {
                ConfigError::InvalidEnvVar("UBERMELON_HOST".to_string(), e.to_string())
            })?;
        }
        if let Some(port) = get_optional_env("UBERMELON_PORT") {
            config.port = port.parse::<u16>().map_err(|e| {
                ConfigError::InvalidEnvVar("UBERMELON_PORT".to_string(), e.to_string())
            })?;
            config.base_url = format!("http://localhost:{}", config.port);
        }
        if let Some(base_url) = get_optional_env("UBERMELON_BASE_URL") {
            config.base_url = base_url;
        }

        config.catalog_path = get_optional_env("UBERMELON_CATALOG_PATH").map(PathBuf::from);
        config.customers_path = get_optional_env("UBERMELON_CUSTOMERS_PATH").map(PathBuf::from);
        if let Some(static_dir) = get_optional_env("UBERMELON_STATIC_DIR") {
            config.static_dir = PathBuf::from(static_dir);
        }

        config.sentry_dsn = get_optional_env("SENTRY_DSN");
        config.sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(config)
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    std::env::var(key)
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Validate length, placeholder patterns and entropy of the session secret.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    validate_secret_strength(value, var_name)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// 64+ characters, no placeholder patterns, high entropy.
    const STRONG_SECRET: &str =
        "q7F!m2Zr9@Lk4#Wp8$Tx3%Vb6^Nc1&Hd5*Gs0(Jy2)Ke7-Ra4+Uf9=Oi3~Pl8_Mw6";

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("mmmmmmm") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_new_accepts_strong_secret() {
        assert!(STRONG_SECRET.len() >= MIN_SESSION_SECRET_LENGTH);
        let config = StorefrontConfig::new(SecretString::from(STRONG_SECRET)).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.catalog_path.is_none());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_new_rejects_short_secret() {
        let result = StorefrontConfig::new(SecretString::from("q7F!m2Zr9@Lk4#Wp"));
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_new_rejects_flask_style_placeholder() {
        let secret = format!("coolstorybruh{STRONG_SECRET}");
        let result = StorefrontConfig::new(SecretString::from(secret));
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_new_rejects_low_entropy() {
        let result = StorefrontConfig::new(SecretString::from("ab".repeat(40)));
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_socket_addr() {
        let mut config = StorefrontConfig::new(SecretString::from(STRONG_SECRET)).unwrap();
        config.port = 8080;
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_https_base_url_is_secure() {
        let mut config = StorefrontConfig::new(SecretString::from(STRONG_SECRET)).unwrap();
        config.base_url = "https://ubermelon.test".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = StorefrontConfig::new(SecretString::from(STRONG_SECRET)).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains(STRONG_SECRET));
    }

    /// All environment mutation lives in this one test so parallel tests
    /// never observe a half-set environment.
    #[test]
    #[allow(unsafe_code)]
    fn test_from_env_secret_handling() {
        const VAR: &str = "UBERMELON_SESSION_SECRET";

        // SAFETY: no other test reads or writes these variables.
        unsafe { std::env::remove_var(VAR) };
        let result = StorefrontConfig::from_env();
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(ref name)) if name == VAR));

        // SAFETY: as above.
        unsafe { std::env::set_var(VAR, "changeme") };
        let result = StorefrontConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));

        // SAFETY: as above.
        unsafe {
            std::env::set_var(VAR, STRONG_SECRET);
            std::env::set_var("UBERMELON_PORT", "not-a-port");
        }
        let result = StorefrontConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(ref name, _)) if name == "UBERMELON_PORT"));

        // SAFETY: as above.
        unsafe {
            std::env::remove_var("UBERMELON_PORT");
            std::env::remove_var(VAR);
        }
    }
}
