//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `QUOTEBOX_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `SHOPIFY_API_KEY` - App client ID, the expected `aud` of session tokens
//! - `SHOPIFY_API_SECRET` - App client secret, signs session tokens
//!
//! ## Optional
//! - `QUOTEBOX_HOST` - Bind address (default: 127.0.0.1)
//! - `QUOTEBOX_PORT` - Listen port (default: 3002)
//! - `QUOTEBOX_BASE_URL` - Public URL of the app (default: `http://{host}:{port}`)
//! - `QUOTEBOX_CORS_ORIGINS` - Comma-separated storefront origins allowed to
//!   call `POST /create-quote` (default: any origin)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Optional (SMTP - enables new quote notifications)
//! - `SMTP_HOST`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `SMTP_FROM` - all four or none
//! - `SMTP_PORT` - SMTP port (default: 587)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_PORT: &str = "3002";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
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

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the app
    pub base_url: String,
    /// Shopify app credentials
    pub shopify: ShopifyAppConfig,
    /// Origins allowed to call the storefront endpoint; empty means any
    pub cors_origins: Vec<String>,
    /// SMTP configuration (optional - enables notifications)
    pub email: Option<EmailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Shopify app credentials.
///
/// Implements `Debug` manually to redact the API secret.
#[derive(Clone)]
pub struct ShopifyAppConfig {
    /// App client ID (public)
    pub api_key: String,
    /// App client secret, the HS256 key for session tokens
    pub api_secret: SecretString,
}

impl std::fmt::Debug for ShopifyAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyAppConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// SMTP configuration for notification emails.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP port
    pub smtp_port: u16,
    /// SMTP authentication username
    pub smtp_username: String,
    /// SMTP authentication password
    pub smtp_password: SecretString,
    /// Sender address for outgoing mail
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("QUOTEBOX_DATABASE_URL")?;
        let host = get_env_or_default("QUOTEBOX_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("QUOTEBOX_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("QUOTEBOX_PORT", DEFAULT_PORT)
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("QUOTEBOX_PORT".to_string(), e.to_string()))?;
        let base_url = get_optional_env("QUOTEBOX_BASE_URL")
            .unwrap_or_else(|| format!("http://{}", SocketAddr::new(host, port)));
        let cors_origins = get_optional_env("QUOTEBOX_CORS_ORIGINS")
            .map(|raw| parse_origin_list(&raw))
            .unwrap_or_default();

        let shopify = ShopifyAppConfig::from_env()?;
        let email = EmailConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            shopify,
            cors_origins,
            email,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the SMTP configuration, if notifications are enabled.
    #[must_use]
    pub const fn email(&self) -> Option<&EmailConfig> {
        self.email.as_ref()
    }
}

impl ShopifyAppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: get_required_env("SHOPIFY_API_KEY")?,
            api_secret: get_validated_secret("SHOPIFY_API_SECRET")?,
        })
    }

    /// Returns the raw secret bytes used as the HS256 session token key.
    #[must_use]
    pub fn secret_bytes(&self) -> &[u8] {
        self.api_secret.expose_secret().as_bytes()
    }
}

impl EmailConfig {
    /// Load SMTP configuration from environment.
    ///
    /// Returns `Ok(None)` when no SMTP variable is set. A partial set is an
    /// error so a typo does not silently disable notifications.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let host = get_optional_env("SMTP_HOST");
        let username = get_optional_env("SMTP_USERNAME");
        let password = get_optional_env("SMTP_PASSWORD");
        let from = get_optional_env("SMTP_FROM");

        match (host, username, password, from) {
            (None, None, None, None) => Ok(None),
            (Some(smtp_host), Some(smtp_username), Some(password), Some(from_address)) => {
                let smtp_port = get_env_or_default("SMTP_PORT", "587")
                    .parse::<u16>()
                    .map_err(|e| {
                        ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string())
                    })?;
                validate_secret_strength(&password, "SMTP_PASSWORD")?;

                Ok(Some(Self {
                    smtp_host,
                    smtp_port,
                    smtp_username,
                    smtp_password: SecretString::from(password),
                    from_address,
                }))
            }
            _ => Err(ConfigError::InvalidEnvVar(
                "SMTP_*".to_string(),
                "SMTP_HOST, SMTP_USERNAME, SMTP_PASSWORD and SMTP_FROM must be set together"
                    .to_string(),
            )),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes.
fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
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
    let len = s.len() as f64;
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

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> AdminConfig {
        AdminConfig {
            database_url: SecretString::from("postgres://localhost/quotebox_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3002,
            base_url: "http://localhost:3002".to_string(),
            shopify: ShopifyAppConfig {
                api_key: "app-client-id".to_string(),
                api_secret: SecretString::from("shpss_super_private_value"),
            },
            cors_origins: Vec::new(),
            email: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-shopify-api-secret", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_origin_list() {
        let origins = parse_origin_list(" https://shop.example.com/ ,, https://acme.myshopify.com");
        assert_eq!(
            origins,
            vec![
                "https://shop.example.com".to_string(),
                "https://acme.myshopify.com".to_string()
            ]
        );
        assert!(parse_origin_list(" , ").is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3002);
    }

    #[test]
    fn test_shopify_app_config_debug_redacts_secret() {
        let debug_output = format!("{:?}", test_config().shopify);

        assert!(debug_output.contains("app-client-id"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("shpss_super_private_value"));
    }

    #[test]
    fn test_email_config_debug_redacts_password() {
        let config = EmailConfig {
            smtp_host: "smtp.mailhost.test".to_string(),
            smtp_port: 587,
            smtp_username: "mailer".to_string(),
            smtp_password: SecretString::from("very_private_smtp_pw"),
            from_address: "quotes@shop.test".to_string(),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("smtp.mailhost.test"));
        assert!(debug_output.contains("587"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("very_private_smtp_pw"));
    }
}
