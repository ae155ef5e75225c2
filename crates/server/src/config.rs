//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHEETS_ENDPOINT` - Base URL of the tabular-store HTTP API
//! - `SHEETS_DOCUMENT` - Document (spreadsheet) identifier
//! - `SHEETS_API_TOKEN` - Bearer token for the tabular store
//! - `VALIDADE_BASE_URL` - Public URL for the application
//!
//! ## Optional
//! - `VALIDADE_HOST` - Bind address (default: 127.0.0.1)
//! - `VALIDADE_PORT` - Listen port (default: 3000)
//! - `SMTP_RELAY` - SMTP relay host for report delivery
//! - `SMTP_USERNAME` - SMTP username
//! - `SMTP_PASSWORD` - SMTP password
//! - `REPORT_FROM` - From address for report emails
//! - `SENTRY_DSN` - Sentry error tracking DSN
//!
//! When no SMTP relay is configured the report service runs in mock mode
//! and logs reports instead of sending them.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

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
    #[error("Incomplete SMTP configuration: {0} is set but {1} is missing")]
    IncompleteSmtp(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the application
    pub base_url: String,
    /// Tabular store configuration
    pub sheets: SheetsConfig,
    /// SMTP configuration for report delivery; `None` enables mock mode
    pub smtp: Option<SmtpConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Tabular store API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct SheetsConfig {
    /// Base URL of the store API (e.g., <https://sheets.internal/api>)
    pub endpoint: String,
    /// Document identifier holding the three worksheets
    pub document: String,
    /// Bearer token (server-side only)
    pub api_token: SecretString,
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("endpoint", &self.endpoint)
            .field("document", &self.document)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

/// SMTP relay configuration for the report service.
#[derive(Clone)]
pub struct SmtpConfig {
    /// Relay hostname
    pub relay: String,
    /// Relay username
    pub username: String,
    /// Relay password
    pub password: SecretString,
    /// From address for outgoing reports
    pub from: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("relay", &self.relay)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from", &self.from)
            .finish()
    }
}

impl ServerConfig {
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

        let host = get_env_or_default("VALIDADE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("VALIDADE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("VALIDADE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("VALIDADE_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("VALIDADE_BASE_URL")?;

        let sheets = SheetsConfig::from_env()?;
        let smtp = SmtpConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            base_url,
            sheets,
            smtp,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SheetsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: get_required_env("SHEETS_ENDPOINT")?,
            document: get_required_env("SHEETS_DOCUMENT")?,
            api_token: get_validated_secret("SHEETS_API_TOKEN")?,
        })
    }
}

impl SmtpConfig {
    /// Load the SMTP block. Returns `Ok(None)` when `SMTP_RELAY` is unset;
    /// a partially configured block is an error rather than silent mock mode.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(relay) = get_optional_env("SMTP_RELAY") else {
            return Ok(None);
        };

        let require = |key: &str| {
            get_optional_env(key)
                .ok_or_else(|| ConfigError::IncompleteSmtp("SMTP_RELAY".to_string(), key.to_string()))
        };

        Ok(Some(Self {
            relay,
            username: require("SMTP_USERNAME")?,
            password: SecretString::from(require("SMTP_PASSWORD")?),
            from: require("REPORT_FROM")?,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
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

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real API tokens have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token issued by the store."
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

    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            sheets: SheetsConfig {
                endpoint: "https://sheets.internal/api".to_string(),
                document: "doc-123".to_string(),
                api_token: SecretString::from("aB3$xY9!mK2@nL5#"),
            },
            smtp: None,
            sentry_dsn: None,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_sheets_config_debug_redacts_token() {
        let config = test_config();
        let debug_output = format!("{:?}", config.sheets);

        assert!(debug_output.contains("sheets.internal"));
        assert!(debug_output.contains("doc-123"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("aB3$xY9!mK2@nL5#"));
    }

    #[test]
    fn test_smtp_config_debug_redacts_password() {
        let smtp = SmtpConfig {
            relay: "smtp.example.com".to_string(),
            username: "reports".to_string(),
            password: SecretString::from("super_secret_smtp_pass"),
            from: "reports@example.com".to_string(),
        };
        let debug_output = format!("{smtp:?}");

        assert!(debug_output.contains("smtp.example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_smtp_pass"));
    }
}
