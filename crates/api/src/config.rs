//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREHOUSE_MONGODB_URI` - MongoDB connection string (falls back to
//!   `MONGODB_URI`). Not needed when `STOREHOUSE_STORE=memory`.
//!
//! ## Optional
//! - `STOREHOUSE_DATABASE` - Database name (default: storehouse)
//! - `STOREHOUSE_STORE` - `mongo` or `memory` (default: mongo)
//! - `STOREHOUSE_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREHOUSE_PORT` - Listen port (default: 3000)
//! - `STOREHOUSE_API_TOKENS` - Comma-separated bearer tokens (min 32 chars,
//!   high entropy). Unset disables authentication.
//! - `STOREHOUSE_VERIFY_REFERENCES` - Reject writes referencing missing
//!   documents (default: false)
//! - `STOREHOUSE_LOG_JSON` - Emit JSON log lines
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance sample rate (default: 0.1)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::services::ReferencePolicy;

const MIN_TOKEN_LENGTH: usize = 32;
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
}

/// Which document store backs the service.
#[derive(Clone)]
pub enum StoreConfig {
    /// A MongoDB database.
    Mongo {
        /// Connection string (may contain credentials)
        uri: SecretString,
        /// Database holding the four collections
        database: String,
    },
    /// A process-local store that is lost on exit.
    Memory,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mongo { database, .. } => f
                .debug_struct("Mongo")
                .field("uri", &"[REDACTED]")
                .field("database", database)
                .finish(),
            Self::Memory => f.write_str("Memory"),
        }
    }
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    /// Sentry DSN; tracking is disabled when unset
    pub dsn: Option<String>,
    /// Environment tag (e.g. production)
    pub environment: Option<String>,
    /// Fraction of errors reported
    pub sample_rate: f32,
    /// Fraction of transactions traced
    pub traces_sample_rate: f32,
}

/// Service configuration.
///
/// Implements `Debug` manually to redact the API tokens.
#[derive(Clone)]
pub struct StorehouseConfig {
    /// Document store backing the collections
    pub store: StoreConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Accepted bearer tokens; empty disables authentication
    pub api_tokens: Vec<SecretString>,
    /// How strictly references are checked on writes
    pub reference_policy: ReferencePolicy,
    /// Emit JSON log lines instead of text
    pub log_json: bool,
    /// Sentry configuration
    pub sentry: SentryConfig,
}

impl std::fmt::Debug for StorehouseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorehouseConfig")
            .field("store", &self.store)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_tokens", &format!("[{} REDACTED]", self.api_tokens.len()))
            .field("reference_policy", &self.reference_policy)
            .field("log_json", &self.log_json)
            .field("sentry", &self.sentry)
            .finish()
    }
}

impl StorehouseConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if tokens fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let store = StoreConfig::from_env()?;
        let host = get_env_or_default("STOREHOUSE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREHOUSE_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREHOUSE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREHOUSE_PORT".to_string(), e.to_string())
            })?;
        let api_tokens = match get_optional_env("STOREHOUSE_API_TOKENS") {
            Some(raw) => parse_api_tokens(&raw, "STOREHOUSE_API_TOKENS")?,
            None => Vec::new(),
        };
        let reference_policy = if get_bool_env("STOREHOUSE_VERIFY_REFERENCES")? {
            ReferencePolicy::MustExist
        } else {
            ReferencePolicy::WellFormed
        };
        let log_json = get_bool_env("STOREHOUSE_LOG_JSON")?;
        let sentry = SentryConfig::from_env()?;

        Ok(Self {
            store,
            host,
            port,
            api_tokens,
            reference_policy,
            log_json,
            sentry,
        })
    }

    /// Configuration for an in-memory instance with no authentication.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            store: StoreConfig::Memory,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            api_tokens: Vec::new(),
            reference_policy: ReferencePolicy::default(),
            log_json: false,
            sentry: SentryConfig::default(),
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StoreConfig {
    /// Load the store selection from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `STOREHOUSE_STORE` is unknown or the
    /// MongoDB URI is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        match get_env_or_default("STOREHOUSE_STORE", "mongo").as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo {
                uri: get_mongodb_uri("STOREHOUSE_MONGODB_URI")?,
                database: get_env_or_default("STOREHOUSE_DATABASE", "storehouse"),
            }),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::InvalidEnvVar(
                "STOREHOUSE_STORE".to_string(),
                format!("unknown store '{other}' (expected 'mongo' or 'memory')"),
            )),
        }
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: get_rate_env("SENTRY_SAMPLE_RATE", 1.0)?,
            traces_sample_rate: get_rate_env("SENTRY_TRACES_SAMPLE_RATE", 0.1)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get MongoDB URI with fallback to generic `MONGODB_URI`.
fn get_mongodb_uri(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("MONGODB_URI") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get a boolean flag; unset means false.
fn get_bool_env(key: &str) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(false), |value| parse_bool(&value, key))
}

fn parse_bool(value: &str, key: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Get a sample rate in `0.0..=1.0`.
fn get_rate_env(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Split a comma-separated token list and validate each token.
fn parse_api_tokens(raw: &str, var_name: &str) -> Result<Vec<SecretString>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            let secret = SecretString::from(token.to_string());
            validate_token_length(&secret, var_name)?;
            validate_secret_strength(token, var_name)?;
            Ok(secret)
        })
        .collect()
}

/// Validate that a token meets minimum length requirements.
fn validate_token_length(token: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = token.expose_secret();
    if value.len() < MIN_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "tokens must be at least {} characters (got {})",
                MIN_TOKEN_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
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
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated token."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const STRONG_TOKEN: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";
    const OTHER_STRONG_TOKEN: &str = "Zq8!vN4@hJ1#kW6$dF3%gS9^tY2&bM7*";

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
        let result = validate_secret_strength("your-api-token-goes-right-here-ok", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength(&"ab".repeat(20), "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_parse_api_tokens_accepts_strong_list() {
        let raw = format!(" {STRONG_TOKEN} , {OTHER_STRONG_TOKEN},");
        let tokens = parse_api_tokens(&raw, "TEST_VAR").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].expose_secret(), STRONG_TOKEN);
    }

    #[test]
    fn test_parse_api_tokens_rejects_short_token() {
        let raw = format!("{STRONG_TOKEN},aB3$xY9!");
        let result = parse_api_tokens(&raw, "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE", "X").unwrap());
        assert!(parse_bool("1", "X").unwrap());
        assert!(!parse_bool("off", "X").unwrap());
        assert!(parse_bool("maybe", "X").is_err());
    }

    #[test]
    fn test_in_memory_defaults() {
        let config = StorehouseConfig::in_memory();
        assert!(matches!(config.store, StoreConfig::Memory));
        assert!(config.api_tokens.is_empty());
        assert_eq!(config.reference_policy, ReferencePolicy::WellFormed);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_debug_redacts_uri() {
        let store = StoreConfig::Mongo {
            uri: SecretString::from("mongodb://admin:hunter2@db:27017".to_string()),
            database: "storehouse".to_string(),
        };
        let debug = format!("{store:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("storehouse"));
    }
}
