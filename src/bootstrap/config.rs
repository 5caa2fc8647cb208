//! Application configuration from the environment.

use std::env;

/// Environment variable naming the bind address.
pub const ADDR_VAR: &str = "NAUTILUS_ADDR";

/// Returns the value of the environment variable `key`, or `fallback` when
/// the variable is unset or empty.
///
/// # Examples
///
/// ```
/// use nautilus::bootstrap::env_or;
///
/// let addr = env_or("NAUTILUS_DOCTEST_UNSET", "127.0.0.1:8080");
/// assert_eq!(addr, "127.0.0.1:8080");
/// ```
pub fn env_or(key: &str, fallback: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => fallback.to_owned(),
    }
}

/// Settings for the serving loop.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP address the application binds to.
    pub address: String,
    /// Initial per-connection read buffer capacity.
    pub read_buffer_size: usize,
    /// Maximum size of a buffered request before it is rejected with 413.
    pub max_request_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8080".to_owned(),
            read_buffer_size: 4096,
            max_request_size: 8 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Builds a config taking the bind address from [`ADDR_VAR`] when set.
    pub fn from_env() -> Self {
        Self {
            address: env_or(ADDR_VAR, "127.0.0.1:8080"),
            ..Self::default()
        }
    }
}
