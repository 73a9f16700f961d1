use crate::ConfigError;
use std::env;

/// Load a variable from the environment
pub fn load_string(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::missing(key))
}

/// Load a variable from the environment
pub fn load_string_opt(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Load a variable from the environment, falling back to a default when the
/// variable is unset. A set but unparseable variable is an error.
pub fn load_u64_or(key: &str, default: u64) -> Result<u64, ConfigError> {
    match load_string_opt(key) {
        Some(val) => val.parse::<u64>().map_err(Into::into),
        None => Ok(default),
    }
}
