pub mod tracing;

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Runtime environment the provisioner is launched in
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        if app_env.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Structured JSON logs for log shippers; pretty output otherwise
    pub fn json_logs(&self) -> bool {
        self.is_production()
    }
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Helper to load environment variable with a default value
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Helper to load environment variable or return error
pub fn env_required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Load the first variable that is set among `keys`, falling back to `default`
pub fn env_first_or_default(keys: &[&str], default: &str) -> String {
    keys.iter()
        .find_map(|key| env::var(key).ok())
        .unwrap_or_else(|| default.to_string())
}

/// Load and parse an environment variable, using `default` when it is unset
pub fn env_parse_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults_to_development() {
        temp_env::with_var_unset("APP_ENV", || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Development);
            assert!(env.is_development());
            assert!(!env.json_logs());
        });
    }

    #[test]
    fn test_environment_production_case_insensitive() {
        temp_env::with_var("APP_ENV", Some("PRODUCTION"), || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Production);
            assert!(env.json_logs());
        });
    }

    #[test]
    fn test_environment_unknown_defaults_to_development() {
        temp_env::with_var("APP_ENV", Some("staging"), || {
            assert_eq!(Environment::from_env(), Environment::Development);
        });
    }

    #[test]
    fn test_env_or_default() {
        temp_env::with_var("PROVISIONER_TEST_VAR", Some("set"), || {
            assert_eq!(env_or_default("PROVISIONER_TEST_VAR", "fallback"), "set");
        });
        temp_env::with_var_unset("PROVISIONER_TEST_VAR", || {
            assert_eq!(env_or_default("PROVISIONER_TEST_VAR", "fallback"), "fallback");
        });
    }

    #[test]
    fn test_env_required_missing() {
        temp_env::with_var_unset("MISSING_REQUIRED", || {
            let err = env_required("MISSING_REQUIRED").unwrap_err();
            assert!(err.to_string().contains("MISSING_REQUIRED"));
            assert!(err.to_string().contains("required"));
        });
    }

    #[test]
    fn test_env_first_or_default_prefers_earlier_keys() {
        temp_env::with_vars(
            [("PRIMARY_KEY", Some("primary")), ("ALIAS_KEY", Some("alias"))],
            || {
                let value = env_first_or_default(&["PRIMARY_KEY", "ALIAS_KEY"], "none");
                assert_eq!(value, "primary");
            },
        );
        temp_env::with_vars(
            [("PRIMARY_KEY", None), ("ALIAS_KEY", Some("alias"))],
            || {
                let value = env_first_or_default(&["PRIMARY_KEY", "ALIAS_KEY"], "none");
                assert_eq!(value, "alias");
            },
        );
        temp_env::with_vars_unset(["PRIMARY_KEY", "ALIAS_KEY"], || {
            let value = env_first_or_default(&["PRIMARY_KEY", "ALIAS_KEY"], "none");
            assert_eq!(value, "none");
        });
    }

    #[test]
    fn test_env_parse_or() {
        temp_env::with_var("POOL_SIZE", Some("42"), || {
            assert_eq!(env_parse_or::<u32>("POOL_SIZE", 7).unwrap(), 42);
        });
        temp_env::with_var_unset("POOL_SIZE", || {
            assert_eq!(env_parse_or::<u32>("POOL_SIZE", 7).unwrap(), 7);
        });
        temp_env::with_var("POOL_SIZE", Some("many"), || {
            let err = env_parse_or::<u32>("POOL_SIZE", 7).unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "POOL_SIZE"));
        });
    }
}
