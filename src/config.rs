//! Server configuration
//!
//! Settings are resolved per key in this order:
//! 1. Environment variables (`UTS_LSP_ADVISORY_DIAGNOSTICS`,
//!    `UTS_LSP_LOCAL_SYMBOL_COMPLETIONS`, `UTS_LSP_COMPILE_CACHE_CAPACITY`)
//! 2. LSP `initializationOptions` sent by the client
//! 3. Built-in defaults

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

pub const ENV_ADVISORY_DIAGNOSTICS: &str = "UTS_LSP_ADVISORY_DIAGNOSTICS";
pub const ENV_LOCAL_SYMBOL_COMPLETIONS: &str = "UTS_LSP_LOCAL_SYMBOL_COMPLETIONS";
pub const ENV_COMPILE_CACHE_CAPACITY: &str = "UTS_LSP_COMPILE_CACHE_CAPACITY";

const DEFAULT_COMPILE_CACHE_CAPACITY: usize = 64;

/// Tunables for the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerConfig {
    /// Publish Information-level lexical annotations alongside compiler diagnostics.
    pub advisory_diagnostics: bool,

    /// Append the document's own visible declarations to default completions.
    pub local_symbol_completions: bool,

    /// Number of compiled semantic models kept in the content-hash cache.
    pub compile_cache_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            advisory_diagnostics: true,
            local_symbol_completions: true,
            compile_cache_capacity: DEFAULT_COMPILE_CACHE_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Resolve configuration from the process environment and optional
    /// initialization options.
    pub fn from_env_or_default(init_options: Option<&Value>) -> Self {
        Self::resolve(|key| std::env::var(key).ok(), init_options)
    }

    /// Same as [`from_env_or_default`](Self::from_env_or_default) with an
    /// injectable environment lookup.
    pub fn resolve<F>(env: F, init_options: Option<&Value>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = init_options
            .and_then(|options| match serde_json::from_value::<ServerConfig>(options.clone()) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!("Ignoring malformed initializationOptions: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        if let Some(value) = env(ENV_ADVISORY_DIAGNOSTICS).and_then(|v| parse_bool(ENV_ADVISORY_DIAGNOSTICS, &v)) {
            config.advisory_diagnostics = value;
        }
        if let Some(value) = env(ENV_LOCAL_SYMBOL_COMPLETIONS).and_then(|v| parse_bool(ENV_LOCAL_SYMBOL_COMPLETIONS, &v)) {
            config.local_symbol_completions = value;
        }
        if let Some(raw) = env(ENV_COMPILE_CACHE_CAPACITY) {
            match raw.trim().parse::<usize>() {
                Ok(capacity) => config.compile_cache_capacity = capacity,
                Err(_) => warn!("Unknown value '{}' for {}, keeping {}", raw, ENV_COMPILE_CACHE_CAPACITY, config.compile_cache_capacity),
            }
        }

        config.compile_cache_capacity = config.compile_cache_capacity.max(1);
        config
    }
}

fn parse_bool(key: &str, raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            warn!("Unknown value '{}' for {}, ignoring", other, key);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::resolve(no_env, None);
        assert_eq!(config, ServerConfig::default());
        assert!(config.advisory_diagnostics);
        assert!(config.local_symbol_completions);
        assert_eq!(config.compile_cache_capacity, 64);
    }

    #[test]
    fn test_init_options_override_defaults() {
        let options = json!({ "advisoryDiagnostics": false, "compileCacheCapacity": 8 });
        let config = ServerConfig::resolve(no_env, Some(&options));
        assert!(!config.advisory_diagnostics);
        assert!(config.local_symbol_completions);
        assert_eq!(config.compile_cache_capacity, 8);
    }

    #[test]
    fn test_env_overrides_init_options() {
        let options = json!({ "advisoryDiagnostics": false });
        let env = |key: &str| (key == ENV_ADVISORY_DIAGNOSTICS).then(|| "true".to_string());
        let config = ServerConfig::resolve(env, Some(&options));
        assert!(config.advisory_diagnostics);
    }

    #[test]
    fn test_malformed_values_are_ignored() {
        let options = json!({ "compileCacheCapacity": "many" });
        let env = |key: &str| match key {
            ENV_LOCAL_SYMBOL_COMPLETIONS => Some("maybe".to_string()),
            ENV_COMPILE_CACHE_CAPACITY => Some("lots".to_string()),
            _ => None,
        };
        let config = ServerConfig::resolve(env, Some(&options));
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_capacity_never_zero() {
        let env = |key: &str| (key == ENV_COMPILE_CACHE_CAPACITY).then(|| "0".to_string());
        assert_eq!(ServerConfig::resolve(env, None).compile_cache_capacity, 1);
    }
}
