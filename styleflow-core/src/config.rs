//! Runtime configuration.

use serde::Deserialize;

/// Environment variable selecting development behavior (`development`).
pub const ENV_MODE: &str = "STYLEFLOW_ENV";
/// Environment variable overriding the default root font size.
pub const ENV_DEFAULT_REM: &str = "STYLEFLOW_DEFAULT_REM";

/// Settings fixed when a [`StyleRuntime`](crate::StyleRuntime) is built.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuntimeConfig {
    /// Log extraction warnings when they are surfaced.
    pub dev_mode: bool,
    /// Root font size in pixels used by the native rem bridge and by reset.
    pub default_rem: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            dev_mode: cfg!(debug_assertions),
            default_rem: 14.0,
        }
    }
}

impl RuntimeConfig {
    /// Defaults, overridden by `STYLEFLOW_ENV` and `STYLEFLOW_DEFAULT_REM`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(mode) = lookup(ENV_MODE) {
            config.dev_mode = mode == "development";
        }
        if let Some(rem) = lookup(ENV_DEFAULT_REM) {
            match rem.trim().parse::<f64>() {
                Ok(value) if value.is_finite() && value > 0.0 => config.default_rem = value,
                _ => tracing::warn!(value = %rem, "ignoring invalid {}", ENV_DEFAULT_REM),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            (ENV_MODE, "development"),
            (ENV_DEFAULT_REM, "16"),
        ]));
        assert!(config.dev_mode);
        assert_eq!(config.default_rem, 16.0);

        let config = RuntimeConfig::from_lookup(lookup(&[(ENV_MODE, "production")]));
        assert!(!config.dev_mode);
    }

    #[test]
    fn invalid_rem_keeps_default() {
        let config = RuntimeConfig::from_lookup(lookup(&[(ENV_DEFAULT_REM, "huge")]));
        assert_eq!(config.default_rem, 14.0);
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: RuntimeConfig = serde_json::from_str(r#"{ "devMode": true }"#).unwrap();
        assert!(config.dev_mode);
        assert_eq!(config.default_rem, 14.0);
    }
}
