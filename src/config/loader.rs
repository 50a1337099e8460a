//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{DestinationConfig, GateConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the human destination.
pub const ENV_HUMAN_URL: &str = "HUMAN_URL";
/// Environment variable holding the bot destination.
pub const ENV_BOT_URL: &str = "BOT_URL";
/// Environment variable overriding the listener address.
pub const ENV_BIND_ADDRESS: &str = "DECOY_BIND_ADDRESS";
/// Environment variable overriding the dispatch mode.
pub const ENV_MODE: &str = "DECOY_MODE";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid {var}: {reason}")]
    Env { var: &'static str, reason: String },
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A non-fatal configuration problem, reported once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Only one destination variable is set and no file pair exists to merge with.
    PartialDestinationEnv { set: &'static str, missing: &'static str },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::PartialDestinationEnv { set, missing } => write!(
                f,
                "{} is set but {} is not; destination pair left unconfigured",
                set, missing
            ),
        }
    }
}

/// A validated configuration plus the warnings raised while building it.
#[derive(Debug)]
pub struct Loaded {
    pub config: GateConfig,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration from an optional TOML file, apply environment
/// overrides, then validate.
pub fn load(path: Option<&Path>) -> Result<Loaded, ConfigError> {
    let config = match path {
        Some(path) => parse_file(path)?,
        None => GateConfig::default(),
    };
    let (config, warnings) = apply_overrides(config, |var| std::env::var(var).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(Loaded { config, warnings })
}

fn parse_file(path: &Path) -> Result<GateConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides through `lookup`.
///
/// `HUMAN_URL` and `BOT_URL` replace the file's destination pair only when
/// both resolve; a single one of them fills the gap left by the file.
pub fn apply_overrides<F>(
    mut config: GateConfig,
    lookup: F,
) -> Result<(GateConfig, Vec<ConfigWarning>), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
    let mut warnings = Vec::new();

    let human = non_empty(ENV_HUMAN_URL);
    let bot = non_empty(ENV_BOT_URL);
    match (human, bot, config.destinations.take()) {
        (Some(human_url), Some(bot_url), _) => {
            config.destinations = Some(DestinationConfig { human_url, bot_url });
        }
        (Some(human_url), None, Some(existing)) => {
            config.destinations = Some(DestinationConfig {
                human_url,
                bot_url: existing.bot_url,
            });
        }
        (None, Some(bot_url), Some(existing)) => {
            config.destinations = Some(DestinationConfig {
                human_url: existing.human_url,
                bot_url,
            });
        }
        (None, None, existing) => config.destinations = existing,
        (Some(_), None, None) => warnings.push(ConfigWarning::PartialDestinationEnv {
            set: ENV_HUMAN_URL,
            missing: ENV_BOT_URL,
        }),
        (None, Some(_), None) => warnings.push(ConfigWarning::PartialDestinationEnv {
            set: ENV_BOT_URL,
            missing: ENV_HUMAN_URL,
        }),
    }

    if let Some(addr) = non_empty(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }

    if let Some(mode) = non_empty(ENV_MODE) {
        config.dispatch.mode = mode.parse().map_err(|reason| ConfigError::Env {
            var: ENV_MODE,
            reason,
        })?;
    }

    Ok((config, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DispatchMode;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn env_pair_overrides_file() {
        let mut config = GateConfig::default();
        config.destinations = Some(DestinationConfig {
            human_url: "https://old-human.example".into(),
            bot_url: "https://old-bot.example".into(),
        });

        let (config, warnings) = apply_overrides(
            config,
            env(&[
                (ENV_HUMAN_URL, "https://real.example"),
                (ENV_BOT_URL, "https://decoy.example"),
            ]),
        )
        .unwrap();

        assert!(warnings.is_empty());
        let destinations = config.destinations.unwrap();
        assert_eq!(destinations.human_url, "https://real.example");
        assert_eq!(destinations.bot_url, "https://decoy.example");
    }

    #[test]
    fn single_env_value_merges_with_file() {
        let mut config = GateConfig::default();
        config.destinations = Some(DestinationConfig {
            human_url: "https://old-human.example".into(),
            bot_url: "https://old-bot.example".into(),
        });

        let (config, warnings) =
            apply_overrides(config, env(&[(ENV_BOT_URL, "https://decoy.example")])).unwrap();
        assert!(warnings.is_empty());

        let destinations = config.destinations.unwrap();
        assert_eq!(destinations.human_url, "https://old-human.example");
        assert_eq!(destinations.bot_url, "https://decoy.example");
    }

    #[test]
    fn single_env_value_without_file_leaves_pair_unset() {
        let (config, warnings) = apply_overrides(
            GateConfig::default(),
            env(&[(ENV_HUMAN_URL, "https://real.example"), (ENV_BOT_URL, "  ")]),
        )
        .unwrap();
        assert!(config.destinations.is_none());
        assert_eq!(
            warnings,
            vec![ConfigWarning::PartialDestinationEnv {
                set: ENV_HUMAN_URL,
                missing: ENV_BOT_URL
            }]
        );
        assert!(warnings[0].to_string().contains("BOT_URL is not"));
    }

    #[test]
    fn mode_and_bind_overrides() {
        let (config, _) = apply_overrides(
            GateConfig::default(),
            env(&[(ENV_MODE, "proxy"), (ENV_BIND_ADDRESS, "127.0.0.1:9000")]),
        )
        .unwrap();
        assert_eq!(config.dispatch.mode, DispatchMode::Proxy);
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");

        let err = apply_overrides(GateConfig::default(), env(&[(ENV_MODE, "bounce")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: ENV_MODE, .. }));
    }

    #[test]
    fn load_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!("decoy-router-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[dispatch]\nmode = 42\n").unwrap();

        let err = load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let _ = fs::remove_file(&path);
    }
}
