//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (threshold, redirect status)
//! - Check destination URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Missing destinations are allowed here; they surface per request as a 500

use thiserror::Error;
use url::Url;

use crate::config::schema::{DispatchMode, GateConfig};

/// Redirect statuses accepted in redirect mode.
pub const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("classifier.missing_header_threshold must be between 1 and 4, got {0}")]
    Threshold(usize),
    #[error("dispatch.redirect_status must be one of 301, 302, 303, 307, 308, got {0}")]
    RedirectStatus(u16),
    #[error("{field} is not a valid absolute URL: {value}")]
    DestinationUrl { field: &'static str, value: String },
    #[error("keyed.prefix must start with '/' and not end with '/', got `{0}`")]
    KeyedPrefix(String),
    #[error("keyed.id_length must be at least 8, got {0}")]
    IdLength(usize),
    #[error("admin.api_key must be set when the admin API is enabled")]
    AdminKey,
    #[error("proxy.timeout_secs must be greater than zero")]
    ProxyTimeout,
    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,
    #[error("timeouts.request_secs ({request_secs}) must exceed proxy.timeout_secs ({proxy_secs}) in proxy mode")]
    RequestTimeoutBelowProxy { request_secs: u64, proxy_secs: u64 },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let threshold = config.classifier.missing_header_threshold;
    if !(1..=4).contains(&threshold) {
        errors.push(ValidationError::Threshold(threshold));
    }

    if !REDIRECT_STATUSES.contains(&config.dispatch.redirect_status) {
        errors.push(ValidationError::RedirectStatus(config.dispatch.redirect_status));
    }

    if let Some(destinations) = &config.destinations {
        for (field, value) in [
            ("destinations.human_url", &destinations.human_url),
            ("destinations.bot_url", &destinations.bot_url),
        ] {
            if !is_web_url(value) {
                errors.push(ValidationError::DestinationUrl {
                    field,
                    value: value.clone(),
                });
            }
        }
    }

    if config.keyed.enabled {
        let prefix = &config.keyed.prefix;
        if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
            errors.push(ValidationError::KeyedPrefix(prefix.clone()));
        }
        if config.keyed.id_length < 8 {
            errors.push(ValidationError::IdLength(config.keyed.id_length));
        }
    }

    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::AdminKey);
    }

    if config.proxy.timeout_secs == 0 {
        errors.push(ValidationError::ProxyTimeout);
    }

    let request_secs = config.timeouts.request_secs;
    if request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    } else if config.dispatch.mode == DispatchMode::Proxy && request_secs <= config.proxy.timeout_secs {
        // The inbound timeout would answer before the upstream fallback runs.
        errors.push(ValidationError::RequestTimeoutBelowProxy {
            request_secs,
            proxy_secs: config.proxy.timeout_secs,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// True for absolute `http` or `https` URLs.
pub fn is_web_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DestinationConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&GateConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = GateConfig::default();
        config.classifier.missing_header_threshold = 0;
        config.dispatch.redirect_status = 200;
        config.admin.enabled = true;
        config.destinations = Some(DestinationConfig {
            human_url: "not a url".into(),
            bot_url: "https://decoy.example".into(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Threshold(0)));
        assert!(errors.contains(&ValidationError::RedirectStatus(200)));
        assert!(errors.contains(&ValidationError::AdminKey));
    }

    #[test]
    fn keyed_prefix_checked_only_when_enabled() {
        let mut config = GateConfig::default();
        config.keyed.prefix = "p/".into();
        assert!(validate_config(&config).is_ok());

        config.keyed.enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::KeyedPrefix("p/".into())]);
    }

    #[test]
    fn request_timeout_must_outlast_upstream_timeout() {
        let mut config = GateConfig::default();
        config.timeouts.request_secs = 1;
        config.proxy.timeout_secs = 5;
        assert!(validate_config(&config).is_ok());

        config.dispatch.mode = DispatchMode::Proxy;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::RequestTimeoutBelowProxy {
                request_secs: 1,
                proxy_secs: 5
            }]
        );

        config.timeouts.request_secs = 6;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_request_timeout_is_rejected() {
        let mut config = GateConfig::default();
        config.timeouts.request_secs = 0;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::RequestTimeout]
        );
    }

    #[test]
    fn web_url_requires_http_scheme() {
        assert!(is_web_url("https://real.example/base"));
        assert!(is_web_url("http://127.0.0.1:3000"));
        assert!(!is_web_url("ftp://real.example"));
        assert!(!is_web_url("/relative"));
    }
}
