//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the decoy router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Static destination pair for single-tenant deployments.
    pub destinations: Option<DestinationConfig>,

    /// Dispatch strategy and filter scope.
    pub dispatch: DispatchConfig,

    /// Classifier tuning.
    pub classifier: ClassifierConfig,

    /// Reverse-proxy settings (only used in proxy mode).
    pub proxy: ProxyConfig,

    /// Per-identifier destination lookup.
    pub keyed: KeyedConfig,

    /// Admin API settings.
    pub admin: AdminConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// The human/bot destination pair.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DestinationConfig {
    /// Where human visitors are sent.
    pub human_url: String,

    /// Where crawlers are sent.
    pub bot_url: String,
}

/// How a classified request is answered.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Answer with a 3xx pointing at the chosen destination.
    #[default]
    Redirect,
    /// Fetch the chosen destination and relay it under the inbound URL.
    Proxy,
}

impl DispatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchMode::Redirect => "redirect",
            DispatchMode::Proxy => "proxy",
        }
    }
}

impl std::str::FromStr for DispatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redirect" => Ok(DispatchMode::Redirect),
            "proxy" => Ok(DispatchMode::Proxy),
            other => Err(format!("unknown dispatch mode `{}`", other)),
        }
    }
}

/// Dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Redirect or reverse proxy.
    pub mode: DispatchMode,

    /// Status code used in redirect mode.
    pub redirect_status: u16,

    /// Path prefixes that skip the filter entirely.
    pub bypass_prefixes: Vec<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::Redirect,
            redirect_status: 302,
            bypass_prefixes: vec![
                "/favicon.ico".to_string(),
                "/.well-known/".to_string(),
            ],
        }
    }
}

/// Classifier tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Number of absent standard browser headers that, together with an
    /// automation marker, makes a medium-confidence bot.
    pub missing_header_threshold: usize,

    /// Match LLM and search-assistant fetchers.
    pub ai_crawlers: bool,

    /// Referer domains treated as a bot signal. Empty disables the check.
    pub referer_domains: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            missing_header_threshold: 2,
            ai_crawlers: true,
            referer_domains: Vec::new(),
        }
    }
}

/// Which upstream response headers are relayed besides the content headers.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RelayHeaderSet {
    /// Cache-Control, Expires, Last-Modified, ETag.
    #[default]
    Caching,
    /// Content-Security-Policy, X-Frame-Options, X-Content-Type-Options.
    Security,
}

/// Response produced when the upstream fetch fails.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProxyFallback {
    /// Static 503 page.
    #[default]
    Unavailable,
    /// 302 to the human destination.
    RedirectHuman,
}

/// Reverse-proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Total upstream timeout (connect + response + body) in seconds.
    pub timeout_secs: u64,

    /// Upstream connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Variant of relayed response headers.
    pub header_set: RelayHeaderSet,

    /// Behaviour on upstream failure.
    pub fallback: ProxyFallback,

    /// Maximum inbound body forwarded upstream, in bytes.
    pub max_body_bytes: usize,

    /// User-Agent sent when the client sent none.
    pub default_user_agent: String,

    /// Accept sent when the client sent none.
    pub default_accept: String,

    /// Accept-Language sent when the client sent none.
    pub default_accept_language: String,

    /// Accept-Encoding sent when the client sent none.
    pub default_accept_encoding: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            connect_timeout_secs: 5,
            header_set: RelayHeaderSet::Caching,
            fallback: ProxyFallback::Unavailable,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
            default_user_agent: "Mozilla/5.0 (compatible; decoy-router/0.1)".to_string(),
            default_accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .to_string(),
            default_accept_language: "en-US,en;q=0.9".to_string(),
            default_accept_encoding: "identity".to_string(),
        }
    }
}

/// Per-identifier destination lookup (`/p/{id}/...`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyedConfig {
    /// Enable keyed routing.
    pub enabled: bool,

    /// Routing prefix preceding the identifier segment.
    pub prefix: String,

    /// Length of generated identifiers.
    pub id_length: usize,

    /// JSON file the store is loaded from and saved to.
    pub persistence_path: Option<String>,
}

impl Default for KeyedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            prefix: "/p".to_string(),
            id_length: 16,
            persistence_path: None,
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount the admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty for development, JSON for log aggregation.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_uses_defaults() {
        let config: GateConfig = toml::from_str(
            r#"
            [destinations]
            human_url = "https://real.example"
            bot_url = "https://decoy.example"
            "#,
        )
        .unwrap();

        assert_eq!(config.dispatch.mode, DispatchMode::Redirect);
        assert_eq!(config.dispatch.redirect_status, 302);
        assert_eq!(config.classifier.missing_header_threshold, 2);
        assert!(config.classifier.referer_domains.is_empty());
        assert_eq!(config.keyed.prefix, "/p");
        assert_eq!(
            config.destinations.unwrap().bot_url,
            "https://decoy.example"
        );
    }

    #[test]
    fn enums_parse_snake_case() {
        let config: GateConfig = toml::from_str(
            r#"
            [dispatch]
            mode = "proxy"

            [proxy]
            header_set = "security"
            fallback = "redirect_human"
            "#,
        )
        .unwrap();

        assert_eq!(config.dispatch.mode, DispatchMode::Proxy);
        assert_eq!(config.proxy.header_set, RelayHeaderSet::Security);
        assert_eq!(config.proxy.fallback, ProxyFallback::RedirectHuman);
        assert!(config.destinations.is_none());
    }

    #[test]
    fn dispatch_mode_from_str() {
        assert_eq!("Proxy".parse::<DispatchMode>(), Ok(DispatchMode::Proxy));
        assert_eq!(" redirect ".parse::<DispatchMode>(), Ok(DispatchMode::Redirect));
        assert!("bounce".parse::<DispatchMode>().is_err());
    }
}
