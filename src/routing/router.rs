//! Route resolution.
//!
//! # Responsibilities
//! - Decide whether the filter applies to a path
//! - Split keyed paths into identifier and suffix
//! - Return an explicit resolution rather than a silent default
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Bypass prefixes are checked before keyed routing

use crate::config::GateConfig;
use crate::routing::matcher::{AnyMatcher, Matcher};

/// Outcome of resolving an inbound path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The filter does not apply.
    Bypass,
    /// Destination pair comes from process configuration; the whole
    /// inbound path is appended to the target.
    Static { suffix: &'a str },
    /// Destination pair is looked up by `id`; only the part after
    /// `{prefix}/{id}` is appended.
    Keyed { id: &'a str, suffix: &'a str },
}

/// Immutable route resolver.
#[derive(Debug)]
pub struct RouteResolver {
    bypass: AnyMatcher,
    keyed_prefix: Option<String>,
}

impl RouteResolver {
    pub fn new(bypass: AnyMatcher, keyed_prefix: Option<String>) -> Self {
        Self {
            bypass,
            keyed_prefix,
        }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        let keyed_prefix = config
            .keyed
            .enabled
            .then(|| config.keyed.prefix.trim_end_matches('/').to_string());
        Self::new(
            AnyMatcher::prefixes(config.dispatch.bypass_prefixes.iter().cloned()),
            keyed_prefix,
        )
    }

    pub fn keyed_prefix(&self) -> Option<&str> {
        self.keyed_prefix.as_deref()
    }

    pub fn resolve<'a>(&self, path: &'a str) -> Resolution<'a> {
        if self.bypass.matches(path) {
            return Resolution::Bypass;
        }

        if let Some(prefix) = &self.keyed_prefix {
            if let Some(rest) = path.strip_prefix(prefix.as_str()) {
                if rest.is_empty() || rest.starts_with('/') {
                    let rest = rest.trim_start_matches('/');
                    let (id, suffix) = match rest.find('/') {
                        Some(idx) => rest.split_at(idx),
                        None => (rest, ""),
                    };
                    return Resolution::Keyed { id, suffix };
                }
            }
        }

        Resolution::Static { suffix: path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed() -> RouteResolver {
        RouteResolver::new(AnyMatcher::prefixes(["/favicon.ico"]), Some("/p".into()))
    }

    #[test]
    fn splits_identifier_and_suffix() {
        assert_eq!(
            keyed().resolve("/p/abc123/extra/seg"),
            Resolution::Keyed {
                id: "abc123",
                suffix: "/extra/seg"
            }
        );
        assert_eq!(
            keyed().resolve("/p/abc123"),
            Resolution::Keyed {
                id: "abc123",
                suffix: ""
            }
        );
    }

    #[test]
    fn bare_prefix_has_empty_identifier() {
        assert_eq!(keyed().resolve("/p/"), Resolution::Keyed { id: "", suffix: "" });
        assert_eq!(keyed().resolve("/p"), Resolution::Keyed { id: "", suffix: "" });
    }

    #[test]
    fn similar_prefix_is_static() {
        assert_eq!(
            keyed().resolve("/products/1"),
            Resolution::Static {
                suffix: "/products/1"
            }
        );
    }

    #[test]
    fn bypass_wins() {
        assert_eq!(keyed().resolve("/favicon.ico"), Resolution::Bypass);
    }

    #[test]
    fn single_tenant_uses_full_path() {
        let resolver = RouteResolver::from_config(&GateConfig::default());
        assert_eq!(resolver.keyed_prefix(), None);
        assert_eq!(
            resolver.resolve("/p/abc123/x"),
            Resolution::Static {
                suffix: "/p/abc123/x"
            }
        );
    }
}
