//! Sticky API generation negotiation
//!
//! Nacos exposes two incompatible HTTP surfaces: the modern `v3` admin API with
//! a `{code,message,data}` envelope and `groupName`/`namespaceId` parameters,
//! and the legacy `v1` open API with bare bodies and `group`/`tenant`. A client
//! commits to one of them the first time a call succeeds and keeps it for life.

use std::fmt;
use std::sync::OnceLock;

use tracing::info;

/// Which API surface a client talks to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiGeneration {
    Unresolved,
    Modern,
    Legacy,
}

impl fmt::Display for ApiGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved => f.write_str("unresolved"),
            Self::Modern => f.write_str("v3"),
            Self::Legacy => f.write_str("v1"),
        }
    }
}

/// Holds the generation once resolved. The only transition is
/// `Unresolved -> Modern | Legacy`; later attempts to change it are ignored.
#[derive(Debug, Default)]
pub struct VersionNegotiator {
    resolved: OnceLock<ApiGeneration>,
}

impl VersionNegotiator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolved_generation(&self) -> ApiGeneration {
        self.resolved
            .get()
            .copied()
            .unwrap_or(ApiGeneration::Unresolved)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Commit to `generation` unless one is already fixed. Returns the
    /// generation in effect afterwards.
    pub fn resolve(&self, generation: ApiGeneration) -> ApiGeneration {
        if generation == ApiGeneration::Unresolved {
            return self.resolved_generation();
        }
        if self.resolved.set(generation).is_ok() {
            info!("API generation resolved to {}", generation);
        }
        self.resolved_generation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unresolved() {
        let negotiator = VersionNegotiator::new();
        assert_eq!(negotiator.resolved_generation(), ApiGeneration::Unresolved);
        assert!(!negotiator.is_resolved());
    }

    #[test]
    fn test_resolution_is_sticky() {
        let negotiator = VersionNegotiator::new();
        assert_eq!(negotiator.resolve(ApiGeneration::Legacy), ApiGeneration::Legacy);
        assert_eq!(negotiator.resolve(ApiGeneration::Modern), ApiGeneration::Legacy);
        assert_eq!(negotiator.resolved_generation(), ApiGeneration::Legacy);
        assert!(negotiator.is_resolved());
    }

    #[test]
    fn test_unresolved_is_not_a_resolution() {
        let negotiator = VersionNegotiator::new();
        assert_eq!(
            negotiator.resolve(ApiGeneration::Unresolved),
            ApiGeneration::Unresolved
        );
        assert!(!negotiator.is_resolved());
        assert_eq!(negotiator.resolve(ApiGeneration::Modern), ApiGeneration::Modern);
    }

    #[test]
    fn test_display() {
        assert_eq!(ApiGeneration::Modern.to_string(), "v3");
        assert_eq!(ApiGeneration::Legacy.to_string(), "v1");
    }
}
