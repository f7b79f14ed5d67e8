//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use verinum_events::EventLog;
use verinum_registry::{ChainedSeed, RequestRegistry, ResolutionPolicy, VerifierPanel};
use verinum_types::{AccountId, Timestamp};

use crate::ServiceError;

/// Configuration for a registry service.
///
/// Can be loaded from a TOML file via [`RegistryConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// The fixed roster of authorized verifier identities.
    pub verifiers: Vec<String>,

    /// How many verifiers are assigned to each request's panel.
    #[serde(default = "default_panel_size")]
    pub panel_size: usize,

    /// How per-verifier outcomes combine into a request outcome:
    /// "first_outcome" or "require_all".
    #[serde(default)]
    pub resolution_policy: ResolutionPolicy,

    /// Capacity of the live event broadcast channel per subscriber.
    #[serde(default = "default_event_capacity")]
    pub event_channel_capacity: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_panel_size() -> usize {
    1
}

fn default_event_capacity() -> usize {
    1024
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl RegistryConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ServiceError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ServiceError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ServiceError> {
        toml::from_str(s).map_err(|e| ServiceError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("RegistryConfig is always serializable to TOML")
    }

    /// Build the registry this configuration describes.
    ///
    /// Surfaces roster/panel-size violations as [`ServiceError::Config`]
    /// before the service starts.
    pub fn build_registry(&self) -> Result<RequestRegistry, ServiceError> {
        if self.verifiers.is_empty() {
            return Err(ServiceError::Config("verifier roster is empty".into()));
        }
        if self.event_channel_capacity == 0 {
            return Err(ServiceError::Config(
                "event channel capacity must be at least 1".into(),
            ));
        }
        let roster: Vec<AccountId> = self
            .verifiers
            .iter()
            .map(|v| {
                if v.is_empty() {
                    Err(ServiceError::Config("verifier id must not be empty".into()))
                } else {
                    Ok(AccountId::new(v.clone()))
                }
            })
            .collect::<Result<_, _>>()?;

        let panel = VerifierPanel::new(roster, self.panel_size)
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        // Genesis for the chained seed: start-time seconds. The chain, not
        // the genesis, is what keeps later seeds unpredictable.
        let mut genesis = [0u8; 32];
        genesis[..8].copy_from_slice(&Timestamp::now().as_secs().to_be_bytes());

        Ok(RequestRegistry::new(
            panel,
            self.resolution_policy,
            Box::new(ChainedSeed::new(genesis)),
            Arc::new(EventLog::with_capacity(self.event_channel_capacity)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_toml_with_defaults() {
        let config = RegistryConfig::from_toml_str(r#"verifiers = ["v1", "v2"]"#).unwrap();
        assert_eq!(config.verifiers, vec!["v1", "v2"]);
        assert_eq!(config.panel_size, 1);
        assert_eq!(config.resolution_policy, ResolutionPolicy::FirstOutcome);
        assert_eq!(config.log_format, "human");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn parses_explicit_policy() {
        let config = RegistryConfig::from_toml_str(
            r#"
            verifiers = ["v1", "v2", "v3"]
            panel_size = 3
            resolution_policy = "require_all"
            "#,
        )
        .unwrap();
        assert_eq!(config.resolution_policy, ResolutionPolicy::RequireAll);
        assert_eq!(config.panel_size, 3);
    }

    #[test]
    fn toml_round_trip() {
        let config = RegistryConfig::from_toml_str(r#"verifiers = ["v1"]"#).unwrap();
        let reparsed = RegistryConfig::from_toml_str(&config.to_toml_string()).unwrap();
        assert_eq!(reparsed.verifiers, config.verifiers);
        assert_eq!(reparsed.panel_size, config.panel_size);
    }

    #[test]
    fn build_rejects_empty_roster() {
        let config = RegistryConfig::from_toml_str(r#"verifiers = []"#).unwrap();
        assert!(matches!(
            config.build_registry(),
            Err(ServiceError::Config(_))
        ));
    }

    #[test]
    fn build_rejects_oversized_panel() {
        let config = RegistryConfig::from_toml_str(
            r#"
            verifiers = ["v1", "v2"]
            panel_size = 3
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.build_registry(),
            Err(ServiceError::Config(_))
        ));
    }

    #[test]
    fn build_constructs_working_registry() {
        let config = RegistryConfig::from_toml_str(
            r#"
            verifiers = ["v1", "v2", "v3"]
            panel_size = 2
            "#,
        )
        .unwrap();
        let registry = config.build_registry().unwrap();
        assert_eq!(registry.roster_size(), 3);
        assert_eq!(registry.panel_size(), 2);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        assert!(matches!(
            RegistryConfig::from_toml_str("verifiers = 7"),
            Err(ServiceError::Config(_))
        ));
    }
}
