//! Runtime configuration.
//!
//! Loaded from YAML; every field has a default so an empty document is a
//! valid configuration. Durations use humantime strings ("10s", "250ms").

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use curavyom_core::{IntentCatalog, IntentLabel, IntentRule};

use crate::agents::SpecialistKind;

/// Environment variable naming a YAML config file.
pub const CONFIG_ENV_VAR: &str = "CURAVYOM_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Bound for a single topic handler
    #[serde(with = "duration_human")]
    pub handler_timeout: Duration,

    /// Bound for each specialist in a fan-out
    #[serde(with = "duration_human")]
    pub specialist_timeout: Duration,

    /// Attach risk and fact-check metadata
    pub annotate: bool,

    /// Expand queries under three words before fan-out
    pub refine_short_queries: bool,

    /// Specialists consulted by the standard analysis, in report order
    pub analysis_specialists: Vec<SpecialistKind>,

    /// Provider switch: `type` selects the factory, remaining keys are
    /// handed to it
    pub provider: serde_json::Value,

    /// Location prefix for rendered reports
    pub report_dir: PathBuf,

    /// Replacement intent catalog, in priority order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intents: Option<Vec<IntentRule>>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            handler_timeout: Duration::from_secs(10),
            specialist_timeout: Duration::from_secs(5),
            annotate: true,
            refine_short_queries: true,
            analysis_specialists: vec![
                SpecialistKind::Clinical,
                SpecialistKind::Patent,
                SpecialistKind::Market,
                SpecialistKind::Regulatory,
            ],
            provider: serde_json::json!({ "type": "simulated" }),
            report_dir: PathBuf::from("reports"),
            intents: None,
        }
    }
}

impl RuntimeConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    /// Load from `CURAVYOM_CONFIG` if set, defaults otherwise.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_yaml_file(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.handler_timeout.is_zero() {
            return Err(ConfigError::Invalid("handler_timeout must be non-zero".into()));
        }
        if self.specialist_timeout.is_zero() {
            return Err(ConfigError::Invalid("specialist_timeout must be non-zero".into()));
        }
        // Specialists must time out before the handler wrapping their fan-out.
        if self.handler_timeout <= self.specialist_timeout {
            return Err(ConfigError::Invalid(format!(
                "handler_timeout ({}) must exceed specialist_timeout ({})",
                humantime::format_duration(self.handler_timeout),
                humantime::format_duration(self.specialist_timeout)
            )));
        }
        if self.analysis_specialists.is_empty() {
            return Err(ConfigError::Invalid(
                "analysis_specialists must name at least one specialist".into(),
            ));
        }
        if self.provider_type().is_none() {
            return Err(ConfigError::Invalid("provider.type must be a string".into()));
        }
        if let Some(rules) = &self.intents {
            if rules.iter().any(|r| r.label == IntentLabel::StandardAnalysis) {
                return Err(ConfigError::Invalid(
                    "standard_analysis is the fallback and cannot appear in intents".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn provider_type(&self) -> Option<&str> {
        self.provider.get("type").and_then(|v| v.as_str())
    }

    /// Configured catalog, or the built-in one.
    pub fn intent_catalog(&self) -> IntentCatalog {
        match &self.intents {
            Some(rules) => IntentCatalog::new(rules.clone()),
            None => IntentCatalog::default(),
        }
    }
}

mod duration_human {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = RuntimeConfig::from_yaml("{}").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.provider_type(), Some("simulated"));
    }

    #[test]
    fn test_humantime_durations() {
        let config = RuntimeConfig::from_yaml(
            r#"
handler_timeout: 2s 500ms
specialist_timeout: 750ms
annotate: false
"#,
        )
        .unwrap();

        assert_eq!(config.handler_timeout, Duration::from_millis(2500));
        assert_eq!(config.specialist_timeout, Duration::from_millis(750));
        assert!(!config.annotate);
        assert!(config.refine_short_queries);
    }

    #[test]
    fn test_bad_duration_is_parse_error() {
        let result = RuntimeConfig::from_yaml("handler_timeout: soon");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_handler_timeout_must_exceed_specialist_timeout() {
        let result = RuntimeConfig::from_yaml(
            r#"
handler_timeout: 1s
specialist_timeout: 5s
"#,
        );
        match result {
            Err(ConfigError::Invalid(msg)) => {
                assert!(msg.contains("handler_timeout (1s) must exceed specialist_timeout (5s)"))
            }
            other => panic!("expected Invalid, got {:?}", other),
        }

        let equal = RuntimeConfig {
            handler_timeout: Duration::from_secs(5),
            specialist_timeout: Duration::from_secs(5),
            ..Default::default()
        };
        assert!(equal.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = RuntimeConfig::from_yaml("specialist_timeout: 0s");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_custom_intents() {
        let config = RuntimeConfig::from_yaml(
            r#"
intents:
  - label: market
    keywords: [Sales]
  - label: greeting
    keywords: [hello]
"#,
        )
        .unwrap();

        let catalog = config.intent_catalog();
        assert_eq!(catalog.classify("sales outlook"), IntentLabel::Market);
        assert_eq!(catalog.classify("compare a and b"), IntentLabel::StandardAnalysis);
    }

    #[test]
    fn test_fallback_label_rejected_in_intents() {
        let result = RuntimeConfig::from_yaml(
            r#"
intents:
  - label: standard_analysis
    keywords: [anything]
"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_provider_settings_pass_through() {
        let config = RuntimeConfig::from_yaml(
            r#"
provider:
  type: simulated
  latency: 20ms
"#,
        )
        .unwrap();
        assert_eq!(config.provider["latency"], "20ms");
    }

    #[test]
    fn test_missing_file() {
        let result = RuntimeConfig::from_yaml_file("/nonexistent/curavyom.yaml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
