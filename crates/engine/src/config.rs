use crate::assembler::DEFAULT_PRIORITY;
use crate::cache::DEFAULT_CACHE_TTL;
use crate::error::{EngineError, Result};
use crate::locator::{default_probes, Probe};
use serde::{Deserialize, Serialize};
use signal_extractor::ExtractorConfig;
use std::path::Path;
use std::time::Duration;

/// Engine configuration; every field falls back to its default when absent
/// from a config file.
///
/// ```toml
/// cache_ttl_ms = 30000
/// priority = ["primary", "secondary", "sm", "md", "lg", "hoverEnlarge"]
///
/// [extractor]
/// strategy = "composed"
///
/// [[probes]]
/// dir = "src/components"
/// extension = "tsx"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long an extraction result stays valid
    pub cache_ttl_ms: u64,

    /// Names listed ahead of all others
    pub priority: Vec<String>,

    /// Ordered `(dir, extension)` lookup candidates, tried per root
    pub probes: Vec<Probe>,

    /// Offer catalog signals when the component file cannot be found
    pub catalog_fallback: bool,

    pub extractor: ExtractorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl_ms: u64::try_from(DEFAULT_CACHE_TTL.as_millis()).unwrap_or(30_000),
            priority: DEFAULT_PRIORITY.iter().map(|s| (*s).to_string()).collect(),
            probes: default_probes(),
            catalog_fallback: false,
            extractor: ExtractorConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        log::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.probes.is_empty() {
            return Err(EngineError::InvalidConfig(
                "at least one probe is required".to_string(),
            ));
        }
        for probe in &self.probes {
            if probe.extension.is_empty() || probe.extension.starts_with('.') {
                return Err(EngineError::InvalidConfig(format!(
                    "probe extension {:?} must be non-empty and without a leading dot",
                    probe.extension
                )));
            }
            if Path::new(&probe.dir).is_absolute() || probe.dir.split('/').any(|s| s == "..") {
                return Err(EngineError::InvalidConfig(format!(
                    "probe dir {:?} must be relative to a search root",
                    probe.dir
                )));
            }
        }
        if self.priority.iter().any(String::is_empty) {
            return Err(EngineError::InvalidConfig(
                "priority names must be non-empty".to_string(),
            ));
        }
        self.extractor
            .validate()
            .map_err(EngineError::InvalidConfig)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_extractor::ExtractionStrategy;

    #[test]
    fn test_default_config_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache_ttl(), Duration::from_millis(30_000));
        assert_eq!(config.probes.len(), 16);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
cache_ttl_ms = 5000

[extractor]
strategy = "input_binding"
"#,
        )
        .unwrap();
        assert_eq!(config.cache_ttl_ms, 5000);
        assert_eq!(config.extractor.strategy, ExtractionStrategy::InputBinding);
        assert!(!config.extractor.denylist.is_empty());
        assert_eq!(config.priority, EngineConfig::default().priority);
    }

    #[test]
    fn test_custom_probes() {
        let config = EngineConfig::from_toml_str(
            r#"
[[probes]]
dir = "ui"
extension = "tsx"
"#,
        )
        .unwrap();
        assert_eq!(config.probes, vec![Probe::new("ui", "tsx")]);
    }

    #[test]
    fn test_config_validation() {
        assert!(matches!(
            EngineConfig::from_toml_str("probes = []"),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("[[probes]]\ndir = \"../x\"\nextension = \"js\""),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("[[probes]]\ndir = \"x\"\nextension = \".js\""),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("cache_ttl_ms = \"soon\""),
            Err(EngineError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.toml");
        std::fs::write(&path, "catalog_fallback = true\n").unwrap();
        assert!(EngineConfig::load(&path).unwrap().catalog_fallback);
        assert!(matches!(
            EngineConfig::load(dir.path().join("missing.toml")),
            Err(EngineError::IoError(_))
        ));
    }
}
