use crate::config::{ExtractionStrategy, ExtractorConfig};
use crate::error::{ExtractorError, Result};
use crate::scans;
use crate::strategy::{strategy_for, SignalStrategy};
use signal_protocol::{LayerDefinition, SignalRecord};
use std::path::Path;

/// Main extractor interface
pub struct SignalExtractor {
    config: ExtractorConfig,
    strategy: Box<dyn SignalStrategy>,
}

impl SignalExtractor {
    /// Create a new extractor with configuration
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate().map_err(ExtractorError::invalid_config)?;
        let strategy = strategy_for(&config);
        Ok(Self { config, strategy })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn strategy(&self) -> ExtractionStrategy {
        self.strategy.kind()
    }

    /// Extract signals from source text
    pub fn extract_str(&self, content: &str) -> Vec<SignalRecord> {
        let records = self.strategy.extract(content);
        log::debug!(
            "{} strategy found {} signals",
            self.strategy.kind().as_str(),
            records.len()
        );
        records
    }

    /// Extract signals from a file on disk
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<Vec<SignalRecord>> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(self.extract_str(&content))
    }

    /// Layer helpers declared in the source, regardless of strategy
    pub fn layers(&self, content: &str) -> Vec<LayerDefinition> {
        scans::scan_layers(content)
    }
}

impl Default for SignalExtractor {
    fn default() -> Self {
        let config = ExtractorConfig::default();
        let strategy = strategy_for(&config);
        Self { config, strategy }
    }
}
