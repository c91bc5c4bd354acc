use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Component not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed cursor context: {0}")]
    MalformedContext(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Extractor error: {0}")]
    ExtractorError(#[from] signal_extractor::ExtractorError),
}

impl EngineError {
    /// Failures that simply mean "nothing to suggest here"
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::MalformedContext(_))
    }
}
