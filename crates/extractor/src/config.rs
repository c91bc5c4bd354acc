use serde::{Deserialize, Serialize};
use signal_protocol::is_identifier;

/// Structural and DOM-level names that show up behind `signals.` but are not signals
pub const DEFAULT_DENYLIST: &[&str] = &[
    "className",
    "children",
    "style",
    "id",
    "key",
    "ref",
    "onClick",
    "onSubmit",
    "onChange",
    "onFocus",
    "onBlur",
    "type",
    "disabled",
];

/// Configuration for signal extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Extraction strategy to use
    pub strategy: ExtractionStrategy,

    /// Names never reported by reference or heuristic scans
    pub denylist: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            strategy: ExtractionStrategy::Composed,
            denylist: DEFAULT_DENYLIST.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl ExtractorConfig {
    /// Only `signals.<name>` references
    pub fn for_plain() -> Self {
        Self {
            strategy: ExtractionStrategy::Plain,
            ..Default::default()
        }
    }

    /// Components that read their flags from an `inputSignal` binding
    pub fn for_input_binding() -> Self {
        Self {
            strategy: ExtractionStrategy::InputBinding,
            ..Default::default()
        }
    }

    /// Docblock and prop-destructuring heuristics
    pub fn for_documented() -> Self {
        Self {
            strategy: ExtractionStrategy::Documented,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(bad) = self.denylist.iter().find(|name| !is_identifier(name)) {
            return Err(format!("denylist entry {bad:?} is not an identifier"));
        }
        Ok(())
    }

    pub fn is_denied(&self, name: &str) -> bool {
        self.denylist.iter().any(|denied| denied == name)
    }
}

/// Which lexical scans a deployment runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// `signals.<name>` references only
    Plain,

    /// Layer, lease, spread, composite and plain reference scans
    /// Canonical strategy for Signal UI components
    Composed,

    /// `inputSignal.<name>` references only
    InputBinding,

    /// `@signal` tags, destructured props, `// signal:` comments and
    /// `signals = [...]` definitions
    Documented,
}

impl Default for ExtractionStrategy {
    fn default() -> Self {
        Self::Composed
    }
}

impl ExtractionStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Composed => "composed",
            Self::InputBinding => "input_binding",
            Self::Documented => "documented",
        }
    }
}
