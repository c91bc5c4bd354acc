use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SUGGESTION_SCHEMA_VERSION: u32 = 1;

/// Provenance of a signal: how the scanner (or the catalog) learned about it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Passed through a `layer(...)` helper
    Layer,
    /// Bound by a `lease(...)` contract
    Lease,
    /// Forwarded by a `spread(...)` passthrough
    Spread,
    /// Guards a computed inline function
    Composite,
    /// Plain `signals.<name>` reference
    Signal,
    /// `@signal` docblock tag
    Documented,
    /// Destructured component prop
    Props,
    /// `// signal: <name>` line comment
    Commented,
    /// Entry of a `signals = [...]` array literal
    Defined,

    // Catalog groups
    Tone,
    Size,
    Shape,
    Behavior,
    State,
    Layout,
    Script,
}

impl Category {
    /// Extraction precedence (lower wins when a name is claimed twice).
    /// Also drives output grouping.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Layer => 0,
            Self::Lease => 1,
            Self::Spread => 2,
            Self::Composite => 3,
            Self::Signal => 4,
            Self::Documented => 5,
            Self::Props => 6,
            Self::Commented => 7,
            Self::Defined => 8,
            Self::Tone
            | Self::Size
            | Self::Shape
            | Self::Behavior
            | Self::State
            | Self::Layout
            | Self::Script => 9,
        }
    }

    /// True for the static catalog groups
    #[must_use]
    pub const fn is_catalog(self) -> bool {
        self.precedence() == 9
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Layer => "layer",
            Self::Lease => "lease",
            Self::Spread => "spread",
            Self::Composite => "composite",
            Self::Signal => "signal",
            Self::Documented => "documented",
            Self::Props => "props",
            Self::Commented => "commented",
            Self::Defined => "defined",
            Self::Tone => "tone",
            Self::Size => "size",
            Self::Shape => "shape",
            Self::Behavior => "behavior",
            Self::State => "state",
            Self::Layout => "layout",
            Self::Script => "script",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signal a component makes available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SignalRecord {
    pub name: String,
    pub description: String,
    pub category: Category,
    /// Owning layer helper, for `Category::Layer` records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
}

impl SignalRecord {
    pub fn new(name: impl Into<String>, description: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category,
            layer: None,
        }
    }

    #[must_use]
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }
}

/// A `const <layer_name> = layer("<layer_type>")` helper and the signal ids
/// passed through its calls, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LayerDefinition {
    pub layer_name: String,
    pub layer_type: String,
    pub signals: Vec<String>,
}

impl LayerDefinition {
    pub fn new(layer_name: impl Into<String>, layer_type: impl Into<String>) -> Self {
        Self {
            layer_name: layer_name.into(),
            layer_type: layer_type.into(),
            signals: Vec::new(),
        }
    }
}

/// What the caret position means for completion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CursorContext {
    pub inside_props: bool,
    pub component_name: Option<String>,
    pub partial_word: String,
}

impl CursorContext {
    /// Not eligible for suggestions
    #[must_use]
    pub fn outside() -> Self {
        Self::default()
    }

    pub fn inside(component_name: impl Into<String>, partial_word: impl Into<String>) -> Self {
        Self {
            inside_props: true,
            component_name: Some(component_name.into()),
            partial_word: partial_word.into(),
        }
    }

    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.inside_props && self.component_name.is_some()
    }
}

/// A displayable completion entry handed to the host renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Suggestion {
    pub name: String,
    pub description: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    /// Markdown shown next to the entry
    pub documentation: String,
    /// Host sort key: `0<name>` for priority signals, `1<name>` otherwise
    pub sort_text: String,
    pub priority: bool,
}

impl Suggestion {
    #[must_use]
    pub fn from_record(record: &SignalRecord, priority: bool) -> Self {
        let mut documentation = format!(
            "**{}** - {}\n\nCategory: {}",
            record.name, record.description, record.category
        );
        if let Some(layer) = &record.layer {
            documentation.push_str(&format!("\n\nLayer: {layer}"));
        }
        let tier = if priority { '0' } else { '1' };
        Self {
            name: record.name.clone(),
            description: record.description.clone(),
            category: record.category,
            layer: record.layer.clone(),
            documentation,
            sort_text: format!("{tier}{}", record.name),
            priority,
        }
    }
}

/// `[A-Za-z][A-Za-z0-9]*`
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// `[A-Z][A-Za-z0-9]*`, the shape of a component tag name
#[must_use]
pub fn is_component_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) && is_identifier(name)
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn identifier_grammar() {
        assert!(is_identifier("primary"));
        assert!(is_identifier("hoverEnlarge2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2xl"));
        assert!(!is_identifier("on-click"));
        assert!(is_component_name("Button"));
        assert!(!is_component_name("button"));
    }

    #[test]
    fn layer_precedes_plain_signal() {
        assert!(Category::Layer.precedence() < Category::Lease.precedence());
        assert!(Category::Lease.precedence() < Category::Spread.precedence());
        assert!(Category::Spread.precedence() < Category::Composite.precedence());
        assert!(Category::Composite.precedence() < Category::Signal.precedence());
        assert!(Category::Tone.is_catalog());
        assert!(!Category::Signal.is_catalog());
    }

    #[test]
    fn record_serializes_without_empty_layer() {
        let record = SignalRecord::new("glow", "Signal: glow", Category::Signal);
        let json = serialize_json(&record).unwrap();
        assert_eq!(
            json,
            r#"{"name":"glow","description":"Signal: glow","category":"signal"}"#
        );

        let layered = record.with_layer("Glow");
        let json = serialize_json(&layered).unwrap();
        assert!(json.contains(r#""layer":"Glow""#));
    }

    #[test]
    fn suggestion_sort_text_tracks_priority() {
        let record = SignalRecord::new("primary", "Primary visual tone", Category::Tone);
        let suggestion = Suggestion::from_record(&record, true);
        assert_eq!(suggestion.sort_text, "0primary");
        assert_eq!(
            suggestion.documentation,
            "**primary** - Primary visual tone\n\nCategory: tone"
        );

        let other = Suggestion::from_record(&record, false);
        assert_eq!(other.sort_text, "1primary");
    }

    #[test]
    fn cursor_context_eligibility() {
        assert!(!CursorContext::outside().is_eligible());
        let ctx = CursorContext::inside("Button", "pri");
        assert!(ctx.is_eligible());
        assert_eq!(ctx.component_name.as_deref(), Some("Button"));
    }
}
