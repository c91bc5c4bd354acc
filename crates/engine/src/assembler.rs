use signal_protocol::{SignalRecord, Suggestion};
use std::collections::{HashMap, HashSet};

/// Most common tone, size and behavior signals; listed before everything else
pub const DEFAULT_PRIORITY: &[&str] = &["primary", "secondary", "sm", "md", "lg", "hoverEnlarge"];

/// Merges catalog and component signals into an ordered suggestion list
#[derive(Debug, Clone)]
pub struct SuggestionAssembler {
    priority: HashSet<String>,
}

impl Default for SuggestionAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_PRIORITY.iter().copied())
    }
}

impl SuggestionAssembler {
    pub fn new<I, S>(priority: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            priority: priority.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_priority(&self, name: &str) -> bool {
        self.priority.contains(name)
    }

    /// Union (component records win on name collision), keep names containing
    /// `partial_word` case-insensitively, priority tier first, then by name.
    pub fn assemble(
        &self,
        catalog: &[SignalRecord],
        extracted: &[SignalRecord],
        partial_word: &str,
    ) -> Vec<Suggestion> {
        let mut merged: HashMap<&str, &SignalRecord> = HashMap::new();
        for record in catalog.iter().chain(extracted) {
            merged.insert(record.name.as_str(), record);
        }

        let needle = partial_word.to_lowercase();
        let mut suggestions: Vec<Suggestion> = merged
            .into_values()
            .filter(|record| needle.is_empty() || record.name.to_lowercase().contains(&needle))
            .map(|record| Suggestion::from_record(record, self.is_priority(&record.name)))
            .collect();

        suggestions.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.name.cmp(&b.name))
        });
        suggestions
    }
}
