use crate::config::{ExtractionStrategy, ExtractorConfig};
use crate::scans::{self, SignalSet, INPUT_SIGNAL_BINDING, SIGNALS_BINDING};
use signal_protocol::SignalRecord;

/// One way of turning component source into signal records.
///
/// Implementations are pure: same text in, same records out.
pub trait SignalStrategy: Send + Sync {
    fn kind(&self) -> ExtractionStrategy;

    fn extract(&self, source: &str) -> Vec<SignalRecord>;
}

/// Build the strategy a config asks for
pub fn strategy_for(config: &ExtractorConfig) -> Box<dyn SignalStrategy> {
    let denylist = config.denylist.clone();
    match config.strategy {
        ExtractionStrategy::Plain => Box::new(ReferenceStrategy {
            kind: ExtractionStrategy::Plain,
            binding: SIGNALS_BINDING,
            denylist,
        }),
        ExtractionStrategy::InputBinding => Box::new(ReferenceStrategy {
            kind: ExtractionStrategy::InputBinding,
            binding: INPUT_SIGNAL_BINDING,
            denylist,
        }),
        ExtractionStrategy::Composed => Box::new(ComposedStrategy { denylist }),
        ExtractionStrategy::Documented => Box::new(DocumentedStrategy { denylist }),
    }
}

/// Bare `<binding>.<name>` references
pub struct ReferenceStrategy {
    kind: ExtractionStrategy,
    binding: &'static str,
    denylist: Vec<String>,
}

impl SignalStrategy for ReferenceStrategy {
    fn kind(&self) -> ExtractionStrategy {
        self.kind
    }

    fn extract(&self, source: &str) -> Vec<SignalRecord> {
        let mut set = SignalSet::new();
        set.claim_all(scans::scan_references(source, self.binding, &self.denylist));
        set.into_sorted()
    }
}

/// Layer, lease, spread, composite, then plain references.
/// Scans run in precedence order so the first claim is the most specific.
pub struct ComposedStrategy {
    denylist: Vec<String>,
}

impl SignalStrategy for ComposedStrategy {
    fn kind(&self) -> ExtractionStrategy {
        ExtractionStrategy::Composed
    }

    fn extract(&self, source: &str) -> Vec<SignalRecord> {
        let mut set = SignalSet::new();
        let layers = scans::scan_layers(source);
        set.claim_all(scans::layer_records(&layers));
        set.claim_all(scans::scan_leases(source));
        set.claim_all(scans::scan_spreads(source));
        set.claim_all(scans::scan_composites(source));
        set.claim_all(scans::scan_references(
            source,
            SIGNALS_BINDING,
            &self.denylist,
        ));
        set.into_sorted()
    }
}

/// Heuristics for components that document their signals instead of
/// reading them through a binding
pub struct DocumentedStrategy {
    denylist: Vec<String>,
}

impl SignalStrategy for DocumentedStrategy {
    fn kind(&self) -> ExtractionStrategy {
        ExtractionStrategy::Documented
    }

    fn extract(&self, source: &str) -> Vec<SignalRecord> {
        let mut set = SignalSet::new();
        set.claim_all(scans::scan_doc_tags(source, &self.denylist));
        set.claim_all(scans::scan_destructured_props(source, &self.denylist));
        set.claim_all(scans::scan_signal_comments(source, &self.denylist));
        set.claim_all(scans::scan_signal_definitions(source, &self.denylist));
        set.into_sorted()
    }
}
