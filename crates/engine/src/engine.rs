use crate::assembler::SuggestionAssembler;
use crate::cache::{Clock, ResultCache, SystemClock};
use crate::config::EngineConfig;
use crate::context;
use crate::error::{EngineError, Result};
use crate::fs::SourceFs;
use crate::locator::{ComponentLocator, ComponentLookupRequest};
use signal_extractor::{catalog, SignalExtractor};
use signal_protocol::{CursorContext, SignalRecord, Suggestion};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Completion engine: caret context → component file → signals → suggestions.
///
/// Owns its result cache; two engines never share entries. The cache lock is
/// never held across an `.await`, so overlapping requests are safe.
pub struct SignalEngine {
    config: EngineConfig,
    fs: Arc<dyn SourceFs>,
    clock: Arc<dyn Clock>,
    locator: ComponentLocator,
    extractor: SignalExtractor,
    assembler: SuggestionAssembler,
    catalog: Vec<SignalRecord>,
    cache: Mutex<ResultCache>,
}

impl SignalEngine {
    pub fn new(config: EngineConfig, fs: Arc<dyn SourceFs>) -> Result<Self> {
        config.validate()?;
        let extractor = SignalExtractor::new(config.extractor.clone())?;
        Ok(Self {
            locator: ComponentLocator::new(config.probes.clone()),
            assembler: SuggestionAssembler::new(config.priority.iter().cloned()),
            cache: Mutex::new(ResultCache::new(config.cache_ttl())),
            catalog: catalog::all_signals(),
            clock: Arc::new(SystemClock),
            extractor,
            config,
            fs,
        })
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Suggestions for the caret at byte offset `caret` of `buffer`.
    /// Every failure degrades to an empty list.
    pub async fn complete(
        &self,
        buffer: &str,
        caret: usize,
        roots: &[PathBuf],
    ) -> Vec<Suggestion> {
        self.complete_prefix(context::prefix_at(buffer, caret), roots).await
    }

    pub async fn complete_prefix(
        &self,
        text_before_caret: &str,
        roots: &[PathBuf],
    ) -> Vec<Suggestion> {
        match self.try_complete_prefix(text_before_caret, roots).await {
            Ok(suggestions) => suggestions,
            Err(err) if err.is_benign() => {
                log::debug!("No suggestions: {err}");
                Vec::new()
            }
            Err(err) => {
                log::warn!("Signal completion failed: {err}");
                Vec::new()
            }
        }
    }

    /// Like [`Self::complete_prefix`], but reports why nothing was suggested
    pub async fn try_complete_prefix(
        &self,
        text_before_caret: &str,
        roots: &[PathBuf],
    ) -> Result<Vec<Suggestion>> {
        let ctx = context::analyze(text_before_caret);
        let component = eligible_component(&ctx)?;

        let extracted = match self.try_locate(component, roots).await {
            Ok(path) => self.try_signals_for_file(&path).await?,
            Err(EngineError::NotFound(_)) if self.config.catalog_fallback => Vec::new(),
            Err(err) => return Err(err),
        };

        let suggestions = self
            .assembler
            .assemble(&self.catalog, &extracted, &ctx.partial_word);
        log::debug!(
            "{} suggestions for <{component} ...{}",
            suggestions.len(),
            ctx.partial_word
        );
        Ok(suggestions)
    }

    pub async fn try_locate(&self, component_name: &str, roots: &[PathBuf]) -> Result<PathBuf> {
        let request = ComponentLookupRequest::new(component_name, roots.to_vec());
        self.locator
            .locate(self.fs.as_ref(), &request)
            .await
            .ok_or_else(|| EngineError::NotFound(component_name.to_string()))
    }

    /// Signals of a component looked up by name; empty when it cannot be found or read
    pub async fn signals_for_component(
        &self,
        component_name: &str,
        roots: &[PathBuf],
    ) -> Vec<SignalRecord> {
        let path = match self.try_locate(component_name, roots).await {
            Ok(path) => path,
            Err(err) => {
                log::debug!("{err}");
                return Vec::new();
            }
        };
        self.signals_for_file(&path).await
    }

    /// Cached extraction; an unreadable file yields no signals
    pub async fn signals_for_file(&self, path: &Path) -> Vec<SignalRecord> {
        match self.try_signals_for_file(path).await {
            Ok(records) => records,
            Err(err) => {
                log::warn!("Error reading component file {}: {err}", path.display());
                Vec::new()
            }
        }
    }

    pub async fn try_signals_for_file(&self, path: &Path) -> Result<Vec<SignalRecord>> {
        let cached = self.lock_cache().get(path, self.clock.now_ms());
        if let Some(hit) = cached {
            log::debug!("Signal cache hit for {}", path.display());
            return Ok(hit);
        }

        let content = self.fs.read_text(path).await?;
        let records = self.extractor.extract_str(&content);
        log::info!("Extracted {} signals from {}", records.len(), path.display());

        let now_ms = self.clock.now_ms();
        self.lock_cache().put(path, records.clone(), now_ms);
        Ok(records)
    }

    /// Drop every cached extraction, e.g. when the workspace changes
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    pub fn cached_entries(&self) -> usize {
        self.lock_cache().len()
    }

    fn lock_cache(&self) -> MutexGuard<'_, ResultCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn eligible_component(ctx: &CursorContext) -> Result<&str> {
    match ctx.component_name.as_deref() {
        Some(name) if ctx.inside_props => Ok(name),
        _ => Err(EngineError::MalformedContext(
            "caret is not at a component prop position".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::fs::MemoryFs;
    use signal_protocol::Category;
    use std::time::Duration;

    const BUTTON: &str = r#"
const Motion = layer("motion");
Motion("button", "hoverEnlarge");
export const Button = ({ signals }) => signals.primary && signals.glowRing;
"#;

    fn engine_with(fs: MemoryFs, clock: &ManualClock) -> SignalEngine {
        SignalEngine::new(EngineConfig::default(), Arc::new(fs))
            .unwrap()
            .with_clock(Arc::new(clock.clone()))
    }

    fn roots() -> Vec<PathBuf> {
        vec![PathBuf::from("/app")]
    }

    #[tokio::test]
    async fn completes_component_and_catalog_signals() {
        let clock = ManualClock::new(0);
        let engine = engine_with(
            MemoryFs::new().with_file("/app/components/Button.jsx", BUTTON),
            &clock,
        );

        let out = engine.complete_prefix("<Button ring", &roots()).await;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "glowRing");

        let all = engine.complete_prefix("<Button ", &roots()).await;
        let hover = all.iter().find(|s| s.name == "hoverEnlarge").unwrap();
        assert_eq!(hover.category, Category::Layer);
        assert!(hover.priority);
        assert!(all.iter().any(|s| s.name == "accent"));
    }

    #[tokio::test]
    async fn ineligible_context_has_no_suggestions() {
        let clock = ManualClock::new(0);
        let engine = engine_with(
            MemoryFs::new().with_file("/app/components/Button.jsx", BUTTON),
            &clock,
        );
        assert!(engine
            .complete_prefix("<Button href=\"/x pri", &roots())
            .await
            .is_empty());
        assert!(matches!(
            engine.try_complete_prefix("const x = ", &roots()).await,
            Err(EngineError::MalformedContext(_))
        ));
    }

    #[tokio::test]
    async fn missing_component_degrades_to_empty_unless_fallback() {
        let clock = ManualClock::new(0);
        let engine = engine_with(MemoryFs::new(), &clock);
        assert!(matches!(
            engine.try_complete_prefix("<Card ", &roots()).await,
            Err(EngineError::NotFound(_))
        ));
        assert!(engine.complete_prefix("<Card ", &roots()).await.is_empty());

        let config = EngineConfig {
            catalog_fallback: true,
            ..Default::default()
        };
        let engine = SignalEngine::new(config, Arc::new(MemoryFs::new())).unwrap();
        let out = engine.complete_prefix("<Card ", &roots()).await;
        assert_eq!(out.len(), catalog::all_signals().len());
        assert_eq!(out[0].name, "hoverEnlarge");
    }

    #[tokio::test]
    async fn unreadable_component_degrades_to_empty() {
        let clock = ManualClock::new(0);
        let engine = engine_with(
            MemoryFs::new().with_unreadable("/app/components/Button.jsx"),
            &clock,
        );
        assert!(matches!(
            engine.try_complete_prefix("<Button ", &roots()).await,
            Err(EngineError::IoError(_))
        ));
        assert!(engine.complete_prefix("<Button ", &roots()).await.is_empty());
        assert!(engine
            .signals_for_component("Button", &roots())
            .await
            .is_empty());
        assert_eq!(engine.cached_entries(), 0);
    }

    #[tokio::test]
    async fn cache_expires_after_ttl() {
        let clock = ManualClock::new(1_000);
        let path = PathBuf::from("/app/components/Button.jsx");
        let engine = engine_with(
            MemoryFs::new().with_file(&path, "signals.first"),
            &clock,
        );

        let first = engine.signals_for_file(&path).await;
        assert_eq!(first[0].name, "first");
        assert_eq!(engine.cached_entries(), 1);

        clock.advance(Duration::from_millis(30_000));
        assert_eq!(engine.signals_for_file(&path).await, first);

        clock.advance(Duration::from_millis(1));
        assert_eq!(engine.signals_for_file(&path).await, first);
        assert_eq!(engine.cached_entries(), 1);

        engine.clear_cache();
        assert_eq!(engine.cached_entries(), 0);
    }
}
