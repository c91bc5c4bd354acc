//! # Signal Engine
//!
//! Cursor-aware completion of signal props for JSX-style components.
//!
//! ## Pipeline
//!
//! ```text
//! text before caret
//!       │
//!       ▼
//! ┌───────────────┐  not a prop position  ┌──────────┐
//! │ context       │ ────────────────────► │  (empty) │
//! └──────┬────────┘                       └──────────┘
//!        │ component name + partial word
//!        ▼
//! ┌───────────────┐  roots × probes, first existing file
//! │ locator       │
//! └──────┬────────┘
//!        ▼
//! ┌───────────────┐  hit within ttl ──► cached records
//! │ result cache  │
//! └──────┬────────┘
//!        │ miss
//!        ▼
//! ┌───────────────┐
//! │ extractor     │  signal-extractor strategies
//! └──────┬────────┘
//!        ▼
//! ┌───────────────┐  catalog ∪ component, filter, priority order
//! │ assembler     │
//! └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use signal_engine::{DiskFs, EngineConfig, SignalEngine};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # async fn run() -> signal_engine::Result<()> {
//! let engine = SignalEngine::new(EngineConfig::default(), Arc::new(DiskFs))?;
//! let roots = vec![PathBuf::from(".")];
//! for s in engine.complete_prefix("<Button pri", &roots).await {
//!     println!("{} ({})", s.name, s.category);
//! }
//! # Ok(())
//! # }
//! ```

mod assembler;
mod cache;
mod config;
pub mod context;
mod engine;
mod error;
mod fs;
mod locator;

pub use assembler::{SuggestionAssembler, DEFAULT_PRIORITY};
pub use cache::{CacheEntry, Clock, ManualClock, ResultCache, SystemClock, DEFAULT_CACHE_TTL};
pub use config::EngineConfig;
pub use context::CaretState;
pub use engine::SignalEngine;
pub use error::{EngineError, Result};
pub use fs::{DiskFs, MemoryFs, SourceFs};
pub use locator::{default_probes, ComponentLocator, ComponentLookupRequest, Probe};

pub use signal_protocol::{CursorContext, Suggestion};
