//! # Signal Extractor
//!
//! Derives the signals a UI component recognizes from its raw source text.
//!
//! ## Architecture
//!
//! ```text
//! Component source
//!     │
//!     ├──> Layer scan      const L = layer("type"); L("x", "id")
//!     ├──> Lease scan      lease("label", "id")
//!     ├──> Spread scan     spread("label", "id")
//!     ├──> Composite scan  signals.id && (() => ...)()
//!     └──> Plain scan      signals.id
//!            │
//!            └─> first claim wins, grouped by provenance, sorted by name
//! ```
//!
//! Scanning is lexical. There is no syntax tree, so constructs the patterns
//! do not recognize are silently absent from the result.
//!
//! ## Example
//!
//! ```rust
//! use signal_extractor::{ExtractorConfig, SignalExtractor};
//!
//! let extractor = SignalExtractor::new(ExtractorConfig::default()).unwrap();
//! let code = r#"
//! const Glow = layer("effect");
//! Glow("button", "glow");
//! export const Button = ({ signals }) => signals.primary && signals.glow;
//! "#;
//!
//! for record in extractor.extract_str(code) {
//!     println!("{} ({})", record.name, record.category);
//! }
//! ```

pub mod catalog;
mod config;
mod error;
mod extractor;
pub mod scans;
mod strategy;

pub use config::{ExtractionStrategy, ExtractorConfig, DEFAULT_DENYLIST};
pub use error::{ExtractorError, Result};
pub use extractor::SignalExtractor;
pub use signal_protocol::{Category, LayerDefinition, SignalRecord};
pub use strategy::{strategy_for, SignalStrategy};
