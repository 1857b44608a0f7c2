//! Tagline — smart text-tagging engine.
//!
//! Takes a single line of free-form user input (a task or event title, e.g.
//! `"call John's about the report next Friday p1"`) and extracts structured
//! semantic tags — dates/times, priorities, locations, people,
//! project/category labels — while resolving ambiguity between independent
//! extraction strategies running over the same text.
//!
//! ## Architecture
//!
//! ```text
//! input text → strategies (test → parse) → candidate pool
//!            → span validation → conflict resolution → ParseResult
//! ```
//!
//! ## Design principles
//! - Strategies are independent: they share a read-only buffer and never see
//!   each other's output; the resolver reconciles them.
//! - Deterministic: same `(text, reference)` always yields byte-identical
//!   output — strategy order is fixed, tag ids are derived from identity.
//! - Pure: no I/O, no shared mutable state; `parse_at` is callable from any
//!   number of threads without locking.
//! - Replaceable capabilities: the date/time and named-entity recognizers
//!   sit behind traits; swapping them never touches the resolver.
//! - Vocabulary is configuration, not code: category patterns, stoplists and
//!   strategy priorities arrive through `EngineConfig`.
//!
//! ## Example
//!
//! ```
//! use tagline::{EngineConfig, TagEngine, TagKind};
//!
//! let engine = TagEngine::new(EngineConfig::default())?;
//! let result = engine.parse("dentist tomorrow at 3pm p1");
//! assert!(result.tags.iter().any(|t| t.kind == TagKind::Time));
//! assert!(result.tags.iter().any(|t| t.kind == TagKind::Priority));
//! # Ok::<(), tagline::TaggingError>(())
//! ```

pub mod confidence;
pub mod config;
pub mod engine;
pub mod error;
pub mod ordinal;
pub mod recognizer;
pub mod resolver;
pub mod strategies;
pub mod traits;
pub mod types;

pub use config::{AppearanceOverride, CategoryRule, EngineConfig, StrategyPriorities};
pub use engine::TagEngine;
pub use error::TaggingError;
pub use resolver::ResolutionOutcome;
pub use traits::{
    ComponentCertainty, DateTimeRecognizer, EntityKind, EntityRecognizer, ParseContext,
    RecognizedEntity, RecognizedInstant, TagStrategy,
};
pub use types::{CandidateTag, Conflict, ParseResult, Span, TagKind, TagValue};
