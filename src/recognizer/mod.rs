//! Built-in rule-based recognizer capabilities.
//!
//! These are the default implementations of the `DateTimeRecognizer` and
//! `EntityRecognizer` traits. They exist so the engine works out of the box;
//! deployments with a heavier NLP stack swap them out through
//! `TagEngine::with_strategies` without touching the resolver.

pub mod datetime;
pub mod entity;

pub use datetime::RuleBasedDateTimeRecognizer;
pub use entity::RuleBasedEntityRecognizer;
