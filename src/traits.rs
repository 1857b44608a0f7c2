//! Trait definitions for the tagging pipeline.
//!
//! Three contracts define the module boundaries:
//! - `TagStrategy`: one independent extraction pass over the input text
//! - `DateTimeRecognizer`: the replaceable natural-language date/time capability
//! - `EntityRecognizer`: the replaceable named-entity capability
//!
//! Any recognizer satisfying its trait is substitutable without touching the
//! conflict resolver. Strategies must hold no mutable instance state so the
//! engine stays callable concurrently.

use chrono::NaiveDateTime;

use crate::config::EngineConfig;
use crate::types::{CandidateTag, Span};

/// Per-call inputs shared by every strategy. The reference instant is the
/// injected clock: relative expressions ("tomorrow", "next friday") resolve
/// against it, never against ambient wall-clock time inside a strategy.
pub struct ParseContext<'a> {
    pub reference: NaiveDateTime,
    pub config: &'a EngineConfig,
}

/// One self-contained extraction pass.
pub trait TagStrategy: Send + Sync {
    /// Stable identifier used as the `source` of produced tags.
    fn id(&self) -> &'static str;

    /// Human-readable name for diagnostics.
    fn name(&self) -> &'static str;

    /// Tie-break rank: higher wins when confidences are equal.
    fn priority(&self) -> i32;

    /// Cheap pre-check. MUST return `false` only when `parse` would return
    /// no tags; false positives are acceptable and harmless.
    fn test(&self, text: &str) -> bool;

    /// Produce zero or more candidates, each with a valid span into `text`.
    /// Strategies never fail on malformed input — worst case is
    /// under-extraction, never a crash.
    fn parse(&self, text: &str, ctx: &ParseContext<'_>) -> Vec<CandidateTag>;
}

// ═══════════════════════════════════════════
// Date/time recognition capability
// ═══════════════════════════════════════════

/// Which resolved components the recognizer is certain about. Drives the
/// confidence adjustments in `confidence::score_datetime`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentCertainty {
    pub year: bool,
    pub month: bool,
    pub day: bool,
    pub hour: bool,
    pub minute: bool,
}

impl ComponentCertainty {
    /// A fully certain calendar date, clock components unknown.
    pub fn full_date() -> Self {
        Self {
            year: true,
            month: true,
            day: true,
            hour: false,
            minute: false,
        }
    }

    pub fn count_certain(&self) -> u32 {
        [self.year, self.month, self.day, self.hour, self.minute]
            .iter()
            .filter(|c| **c)
            .count() as u32
    }
}

/// End of a recognized range, anchored to its own span (including the
/// connector) so the start and "Until" tags never collide on equal spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeEnd {
    pub instant: NaiveDateTime,
    pub span: Span,
}

/// One date/time expression found in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedInstant {
    pub span: Span,
    pub instant: NaiveDateTime,
    pub end: Option<RangeEnd>,
    pub certainty: ComponentCertainty,
}

/// Natural-language date/time recognition. External and replaceable; the
/// crate ships a rule-based default.
pub trait DateTimeRecognizer: Send + Sync {
    fn recognize(&self, text: &str, reference: NaiveDateTime) -> Vec<RecognizedInstant>;
}

// ═══════════════════════════════════════════
// Named-entity recognition capability
// ═══════════════════════════════════════════

/// Entity classes a recognizer may report. `Organization` is part of the
/// capability contract even though the engine maps it onto `Location`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Person,
    Place,
    Organization,
}

/// One named entity found in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedEntity {
    pub span: Span,
    pub kind: EntityKind,
    pub text: String,
}

/// Named-entity recognition for people, places and organizations. External
/// and replaceable; the crate ships a rule-based default.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Vec<RecognizedEntity>;
}
