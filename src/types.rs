//! Core types for the tagging engine.
//!
//! These types model the full parse lifecycle:
//! Input text → Strategies → Candidate pool → Conflict resolution → ParseResult.
//!
//! Every entity is created fresh per parse call and is immutable once
//! constructed; the engine holds no state between calls.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ═══════════════════════════════════════════
// Span
// ═══════════════════════════════════════════

/// A half-open byte range `[start, end)` over the original UTF-8 input.
///
/// Offsets always fall on `char` boundaries of the input string. The engine
/// never mutates the text it scans, so spans stay valid for the whole parse;
/// the "clean text" is a separately rendered derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Two spans overlap when each starts before the other ends.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn union(&self, other: &Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// The substring this span identifies, or `None` when the span does not
    /// lie on `char` boundaries inside `text`.
    pub fn slice_of<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.is_empty() || self.end > text.len() {
            return None;
        }
        if !text.is_char_boundary(self.start) || !text.is_char_boundary(self.end) {
            return None;
        }
        Some(&text[self.start..self.end])
    }
}

// ═══════════════════════════════════════════
// Tag Kind
// ═══════════════════════════════════════════

/// The closed set of tag kinds the engine can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    Date,
    Time,
    Priority,
    Location,
    Person,
    Label,
    Project,
}

impl TagKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Time => "time",
            Self::Priority => "priority",
            Self::Location => "location",
            Self::Person => "person",
            Self::Label => "label",
            Self::Project => "project",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "date" => Some(Self::Date),
            "time" => Some(Self::Time),
            "priority" => Some(Self::Priority),
            "location" => Some(Self::Location),
            "person" => Some(Self::Person),
            "label" => Some(Self::Label),
            "project" => Some(Self::Project),
            _ => None,
        }
    }

    pub fn all() -> &'static [TagKind] {
        &[
            Self::Date,
            Self::Time,
            Self::Priority,
            Self::Location,
            Self::Person,
            Self::Label,
            Self::Project,
        ]
    }

    /// Default icon hint for chip rendering. Presentation only — callers may
    /// override per kind through `EngineConfig::appearance`.
    pub fn default_icon(&self) -> &'static str {
        match self {
            Self::Date => "calendar",
            Self::Time => "clock",
            Self::Priority => "flag",
            Self::Location => "map-pin",
            Self::Person => "user",
            Self::Label => "tag",
            Self::Project => "folder",
        }
    }

    /// Default color hint (hex) for chip rendering.
    pub fn default_color(&self) -> &'static str {
        match self {
            Self::Date => "#3b82f6",
            Self::Time => "#6366f1",
            Self::Priority => "#ef4444",
            Self::Location => "#10b981",
            Self::Person => "#f59e0b",
            Self::Label => "#8b5cf6",
            Self::Project => "#64748b",
        }
    }
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ═══════════════════════════════════════════
// Tag Value
// ═══════════════════════════════════════════

/// Kind-dependent tag payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TagValue {
    /// Concrete resolved instant — `Date` and `Time` tags.
    Instant(chrono::NaiveDateTime),
    /// Normalized category key — `Label` tags.
    Category(String),
    /// Free text — everything else.
    Text(String),
}

impl TagValue {
    pub fn as_instant(&self) -> Option<chrono::NaiveDateTime> {
        match self {
            Self::Instant(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Category(s) | Self::Text(s) => Some(s),
            Self::Instant(_) => None,
        }
    }
}

// ═══════════════════════════════════════════
// Candidate Tag
// ═══════════════════════════════════════════

/// Namespace for deterministic tag ids.
static TAG_NAMESPACE: LazyLock<Uuid> =
    LazyLock::new(|| Uuid::new_v5(&Uuid::NAMESPACE_OID, b"tagline.tag"));

/// One strategy's proposed structured interpretation of a span of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateTag {
    /// Derived from the tag's identity (source, kind, span, display) so
    /// repeated parses of the same input yield identical ids while distinct
    /// tags never share one.
    pub id: Uuid,
    pub kind: TagKind,
    pub value: TagValue,
    /// User-facing rendering of `value` (e.g. "Today", "High Priority").
    pub display_text: String,
    /// Origin span in the source text.
    pub span: Span,
    /// The exact substring matched, pre-normalization.
    pub original_text: String,
    /// Ordering key in `[0.0, 1.0]` for tie-breaking, not a probability.
    pub confidence: f32,
    /// Id of the strategy that produced the tag.
    pub source: String,
}

impl CandidateTag {
    pub fn new(
        kind: TagKind,
        value: TagValue,
        display_text: impl Into<String>,
        span: Span,
        original_text: impl Into<String>,
        confidence: f32,
        source: &str,
    ) -> Self {
        let display_text = display_text.into();
        let original_text = original_text.into();
        let identity = format!(
            "{source}|{kind}|{start}..{end}|{display_text}",
            kind = kind.as_str(),
            start = span.start,
            end = span.end,
        );
        Self {
            id: Uuid::new_v5(&TAG_NAMESPACE, identity.as_bytes()),
            kind,
            value,
            display_text,
            span,
            original_text,
            confidence,
            source: source.to_string(),
        }
    }
}

// ═══════════════════════════════════════════
// Conflict
// ═══════════════════════════════════════════

/// An input region where two or more candidate tags overlapped and were not
/// judged coexistable. Recorded for observability — never silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Union of the clustered candidates' spans.
    pub span: Span,
    /// Every candidate in the cluster, survivor included.
    pub tags: Vec<CandidateTag>,
    /// The survivor, or `None` if resolution could not pick one — in which
    /// case the assembler excludes the whole cluster from the final list.
    pub resolved: Option<CandidateTag>,
}

// ═══════════════════════════════════════════
// Parse Result
// ═══════════════════════════════════════════

/// Final output of a parse call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Input text with all kept tag spans elided — "what remains" after
    /// structured content is stripped.
    pub clean_text: String,
    /// Kept tags, ordered by ascending span start.
    pub tags: Vec<CandidateTag>,
    /// Arithmetic mean of kept tags' confidences; 1.0 when no tags were
    /// produced (an empty parse is not an error).
    pub confidence: f32,
    /// Conflict records that survived resolution, for observability.
    pub conflicts: Vec<Conflict>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_overlap_is_symmetric() {
        let a = Span::new(0, 5);
        let b = Span::new(3, 8);
        let c = Span::new(5, 8);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Half-open ranges: touching spans do not overlap
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn span_union_covers_both() {
        let a = Span::new(2, 5);
        let b = Span::new(9, 12);
        assert_eq!(a.union(&b), Span::new(2, 12));
    }

    #[test]
    fn span_slice_of_checks_boundaries() {
        // 'é' occupies bytes 3..5
        let text = "café open";
        assert_eq!(Span::new(0, 5).slice_of(text), Some("café"));
        assert_eq!(Span::new(0, 3).slice_of(text), Some("caf"));
        // 3..4 would split the two-byte 'é'
        assert_eq!(Span::new(3, 4).slice_of(text), None);
        assert_eq!(Span::new(6, 50).slice_of(text), None);
        assert_eq!(Span::new(4, 4).slice_of(text), None);
    }

    #[test]
    fn tag_kind_roundtrip() {
        for kind in TagKind::all() {
            assert_eq!(TagKind::from_str(kind.as_str()), Some(*kind));
        }
        assert_eq!(TagKind::from_str("unknown"), None);
    }

    #[test]
    fn tag_kind_serde_snake_case() {
        let json = serde_json::to_string(&TagKind::Location).unwrap();
        assert_eq!(json, "\"location\"");
        let parsed: TagKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, TagKind::Location);
    }

    #[test]
    fn tag_kind_hints_are_nonempty() {
        for kind in TagKind::all() {
            assert!(!kind.default_icon().is_empty());
            assert!(kind.default_color().starts_with('#'));
        }
    }

    #[test]
    fn tag_value_accessors() {
        let dt = chrono::NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        assert_eq!(TagValue::Instant(dt).as_instant(), Some(dt));
        assert_eq!(TagValue::Instant(dt).as_text(), None);
        assert_eq!(TagValue::Category("work".into()).as_text(), Some("work"));
        assert_eq!(TagValue::Text("high".into()).as_text(), Some("high"));
    }

    #[test]
    fn candidate_tag_ids_are_deterministic() {
        let make = || {
            CandidateTag::new(
                TagKind::Person,
                TagValue::Text("John".into()),
                "John",
                Span::new(6, 12),
                "John's",
                0.7,
                "entity",
            )
        };
        assert_eq!(make().id, make().id);
    }

    #[test]
    fn candidate_tag_ids_differ_across_spans() {
        let a = CandidateTag::new(
            TagKind::Person,
            TagValue::Text("John".into()),
            "John",
            Span::new(6, 12),
            "John's",
            0.7,
            "entity",
        );
        let b = CandidateTag::new(
            TagKind::Person,
            TagValue::Text("John".into()),
            "John",
            Span::new(20, 26),
            "John's",
            0.7,
            "entity",
        );
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn parse_result_serde_roundtrip() {
        let tag = CandidateTag::new(
            TagKind::Label,
            TagValue::Category("work".into()),
            "Work",
            Span::new(0, 6),
            "report",
            0.8,
            "entity",
        );
        let result = ParseResult {
            clean_text: "finish".into(),
            tags: vec![tag],
            confidence: 0.8,
            conflicts: vec![],
        };
        let json = serde_json::to_string(&result).unwrap();
        let parsed: ParseResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
