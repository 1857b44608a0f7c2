//! Priority-keyword extraction strategy.
//!
//! Detects explicit markers ("p1"), keyword phrases ("high priority",
//! "urgent") and trailing exclamation runs, normalizing every form to one of
//! three levels. Display text is always the normalized "High Priority" /
//! "Medium Priority" / "Low Priority" regardless of how the level was
//! spelled.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::confidence::fixed;
use crate::traits::{ParseContext, TagStrategy};
use crate::types::{CandidateTag, Span, TagKind, TagValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    fn value(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    fn display(&self) -> &'static str {
        match self {
            Self::High => "High Priority",
            Self::Medium => "Medium Priority",
            Self::Low => "Low Priority",
        }
    }
}

struct PriorityPattern {
    regex: Regex,
    level: Level,
    confidence: f32,
}

fn pattern(source: &str, level: Level, confidence: f32) -> PriorityPattern {
    PriorityPattern {
        regex: RegexBuilder::new(source)
            .case_insensitive(true)
            .build()
            .expect("built-in priority pattern is valid"),
        level,
        confidence,
    }
}

static PRIORITY_PATTERNS: LazyLock<Vec<PriorityPattern>> = LazyLock::new(|| {
    vec![
        pattern(r"\bp[01]\b", Level::High, fixed::PRIORITY_EXPLICIT),
        pattern(r"\bp2\b", Level::Medium, fixed::PRIORITY_EXPLICIT),
        pattern(r"\bp3\b", Level::Low, fixed::PRIORITY_EXPLICIT),
        pattern(
            r"\b(?:high(?:est)?|top)[\s-]?priority\b",
            Level::High,
            fixed::PRIORITY_KEYWORD,
        ),
        pattern(
            r"\b(?:urgent(?:ly)?|asap|critical|important)\b",
            Level::High,
            fixed::PRIORITY_KEYWORD,
        ),
        pattern(
            r"\b(?:med(?:ium)?|normal)[\s-]?priority\b",
            Level::Medium,
            fixed::PRIORITY_KEYWORD,
        ),
        pattern(
            r"\blow(?:est)?[\s-]?priority\b",
            Level::Low,
            fixed::PRIORITY_KEYWORD,
        ),
        pattern(r"!{2,}", Level::High, fixed::PRIORITY_EXCLAIM),
    ]
});

/// Substrings whose absence proves `parse` would find nothing.
const TEST_MARKERS: &[&str] = &[
    "p0", "p1", "p2", "p3", "priority", "urgent", "asap", "critical", "important", "!!",
];

pub struct PriorityStrategy {
    priority: i32,
}

impl PriorityStrategy {
    pub const ID: &'static str = "priority";

    pub fn new(priority: i32) -> Self {
        Self { priority }
    }
}

impl TagStrategy for PriorityStrategy {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Priority keywords"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn test(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        TEST_MARKERS.iter().any(|m| lower.contains(m))
    }

    fn parse(&self, text: &str, _ctx: &ParseContext<'_>) -> Vec<CandidateTag> {
        let mut tags: Vec<CandidateTag> = Vec::new();
        let mut claimed: Vec<Span> = Vec::new();

        for pattern in PRIORITY_PATTERNS.iter() {
            for m in pattern.regex.find_iter(text) {
                let span = Span::new(m.start(), m.end());
                // earlier patterns win overlapping ground
                if claimed.iter().any(|s| s.overlaps(&span)) {
                    continue;
                }
                claimed.push(span);
                tags.push(CandidateTag::new(
                    TagKind::Priority,
                    TagValue::Text(pattern.level.value().to_string()),
                    pattern.level.display(),
                    span,
                    m.as_str(),
                    pattern.confidence,
                    Self::ID,
                ));
            }
        }

        tags.sort_by_key(|t| t.span);
        tags
    }
}
