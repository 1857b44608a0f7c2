//! The tagging engine: orchestrator and parse-result assembler.
//!
//! Runs every registered strategy over the same read-only input in a fixed,
//! deterministic order, validates candidate spans at the boundary, delegates
//! overlap handling to the resolver, and assembles the final `ParseResult`
//! (clean text, mean confidence, surviving conflict records).
//!
//! The engine holds no mutable state: `parse_at` is a pure function of
//! `(text, reference, config)`, safe to call from any number of threads.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::TaggingError;
use crate::recognizer::{RuleBasedDateTimeRecognizer, RuleBasedEntityRecognizer};
use crate::resolver;
use crate::strategies::{DateTimeStrategy, EntityStrategy, PriorityStrategy};
use crate::traits::{ParseContext, TagStrategy};
use crate::types::{CandidateTag, ParseResult, Span};

pub struct TagEngine {
    strategies: Vec<Box<dyn TagStrategy>>,
    priority_of: BTreeMap<String, i32>,
    config: EngineConfig,
}

impl TagEngine {
    /// Build the standard engine: date/time, priority and entity strategies
    /// over the built-in rule-based recognizers.
    pub fn new(config: EngineConfig) -> Result<Self, TaggingError> {
        let strategies: Vec<Box<dyn TagStrategy>> = vec![
            Box::new(DateTimeStrategy::new(
                Box::new(RuleBasedDateTimeRecognizer::new()),
                config.priorities.datetime,
            )),
            Box::new(PriorityStrategy::new(config.priorities.priority)),
            Box::new(EntityStrategy::new(
                Box::new(RuleBasedEntityRecognizer::new()),
                &config,
            )?),
        ];
        Self::with_strategies(config, strategies)
    }

    /// Build with a custom strategy set (substituted recognizer capabilities
    /// included). Execution order is priority descending then id ascending —
    /// never registration order, so identical input yields identical output.
    pub fn with_strategies(
        config: EngineConfig,
        mut strategies: Vec<Box<dyn TagStrategy>>,
    ) -> Result<Self, TaggingError> {
        if strategies.is_empty() {
            return Err(TaggingError::NoStrategies);
        }
        strategies.sort_by(|a, b| {
            b.priority()
                .cmp(&a.priority())
                .then_with(|| a.id().cmp(b.id()))
        });
        let mut priority_of = BTreeMap::new();
        for strategy in &strategies {
            if priority_of
                .insert(strategy.id().to_string(), strategy.priority())
                .is_some()
            {
                return Err(TaggingError::DuplicateStrategy(strategy.id().to_string()));
            }
        }
        Ok(Self {
            strategies,
            priority_of,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse against the current local time. Prefer `parse_at` anywhere
    /// reproducibility matters.
    pub fn parse(&self, text: &str) -> ParseResult {
        self.parse_at(text, chrono::Local::now().naive_local())
    }

    /// Parse against an explicit reference instant.
    pub fn parse_at(&self, text: &str, reference: NaiveDateTime) -> ParseResult {
        let ctx = ParseContext {
            reference,
            config: &self.config,
        };

        let mut pool: Vec<CandidateTag> = Vec::new();
        for strategy in &self.strategies {
            if !strategy.test(text) {
                continue;
            }
            let candidates = strategy.parse(text, &ctx);
            debug!(
                strategy = strategy.id(),
                candidates = candidates.len(),
                "strategy pass complete"
            );
            pool.extend(candidates);
        }

        let pool = validate_candidates(text, pool);
        let outcome = resolver::resolve(pool, &self.priority_of);
        // tags of an unresolved conflict are already excluded from
        // `outcome.kept`; they remain visible in the conflict record

        let clean_text = build_clean_text(text, &outcome.kept);
        let confidence = if outcome.kept.is_empty() {
            1.0
        } else {
            outcome.kept.iter().map(|t| t.confidence).sum::<f32>() / outcome.kept.len() as f32
        };

        ParseResult {
            clean_text,
            tags: outcome.kept,
            confidence,
            conflicts: outcome.conflicts,
        }
    }
}

/// Boundary check for strategy output: a tag whose span is inverted, out of
/// bounds, off a `char` boundary, or inconsistent with `original_text` is a
/// programming error in that strategy — logged and dropped, never a crash.
fn validate_candidates(text: &str, pool: Vec<CandidateTag>) -> Vec<CandidateTag> {
    pool.into_iter()
        .filter(|tag| match tag.span.slice_of(text) {
            Some(slice) if slice == tag.original_text => true,
            _ => {
                warn!(
                    source = %tag.source,
                    start = tag.span.start,
                    end = tag.span.end,
                    "dropping tag with invalid span"
                );
                false
            }
        })
        .collect()
}

/// The input with all kept tag spans elided. Overlapping spans are coalesced
/// first; removal runs in descending start order so earlier offsets stay
/// valid; leftover whitespace is collapsed.
fn build_clean_text(text: &str, kept: &[CandidateTag]) -> String {
    let mut spans: Vec<Span> = kept.iter().map(|t| t.span).collect();
    spans.sort();

    let mut coalesced: Vec<Span> = Vec::new();
    for span in spans {
        match coalesced.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => coalesced.push(span),
        }
    }

    let mut remaining = text.to_string();
    for span in coalesced.iter().rev() {
        remaining.replace_range(span.start..span.end, "");
    }
    remaining.split_whitespace().collect::<Vec<_>>().join(" ")
}
