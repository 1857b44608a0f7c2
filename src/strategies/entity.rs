//! Entity and category extraction strategy.
//!
//! Wraps the `EntityRecognizer` capability and augments it with bespoke
//! detectors, run in a fixed order over one shared claimed-span set:
//! recognizer output, street addresses, preposition/venue locations,
//! possessive names, @mentions, #hashtags, contextual-verb names, and
//! finally category classification. Each detector skips candidates whose
//! span overlaps ground an earlier one claimed, so the same substring never
//! produces two conflicting Person/Location tags inside this strategy.
//! Category labels coexist and never claim ground.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::config::EngineConfig;
use crate::confidence::{fixed, score_category};
use crate::error::TaggingError;
use crate::traits::{EntityKind, EntityRecognizer, ParseContext, TagStrategy};
use crate::types::{CandidateTag, Span, TagKind, TagValue};

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    // number + street name + suffix, then optional city, state and zip
    Regex::new(
        r"\b\d{1,5}\s+(?:[A-Z][A-Za-z]*\s+){1,4}(?:St|Street|Ave|Avenue|Rd|Road|Blvd|Boulevard|Dr|Drive|Ln|Lane|Way|Ct|Court|Pl|Place)\b\.?(?:,\s*[A-Z][A-Za-z]+(?:\s+[A-Z][A-Za-z]+)*)?(?:,\s*[A-Z]{2}\b)?(?:\s+\d{5})?",
    )
    .expect("built-in address pattern is valid")
});

static PREP_PROPER_RE: LazyLock<Regex> = LazyLock::new(|| {
    // locative preposition followed by a capitalized phrase; deliberately
    // case-sensitive, and "on Friday"/"in January" fall to the stoplist check
    Regex::new(
        r"\b(?:[Aa]t|[Ii]n|[Nn]ear|[Oo]n)\s+(?:the\s+)?([A-Z][\w'’]*(?:\s+[A-Z][\w'’]*){0,2})",
    )
    .expect("built-in preposition-location pattern is valid")
});

static POSSESSIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z][a-z]+)['’]s\b").expect("built-in possessive pattern is valid"));

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_]+)\b").expect("built-in mention pattern is valid"));

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([A-Za-z0-9_]+)\b").expect("built-in hashtag pattern is valid"));

pub struct EntityStrategy {
    recognizer: Box<dyn EntityRecognizer>,
    priority: i32,
    categories: Vec<(String, Regex)>,
    venue_re: Option<Regex>,
    contact_re: Option<Regex>,
}

impl EntityStrategy {
    pub const ID: &'static str = "entity";

    pub fn new(
        recognizer: Box<dyn EntityRecognizer>,
        config: &EngineConfig,
    ) -> Result<Self, TaggingError> {
        let mut categories = Vec::with_capacity(config.categories.len());
        for rule in &config.categories {
            let compiled = RegexBuilder::new(&rule.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| TaggingError::InvalidCategoryPattern {
                    category: rule.key.clone(),
                    source,
                })?;
            categories.push((rule.key.clone(), compiled));
        }

        let venue_re = if config.venues.is_empty() {
            None
        } else {
            Some(
                RegexBuilder::new(&format!(
                    r"\b(?:(at|in|near|on)\s+)?(?:the\s+)?({})\b",
                    alternation(&config.venues)
                ))
                .case_insensitive(true)
                .build()
                .map_err(|source| TaggingError::InvalidPattern {
                    what: "venue vocabulary",
                    source,
                })?,
            )
        };

        let contact_re = if config.contact_verbs.is_empty() {
            None
        } else {
            Some(
                RegexBuilder::new(&format!(
                    r"\b(?:{})\s+([A-Za-z][\w'’.\-]*(?:\s+[A-Za-z][\w'’.\-]*){{0,2}})",
                    alternation(&config.contact_verbs)
                ))
                .case_insensitive(true)
                .build()
                .map_err(|source| TaggingError::InvalidPattern {
                    what: "contact-verb",
                    source,
                })?,
            )
        };

        Ok(Self {
            recognizer,
            priority: config.priorities.entity,
            categories,
            venue_re,
            contact_re,
        })
    }

    /// Refine a contextual-verb capture into a person name: drop leading
    /// honorifics/stopwords, cut at the first connector, keep at most the
    /// last two tokens, reject stoplisted nouns.
    fn refine_name(
        &self,
        capture: &str,
        capture_start: usize,
        config: &EngineConfig,
    ) -> Option<(Span, String)> {
        let mut tokens = tokens_with_offsets(capture);

        while let Some((_, first)) = tokens.first() {
            if config.is_honorific(first) || config.is_connector(first) {
                tokens.remove(0);
            } else {
                break;
            }
        }
        if let Some(pos) = tokens
            .iter()
            .position(|(_, w)| config.is_connector(w) || config.is_honorific(w))
        {
            tokens.truncate(pos);
        }
        if tokens.len() > 2 {
            tokens.drain(..tokens.len() - 2);
        }
        if tokens.is_empty() {
            return None;
        }

        let cleaned: Vec<&str> = tokens.iter().map(|(_, w)| clean_name_token(w)).collect();
        if cleaned.iter().any(|w| w.is_empty() || config.is_stoplisted(w)) {
            return None;
        }

        let (first_off, _) = tokens[0];
        let (last_off, last_word) = tokens[tokens.len() - 1];
        let span = Span::new(capture_start + first_off, capture_start + last_off + last_word.len());
        let display = cleaned
            .iter()
            .map(|w| title_case(w))
            .collect::<Vec<_>>()
            .join(" ");
        Some((span, display))
    }
}

impl TagStrategy for EntityStrategy {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Entities & categories"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn test(&self, text: &str) -> bool {
        // the heuristics key off ordinary words, so the only safe cheap
        // rejection is input with nothing alphanumeric at all
        text.chars().any(|c| c.is_alphanumeric())
    }

    fn parse(&self, text: &str, ctx: &ParseContext<'_>) -> Vec<CandidateTag> {
        let config = ctx.config;
        let mut tags: Vec<CandidateTag> = Vec::new();
        let mut claimed: Vec<Span> = Vec::new();

        let claim_and_push =
            |tag: CandidateTag, claimed: &mut Vec<Span>, tags: &mut Vec<CandidateTag>| {
                claimed.push(tag.span);
                tags.push(tag);
            };

        // recognizer capability output claims ground first
        for entity in self.recognizer.recognize(text) {
            if claimed.iter().any(|s| s.overlaps(&entity.span)) {
                continue;
            }
            let Some(original) = entity.span.slice_of(text) else {
                continue;
            };
            let (kind, confidence) = match entity.kind {
                EntityKind::Person => (TagKind::Person, fixed::NER_PERSON),
                EntityKind::Place => (TagKind::Location, fixed::NER_PLACE),
                // the tag vocabulary has no organization kind; treat as a place
                EntityKind::Organization => (TagKind::Location, fixed::NER_ORGANIZATION),
            };
            let tag = CandidateTag::new(
                kind,
                TagValue::Text(entity.text.clone()),
                entity.text.clone(),
                entity.span,
                original,
                confidence,
                Self::ID,
            );
            claim_and_push(tag, &mut claimed, &mut tags);
        }

        // 1. explicit street addresses
        for m in ADDRESS_RE.find_iter(text) {
            let span = Span::new(m.start(), m.end());
            if claimed.iter().any(|s| s.overlaps(&span)) {
                continue;
            }
            let tag = CandidateTag::new(
                TagKind::Location,
                TagValue::Text(m.as_str().to_string()),
                m.as_str(),
                span,
                m.as_str(),
                fixed::ADDRESS,
                Self::ID,
            );
            claim_and_push(tag, &mut claimed, &mut tags);
        }

        // 2a. fixed venue vocabulary, with or without a locative preposition
        if let Some(venue_re) = &self.venue_re {
            for caps in venue_re.captures_iter(text) {
                let m = caps.get(0).expect("group 0");
                let span = Span::new(m.start(), m.end());
                if claimed.iter().any(|s| s.overlaps(&span)) {
                    continue;
                }
                let venue = caps.get(2).map(|g| g.as_str()).unwrap_or_default();
                let confidence = if caps.get(1).is_some() {
                    fixed::LOCATION_PREPOSITION
                } else {
                    fixed::LOCATION_BARE
                };
                let display = venue
                    .split_whitespace()
                    .map(title_case)
                    .collect::<Vec<_>>()
                    .join(" ");
                let tag = CandidateTag::new(
                    TagKind::Location,
                    TagValue::Text(display.clone()),
                    display,
                    span,
                    m.as_str(),
                    confidence,
                    Self::ID,
                );
                claim_and_push(tag, &mut claimed, &mut tags);
            }
        }

        // 2b. preposition-led capitalized phrases
        for caps in PREP_PROPER_RE.captures_iter(text) {
            let m = caps.get(0).expect("group 0");
            let span = Span::new(m.start(), m.end());
            if claimed.iter().any(|s| s.overlaps(&span)) {
                continue;
            }
            let phrase = caps.get(1).expect("phrase group").as_str();
            if phrase
                .split_whitespace()
                .any(|w| config.is_stoplisted(clean_name_token(w)))
            {
                continue;
            }
            let tag = CandidateTag::new(
                TagKind::Location,
                TagValue::Text(phrase.to_string()),
                phrase,
                span,
                m.as_str(),
                fixed::LOCATION_PREPOSITION,
                Self::ID,
            );
            claim_and_push(tag, &mut claimed, &mut tags);
        }

        // 3. possessive names: "John's" → "John", stoplisted nouns discarded
        for caps in POSSESSIVE_RE.captures_iter(text) {
            let m = caps.get(0).expect("group 0");
            let span = Span::new(m.start(), m.end());
            if claimed.iter().any(|s| s.overlaps(&span)) {
                continue;
            }
            let name = caps.get(1).expect("name group").as_str();
            if config.is_stoplisted(name) {
                continue;
            }
            let display = title_case(name);
            let tag = CandidateTag::new(
                TagKind::Person,
                TagValue::Text(display.clone()),
                display,
                span,
                m.as_str(),
                fixed::PERSON_POSSESSIVE,
                Self::ID,
            );
            claim_and_push(tag, &mut claimed, &mut tags);
        }

        // 4. @mentions
        for caps in MENTION_RE.captures_iter(text) {
            let m = caps.get(0).expect("group 0");
            let span = Span::new(m.start(), m.end());
            if claimed.iter().any(|s| s.overlaps(&span)) {
                continue;
            }
            let display = handle_to_display(caps.get(1).expect("handle group").as_str());
            let tag = CandidateTag::new(
                TagKind::Person,
                TagValue::Text(display.clone()),
                display,
                span,
                m.as_str(),
                fixed::PERSON_MENTION,
                Self::ID,
            );
            claim_and_push(tag, &mut claimed, &mut tags);
        }

        // 5. #hashtags become projects, mirroring the mention treatment
        for caps in HASHTAG_RE.captures_iter(text) {
            let m = caps.get(0).expect("group 0");
            let span = Span::new(m.start(), m.end());
            if claimed.iter().any(|s| s.overlaps(&span)) {
                continue;
            }
            let display = handle_to_display(caps.get(1).expect("tag group").as_str());
            let tag = CandidateTag::new(
                TagKind::Project,
                TagValue::Text(display.clone()),
                display,
                span,
                m.as_str(),
                fixed::PROJECT_HASHTAG,
                Self::ID,
            );
            claim_and_push(tag, &mut claimed, &mut tags);
        }

        // 6. contextual-verb names: "call John about…" → "John"
        if let Some(contact_re) = &self.contact_re {
            for caps in contact_re.captures_iter(text) {
                let capture = caps.get(1).expect("name capture");
                let Some((span, display)) =
                    self.refine_name(capture.as_str(), capture.start(), config)
                else {
                    continue;
                };
                if claimed.iter().any(|s| s.overlaps(&span)) {
                    continue;
                }
                let Some(original) = span.slice_of(text) else {
                    continue;
                };
                let tag = CandidateTag::new(
                    TagKind::Person,
                    TagValue::Text(display.clone()),
                    display,
                    span,
                    original,
                    fixed::PERSON_CONTEXTUAL,
                    Self::ID,
                );
                claim_and_push(tag, &mut claimed, &mut tags);
            }
        }

        // 7. category labels — all matching categories coexist; a category
        // anchors to its first unclaimed match and is dropped only when
        // every match sits on claimed ground
        for (key, regex) in &self.categories {
            let mut count = 0usize;
            let mut any_long = false;
            let mut anchor: Option<Span> = None;
            for m in regex.find_iter(text) {
                count += 1;
                if m.as_str().chars().count() > 5 {
                    any_long = true;
                }
                let span = Span::new(m.start(), m.end());
                if anchor.is_none() && !claimed.iter().any(|s| s.overlaps(&span)) {
                    anchor = Some(span);
                }
            }
            if count == 0 {
                continue;
            }
            let Some(span) = anchor else {
                continue;
            };
            let Some(original) = span.slice_of(text) else {
                continue;
            };
            tags.push(CandidateTag::new(
                TagKind::Label,
                TagValue::Category(key.clone()),
                title_case(key),
                span,
                original,
                score_category(count, any_long),
                Self::ID,
            ));
        }

        tags.sort_by_key(|t| t.span);
        tags
    }
}

/// Longest-first alternation of escaped literals, so "meet with" beats
/// "meet" and "coffee shop" beats "cafe".
fn alternation(words: &[String]) -> String {
    let mut sorted: Vec<&String> = words.iter().collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    sorted
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

fn tokens_with_offsets(s: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in s.char_indices() {
        if c.is_whitespace() {
            if let Some(st) = start.take() {
                out.push((st, &s[st..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(st) = start {
        out.push((st, &s[st..]));
    }
    out
}

/// Strip the possessive suffix and trailing punctuation from a name token.
fn clean_name_token(token: &str) -> &str {
    let token = token.trim_end_matches(['.', ',', ';', ':', '!', '?', '-']);
    token
        .strip_suffix("'s")
        .or_else(|| token.strip_suffix("’s"))
        .unwrap_or(token)
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "@john_smith" → "John Smith".
fn handle_to_display(handle: &str) -> String {
    handle
        .split('_')
        .filter(|part| !part.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}
