//! Rule-based named-entity recognition.
//!
//! Default implementation of the `EntityRecognizer` capability. Deliberately
//! narrow: honorific-prefixed names, proper-noun venue phrases and
//! corporate-suffix organizations. The bespoke detectors in the entity
//! strategy cover the rest; a deployment with a real NER engine replaces
//! this through the trait.

use std::sync::LazyLock;

use regex::Regex;

use crate::traits::{EntityKind, EntityRecognizer, RecognizedEntity};
use crate::types::Span;

/// A compiled surface pattern with the entity kind it detects.
struct SurfacePattern {
    regex: Regex,
    kind: EntityKind,
}

fn surface(source: &str, kind: EntityKind) -> SurfacePattern {
    SurfacePattern {
        // case-sensitive on purpose: these patterns key off capitalization
        regex: Regex::new(source).expect("built-in entity pattern is valid"),
        kind,
    }
}

static SURFACE_PATTERNS: LazyLock<Vec<SurfacePattern>> = LazyLock::new(|| {
    vec![
        surface(
            r"\b(?:Dr|Mr|Mrs|Ms|Miss|Prof)\.?\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?\b",
            EntityKind::Person,
        ),
        surface(
            r"\b(?:[A-Z][A-Za-z']+\s+){1,3}(?:Park|Hospital|Center|Centre|Cafe|Café|University|Airport|Station|Hotel|Tower|Plaza|Square|Hall|Library|Museum|Clinic)\b",
            EntityKind::Place,
        ),
        surface(
            r"\b(?:[A-Z][A-Za-z']+\s+){1,3}(?:Inc|LLC|Ltd|Corp|Co)\b\.?",
            EntityKind::Organization,
        ),
    ]
});

/// The built-in recognizer. Stateless; construct freely.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedEntityRecognizer;

impl RuleBasedEntityRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl EntityRecognizer for RuleBasedEntityRecognizer {
    fn recognize(&self, text: &str) -> Vec<RecognizedEntity> {
        let mut found: Vec<RecognizedEntity> = Vec::new();
        for pattern in SURFACE_PATTERNS.iter() {
            for m in pattern.regex.find_iter(text) {
                let span = Span::new(m.start(), m.end());
                // earlier patterns win overlapping ground
                if found.iter().any(|e| e.span.overlaps(&span)) {
                    continue;
                }
                found.push(RecognizedEntity {
                    span,
                    kind: pattern.kind,
                    text: m.as_str().to_string(),
                });
            }
        }
        found.sort_by_key(|e| e.span);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognize(text: &str) -> Vec<RecognizedEntity> {
        RuleBasedEntityRecognizer::new().recognize(text)
    }

    #[test]
    fn honorific_name_is_a_person() {
        let found = recognize("appointment with Dr. Ramirez next week");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, EntityKind::Person);
        assert_eq!(found[0].text, "Dr. Ramirez");
    }

    #[test]
    fn two_part_name_after_honorific() {
        let found = recognize("lunch with Mrs Helen Park");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, EntityKind::Person);
        assert_eq!(found[0].text, "Mrs Helen Park");
    }

    #[test]
    fn venue_phrase_is_a_place() {
        let found = recognize("concert at Lincoln Hall tonight");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, EntityKind::Place);
        assert_eq!(found[0].text, "Lincoln Hall");
    }

    #[test]
    fn corporate_suffix_is_an_organization() {
        let found = recognize("send contract to Acme Corp today");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, EntityKind::Organization);
        assert_eq!(found[0].text, "Acme Corp");
    }

    #[test]
    fn spans_point_at_the_source_text() {
        let text = "visit Mercy Hospital on friday";
        let found = recognize(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span.slice_of(text), Some("Mercy Hospital"));
    }

    #[test]
    fn lowercase_text_yields_nothing() {
        assert!(recognize("meet someone at the park").is_empty());
        assert!(recognize("").is_empty());
    }
}
