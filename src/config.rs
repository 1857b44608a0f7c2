//! Engine configuration: the declarative vocabulary the heuristics run on.
//!
//! Everything here is data, not code — category patterns, stoplists,
//! honorifics, venue vocabulary, strategy priorities — so deployments can
//! extend vocabulary (or localize it) without modifying the resolution
//! algorithm. Config-supplied patterns are compiled at engine construction;
//! an invalid pattern is a construction-time error, never a runtime one.

use serde::{Deserialize, Serialize};

use crate::types::TagKind;

// ═══════════════════════════════════════════
// Category rules
// ═══════════════════════════════════════════

/// One category of the Label classifier: a normalized key plus a
/// regex-alternation pattern (compiled case-insensitively).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub key: String,
    pub pattern: String,
}

impl CategoryRule {
    fn new(key: &str, pattern: &str) -> Self {
        Self {
            key: key.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

// ═══════════════════════════════════════════
// Strategy priorities
// ═══════════════════════════════════════════

/// Tie-break ranks per strategy: higher wins when confidences are equal.
/// Date/time detections outrank priority keywords, which outrank entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyPriorities {
    pub datetime: i32,
    pub priority: i32,
    pub entity: i32,
}

impl Default for StrategyPriorities {
    fn default() -> Self {
        Self {
            datetime: 100,
            priority: 80,
            entity: 60,
        }
    }
}

// ═══════════════════════════════════════════
// Appearance overrides
// ═══════════════════════════════════════════

/// Per-kind icon/color override. Presentation concern only; absent kinds
/// fall back to `TagKind::default_icon` / `default_color`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceOverride {
    pub kind: TagKind,
    pub icon: String,
    pub color: String,
}

// ═══════════════════════════════════════════
// Engine config
// ═══════════════════════════════════════════

/// Full configuration surface of the engine. `Default` carries the built-in
/// English vocabulary; the whole struct deserializes from config data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Category → pattern dictionary for the Label classifier.
    pub categories: Vec<CategoryRule>,
    /// Lowercase common nouns that can never be a person name (weekday and
    /// month names included — they show up as possessives like "Friday's").
    pub person_stoplist: Vec<String>,
    /// Lowercase honorific tokens stripped from contextual name captures.
    pub honorifics: Vec<String>,
    /// Lowercase fixed venue vocabulary for the location heuristic.
    pub venues: Vec<String>,
    /// Lowercase person-addressing verbs for the contextual-name heuristic.
    /// Multi-word entries ("meet with") are matched longest-first.
    pub contact_verbs: Vec<String>,
    /// Lowercase connector words that terminate a contextual name capture
    /// ("call John about the report" — the name stops at "about").
    pub connector_stopwords: Vec<String>,
    pub priorities: StrategyPriorities,
    pub appearance: Vec<AppearanceOverride>,
}

impl EngineConfig {
    /// True when `word` (any case) can never be a person name.
    pub fn is_stoplisted(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.person_stoplist.iter().any(|s| *s == lower)
    }

    pub fn is_honorific(&self, word: &str) -> bool {
        let lower = word.to_lowercase().trim_end_matches('.').to_string();
        self.honorifics.iter().any(|h| *h == lower)
    }

    pub fn is_connector(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.connector_stopwords.iter().any(|c| *c == lower)
    }

    pub fn is_venue(&self, phrase: &str) -> bool {
        let lower = phrase.to_lowercase();
        self.venues.iter().any(|v| *v == lower)
    }

    /// Icon/color for a kind, honoring overrides.
    pub fn appearance_for(&self, kind: TagKind) -> (&str, &str) {
        self.appearance
            .iter()
            .find(|a| a.kind == kind)
            .map(|a| (a.icon.as_str(), a.color.as_str()))
            .unwrap_or_else(|| (kind.default_icon(), kind.default_color()))
    }
}

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            categories: vec![
                CategoryRule::new(
                    "work",
                    r"\b(?:meetings?|deadline|report|presentation|project|client|boss|office|standup|sprint|interview|proposal|contract|review|slides|demo|sync|emails?)\b",
                ),
                CategoryRule::new(
                    "personal",
                    r"\b(?:birthday|anniversary|family|mom|dad|kids|chores|laundry|cleaning|errands?|haircut)\b",
                ),
                CategoryRule::new(
                    "health",
                    r"\b(?:doctor|dentist|gym|workout|yoga|medication|meds|pills|check-?up|therapy|therapist|meditation|exercise|run|jog|appointment)\b",
                ),
                CategoryRule::new(
                    "shopping",
                    r"\b(?:buy|shop(?:ping)?|grocer(?:ies|y)|order|purchase|return|pick\s*up|amazon)\b",
                ),
                CategoryRule::new(
                    "finance",
                    r"\b(?:pay|bills?|invoice|bank|budget|tax(?:es)?|rent|mortgage|insurance|deposit|refund|paycheck|salary)\b",
                ),
                CategoryRule::new(
                    "social",
                    r"\b(?:party|dinner|lunch|drinks|brunch|hangout|wedding|bbq|barbecue|game\s+night|movie|concert)\b",
                ),
                CategoryRule::new(
                    "travel",
                    r"\b(?:flight|trip|hotel|airbnb|airport|vacation|passport|visa|itinerary|booking|train|luggage|packing)\b",
                ),
                CategoryRule::new(
                    "education",
                    r"\b(?:class(?:es)?|study(?:ing)?|exams?|homework|lecture|course|school|essay|assignment|tutorial|semester|quiz|textbook|chapter)\b",
                ),
            ],
            person_stoplist: strings(&[
                // weekday and month names — "Friday's" is never a person
                "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
                "january", "february", "march", "april", "may", "june", "july", "august",
                "september", "october", "november", "december",
                // generic nouns
                "company", "team", "meeting", "office", "project", "client", "manager",
                "boss", "everyone", "everybody", "family", "work", "home", "school",
                "doctor", "dentist", "lunch", "dinner", "breakfast", "today", "tomorrow",
                "yesterday", "tonight", "morning", "afternoon", "evening", "night", "week",
                "month", "year", "store", "bank", "report", "friend", "guys", "people",
                "staff", "group", "department", "committee", "vendor", "customer",
            ]),
            honorifics: strings(&["mr", "mrs", "ms", "miss", "dr", "prof", "sir", "madam"]),
            venues: strings(&[
                "office", "gym", "school", "work", "home", "airport", "downtown", "park",
                "cafe", "coffee shop", "restaurant", "mall", "library", "hospital",
                "clinic", "bank", "church", "beach", "studio", "station", "hotel",
                "campus", "store", "market", "pharmacy", "supermarket", "pool",
            ]),
            contact_verbs: strings(&[
                "call", "text", "email", "meet with", "meet", "message", "ping", "remind",
                "visit", "contact", "phone", "chat with", "talk to", "follow up with",
                "sync with", "interview", "invite",
            ]),
            connector_stopwords: strings(&[
                "about", "regarding", "re", "on", "at", "in", "for", "to", "the", "a",
                "an", "and", "with", "my", "our", "your", "his", "her", "their", "this",
                "that", "next", "last", "tomorrow", "today", "tonight", "later", "soon",
                "before", "after", "by", "from", "until", "when", "if",
            ]),
            priorities: StrategyPriorities::default(),
            appearance: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;

    #[test]
    fn default_vocabulary_is_populated() {
        let config = EngineConfig::default();
        assert_eq!(config.categories.len(), 8);
        assert!(config.person_stoplist.len() > 30);
        assert!(!config.honorifics.is_empty());
        assert!(!config.venues.is_empty());
        assert!(!config.contact_verbs.is_empty());
    }

    #[test]
    fn default_category_patterns_compile() {
        for rule in EngineConfig::default().categories {
            let compiled = RegexBuilder::new(&rule.pattern)
                .case_insensitive(true)
                .build();
            assert!(compiled.is_ok(), "pattern for '{}' must compile", rule.key);
        }
    }

    #[test]
    fn stoplist_lookup_is_case_insensitive() {
        let config = EngineConfig::default();
        assert!(config.is_stoplisted("Company"));
        assert!(config.is_stoplisted("FRIDAY"));
        assert!(!config.is_stoplisted("John"));
    }

    #[test]
    fn honorific_lookup_ignores_trailing_dot() {
        let config = EngineConfig::default();
        assert!(config.is_honorific("Dr."));
        assert!(config.is_honorific("mrs"));
        assert!(!config.is_honorific("John"));
    }

    #[test]
    fn default_priorities_rank_datetime_highest() {
        let p = StrategyPriorities::default();
        assert!(p.datetime > p.priority);
        assert!(p.priority > p.entity);
    }

    #[test]
    fn appearance_override_wins_over_default() {
        let mut config = EngineConfig::default();
        assert_eq!(
            config.appearance_for(TagKind::Person),
            (TagKind::Person.default_icon(), TagKind::Person.default_color())
        );
        config.appearance.push(AppearanceOverride {
            kind: TagKind::Person,
            icon: "smiley".into(),
            color: "#123456".into(),
        });
        assert_eq!(config.appearance_for(TagKind::Person), ("smiley", "#123456"));
    }

    #[test]
    fn config_deserializes_with_partial_fields() {
        let json = r#"{"priorities": {"datetime": 10, "priority": 9, "entity": 8}}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.priorities.datetime, 10);
        // omitted fields fall back to the built-in vocabulary
        assert_eq!(config.categories.len(), 8);
    }
}
