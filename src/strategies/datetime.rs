//! Date/time extraction strategy.
//!
//! Wraps the `DateTimeRecognizer` capability and adds the bespoke ordinal
//! weekday-of-month rule. Emits a `Time` tag when an hour or minute
//! component is certain, else a `Date` tag; a recognized range additionally
//! emits an "Until <end>" tag over the end segment's span. Ordinal matches
//! are kept only on spans the general recognizer left uncovered.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::confidence::score_datetime;
use crate::ordinal::find_ordinal_weekdays;
use crate::traits::{
    ComponentCertainty, DateTimeRecognizer, ParseContext, RecognizedInstant, TagStrategy,
};
use crate::types::{CandidateTag, Span, TagKind, TagValue};

/// Cheap `test` vocabulary. Permissive by design: false positives cost one
/// recognizer pass, false negatives would violate the strategy contract.
const TEST_KEYWORDS: &[&str] = &[
    "today", "tonight", "tomorrow", "yesterday", "noon", "midday", "midnight", "next", "in ",
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "january",
    "february", "march", "april", "may", "june", "july", "august", "september", "october",
    "november", "december", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "oct", "nov",
    "dec",
];

pub struct DateTimeStrategy {
    recognizer: Box<dyn DateTimeRecognizer>,
    priority: i32,
}

impl DateTimeStrategy {
    pub const ID: &'static str = "datetime";

    pub fn new(recognizer: Box<dyn DateTimeRecognizer>, priority: i32) -> Self {
        Self { recognizer, priority }
    }

    fn tag_for(
        &self,
        text: &str,
        span: Span,
        instant: NaiveDateTime,
        certainty: &ComponentCertainty,
        reference: NaiveDateTime,
        display: String,
    ) -> Option<CandidateTag> {
        let original = span.slice_of(text)?;
        let has_clock = certainty.hour || certainty.minute;
        // a date-only tag is "past" by calendar day, a clock tag by instant
        let is_past = if has_clock {
            instant < reference
        } else {
            instant.date() < reference.date()
        };
        let confidence = score_datetime(certainty, original.chars().count(), is_past);
        let kind = if has_clock { TagKind::Time } else { TagKind::Date };
        Some(CandidateTag::new(
            kind,
            TagValue::Instant(instant),
            display,
            span,
            original,
            confidence,
            Self::ID,
        ))
    }
}

impl TagStrategy for DateTimeStrategy {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Date & time"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn test(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        lower.chars().any(|c| c.is_ascii_digit())
            || TEST_KEYWORDS.iter().any(|k| lower.contains(k))
    }

    fn parse(&self, text: &str, ctx: &ParseContext<'_>) -> Vec<CandidateTag> {
        let mut tags: Vec<CandidateTag> = Vec::new();

        for found in self.recognizer.recognize(text, ctx.reference) {
            let RecognizedInstant {
                span,
                instant,
                end,
                certainty,
            } = found;
            let display = display_for(instant, &certainty, ctx.reference);
            if let Some(tag) = self.tag_for(text, span, instant, &certainty, ctx.reference, display)
            {
                tags.push(tag);
            }
            if let Some(range_end) = end {
                let display = format!(
                    "Until {}",
                    display_for(range_end.instant, &certainty, ctx.reference)
                );
                if let Some(tag) = self.tag_for(
                    text,
                    range_end.span,
                    range_end.instant,
                    &certainty,
                    ctx.reference,
                    display,
                ) {
                    tags.push(tag);
                }
            }
        }

        // bespoke rule, only on uncovered spans: general recognizer wins
        let covered: Vec<Span> = tags.iter().map(|t| t.span).collect();
        for found in find_ordinal_weekdays(text, ctx.reference.date()) {
            if covered.iter().any(|s| s.overlaps(&found.span)) {
                continue;
            }
            let instant = match found.date.and_hms_opt(0, 0, 0) {
                Some(instant) => instant,
                None => continue,
            };
            let certainty = ComponentCertainty::full_date();
            let display = display_for(instant, &certainty, ctx.reference);
            if let Some(tag) =
                self.tag_for(text, found.span, instant, &certainty, ctx.reference, display)
            {
                tags.push(tag);
            }
        }

        tags.sort_by_key(|t| t.span);
        tags
    }
}

/// Humanized rendering: "Today", "Tomorrow", a near weekday name, or a
/// calendar date; a certain clock component appends "3:00 PM".
fn display_for(
    instant: NaiveDateTime,
    certainty: &ComponentCertainty,
    reference: NaiveDateTime,
) -> String {
    let has_clock = certainty.hour || certainty.minute;
    let implied_today = instant.date() == reference.date() && !certainty.day;
    if has_clock && implied_today {
        return format_time(instant);
    }
    let date_part = humanize_date(instant.date(), reference.date());
    if has_clock {
        format!("{date_part} {}", format_time(instant))
    } else {
        date_part
    }
}

fn format_time(instant: NaiveDateTime) -> String {
    instant.format("%-I:%M %p").to_string()
}

fn humanize_date(date: NaiveDate, reference: NaiveDate) -> String {
    let delta = date.signed_duration_since(reference).num_days();
    match delta {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        2..=6 => date.format("%A").to_string(),
        _ if date.year() == reference.year() => date.format("%b %-d").to_string(),
        _ => date.format("%b %-d, %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::recognizer::RuleBasedDateTimeRecognizer;
    use chrono::Weekday;

    fn reference() -> NaiveDateTime {
        // Thursday, August 6, 2026, 09:00
        NaiveDate::from_ymd_opt(2026, 8, 6)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn strategy() -> DateTimeStrategy {
        DateTimeStrategy::new(Box::new(RuleBasedDateTimeRecognizer::new()), 100)
    }

    fn parse(text: &str) -> Vec<CandidateTag> {
        let config = EngineConfig::default();
        let ctx = ParseContext {
            reference: reference(),
            config: &config,
        };
        strategy().parse(text, &ctx)
    }

    #[test]
    fn test_never_misses_parseable_input() {
        let strategy = strategy();
        for text in [
            "dentist tomorrow at 3pm",
            "the third friday of next month",
            "taxes due 3/14",
            "lunch at noon",
            "submit draft friday",
        ] {
            assert!(strategy.test(text), "test() must cover {text:?}");
            assert!(!parse(text).is_empty());
        }
    }

    #[test]
    fn test_rejects_plain_words_cheaply() {
        // not required by the contract, but the pre-check should skip
        // obviously date-free input
        assert!(!strategy().test("buy milk"));
    }

    #[test]
    fn date_without_clock_is_a_date_tag() {
        let tags = parse("submit draft tomorrow");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].kind, TagKind::Date);
        assert_eq!(tags[0].display_text, "Tomorrow");
        assert_eq!(tags[0].source, "datetime");
    }

    #[test]
    fn clock_component_makes_a_time_tag() {
        let tags = parse("standup at 9:15am");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].kind, TagKind::Time);
        assert_eq!(tags[0].display_text, "9:15 AM");
    }

    #[test]
    fn merged_date_and_time_render_both_parts() {
        let tags = parse("dentist tomorrow at 3pm");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].kind, TagKind::Time);
        assert_eq!(tags[0].display_text, "Tomorrow 3:00 PM");
        assert_eq!(tags[0].original_text, "tomorrow at 3pm");
    }

    #[test]
    fn near_weekday_renders_by_name() {
        // Monday is 4 days out from the Thursday reference
        let tags = parse("review monday");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].display_text, "Monday");
    }

    #[test]
    fn far_date_renders_as_calendar_date() {
        let tags = parse("call about the report next friday");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].kind, TagKind::Date);
        // 8 days out — past the weekday-name window
        assert_eq!(tags[0].display_text, "Aug 14");
        // full date certain, future: 0.7 + 3×0.05 + 0.1
        assert!((tags[0].confidence - 0.95).abs() < 1e-6);
    }

    #[test]
    fn other_year_renders_with_year() {
        let tags = parse("renew passport March 3, 2027");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].display_text, "Mar 3, 2027");
    }

    #[test]
    fn range_emits_until_tag_on_end_segment() {
        let text = "workshop 2pm to 4pm";
        let tags = parse(text);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].display_text, "2:00 PM");
        assert_eq!(tags[1].display_text, "Until 4:00 PM");
        assert_eq!(tags[1].original_text, "to 4pm");
        assert!(!tags[0].span.overlaps(&tags[1].span));
    }

    #[test]
    fn ordinal_phrase_resolves_when_uncovered() {
        let tags = parse("the third friday of next month");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].kind, TagKind::Date);
        let value = tags[0].value.as_instant().unwrap();
        assert_eq!(value.date().weekday(), Weekday::Fri);
        assert_eq!(value.date(), NaiveDate::from_ymd_opt(2026, 9, 18).unwrap());
        // bespoke rule scores like any certain full date
        assert!((tags[0].confidence - 0.95).abs() < 1e-6);
    }

    #[test]
    fn past_date_loses_confidence() {
        let tags = parse("retro yesterday");
        assert_eq!(tags.len(), 1);
        // 0.95 − 0.05 past penalty
        assert!((tags[0].confidence - 0.90).abs() < 1e-6);
    }

    #[test]
    fn today_is_not_penalized_as_past() {
        // midnight of the reference day is earlier than the 09:00 reference
        // instant, but the calendar day is not in the past
        let tags = parse("wrap up today");
        assert_eq!(tags.len(), 1);
        assert!((tags[0].confidence - 0.95).abs() < 1e-6);
    }

    #[test]
    fn spans_match_source_text() {
        let text = "gym friday and dentist 3/14";
        for tag in parse(text) {
            assert_eq!(tag.span.slice_of(text), Some(tag.original_text.as_str()));
        }
    }

    #[test]
    fn tags_come_out_ordered_by_span() {
        let tags = parse("gym friday and dentist 3/14");
        assert_eq!(tags.len(), 2);
        assert!(tags[0].span.start < tags[1].span.start);
    }
}
