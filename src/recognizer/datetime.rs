//! Rule-based natural-language date/time recognition.
//!
//! Default implementation of the `DateTimeRecognizer` capability. Scans for
//! relative day words, weekday references, explicit calendar dates, clock
//! times and time ranges, then merges adjacent date and time mentions into
//! single instants. Everything resolves against the injected reference
//! instant — the recognizer never reads the wall clock.

use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use regex::{Match, Regex, RegexBuilder};

use crate::traits::{ComponentCertainty, DateTimeRecognizer, RangeEnd, RecognizedInstant};
use crate::types::Span;

fn pattern(source: &str) -> Regex {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .expect("built-in datetime pattern is valid")
}

static RELATIVE_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\b(day\s+after\s+tomorrow|tomorrow|today|tonight|yesterday)\b"));

static WEEKDAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"\b(?:(this|next|coming)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
});

static NEXT_PERIOD_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\bnext\s+(week|month)\b"));

static IN_OFFSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"\bin\s+(\d{1,3}|an?|one|two|three|four|five|six|seven|eight|nine|ten)\s+(days?|weeks?|months?)\b")
});

static MONTH_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"\b(january|february|march|april|june|july|august|september|october|november|december|may|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s*(\d{4}))?\b",
    )
});

static DAY_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"\b(\d{1,2})(?:st|nd|rd|th)?\s+(?:of\s+)?(january|february|march|april|may|june|july|august|september|october|november|december)\b",
    )
});

static NUMERIC_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{2,4}))?\b"));

static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"\b(?:(at)\s+)?(\d{1,2})(?::([0-5][0-9]))?\s*(a\.?m\.?|p\.?m\.?)?\b")
});

static NAMED_TIME_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\b(noon|midday|midnight)\b"));

static RANGE_CONNECTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^\s*(?:to|until|till|through|[-–])\s*$"));

static DATE_THEN_TIME_GAP_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^[\s,]*(?:at|@|on)?\s*$"));

static TIME_THEN_DATE_GAP_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^[\s,]*(?:on|of)?\s*$"));

/// Words that mean a weekday belongs to an ordinal weekday-of-month phrase,
/// which is the ordinal rule's territory rather than this recognizer's.
const ORDINAL_WORDS: &[&str] = &[
    "first", "second", "third", "fourth", "fifth", "last", "1st", "2nd", "3rd", "4th", "5th",
];

#[derive(Debug, Clone, Copy)]
struct DateMatch {
    span: Span,
    date: NaiveDate,
    certainty: ComponentCertainty,
}

#[derive(Debug, Clone, Copy)]
struct TimeMatch {
    span: Span,
    time: NaiveTime,
    minute_certain: bool,
}

/// A bare small number that could only be the start of a time range
/// ("2 to 4pm"); it never stands alone as a time.
#[derive(Debug, Clone, Copy)]
struct BareHour {
    span: Span,
    hour: u32,
}

/// The built-in recognizer. Stateless; construct freely.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedDateTimeRecognizer;

impl RuleBasedDateTimeRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl DateTimeRecognizer for RuleBasedDateTimeRecognizer {
    fn recognize(&self, text: &str, reference: NaiveDateTime) -> Vec<RecognizedInstant> {
        let dates = collect_dates(text, reference.date());
        let (times, bare_hours) = collect_times(text, &dates);
        assemble(text, reference, dates, times, bare_hours)
    }
}

// ═══════════════════════════════════════════
// Date collection
// ═══════════════════════════════════════════

fn claimed(spans: &[Span], candidate: Span) -> bool {
    spans.iter().any(|s| s.overlaps(&candidate))
}

/// True when the word immediately before `start` marks an ordinal phrase
/// ("third friday of…") or an ordinal-owned month ("of next month").
fn preceding_word_is(text: &str, start: usize, words: &[&str]) -> bool {
    let before = text[..start].trim_end().to_lowercase();
    words.iter().any(|w| {
        before.ends_with(w)
            && before[..before.len() - w.len()]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric())
    })
}

fn collect_dates(text: &str, reference: NaiveDate) -> Vec<DateMatch> {
    fn push(
        span: Span,
        date: NaiveDate,
        certainty: ComponentCertainty,
        spans: &mut Vec<Span>,
        out: &mut Vec<DateMatch>,
    ) {
        if !claimed(spans, span) {
            spans.push(span);
            out.push(DateMatch { span, date, certainty });
        }
    }

    let mut out: Vec<DateMatch> = Vec::new();
    let mut spans: Vec<Span> = Vec::new();

    for caps in RELATIVE_DAY_RE.captures_iter(text) {
        let m = caps.get(0).expect("group 0");
        let date = match caps[1].to_lowercase().replace(char::is_whitespace, " ").as_str() {
            "today" | "tonight" => reference,
            "yesterday" => reference.pred_opt().unwrap_or(reference),
            "tomorrow" => reference.succ_opt().unwrap_or(reference),
            // collapsed whitespace may not be single spaces in the source
            other if other.starts_with("day") => reference
                .checked_add_days(Days::new(2))
                .unwrap_or(reference),
            _ => continue,
        };
        push(span_of(m), date, ComponentCertainty::full_date(), &mut spans, &mut out);
    }

    for caps in WEEKDAY_RE.captures_iter(text) {
        let m = caps.get(0).expect("group 0");
        let weekday_group = caps.get(2).expect("weekday group");
        if preceding_word_is(text, m.start(), ORDINAL_WORDS) {
            continue;
        }
        let Some(weekday) = weekday_from_name(weekday_group.as_str()) else {
            continue;
        };
        let qualifier = caps.get(1).map(|q| q.as_str().to_lowercase());
        let mut ahead = (weekday.num_days_from_monday() + 7
            - reference.weekday().num_days_from_monday())
            % 7;
        match qualifier.as_deref() {
            // "next friday" is the following week's occurrence
            Some("next") => ahead += 7,
            // bare and "this"/"coming" resolve to the upcoming occurrence,
            // today excluded
            _ => {
                if ahead == 0 {
                    ahead = 7;
                }
            }
        }
        let Some(date) = reference.checked_add_days(Days::new(ahead as u64)) else {
            continue;
        };
        push(span_of(m), date, ComponentCertainty::full_date(), &mut spans, &mut out);
    }

    for caps in NEXT_PERIOD_RE.captures_iter(text) {
        let m = caps.get(0).expect("group 0");
        // "of next month" belongs to the ordinal weekday rule
        if preceding_word_is(text, m.start(), &["of", "in"]) {
            continue;
        }
        let (date, certainty) = match caps[1].to_lowercase().as_str() {
            "week" => (
                reference.checked_add_days(Days::new(7)),
                ComponentCertainty {
                    year: true,
                    month: true,
                    ..Default::default()
                },
            ),
            _ => (
                add_months(reference, 1),
                ComponentCertainty {
                    year: true,
                    month: true,
                    ..Default::default()
                },
            ),
        };
        if let Some(date) = date {
            push(span_of(m), date, certainty, &mut spans, &mut out);
        }
    }

    for caps in IN_OFFSET_RE.captures_iter(text) {
        let m = caps.get(0).expect("group 0");
        let Some(count) = parse_count(&caps[1]) else {
            continue;
        };
        let unit = caps[2].to_lowercase();
        let (date, certainty) = if unit.starts_with("day") {
            (
                reference.checked_add_days(Days::new(count)),
                ComponentCertainty::full_date(),
            )
        } else if unit.starts_with("week") {
            (
                reference.checked_add_days(Days::new(count * 7)),
                ComponentCertainty::full_date(),
            )
        } else {
            (
                add_months(reference, count as u32),
                ComponentCertainty {
                    year: true,
                    month: true,
                    ..Default::default()
                },
            )
        };
        if let Some(date) = date {
            push(span_of(m), date, certainty, &mut spans, &mut out);
        }
    }

    for caps in MONTH_DAY_RE.captures_iter(text) {
        let m = caps.get(0).expect("group 0");
        let Some(month) = month_from_name(&caps[1]) else {
            continue;
        };
        let Ok(day) = caps[2].parse::<u32>() else {
            continue;
        };
        let explicit_year = caps.get(3).and_then(|y| y.as_str().parse::<i32>().ok());
        if let Some((date, certainty)) = resolve_month_day(month, day, explicit_year, reference) {
            push(span_of(m), date, certainty, &mut spans, &mut out);
        }
    }

    for caps in DAY_MONTH_RE.captures_iter(text) {
        let m = caps.get(0).expect("group 0");
        let Ok(day) = caps[1].parse::<u32>() else {
            continue;
        };
        let Some(month) = month_from_name(&caps[2]) else {
            continue;
        };
        if let Some((date, certainty)) = resolve_month_day(month, day, None, reference) {
            push(span_of(m), date, certainty, &mut spans, &mut out);
        }
    }

    for caps in NUMERIC_DATE_RE.captures_iter(text) {
        let m = caps.get(0).expect("group 0");
        let (Ok(month), Ok(day)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            continue;
        };
        let explicit_year = caps.get(3).and_then(|y| y.as_str().parse::<i32>().ok()).map(|y| {
            if y < 100 {
                2000 + y
            } else {
                y
            }
        });
        if let Some((date, certainty)) = resolve_month_day(month, day, explicit_year, reference) {
            push(span_of(m), date, certainty, &mut spans, &mut out);
        }
    }

    out.sort_by_key(|d| d.span);
    out
}

fn resolve_month_day(
    month: u32,
    day: u32,
    explicit_year: Option<i32>,
    reference: NaiveDate,
) -> Option<(NaiveDate, ComponentCertainty)> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    let certainty = ComponentCertainty {
        year: explicit_year.is_some(),
        month: true,
        day: true,
        ..Default::default()
    };
    let year = explicit_year.unwrap_or_else(|| {
        // elided year resolves to the nearest future occurrence
        if (month, day) < (reference.month(), reference.day()) {
            reference.year() + 1
        } else {
            reference.year()
        }
    });
    NaiveDate::from_ymd_opt(year, month, day).map(|d| (d, certainty))
}

// ═══════════════════════════════════════════
// Time collection
// ═══════════════════════════════════════════

fn collect_times(text: &str, dates: &[DateMatch]) -> (Vec<TimeMatch>, Vec<BareHour>) {
    let date_spans: Vec<Span> = dates.iter().map(|d| d.span).collect();
    let mut times: Vec<TimeMatch> = Vec::new();
    let mut bare: Vec<BareHour> = Vec::new();

    for caps in CLOCK_RE.captures_iter(text) {
        let at = caps.get(1);
        let hour_group = caps.get(2).expect("hour group");
        let minutes = caps.get(3);
        let meridiem = caps.get(4);

        let Ok(raw_hour) = hour_group.as_str().parse::<u32>() else {
            continue;
        };
        if raw_hour > 23 {
            continue;
        }

        let start = at.map(|g| g.start()).unwrap_or_else(|| hour_group.start());
        let end = meridiem
            .map(|g| g.end())
            .or_else(|| minutes.map(|g| g.end()))
            .unwrap_or_else(|| hour_group.end());
        let span = Span::new(start, end);
        if claimed(&date_spans, span) {
            continue;
        }

        let anchored = at.is_some() || minutes.is_some() || meridiem.is_some();
        if !anchored {
            if (1..=12).contains(&raw_hour) {
                bare.push(BareHour {
                    span,
                    hour: raw_hour,
                });
            }
            continue;
        }

        let minute = minutes.and_then(|g| g.as_str().parse::<u32>().ok()).unwrap_or(0);
        let hour = match meridiem.map(|g| normalize_meridiem(g.as_str())) {
            Some(Meridiem::Pm) if raw_hour < 12 => raw_hour + 12,
            Some(Meridiem::Am) if raw_hour == 12 => 0,
            Some(_) => raw_hour,
            None if raw_hour <= 12 => infer_meridiem(raw_hour),
            None => raw_hour,
        };
        let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) else {
            continue;
        };
        times.push(TimeMatch {
            span,
            time,
            minute_certain: minutes.is_some(),
        });
    }

    for caps in NAMED_TIME_RE.captures_iter(text) {
        let m = caps.get(0).expect("group 0");
        let span = span_of(m);
        if claimed(&date_spans, span) || times.iter().any(|t| t.span.overlaps(&span)) {
            continue;
        }
        let hour = match caps[1].to_lowercase().as_str() {
            "midnight" => 0,
            _ => 12,
        };
        if let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0) {
            times.push(TimeMatch {
                span,
                time,
                minute_certain: false,
            });
        }
    }

    times.sort_by_key(|t| t.span);
    (times, bare)
}

enum Meridiem {
    Am,
    Pm,
}

fn normalize_meridiem(s: &str) -> Meridiem {
    if s.to_lowercase().starts_with('p') {
        Meridiem::Pm
    } else {
        Meridiem::Am
    }
}

/// Bare hours skew to business hours: 8–11 resolve AM, everything else PM
/// (12 stays noon, 0 stays midnight).
fn infer_meridiem(hour: u32) -> u32 {
    match hour {
        8..=11 => hour,
        12 | 0 => hour,
        h if h < 8 => h + 12,
        h => h,
    }
}

// ═══════════════════════════════════════════
// Assembly: ranges, date+time merging
// ═══════════════════════════════════════════

fn assemble(
    text: &str,
    reference: NaiveDateTime,
    dates: Vec<DateMatch>,
    times: Vec<TimeMatch>,
    bare_hours: Vec<BareHour>,
) -> Vec<RecognizedInstant> {
    let mut out: Vec<RecognizedInstant> = Vec::new();
    let mut date_used = vec![false; dates.len()];
    let mut time_used = vec![false; times.len()];

    // Ranges between two anchored times: "2pm to 4pm".
    for i in 0..times.len() {
        if time_used[i] {
            continue;
        }
        let Some(j) = times.iter().enumerate().position(|(j, t)| {
            j != i
                && !time_used[j]
                && t.span.start >= times[i].span.end
                && is_range_connector(text, times[i].span.end, t.span.start)
        }) else {
            continue;
        };
        time_used[i] = true;
        time_used[j] = true;
        out.push(build_range(
            text, reference, &dates, &mut date_used, times[i], times[j],
        ));
    }

    // Ranges led by a bare hour: "2 to 4pm" — the bare start borrows the
    // anchored end's meridiem, flipping when that would invert the range.
    for bare in &bare_hours {
        let Some(j) = times.iter().enumerate().position(|(j, t)| {
            !time_used[j]
                && t.span.start >= bare.span.end
                && is_range_connector(text, bare.span.end, t.span.start)
        }) else {
            continue;
        };
        let end = times[j];
        let mut start_hour = if end.time.hour() >= 12 {
            (bare.hour % 12) + 12
        } else {
            bare.hour % 12
        };
        if start_hour >= end.time.hour() + u32::from(end.time.minute() > 0) {
            start_hour = if start_hour >= 12 { start_hour - 12 } else { start_hour + 12 };
        }
        let Some(start_time) = NaiveTime::from_hms_opt(start_hour, 0, 0) else {
            continue;
        };
        time_used[j] = true;
        out.push(build_range(
            text,
            reference,
            &dates,
            &mut date_used,
            TimeMatch {
                span: bare.span,
                time: start_time,
                minute_certain: false,
            },
            end,
        ));
    }

    // Single times merged with an adjacent date mention.
    for (i, time) in times.iter().enumerate() {
        if time_used[i] {
            continue;
        }
        time_used[i] = true;
        let adjacent = dates.iter().enumerate().find(|(k, d)| {
            !date_used[*k]
                && ((d.span.end <= time.span.start
                    && gap_matches(&DATE_THEN_TIME_GAP_RE, text, d.span.end, time.span.start))
                    || (time.span.end <= d.span.start
                        && gap_matches(&TIME_THEN_DATE_GAP_RE, text, time.span.end, d.span.start)))
        });
        let (span, date, mut certainty) = match adjacent {
            Some((k, d)) => {
                date_used[k] = true;
                (d.span.union(&time.span), d.date, d.certainty)
            }
            None => (time.span, reference.date(), ComponentCertainty::default()),
        };
        certainty.hour = true;
        certainty.minute = time.minute_certain;
        out.push(RecognizedInstant {
            span,
            instant: date.and_time(time.time),
            end: None,
            certainty,
        });
    }

    // Date-only mentions.
    for (k, date) in dates.iter().enumerate() {
        if date_used[k] {
            continue;
        }
        out.push(RecognizedInstant {
            span: date.span,
            instant: date.date.and_hms_opt(0, 0, 0).unwrap_or(reference),
            end: None,
            certainty: date.certainty,
        });
    }

    out.sort_by_key(|r| r.span);
    out
}

fn build_range(
    text: &str,
    reference: NaiveDateTime,
    dates: &[DateMatch],
    date_used: &mut [bool],
    start: TimeMatch,
    end: TimeMatch,
) -> RecognizedInstant {
    // A date immediately before the range applies to both endpoints.
    let leading_date = dates.iter().enumerate().find(|(k, d)| {
        !date_used[*k]
            && d.span.end <= start.span.start
            && gap_matches(&DATE_THEN_TIME_GAP_RE, text, d.span.end, start.span.start)
    });
    let (primary_span, date, mut certainty) = match leading_date {
        Some((k, d)) => {
            date_used[k] = true;
            (d.span.union(&start.span), d.date, d.certainty)
        }
        None => (start.span, reference.date(), ComponentCertainty::default()),
    };
    certainty.hour = true;
    certainty.minute = start.minute_certain;

    let start_instant = date.and_time(start.time);
    let mut end_instant = date.and_time(end.time);
    if end_instant <= start_instant {
        // "11pm to 1am" crosses midnight
        end_instant = end_instant + chrono::Duration::days(1);
    }
    // the end span swallows the connector so the whole expression elides
    let connector_start = start.span.end
        + text[start.span.end..end.span.start]
            .len()
            .saturating_sub(text[start.span.end..end.span.start].trim_start().len());
    RecognizedInstant {
        span: primary_span,
        instant: start_instant,
        end: Some(RangeEnd {
            instant: end_instant,
            span: Span::new(connector_start, end.span.end),
        }),
        certainty,
    }
}

fn is_range_connector(text: &str, from: usize, to: usize) -> bool {
    from <= to
        && text
            .get(from..to)
            .is_some_and(|gap| RANGE_CONNECTOR_RE.is_match(gap))
}

fn gap_matches(re: &Regex, text: &str, from: usize, to: usize) -> bool {
    from <= to && text.get(from..to).is_some_and(|gap| re.is_match(gap))
}

// ═══════════════════════════════════════════
// Small parsers
// ═══════════════════════════════════════════

fn span_of(m: Match<'_>) -> Span {
    Span::new(m.start(), m.end())
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let month = match lower.trim_end_matches('.') {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn parse_count(word: &str) -> Option<u64> {
    match word.to_lowercase().as_str() {
        "a" | "an" | "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        "six" => Some(6),
        "seven" => Some(7),
        "eight" => Some(8),
        "nine" => Some(9),
        "ten" => Some(10),
        digits => digits.parse().ok(),
    }
}

fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(chrono::Months::new(months))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDateTime {
        // Thursday, August 6, 2026, 09:00
        NaiveDate::from_ymd_opt(2026, 8, 6)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn recognize(text: &str) -> Vec<RecognizedInstant> {
        RuleBasedDateTimeRecognizer::new().recognize(text, reference())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn today_and_tomorrow() {
        let found = recognize("finish the report today");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instant.date(), date(2026, 8, 6));
        assert!(found[0].certainty.day);
        assert!(!found[0].certainty.hour);

        let found = recognize("dentist tomorrow");
        assert_eq!(found[0].instant.date(), date(2026, 8, 7));
    }

    #[test]
    fn bare_weekday_resolves_to_upcoming_occurrence() {
        // Reference is a Thursday; "friday" is the next day.
        let found = recognize("submit draft friday");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instant.date(), date(2026, 8, 7));
    }

    #[test]
    fn same_weekday_never_resolves_to_today() {
        let found = recognize("standup thursday");
        assert_eq!(found[0].instant.date(), date(2026, 8, 13));
    }

    #[test]
    fn next_weekday_is_following_week() {
        let found = recognize("call about the report next friday");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instant.date(), date(2026, 8, 14));
    }

    #[test]
    fn explicit_month_day() {
        let found = recognize("launch on September 14");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instant.date(), date(2026, 9, 14));
        assert!(found[0].certainty.month && found[0].certainty.day);
        assert!(!found[0].certainty.year);
    }

    #[test]
    fn explicit_year_is_certain() {
        let found = recognize("renew passport March 3, 2027");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instant.date(), date(2027, 3, 3));
        assert!(found[0].certainty.year);
    }

    #[test]
    fn elided_year_rolls_to_nearest_future() {
        // March has passed relative to August 2026.
        let found = recognize("taxes due 3/14");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instant.date(), date(2027, 3, 14));
    }

    #[test]
    fn day_of_month_form() {
        let found = recognize("rent due 1st of September");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instant.date(), date(2026, 9, 1));
    }

    #[test]
    fn invalid_calendar_dates_are_skipped() {
        assert!(recognize("meeting 13/45").is_empty());
        assert!(recognize("February 31").is_empty());
    }

    #[test]
    fn clock_time_with_meridiem() {
        let found = recognize("standup at 9:15am");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instant.time(), NaiveTime::from_hms_opt(9, 15, 0).unwrap());
        assert!(found[0].certainty.hour);
        assert!(found[0].certainty.minute);
        // no date mention: resolved onto the reference day, date uncertain
        assert_eq!(found[0].instant.date(), date(2026, 8, 6));
        assert!(!found[0].certainty.day);
    }

    #[test]
    fn bare_at_hour_prefers_business_hours() {
        let found = recognize("review at 3");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instant.time(), NaiveTime::from_hms_opt(15, 0, 0).unwrap());

        let found = recognize("review at 9");
        assert_eq!(found[0].instant.time(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn unanchored_numbers_are_not_times() {
        assert!(recognize("order 3 pizzas").is_empty());
        assert!(recognize("buy 12 eggs").is_empty());
    }

    #[test]
    fn date_and_time_merge_into_one_instant() {
        let found = recognize("dentist tomorrow at 3pm");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instant.date(), date(2026, 8, 7));
        assert_eq!(found[0].instant.time(), NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert!(found[0].certainty.day && found[0].certainty.hour);
        // span covers "tomorrow at 3pm"
        assert_eq!(found[0].span.slice_of("dentist tomorrow at 3pm"), Some("tomorrow at 3pm"));
    }

    #[test]
    fn time_then_date_merges_too() {
        let found = recognize("3pm on friday works");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instant.date(), date(2026, 8, 7));
        assert_eq!(found[0].instant.time(), NaiveTime::from_hms_opt(15, 0, 0).unwrap());
    }

    #[test]
    fn time_range_produces_end() {
        let found = recognize("workshop 2pm to 4pm");
        assert_eq!(found.len(), 1);
        let end = found[0].end.expect("range end");
        assert_eq!(found[0].instant.time(), NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(end.instant.time(), NaiveTime::from_hms_opt(16, 0, 0).unwrap());
        // end span swallows the connector, disjoint from the start span
        assert!(!found[0].span.overlaps(&end.span));
        assert_eq!(end.span.slice_of("workshop 2pm to 4pm"), Some("to 4pm"));
    }

    #[test]
    fn bare_hour_range_start_borrows_meridiem() {
        let found = recognize("focus block 2 to 4pm");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instant.time(), NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        let end = found[0].end.expect("range end");
        assert_eq!(end.instant.time(), NaiveTime::from_hms_opt(16, 0, 0).unwrap());
    }

    #[test]
    fn inverted_range_borrows_other_meridiem() {
        let found = recognize("shift 10 to 2pm");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instant.time(), NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    }

    #[test]
    fn overnight_range_crosses_midnight() {
        let found = recognize("maintenance window 11pm to 1am");
        assert_eq!(found.len(), 1);
        let end = found[0].end.expect("range end");
        assert!(end.instant > found[0].instant);
        assert_eq!(end.instant.date(), date(2026, 8, 7));
    }

    #[test]
    fn date_before_range_applies_to_both_endpoints() {
        let found = recognize("offsite friday 2pm to 4pm");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instant.date(), date(2026, 8, 7));
        assert_eq!(found[0].end.unwrap().instant.date(), date(2026, 8, 7));
    }

    #[test]
    fn noon_and_midnight() {
        let found = recognize("lunch at noon");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instant.time(), NaiveTime::from_hms_opt(12, 0, 0).unwrap());

        let found = recognize("deploy at midnight");
        assert_eq!(found[0].instant.time(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn in_n_days_and_weeks() {
        let found = recognize("follow up in 3 days");
        assert_eq!(found[0].instant.date(), date(2026, 8, 9));

        let found = recognize("renew in two weeks");
        assert_eq!(found[0].instant.date(), date(2026, 8, 20));
    }

    #[test]
    fn next_week_has_uncertain_day() {
        let found = recognize("plan sprint next week");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instant.date(), date(2026, 8, 13));
        assert!(found[0].certainty.month);
        assert!(!found[0].certainty.day);
    }

    #[test]
    fn ordinal_phrases_are_left_for_the_ordinal_rule() {
        // neither "friday" nor "next month" may be claimed here
        assert!(recognize("the third friday of next month").is_empty());
    }

    #[test]
    fn plain_text_yields_nothing() {
        assert!(recognize("buy milk and bread").is_empty());
        assert!(recognize("").is_empty());
    }

    #[test]
    fn recognition_is_deterministic() {
        let a = recognize("dentist tomorrow at 3pm and gym friday");
        let b = recognize("dentist tomorrow at 3pm and gym friday");
        assert_eq!(a, b);
    }
}
