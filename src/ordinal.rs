//! Ordinal weekday-of-month phrases: "the third Friday of next month",
//! "the last Sunday in March".
//!
//! The general date/time recognizer does not cover these, so they get a
//! bespoke rule. The n-th occurrence is computed as
//! `1 + ((target_weekday − first_weekday_of_month + 7) mod 7) + 7×(n−1)`;
//! when that overflows the month it falls back to the last occurrence of the
//! weekday in the target month. "Last" walks backward from the month's final
//! day. A named month that has already passed rolls into the next calendar
//! year.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, Weekday};
use regex::{Regex, RegexBuilder};

use crate::types::Span;

static ORDINAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(
        r"\b(?:the\s+)?(first|1st|second|2nd|third|3rd|fourth|4th|fifth|5th|last)\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\s+(?:of|in)\s+(january|february|march|april|may|june|july|august|september|october|november|december|this\s+month|next\s+month)\b",
    )
    .case_insensitive(true)
    .build()
    .expect("ordinal weekday pattern is valid")
});

/// One resolved ordinal-weekday phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdinalMatch {
    pub span: Span,
    pub date: NaiveDate,
}

enum Ordinal {
    Nth(u32),
    Last,
}

/// Find and resolve every ordinal weekday-of-month phrase in `text`.
pub fn find_ordinal_weekdays(text: &str, reference: NaiveDate) -> Vec<OrdinalMatch> {
    let mut matches = Vec::new();
    for caps in ORDINAL_RE.captures_iter(text) {
        let whole = caps.get(0).expect("group 0 always present");
        let Some(ordinal) = parse_ordinal(&caps[1]) else {
            continue;
        };
        let Some(weekday) = parse_weekday(&caps[2]) else {
            continue;
        };
        let (year, month) = resolve_month(&caps[3], reference);
        let date = match ordinal {
            Ordinal::Nth(n) => nth_weekday_of_month(year, month, weekday, n),
            Ordinal::Last => last_weekday_of_month(year, month, weekday),
        };
        if let Some(date) = date {
            matches.push(OrdinalMatch {
                span: Span::new(whole.start(), whole.end()),
                date,
            });
        }
    }
    matches
}

fn parse_ordinal(word: &str) -> Option<Ordinal> {
    match word.to_lowercase().as_str() {
        "first" | "1st" => Some(Ordinal::Nth(1)),
        "second" | "2nd" => Some(Ordinal::Nth(2)),
        "third" | "3rd" => Some(Ordinal::Nth(3)),
        "fourth" | "4th" => Some(Ordinal::Nth(4)),
        "fifth" | "5th" => Some(Ordinal::Nth(5)),
        "last" => Some(Ordinal::Last),
        _ => None,
    }
}

fn parse_weekday(word: &str) -> Option<Weekday> {
    match word.to_lowercase().as_str() {
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

/// Month name → (year, month), rolling a month that has already passed into
/// the next calendar year. "this month" / "next month" resolve relative to
/// the reference date.
fn resolve_month(word: &str, reference: NaiveDate) -> (i32, u32) {
    let lower = word.to_lowercase();
    let normalized = lower.split_whitespace().collect::<Vec<_>>().join(" ");
    match normalized.as_str() {
        "this month" => (reference.year(), reference.month()),
        "next month" => {
            if reference.month() == 12 {
                (reference.year() + 1, 1)
            } else {
                (reference.year(), reference.month() + 1)
            }
        }
        name => {
            let month = month_number(name);
            if month < reference.month() {
                (reference.year() + 1, month)
            } else {
                (reference.year(), month)
            }
        }
    }
}

fn month_number(name: &str) -> u32 {
    match name {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        "december" => 12,
        _ => unreachable!("month alternation only matches full month names"),
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// The n-th occurrence of `weekday` in the month, falling back to the last
/// occurrence when `n` overflows the month.
fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let first_wd = first.weekday().num_days_from_monday();
    let target_wd = weekday.num_days_from_monday();
    let day = 1 + (target_wd + 7 - first_wd) % 7 + 7 * (n - 1);
    if day > days_in_month(year, month) {
        return last_weekday_of_month(year, month, weekday);
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Last occurrence of `weekday` in the month: start at the final day and
/// walk backward to the nearest match.
fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let mut date = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))?;
    while date.weekday() != weekday {
        date = date.pred_opt()?;
    }
    Some(date)
}
