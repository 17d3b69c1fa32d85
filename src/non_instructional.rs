use crate::calendar::days_in_range;
use crate::date_parse::{self, ParsedDate};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// A holiday, assessment day or closure as listed in an academic calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonInstructionalEntry {
    /// Single date ("15.08.2025", "Oct 2") or range ("Sep 10-15", "16.08.2025 to 23.08.2025").
    #[serde(rename = "date", alias = "text")]
    pub text: String,
    #[serde(default)]
    pub reason: String,
}

impl NonInstructionalEntry {
    pub fn new(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reason: reason.into(),
        }
    }
}

/// Expand entries into the set of dates on which no class is held.
///
/// Entries are handled independently; an entry that cannot be parsed is
/// logged and skipped without affecting the others.
pub fn resolve_excluded_dates(
    entries: &[NonInstructionalEntry],
    reference: NaiveDate,
) -> HashSet<NaiveDate> {
    let mut excluded = HashSet::new();
    for entry in entries {
        match resolve_entry(entry, reference) {
            Some((start, end)) => excluded.extend(days_in_range(start, end)),
            None => warn!(
                text = %entry.text,
                reason = %entry.reason,
                "skipping non-instructional entry"
            ),
        }
    }
    debug!(
        entries = entries.len(),
        dates = excluded.len(),
        "resolved non-instructional dates"
    );
    excluded
}

/// Resolve one entry to an inclusive `(start, end)` interval.
pub fn resolve_entry(
    entry: &NonInstructionalEntry,
    reference: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    let parts = split_range(&entry.text);
    match parts.as_slice() {
        [single] => {
            let date = date_parse::parse_flexible_date(single, reference)?;
            Some((date, date))
        }
        [start, end] => {
            let start = date_parse::parse_date_token(start, reference)?;
            let end = parse_range_end(end, start.date, reference)?;
            let start = anchor_start_year(start, end)?;
            let end = repair_range_end(start, end)?;
            (end >= start).then_some((start, end))
        }
        _ => None,
    }
}

/// Split on a hyphen or a whitespace-delimited "to". Runs of whitespace are
/// collapsed first so "16.08.2025  to\t23.08.2025" splits like the single-space form.
fn split_range(text: &str) -> Vec<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    normalized
        .split('-')
        .flat_map(|piece| piece.split(" to "))
        .map(|piece| piece.trim().to_string())
        .collect()
}

/// End fragment of a range: either a full date token or a bare day of month
/// ("15" or "15, 2024") that takes its month from the range start.
#[derive(Debug, Clone, Copy)]
enum RangeEnd {
    Token(ParsedDate),
    Day { date: NaiveDate, explicit_year: bool },
}

impl RangeEnd {
    fn date(self) -> NaiveDate {
        match self {
            RangeEnd::Token(parsed) => parsed.date,
            RangeEnd::Day { date, .. } => date,
        }
    }

    fn has_year(self) -> bool {
        match self {
            RangeEnd::Token(parsed) => parsed.format.has_year(),
            RangeEnd::Day { explicit_year, .. } => explicit_year,
        }
    }

    fn names_month(self) -> bool {
        match self {
            RangeEnd::Token(parsed) => parsed.format.names_month(),
            RangeEnd::Day { .. } => false,
        }
    }
}

fn parse_range_end(fragment: &str, start: NaiveDate, reference: NaiveDate) -> Option<RangeEnd> {
    if let Some((day, year)) = bare_day(fragment) {
        // A bare day belongs to the start's month.
        let date = NaiveDate::from_ymd_opt(year.unwrap_or(start.year()), start.month(), day)?;
        return Some(RangeEnd::Day {
            date,
            explicit_year: year.is_some(),
        });
    }

    date_parse::parse_date_token(fragment, reference).map(RangeEnd::Token)
}

/// `"15"` -> `(15, None)`, `"15, 2024"` -> `(15, Some(2024))`.
fn bare_day(fragment: &str) -> Option<(u32, Option<i32>)> {
    let (day, year) = match fragment.split_once(',') {
        Some((day, year)) => (day.trim(), Some(year.trim())),
        None => (fragment.trim(), None),
    };
    if day.is_empty() || day.len() > 2 || !day.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let day: u32 = day.parse().ok()?;
    let year = match year {
        Some(year) if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) => {
            Some(year.parse().ok()?)
        }
        Some(_) => return None,
        None => None,
    };
    Some((day, year))
}

/// A year-less start takes its year from an end that spells one out
/// ("Sep 10-15, 2024", "Dec 28 - Jan 3, 2025").
fn anchor_start_year(start: ParsedDate, end: RangeEnd) -> Option<NaiveDate> {
    if start.format.has_year() || !end.has_year() {
        return Some(start.date);
    }
    let end = end.date();
    let year = if start.date.month() > end.month() {
        end.year() - 1
    } else {
        end.year()
    };
    start.date.with_year(year)
}

/// Fix up an end date that landed before the start.
///
/// The end first takes the start's month. If that is still before the start,
/// it moves to the following year; otherwise it takes the start's year. An end
/// that names an earlier month than the start ("Dec 28 - Jan 3") and cannot be
/// fixed by the month change wraps into the following year with its own month.
fn repair_range_end(start: NaiveDate, end: RangeEnd) -> Option<NaiveDate> {
    let date = end.date();
    if date >= start {
        return Some(date);
    }

    let same_month = NaiveDate::from_ymd_opt(date.year(), start.month(), date.day())?;
    if same_month >= start {
        return same_month.with_year(start.year());
    }
    if end.names_month() && date.month() < start.month() {
        return date.with_year(start.year() + 1);
    }
    same_month.with_year(start.year() + 1)
}
