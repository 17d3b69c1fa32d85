//! Free-text date tokens as they appear in academic calendars.
//!
//! Tokens may omit the year ("Nov 29"). Such tokens are anchored to a caller
//! supplied reference date: the reference's year is tried first, and a result
//! that falls before the reference rolls into the following year.

use chrono::{Datelike, NaiveDate};
use tracing::warn;

/// Textual date grammars, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `14.11.2025`
    DayMonthYear,
    /// `November 29, 2024`
    LongMonthDayYear,
    /// `Nov 29, 2024`
    ShortMonthDayYear,
    /// `November 29`
    LongMonthDay,
    /// `Nov 29`
    ShortMonthDay,
}

impl DateFormat {
    pub const ALL: [DateFormat; 5] = [
        DateFormat::DayMonthYear,
        DateFormat::LongMonthDayYear,
        DateFormat::ShortMonthDayYear,
        DateFormat::LongMonthDay,
        DateFormat::ShortMonthDay,
    ];

    /// chrono pattern; year-less grammars get the trial year appended before parsing.
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::DayMonthYear => "%d.%m.%Y",
            DateFormat::LongMonthDayYear => "%B %d, %Y",
            DateFormat::ShortMonthDayYear => "%b %d, %Y",
            DateFormat::LongMonthDay => "%B %d %Y",
            DateFormat::ShortMonthDay => "%b %d %Y",
        }
    }

    pub fn has_year(self) -> bool {
        matches!(
            self,
            DateFormat::DayMonthYear | DateFormat::LongMonthDayYear | DateFormat::ShortMonthDayYear
        )
    }

    pub fn names_month(self) -> bool {
        !matches!(self, DateFormat::DayMonthYear)
    }
}

/// A parsed token together with the grammar that matched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    pub date: NaiveDate,
    pub format: DateFormat,
}

/// Parse `token` against the supported grammars, resolving a missing year
/// relative to `reference`. Returns `None` when nothing matches.
pub fn parse_flexible_date(token: &str, reference: NaiveDate) -> Option<NaiveDate> {
    parse_date_token(token, reference).map(|parsed| parsed.date)
}

/// Like [`parse_flexible_date`] but also reports which grammar matched.
pub fn parse_date_token(token: &str, reference: NaiveDate) -> Option<ParsedDate> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    for format in DateFormat::ALL {
        if let Some(date) = parse_with_format(token, format, reference) {
            return Some(ParsedDate { date, format });
        }
    }

    warn!(token, "could not parse date");
    None
}

fn parse_with_format(token: &str, format: DateFormat, reference: NaiveDate) -> Option<NaiveDate> {
    if format.has_year() {
        return NaiveDate::parse_from_str(token, format.pattern()).ok();
    }

    // A trailing year would otherwise be read as part of the day field.
    if token.ends_with(|c: char| !c.is_ascii_digit()) || token.contains(',') {
        return None;
    }
    let trial = format!("{token} {}", reference.year());
    let date = NaiveDate::parse_from_str(&trial, format.pattern()).ok()?;
    roll_past_reference(date, reference)
}

/// A year-less date earlier than the reference belongs to the next year.
/// Feb 29 rolled into a common year becomes Mar 1.
fn roll_past_reference(date: NaiveDate, reference: NaiveDate) -> Option<NaiveDate> {
    if date >= reference {
        return Some(date);
    }
    let year = date.year() + 1;
    date.with_year(year).or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn grammar_reported_for_each_shape() {
        let reference = ymd(2024, 8, 1);
        let cases = [
            ("14.11.2025", DateFormat::DayMonthYear),
            ("November 29, 2024", DateFormat::LongMonthDayYear),
            ("November 29", DateFormat::LongMonthDay),
        ];
        for (token, expected) in cases {
            let parsed = parse_date_token(token, reference).unwrap();
            assert_eq!(parsed.format.has_year(), expected.has_year(), "{token}");
            assert_eq!(parsed.format.names_month(), expected.names_month(), "{token}");
        }
    }

    #[test]
    fn trial_year_is_appended_only_to_yearless_tokens() {
        let reference = ymd(2024, 8, 1);
        assert_eq!(
            parse_with_format("Nov 29, 2023", DateFormat::ShortMonthDay, reference),
            None
        );
        assert_eq!(
            parse_with_format("Nov 29", DateFormat::ShortMonthDay, reference),
            Some(ymd(2024, 11, 29))
        );
    }
}
