use crate::calendar::ClassWeekdays;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// Only format accepted for manually entered dates.
pub const EXTRA_DAY_FORMAT: &str = "%d.%m.%Y";

/// Split raw user text into lines. Newlines and commas both separate lines;
/// blank lines are dropped.
pub fn split_extra_lines(text: &str) -> Vec<&str> {
    text.split(['\n', ','])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Interpret one "day order" line such as `"23.11.2024 Friday Day Order"`.
///
/// The date counts when the declared weekday is a class weekday, or when no
/// weekday is declared and the date itself falls on one.
pub fn parse_extra_line(line: &str, class_days: &ClassWeekdays) -> Option<NaiveDate> {
    let mut tokens = line.split_whitespace();
    let date_token = tokens.next()?;
    let date = match NaiveDate::parse_from_str(date_token, EXTRA_DAY_FORMAT) {
        Ok(date) => date,
        Err(_) => {
            debug!(line, "skipping extra day with unparseable date");
            return None;
        }
    };

    let matches = match tokens.next() {
        Some(declared) => class_days.contains_name(declared),
        None => class_days.contains(date.weekday()),
    };
    if !matches {
        debug!(line, "skipping extra day outside the class weekdays");
        return None;
    }
    Some(date)
}

/// Dates contributed by the extra lines, in input order (not deduplicated).
pub fn extra_class_dates<S: AsRef<str>>(lines: &[S], class_days: &ClassWeekdays) -> Vec<NaiveDate> {
    lines
        .iter()
        .filter_map(|line| parse_extra_line(line.as_ref(), class_days))
        .collect()
}
