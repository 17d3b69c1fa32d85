use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::HashSet;
use tracing::debug;

/// Weekday names indexed Sunday-first, matching `Weekday::num_days_from_sunday`.
const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Map a full English weekday name (any case, surrounding whitespace ignored)
/// to a `Weekday`. Abbreviations are not recognized.
pub fn parse_weekday_name(name: &str) -> Option<Weekday> {
    let name = name.trim();
    WEEKDAY_NAMES
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(name))
        .map(|idx| ALL_WEEKDAYS[idx])
}

/// Sunday-based day number (Sunday = 0 .. Saturday = 6).
pub fn weekday_index(day: Weekday) -> u32 {
    day.num_days_from_sunday()
}

pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[weekday_index(day) as usize]
}

/// The set of weekdays a course meets on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassWeekdays {
    days: HashSet<Weekday>,
}

impl ClassWeekdays {
    /// Build the set from free-form names. Names that are not canonical
    /// weekday names are dropped and never match anything.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut days = HashSet::new();
        for name in names {
            let name = name.as_ref();
            match parse_weekday_name(name) {
                Some(day) => {
                    days.insert(day);
                }
                None => debug!(name, "ignoring unrecognized weekday name"),
            }
        }
        Self { days }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    /// Case-insensitive lookup by name.
    pub fn contains_name(&self, name: &str) -> bool {
        parse_weekday_name(name).is_some_and(|day| self.contains(day))
    }

    /// Weekdays in Sunday-first order.
    pub fn sorted(&self) -> Vec<Weekday> {
        let mut days: Vec<Weekday> = self.days.iter().copied().collect();
        days.sort_by_key(|day| weekday_index(*day));
        days
    }
}

impl FromIterator<Weekday> for ClassWeekdays {
    fn from_iter<T: IntoIterator<Item = Weekday>>(iter: T) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

/// Course calendar: the weekdays a course meets on minus the dates on which no
/// instruction happens.
#[derive(Debug, Clone)]
pub struct ClassCalendar<'a> {
    class_days: &'a ClassWeekdays,
    excluded: &'a HashSet<NaiveDate>,
}

impl<'a> ClassCalendar<'a> {
    pub fn new(class_days: &'a ClassWeekdays, excluded: &'a HashSet<NaiveDate>) -> Self {
        Self {
            class_days,
            excluded,
        }
    }

    /// Check if the course meets on a date
    pub fn is_class_day(&self, date: NaiveDate) -> bool {
        !self.excluded.contains(&date) && self.class_days.contains(date.weekday())
    }

    /// Get all class days in a date range (inclusive). An inverted range is empty.
    pub fn class_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut current = start;

        while current <= end {
            if self.is_class_day(current) {
                days.push(current);
            }
            current = current + Duration::days(1);
        }
        days
    }
}

/// Every date in `[start, end]`, empty when `end < start`.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}
