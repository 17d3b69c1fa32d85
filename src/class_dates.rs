use crate::calendar::{ClassCalendar, ClassWeekdays, weekday_name};
use crate::extra_days::extra_class_dates;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Date range selected by the student. Either bound may still be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl ScheduleWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Both bounds, if present and in order.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end >= start => Some((start, end)),
            _ => None,
        }
    }
}

/// Ordered, duplicate-free class dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassDateSet {
    dates: Vec<NaiveDate>,
}

impl ClassDateSet {
    fn from_unsorted(mut dates: Vec<NaiveDate>) -> Self {
        dates.sort_unstable();
        dates.dedup();
        Self { dates }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.binary_search(&date).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.dates.iter()
    }

    /// Number of class dates on or before `cutoff`.
    pub fn count_until(&self, cutoff: NaiveDate) -> usize {
        self.dates.partition_point(|date| *date <= cutoff)
    }

    /// Tabular view with a `date` and a `weekday` column.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        // Polars stores dates as days since 1970-01-01.
        let epoch = NaiveDate::default();
        let days: Vec<i32> = self
            .dates
            .iter()
            .map(|date| (*date - epoch).num_days() as i32)
            .collect();
        let weekdays: Vec<&str> = self
            .dates
            .iter()
            .map(|date| weekday_name(date.weekday()))
            .collect();

        let date_series =
            Series::new(PlSmallStr::from_static("date"), days).cast(&DataType::Date)?;
        let weekday_series = Series::new(PlSmallStr::from_static("weekday"), weekdays);
        DataFrame::new(vec![date_series.into(), weekday_series.into()])
    }
}

impl FromIterator<NaiveDate> for ClassDateSet {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        Self::from_unsorted(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ClassDateSet {
    type Item = &'a NaiveDate;
    type IntoIter = std::slice::Iter<'a, NaiveDate>;

    fn into_iter(self) -> Self::IntoIter {
        self.dates.iter()
    }
}

/// Combine the weekly pattern over `window`, minus `excluded`, with the
/// manually declared extra days.
///
/// Extra days are never filtered against `excluded`. Without a usable window
/// or without class weekdays only the extra days contribute.
pub fn build_class_dates<S: AsRef<str>>(
    window: Option<&ScheduleWindow>,
    class_days: &ClassWeekdays,
    excluded: &HashSet<NaiveDate>,
    extra_lines: &[S],
) -> ClassDateSet {
    let regular = match window.and_then(ScheduleWindow::bounds) {
        Some((start, end)) if !class_days.is_empty() => {
            ClassCalendar::new(class_days, excluded).class_days_in_range(start, end)
        }
        _ => Vec::new(),
    };
    let extra = extra_class_dates(extra_lines, class_days);
    debug!(
        regular = regular.len(),
        extra = extra.len(),
        "rebuilt class dates"
    );

    let mut dates = regular;
    dates.extend(extra);
    ClassDateSet::from_unsorted(dates)
}
