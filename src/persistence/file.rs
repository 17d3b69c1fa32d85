use super::{PersistenceError, PersistenceResult};
use crate::calendar::{parse_weekday_name, weekday_name};
use crate::class_dates::ClassDateSet;
use crate::extraction::ExtractedSchedule;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct ClassDatesSnapshot {
    class_dates: Vec<NaiveDate>,
    #[serde(default)]
    excluded_dates: Vec<NaiveDate>,
}

pub fn save_class_dates_to_json<P: AsRef<Path>>(
    dates: &ClassDateSet,
    excluded: &HashSet<NaiveDate>,
    path: P,
) -> PersistenceResult<()> {
    let mut excluded_dates: Vec<NaiveDate> = excluded.iter().copied().collect();
    excluded_dates.sort_unstable();
    let snapshot = ClassDatesSnapshot {
        class_dates: dates.dates().to_vec(),
        excluded_dates,
    };
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

#[derive(Serialize, Deserialize)]
struct ClassDateCsvRecord {
    date: String,
    weekday: String,
}

impl From<&NaiveDate> for ClassDateCsvRecord {
    fn from(date: &NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            weekday: weekday_name(date.weekday()).to_string(),
        }
    }
}

impl ClassDateCsvRecord {
    fn into_date(self) -> PersistenceResult<NaiveDate> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|err| {
            PersistenceError::InvalidData(format!("invalid date '{}': {err}", self.date))
        })?;
        if !self.weekday.trim().is_empty()
            && parse_weekday_name(&self.weekday) != Some(date.weekday())
        {
            return Err(PersistenceError::InvalidData(format!(
                "{} is a {}, not a {}",
                self.date,
                weekday_name(date.weekday()),
                self.weekday
            )));
        }
        Ok(date)
    }
}

pub fn save_class_dates_to_csv<P: AsRef<Path>>(
    dates: &ClassDateSet,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for date in dates {
        writer.serialize(ClassDateCsvRecord::from(date))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_class_dates_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<ClassDateSet> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut dates = Vec::new();
    for record in reader.deserialize::<ClassDateCsvRecord>() {
        dates.push(record?.into_date()?);
    }
    Ok(dates.into_iter().collect())
}

/// Read a JSON object mapping course codes to extraction results.
pub fn load_extraction_catalog<P: AsRef<Path>>(
    path: P,
) -> PersistenceResult<HashMap<String, ExtractedSchedule>> {
    let file = File::open(path)?;
    let catalog = serde_json::from_reader(file)?;
    Ok(catalog)
}
