//! Boundary to the document-understanding step that reads a timetable and an
//! academic calendar and reports which weekdays a course meets on.

use crate::non_instructional::NonInstructionalEntry;
use crate::persistence::{self, PersistenceError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Structured result of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedSchedule {
    #[serde(default, alias = "classWeekdays")]
    pub class_days: Vec<String>,
    #[serde(default, alias = "nonInstructionalEntries")]
    pub non_instructional_days: Vec<NonInstructionalEntry>,
    #[serde(
        default,
        alias = "lastInstructionalDayText",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_instructional_day: Option<String>,
    /// Explanation of the findings, or of why nothing matched.
    #[serde(
        default,
        rename = "reason",
        alias = "explanation",
        skip_serializing_if = "Option::is_none"
    )]
    pub explanation: Option<String>,
}

/// Inputs handed to an extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub timetable: Option<PathBuf>,
    pub calendar: Option<PathBuf>,
    pub course_code: String,
}

impl ExtractionRequest {
    pub fn new(
        timetable: impl Into<PathBuf>,
        calendar: impl Into<PathBuf>,
        course_code: impl Into<String>,
    ) -> Self {
        Self {
            timetable: Some(timetable.into()),
            calendar: Some(calendar.into()),
            course_code: course_code.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ExtractionError> {
        if self.timetable.is_none() {
            return Err(ExtractionError::malformed(
                "please upload the weekly timetable",
            ));
        }
        if self.calendar.is_none() {
            return Err(ExtractionError::malformed(
                "please upload the academic calendar",
            ));
        }
        if self.course_code.trim().is_empty() {
            return Err(ExtractionError::malformed(
                "please enter the course code to search for",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The extraction service is overloaded or unreachable; retrying may help.
    Unavailable(String),
    /// The documents or request could not be interpreted.
    MalformedInput(String),
    /// The course code was not found in the timetable.
    NoMatch {
        course_code: String,
        explanation: Option<String>,
    },
}

impl ExtractionError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        ExtractionError::Unavailable(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ExtractionError::MalformedInput(message.into())
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::Unavailable(msg) => {
                write!(f, "extraction service unavailable: {msg}")
            }
            ExtractionError::MalformedInput(msg) => write!(f, "malformed input: {msg}"),
            ExtractionError::NoMatch {
                course_code,
                explanation: Some(explanation),
            } => write!(f, "no classes found for {course_code}: {explanation}"),
            ExtractionError::NoMatch {
                course_code,
                explanation: None,
            } => write!(f, "no classes found for {course_code}"),
        }
    }
}

impl std::error::Error for ExtractionError {}

impl From<PersistenceError> for ExtractionError {
    fn from(value: PersistenceError) -> Self {
        match value {
            PersistenceError::Io(err) => ExtractionError::Unavailable(err.to_string()),
            other => ExtractionError::MalformedInput(other.to_string()),
        }
    }
}

/// Anything that can turn a timetable and a calendar into an [`ExtractedSchedule`].
pub trait ScheduleExtractor {
    fn extract(&self, request: &ExtractionRequest) -> Result<ExtractedSchedule, ExtractionError>;
}

/// Extractor backed by a JSON catalog of results prepared ahead of time,
/// keyed by course code.
#[derive(Debug, Clone)]
pub struct JsonFileExtractor {
    path: PathBuf,
}

impl JsonFileExtractor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScheduleExtractor for JsonFileExtractor {
    fn extract(&self, request: &ExtractionRequest) -> Result<ExtractedSchedule, ExtractionError> {
        request.validate()?;
        let catalog: HashMap<String, ExtractedSchedule> =
            persistence::load_extraction_catalog(&self.path)?;

        // Course codes match exactly: BCSE301P is not BCSE301L.
        let Some(schedule) = catalog.get(&request.course_code) else {
            return Err(ExtractionError::NoMatch {
                course_code: request.course_code.clone(),
                explanation: None,
            });
        };
        if schedule.class_days.is_empty() {
            return Err(ExtractionError::NoMatch {
                course_code: request.course_code.clone(),
                explanation: schedule.explanation.clone(),
            });
        }
        Ok(schedule.clone())
    }
}
