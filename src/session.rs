use crate::calendar::ClassWeekdays;
use crate::class_dates::{ClassDateSet, ScheduleWindow, build_class_dates};
use crate::date_parse::parse_flexible_date;
use crate::extra_days::split_extra_lines;
use crate::extraction::{ExtractedSchedule, ExtractionError, ExtractionRequest, ScheduleExtractor};
use crate::non_instructional::{NonInstructionalEntry, resolve_excluded_dates};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    StartAfterSemesterEnd {
        start: NaiveDate,
        semester_end: NaiveDate,
    },
    EndAfterSemesterEnd {
        end: NaiveDate,
        semester_end: NaiveDate,
    },
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowError::StartAfterSemesterEnd {
                start,
                semester_end,
            } => write!(
                f,
                "start date {start} cannot be after the last instructional day ({semester_end})"
            ),
            WindowError::EndAfterSemesterEnd { end, semester_end } => write!(
                f,
                "end date {end} cannot be after the last instructional day ({semester_end})"
            ),
        }
    }
}

impl std::error::Error for WindowError {}

/// In-memory state of one student's planning session.
///
/// Everything derived (excluded dates, class dates) is recomputed on demand
/// from the stored inputs; nothing derived is cached.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScheduleSession {
    course_code: String,
    extraction: Option<ExtractedSchedule>,
    window: ScheduleWindow,
    semester_end: Option<NaiveDate>,
    extra_days: String,
}

impl ScheduleSession {
    pub fn new(course_code: impl Into<String>) -> Self {
        Self {
            course_code: course_code.into(),
            ..Self::default()
        }
    }

    pub fn course_code(&self) -> &str {
        &self.course_code
    }

    pub fn set_course_code(&mut self, course_code: impl Into<String>) {
        self.course_code = course_code.into();
    }

    pub fn extraction(&self) -> Option<&ExtractedSchedule> {
        self.extraction.as_ref()
    }

    pub fn window(&self) -> ScheduleWindow {
        self.window
    }

    /// Last instructional day reported by the most recent extraction.
    pub fn semester_end(&self) -> Option<NaiveDate> {
        self.semester_end
    }

    pub fn extra_days(&self) -> &str {
        &self.extra_days
    }

    pub fn class_weekdays(&self) -> ClassWeekdays {
        self.extraction
            .as_ref()
            .map(|extraction| ClassWeekdays::from_names(&extraction.class_days))
            .unwrap_or_default()
    }

    pub fn non_instructional_days(&self) -> &[NonInstructionalEntry] {
        self.extraction
            .as_ref()
            .map(|extraction| extraction.non_instructional_days.as_slice())
            .unwrap_or_default()
    }

    /// Drop every extraction-derived value, including the selected window.
    pub fn reset_extraction(&mut self) {
        self.extraction = None;
        self.semester_end = None;
        self.window = ScheduleWindow::default();
    }

    /// Run `extractor` for the session's course and adopt its result.
    ///
    /// Previous results are discarded before the extractor runs, so a failed
    /// run leaves the session without any extraction.
    pub fn run_extraction(
        &mut self,
        extractor: &dyn ScheduleExtractor,
        request: &ExtractionRequest,
        today: NaiveDate,
    ) -> Result<&ExtractedSchedule, ExtractionError> {
        request.validate()?;
        self.course_code = request.course_code.clone();
        self.reset_extraction();

        let extracted = extractor.extract(request).inspect_err(|err| {
            warn!(course = %request.course_code, error = %err, "extraction failed");
        })?;
        Ok(self.apply_extraction(extracted, today))
    }

    /// Replace the current extraction wholesale. The window is kept.
    ///
    /// A parseable last instructional day becomes the semester end and the
    /// window's end date; a start date after it is cleared.
    pub fn apply_extraction(
        &mut self,
        extracted: ExtractedSchedule,
        today: NaiveDate,
    ) -> &ExtractedSchedule {
        self.semester_end = None;
        let reference = self.reference_date(today);
        if let Some(text) = extracted.last_instructional_day.as_deref() {
            match parse_flexible_date(text, reference) {
                Some(last_day) => {
                    self.semester_end = Some(last_day);
                    self.window.end = Some(last_day);
                    if self.window.start.is_some_and(|start| start > last_day) {
                        warn!(%last_day, "clearing start date after the last instructional day");
                        self.window.start = None;
                    }
                }
                None => warn!(text, "ignoring unparseable last instructional day"),
            }
        }
        info!(
            course = %self.course_code,
            weekdays = extracted.class_days.len(),
            non_instructional = extracted.non_instructional_days.len(),
            "adopted extraction result"
        );
        self.extraction.insert(extracted)
    }

    pub fn set_start_date(&mut self, start: Option<NaiveDate>) -> Result<(), WindowError> {
        if let (Some(start), Some(semester_end)) = (start, self.semester_end) {
            if start > semester_end {
                return Err(WindowError::StartAfterSemesterEnd {
                    start,
                    semester_end,
                });
            }
        }
        self.window.start = start;
        Ok(())
    }

    pub fn set_end_date(&mut self, end: Option<NaiveDate>) -> Result<(), WindowError> {
        if let (Some(end), Some(semester_end)) = (end, self.semester_end) {
            if end > semester_end {
                return Err(WindowError::EndAfterSemesterEnd { end, semester_end });
            }
        }
        self.window.end = end;
        Ok(())
    }

    /// Raw "day order" text; lines are separated by newlines or commas.
    pub fn set_extra_days(&mut self, text: impl Into<String>) {
        self.extra_days = text.into();
    }

    pub fn extra_lines(&self) -> Vec<&str> {
        split_extra_lines(&self.extra_days)
    }

    /// Anchor for year-less dates: the window start, or `today` without one.
    pub fn reference_date(&self, today: NaiveDate) -> NaiveDate {
        self.window.start.unwrap_or(today)
    }

    pub fn excluded_dates(&self, today: NaiveDate) -> HashSet<NaiveDate> {
        resolve_excluded_dates(self.non_instructional_days(), self.reference_date(today))
    }

    pub fn class_dates(&self, today: NaiveDate) -> ClassDateSet {
        let excluded = self.excluded_dates(today);
        build_class_dates(
            Some(&self.window),
            &self.class_weekdays(),
            &excluded,
            &self.extra_lines(),
        )
    }

    /// Classes left before the debar calculation: every computed class date.
    pub fn classes_remaining(&self, today: NaiveDate) -> usize {
        self.class_dates(today).len()
    }
}
