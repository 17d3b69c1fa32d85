use serde::{Deserialize, Serialize};
use std::fmt;

/// Attendance percentage a student must reach to sit the exam.
/// 75% is the published rule; anything at or above 74.01% rounds up to it.
pub const ELIGIBILITY_THRESHOLD: f64 = 74.01;

#[derive(Debug, Clone, PartialEq)]
pub enum AttendanceError {
    NonPositiveTotal(i64),
    NegativeAttended(i64),
    AttendedExceedsTotal { attended: i64, total_held: i64 },
    NegativeClassesLeft(i64),
}

impl fmt::Display for AttendanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceError::NonPositiveTotal(_) => {
                write!(f, "Total classes held must be a positive number.")
            }
            AttendanceError::NegativeAttended(_) => {
                write!(f, "Classes attended (till date) cannot be negative.")
            }
            AttendanceError::AttendedExceedsTotal { .. } => write!(
                f,
                "Classes attended (till date) cannot exceed total classes held."
            ),
            AttendanceError::NegativeClassesLeft(_) => write!(
                f,
                "Classes left for debar calculation must be a valid non-negative number if provided."
            ),
        }
    }
}

impl std::error::Error for AttendanceError {}

/// Percentage (rounded to two decimals) and whether it meets the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub percentage: f64,
    pub eligible: bool,
}

impl AttendanceSummary {
    fn from_counts(attended: i64, total: i64, threshold: f64) -> Self {
        let percentage = attended as f64 / total as f64 * 100.0;
        Self {
            percentage: (percentage * 100.0).round() / 100.0,
            eligible: percentage >= threshold,
        }
    }
}

/// Classes held and attended so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    total_held: i64,
    attended: i64,
}

impl AttendanceRecord {
    pub fn new(total_held: i64, attended: i64) -> Result<Self, AttendanceError> {
        if total_held <= 0 {
            return Err(AttendanceError::NonPositiveTotal(total_held));
        }
        if attended < 0 {
            return Err(AttendanceError::NegativeAttended(attended));
        }
        if attended > total_held {
            return Err(AttendanceError::AttendedExceedsTotal {
                attended,
                total_held,
            });
        }
        Ok(Self {
            total_held,
            attended,
        })
    }

    pub fn total_held(&self) -> i64 {
        self.total_held
    }

    pub fn attended(&self) -> i64 {
        self.attended
    }

    pub fn summary(&self, threshold: f64) -> AttendanceSummary {
        AttendanceSummary::from_counts(self.attended, self.total_held, threshold)
    }

    /// Start a "what if" projection over the classes remaining before the
    /// debar calculation; the student is assumed to attend all of them.
    pub fn scenario(&self, classes_left: i64) -> Result<FutureScenario, AttendanceError> {
        if classes_left < 0 {
            return Err(AttendanceError::NegativeClassesLeft(classes_left));
        }
        Ok(FutureScenario {
            record: *self,
            classes_left,
            attending: classes_left,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureScenario {
    record: AttendanceRecord,
    classes_left: i64,
    attending: i64,
}

impl FutureScenario {
    pub fn classes_left(&self) -> i64 {
        self.classes_left
    }

    pub fn attending(&self) -> i64 {
        self.attending
    }

    /// Attend one more of the remaining classes, up to all of them.
    pub fn attend_more(&mut self) {
        self.attending = (self.attending + 1).min(self.classes_left);
    }

    /// Skip one more of the remaining classes, down to none.
    pub fn attend_fewer(&mut self) {
        self.attending = (self.attending - 1).max(0);
    }

    pub fn set_attending(&mut self, attending: i64) {
        self.attending = attending.clamp(0, self.classes_left);
    }

    /// Attendance at the debar cutoff if the student attends `attending` of
    /// the remaining classes. The record's total is positive, so the final
    /// total always is too.
    pub fn projected(&self, threshold: f64) -> AttendanceSummary {
        AttendanceSummary::from_counts(
            self.record.attended + self.attending,
            self.record.total_held + self.classes_left,
            threshold,
        )
    }
}
