pub mod attendance;
pub mod calendar;
pub mod class_dates;
pub mod config;
pub mod date_parse;
pub mod extra_days;
pub mod extraction;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod non_instructional;
pub mod persistence;
pub mod session;

pub use attendance::{
    AttendanceError, AttendanceRecord, AttendanceSummary, ELIGIBILITY_THRESHOLD, FutureScenario,
};
pub use calendar::{ClassCalendar, ClassWeekdays, parse_weekday_name, weekday_index};
pub use class_dates::{ClassDateSet, ScheduleWindow, build_class_dates};
pub use config::{AppConfig, ConfigError};
pub use date_parse::parse_flexible_date;
pub use extra_days::split_extra_lines;
pub use extraction::{
    ExtractedSchedule, ExtractionError, ExtractionRequest, JsonFileExtractor, ScheduleExtractor,
};
pub use non_instructional::{NonInstructionalEntry, resolve_excluded_dates};
pub use persistence::{
    PersistenceError, load_class_dates_from_csv, load_extraction_catalog, save_class_dates_to_csv,
    save_class_dates_to_json,
};
pub use session::{ScheduleSession, WindowError};
