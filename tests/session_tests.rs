use chrono::NaiveDate;
use class_schedule::{
    ExtractedSchedule, ExtractionError, ExtractionRequest, JsonFileExtractor,
    NonInstructionalEntry, ScheduleExtractor, ScheduleSession, WindowError,
};
use std::fs;
use tempfile::tempdir;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    ymd(2024, 8, 1)
}

fn fall_schedule() -> ExtractedSchedule {
    ExtractedSchedule {
        class_days: vec!["Tuesday".into(), "Thursday".into()],
        non_instructional_days: vec![
            NonInstructionalEntry::new("Sep 10-15", "CAT-I"),
            NonInstructionalEntry::new("Oct 2", "Gandhi Jayanthi"),
        ],
        last_instructional_day: Some("November 29, 2024".into()),
        explanation: Some("Found BCSE301L in slots A1 and A2.".into()),
    }
}

struct FixedExtractor(Result<ExtractedSchedule, ExtractionError>);

impl ScheduleExtractor for FixedExtractor {
    fn extract(&self, _request: &ExtractionRequest) -> Result<ExtractedSchedule, ExtractionError> {
        self.0.clone()
    }
}

fn request(course: &str) -> ExtractionRequest {
    ExtractionRequest::new("timetable.png", "calendar.pdf", course)
}

#[test]
fn applying_extraction_sets_semester_end_and_window_end() {
    let mut session = ScheduleSession::new("BCSE301L");
    session.apply_extraction(fall_schedule(), today());

    assert_eq!(session.semester_end(), Some(ymd(2024, 11, 29)));
    assert_eq!(session.window().end, Some(ymd(2024, 11, 29)));
    assert_eq!(session.window().start, None);
    assert_eq!(session.class_weekdays().len(), 2);
}

#[test]
fn unparseable_last_day_leaves_semester_open() {
    let mut session = ScheduleSession::new("BCSE301L");
    let mut schedule = fall_schedule();
    schedule.last_instructional_day = Some("end of November".into());
    session.apply_extraction(schedule, today());

    assert_eq!(session.semester_end(), None);
    assert!(session.set_end_date(Some(ymd(2025, 3, 1))).is_ok());
}

#[test]
fn window_cannot_extend_past_semester_end() {
    let mut session = ScheduleSession::new("BCSE301L");
    session.apply_extraction(fall_schedule(), today());

    assert_eq!(
        session.set_start_date(Some(ymd(2024, 12, 2))),
        Err(WindowError::StartAfterSemesterEnd {
            start: ymd(2024, 12, 2),
            semester_end: ymd(2024, 11, 29),
        })
    );
    assert_eq!(
        session.set_end_date(Some(ymd(2024, 11, 30))),
        Err(WindowError::EndAfterSemesterEnd {
            end: ymd(2024, 11, 30),
            semester_end: ymd(2024, 11, 29),
        })
    );
    assert_eq!(session.window().end, Some(ymd(2024, 11, 29)));

    assert!(session.set_start_date(Some(ymd(2024, 11, 29))).is_ok());
    assert!(session.set_end_date(None).is_ok());
    assert_eq!(session.window().end, None);
}

#[test]
fn new_semester_end_clears_later_start_date() {
    let mut session = ScheduleSession::new("BCSE301L");
    session.set_start_date(Some(ymd(2024, 12, 10))).unwrap();
    session.apply_extraction(fall_schedule(), today());

    assert_eq!(session.window().start, None);
    assert_eq!(session.window().end, Some(ymd(2024, 11, 29)));

    session.set_start_date(Some(ymd(2024, 11, 1))).unwrap();
    session.apply_extraction(fall_schedule(), today());
    assert_eq!(session.window().start, Some(ymd(2024, 11, 1)));
}

#[test]
fn class_dates_combine_extraction_window_and_extra_days() {
    let mut session = ScheduleSession::new("BCSE301L");
    session.apply_extraction(fall_schedule(), today());
    session.set_start_date(Some(ymd(2024, 9, 1))).unwrap();
    session.set_end_date(Some(ymd(2024, 10, 5))).unwrap();
    session.set_extra_days("12.09.2024 Thursday\n28.09.2024 Tuesday Day Order");

    let dates = session.class_dates(today());
    // Tue/Thu from Sep 1 to Oct 5 is 10 dates; CAT-I removes 10 and 12,
    // Gandhi Jayanthi falls on a Wednesday, and the two extra days add 12 and 28.
    assert_eq!(dates.len(), 10);
    assert!(dates.contains(ymd(2024, 9, 12)));
    assert!(dates.contains(ymd(2024, 9, 28)));
    assert!(!dates.contains(ymd(2024, 9, 10)));
    assert_eq!(session.classes_remaining(today()), 10);
}

#[test]
fn yearless_entries_resolve_against_window_start_or_today() {
    let mut session = ScheduleSession::new("BCSE301L");
    let mut schedule = fall_schedule();
    schedule.non_instructional_days = vec![NonInstructionalEntry::new("Jan 5", "Pongal")];
    schedule.last_instructional_day = None;
    session.apply_extraction(schedule, today());

    assert!(session.excluded_dates(today()).contains(&ymd(2025, 1, 5)));

    session.set_start_date(Some(ymd(2025, 1, 1))).unwrap();
    assert!(session.excluded_dates(today()).contains(&ymd(2025, 1, 5)));

    session.set_start_date(Some(ymd(2025, 2, 1))).unwrap();
    assert!(session.excluded_dates(today()).contains(&ymd(2026, 1, 5)));
}

#[test]
fn run_extraction_adopts_result() {
    let mut session = ScheduleSession::default();
    let extractor = FixedExtractor(Ok(fall_schedule()));
    let extracted = session
        .run_extraction(&extractor, &request("BCSE301L"), today())
        .unwrap();
    assert_eq!(extracted.class_days.len(), 2);
    assert_eq!(session.course_code(), "BCSE301L");
    assert_eq!(session.non_instructional_days().len(), 2);
}

#[test]
fn failed_extraction_clears_previous_results() {
    let mut session = ScheduleSession::new("BCSE301L");
    session.apply_extraction(fall_schedule(), today());
    session.set_start_date(Some(ymd(2024, 9, 1))).unwrap();

    let extractor = FixedExtractor(Err(ExtractionError::unavailable("model overloaded")));
    let err = session
        .run_extraction(&extractor, &request("BCSE301L"), today())
        .unwrap_err();
    assert!(matches!(err, ExtractionError::Unavailable(_)));
    assert!(session.extraction().is_none());
    assert_eq!(session.semester_end(), None);
    assert_eq!(session.window().start, None);
    assert!(session.class_dates(today()).is_empty());
}

#[test]
fn invalid_request_is_rejected_before_extraction() {
    let mut session = ScheduleSession::new("BCSE301L");
    session.apply_extraction(fall_schedule(), today());

    let mut missing_calendar = request("BCSE301L");
    missing_calendar.calendar = None;
    let extractor = FixedExtractor(Ok(fall_schedule()));
    let err = session
        .run_extraction(&extractor, &missing_calendar, today())
        .unwrap_err();
    assert!(matches!(err, ExtractionError::MalformedInput(_)));
    // Nothing ran, so the earlier result survives.
    assert!(session.extraction().is_some());

    let err = session
        .run_extraction(&extractor, &request("   "), today())
        .unwrap_err();
    assert!(matches!(err, ExtractionError::MalformedInput(_)));
}

#[test]
fn json_catalog_extractor_matches_course_codes_exactly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(
        &path,
        r#"{
            "BCSE301L": {
                "classDays": ["Tuesday", "Thursday"],
                "nonInstructionalDays": [{"date": "Sep 10-15", "reason": "CAT-I"}],
                "lastInstructionalDay": "November 29, 2024",
                "reason": "Slots A1 and A2."
            },
            "BCSE399J": {
                "classDays": [],
                "reason": "Course listed without slots."
            }
        }"#,
    )
    .unwrap();
    let extractor = JsonFileExtractor::new(&path);

    let found = extractor.extract(&request("BCSE301L")).unwrap();
    assert_eq!(found.class_days, vec!["Tuesday", "Thursday"]);
    assert_eq!(found.last_instructional_day.as_deref(), Some("November 29, 2024"));

    let err = extractor.extract(&request("BCSE301P")).unwrap_err();
    assert_eq!(
        err,
        ExtractionError::NoMatch {
            course_code: "BCSE301P".into(),
            explanation: None,
        }
    );

    let err = extractor.extract(&request("BCSE399J")).unwrap_err();
    assert_eq!(
        err,
        ExtractionError::NoMatch {
            course_code: "BCSE399J".into(),
            explanation: Some("Course listed without slots.".into()),
        }
    );
}

#[test]
fn json_catalog_extractor_reports_unreadable_catalogs() {
    let dir = tempdir().unwrap();

    let missing = JsonFileExtractor::new(dir.path().join("absent.json"));
    assert!(matches!(
        missing.extract(&request("BCSE301L")),
        Err(ExtractionError::Unavailable(_))
    ));

    let garbled_path = dir.path().join("garbled.json");
    fs::write(&garbled_path, "{ not json").unwrap();
    let garbled = JsonFileExtractor::new(&garbled_path);
    assert!(matches!(
        garbled.extract(&request("BCSE301L")),
        Err(ExtractionError::MalformedInput(_))
    ));
}
