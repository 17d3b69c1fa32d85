use class_schedule::{AttendanceError, AttendanceRecord, ELIGIBILITY_THRESHOLD};

#[test]
fn record_rejects_invalid_counts() {
    assert_eq!(
        AttendanceRecord::new(0, 0),
        Err(AttendanceError::NonPositiveTotal(0))
    );
    assert_eq!(
        AttendanceRecord::new(40, -1),
        Err(AttendanceError::NegativeAttended(-1))
    );
    assert_eq!(
        AttendanceRecord::new(40, 41),
        Err(AttendanceError::AttendedExceedsTotal {
            attended: 41,
            total_held: 40,
        })
    );
}

#[test]
fn validation_messages_are_user_facing() {
    let err = AttendanceRecord::new(40, 41).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Classes attended (till date) cannot exceed total classes held."
    );
    let err = AttendanceRecord::new(-3, 0).unwrap_err();
    assert_eq!(err.to_string(), "Total classes held must be a positive number.");
}

#[test]
fn current_percentage_and_eligibility() {
    let record = AttendanceRecord::new(80, 60).unwrap();
    let summary = record.summary(ELIGIBILITY_THRESHOLD);
    assert_eq!(summary.percentage, 75.0);
    assert!(summary.eligible);

    let record = AttendanceRecord::new(3, 2).unwrap();
    let summary = record.summary(ELIGIBILITY_THRESHOLD);
    assert_eq!(summary.percentage, 66.67);
    assert!(!summary.eligible);
}

#[test]
fn scenario_starts_by_attending_every_remaining_class() {
    let record = AttendanceRecord::new(40, 28).unwrap();
    let scenario = record.scenario(20).unwrap();
    assert_eq!(scenario.classes_left(), 20);
    assert_eq!(scenario.attending(), 20);

    // 48 of 60.
    let projected = scenario.projected(ELIGIBILITY_THRESHOLD);
    assert_eq!(projected.percentage, 80.0);
    assert!(projected.eligible);
}

#[test]
fn skipping_classes_lowers_the_projection() {
    let record = AttendanceRecord::new(40, 28).unwrap();
    let mut scenario = record.scenario(20).unwrap();
    for _ in 0..5 {
        scenario.attend_fewer();
    }
    // 43 of 60.
    let projected = scenario.projected(ELIGIBILITY_THRESHOLD);
    assert_eq!(projected.percentage, 71.67);
    assert!(!projected.eligible);

    scenario.attend_more();
    assert_eq!(scenario.attending(), 16);
}

#[test]
fn attending_is_clamped_to_remaining_classes() {
    let record = AttendanceRecord::new(10, 10).unwrap();
    let mut scenario = record.scenario(2).unwrap();
    scenario.attend_more();
    assert_eq!(scenario.attending(), 2);
    scenario.set_attending(-4);
    assert_eq!(scenario.attending(), 0);
    scenario.attend_fewer();
    assert_eq!(scenario.attending(), 0);
    scenario.set_attending(99);
    assert_eq!(scenario.attending(), 2);
}

#[test]
fn no_classes_left_projects_current_attendance() {
    let record = AttendanceRecord::new(80, 60).unwrap();
    let scenario = record.scenario(0).unwrap();
    assert_eq!(
        scenario.projected(ELIGIBILITY_THRESHOLD),
        record.summary(ELIGIBILITY_THRESHOLD)
    );
}

#[test]
fn negative_classes_left_is_rejected() {
    let record = AttendanceRecord::new(80, 60).unwrap();
    assert_eq!(
        record.scenario(-1),
        Err(AttendanceError::NegativeClassesLeft(-1))
    );
}
