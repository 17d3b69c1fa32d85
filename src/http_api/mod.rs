use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::{Local, NaiveDate};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AppConfig, AttendanceRecord, AttendanceSummary, ExtractedSchedule, ScheduleSession,
    ScheduleWindow, calendar::weekday_name,
};

#[derive(Clone)]
pub struct AppState {
    session: Arc<RwLock<ScheduleSession>>,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(session: ScheduleSession, config: AppConfig) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            config: Arc::new(config),
        }
    }

    fn session(&self) -> Arc<RwLock<ScheduleSession>> {
        self.session.clone()
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Invalid(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub course_code: String,
    pub class_weekdays: Vec<String>,
    pub window: ScheduleWindow,
    pub semester_end: Option<NaiveDate>,
    pub extra_days: String,
    pub explanation: Option<String>,
}

impl From<&ScheduleSession> for SessionView {
    fn from(session: &ScheduleSession) -> Self {
        Self {
            course_code: session.course_code().to_string(),
            class_weekdays: session
                .class_weekdays()
                .sorted()
                .into_iter()
                .map(|day| weekday_name(day).to_string())
                .collect(),
            window: session.window(),
            semester_end: session.semester_end(),
            extra_days: session.extra_days().to_string(),
            explanation: session
                .extraction()
                .and_then(|extraction| extraction.explanation.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExtraDaysPayload {
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassDatesResponse {
    pub count: usize,
    pub dates: Vec<NaiveDate>,
    pub excluded: Vec<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct AttendancePayload {
    total_held: i64,
    attended: i64,
    #[serde(default)]
    classes_left: Option<i64>,
    #[serde(default)]
    attending: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttendanceResponse {
    pub current: AttendanceSummary,
    pub classes_left: Option<i64>,
    pub attending: Option<i64>,
    pub projected: Option<AttendanceSummary>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/session", get(get_session))
        .route("/session/extraction", put(put_extraction))
        .route("/session/window", put(put_window))
        .route("/session/extra-days", put(put_extra_days))
        .route("/class-dates", get(get_class_dates))
        .route("/attendance", post(post_attendance))
        .with_state(state)
}

pub async fn serve(
    addr: SocketAddr,
    session: ScheduleSession,
    config: AppConfig,
) -> std::io::Result<()> {
    let state = AppState::new(session, config);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session();
    let view = {
        let guard = session.read();
        SessionView::from(&*guard)
    };
    Json(view)
}

async fn put_extraction(
    State(state): State<AppState>,
    Json(extracted): Json<ExtractedSchedule>,
) -> Json<SessionView> {
    let session = state.session();
    let view = {
        let mut guard = session.write();
        guard.apply_extraction(extracted, today());
        SessionView::from(&*guard)
    };
    Json(view)
}

async fn put_window(
    State(state): State<AppState>,
    Json(window): Json<ScheduleWindow>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.session();
    let view = {
        let mut guard = session.write();
        // Both bounds are checked before either is stored.
        let mut updated = guard.clone();
        updated
            .set_start_date(window.start)
            .and_then(|_| updated.set_end_date(window.end))
            .map_err(|err| ApiError::invalid(err.to_string()))?;
        *guard = updated;
        SessionView::from(&*guard)
    };
    Ok(Json(view))
}

async fn put_extra_days(
    State(state): State<AppState>,
    Json(payload): Json<ExtraDaysPayload>,
) -> Json<SessionView> {
    let session = state.session();
    let view = {
        let mut guard = session.write();
        guard.set_extra_days(payload.text);
        SessionView::from(&*guard)
    };
    Json(view)
}

async fn get_class_dates(State(state): State<AppState>) -> Json<ClassDatesResponse> {
    let session = state.session();
    let today = today();
    let (dates, mut excluded) = {
        let guard = session.read();
        let excluded: Vec<NaiveDate> = guard.excluded_dates(today).into_iter().collect();
        (guard.class_dates(today), excluded)
    };
    excluded.sort_unstable();
    Json(ClassDatesResponse {
        count: dates.len(),
        dates: dates.dates().to_vec(),
        excluded,
    })
}

async fn post_attendance(
    State(state): State<AppState>,
    Json(payload): Json<AttendancePayload>,
) -> Result<Json<AttendanceResponse>, ApiError> {
    let threshold = state.config.eligibility_threshold;
    let record = AttendanceRecord::new(payload.total_held, payload.attended)
        .map_err(|err| ApiError::invalid(err.to_string()))?;

    // Without an explicit count, every computed class date is still ahead.
    let classes_left = match payload.classes_left {
        Some(left) => Some(left),
        None => {
            let session = state.session();
            let remaining = session.read().classes_remaining(today());
            (remaining > 0).then_some(remaining as i64)
        }
    };

    let scenario = classes_left
        .map(|left| record.scenario(left))
        .transpose()
        .map_err(|err| ApiError::invalid(err.to_string()))?
        .map(|mut scenario| {
            if let Some(attending) = payload.attending {
                scenario.set_attending(attending);
            }
            scenario
        });

    Ok(Json(AttendanceResponse {
        current: record.summary(threshold),
        classes_left: scenario.map(|s| s.classes_left()),
        attending: scenario.map(|s| s.attending()),
        projected: scenario.map(|s| s.projected(threshold)),
    }))
}
