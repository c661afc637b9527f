//! Read-only report pages.

use super::error::{OrRedirect, PageError};
use super::flash::FlashQuery;
use super::pages::{
    render, AttendanceReportPage, ReportsIndexPage, StudentReportPage, SubjectReportPage,
};
use super::{with_pool, AppState};
use crate::app::{report_attendance, report_students, report_subjects};
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;

const REPORTS: &str = "/reports";

async fn reports_index(Query(q): Query<FlashQuery>) -> Result<Html<String>, PageError> {
    render(&ReportsIndexPage {
        flash: q.into_flash(),
    })
}

async fn student_report(
    State(state): State<AppState>,
    Query(q): Query<FlashQuery>,
) -> Result<Html<String>, PageError> {
    let students = with_pool(&state, report_students).await.or_redirect(REPORTS)?;
    render(&StudentReportPage {
        flash: q.into_flash(),
        students,
    })
}

async fn subject_report(
    State(state): State<AppState>,
    Query(q): Query<FlashQuery>,
) -> Result<Html<String>, PageError> {
    let subjects = with_pool(&state, report_subjects).await.or_redirect(REPORTS)?;
    render(&SubjectReportPage {
        flash: q.into_flash(),
        subjects,
    })
}

async fn attendance_report(
    State(state): State<AppState>,
    Query(q): Query<FlashQuery>,
) -> Result<Html<String>, PageError> {
    let rows = with_pool(&state, report_attendance).await.or_redirect(REPORTS)?;
    render(&AttendanceReportPage {
        flash: q.into_flash(),
        rows,
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", get(reports_index))
        .route("/reports/students", get(student_report))
        .route("/reports/subjects", get(subject_report))
        .route("/reports/attendance", get(attendance_report))
}
