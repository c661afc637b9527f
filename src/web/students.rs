//! Student pages: listing, add/edit/delete, detail, enrollment, marks and
//! attendance for one student.

use super::error::{OrRedirect, PageError};
use super::flash::{redirect_with, FlashKind, FlashQuery};
use super::forms::{AttendanceForm, EnrollForm, MarkForm, StudentForm};
use super::pages::{
    render, AttendancePage, EnrollPage, MarksPage, StudentFormPage, StudentListPage,
    StudentViewPage,
};
use super::{with_pool, AppState};
use crate::app::{
    attendance_list_by_student, attendance_record, attendance_summary_by_student,
    enrollment_create, mark_add, mark_list_by_student, student_create, student_delete,
    student_detail, student_get, student_list, student_update, subject_list,
};
use crate::domain::AttendanceStatus;
use axum::extract::{Form, Path, Query, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::Router;

const STUDENTS: &str = "/students";

/// GET /students
async fn list_students(
    State(state): State<AppState>,
    Query(q): Query<FlashQuery>,
) -> Result<Html<String>, PageError> {
    let students = with_pool(&state, student_list).await.or_redirect("/")?;
    render(&StudentListPage {
        flash: q.into_flash(),
        students,
    })
}

/// GET /students/add
async fn add_student_form(Query(q): Query<FlashQuery>) -> Result<Html<String>, PageError> {
    render(&StudentFormPage {
        flash: q.into_flash(),
        title: "Add Student",
        action: "/students/add".to_string(),
        values: StudentForm::default(),
    })
}

/// POST /students/add
async fn add_student(
    State(state): State<AppState>,
    Form(form): Form<StudentForm>,
) -> Result<Redirect, PageError> {
    let req = form.into_create_req().or_redirect(STUDENTS)?;
    with_pool(&state, move |pool| student_create(pool, req))
        .await
        .or_redirect(STUDENTS)?;
    Ok(redirect_with(STUDENTS, FlashKind::Success, "Student added successfully!"))
}

/// GET /students/edit/{id}
async fn edit_student_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(q): Query<FlashQuery>,
) -> Result<Html<String>, PageError> {
    let student = with_pool(&state, move |pool| student_get(pool, id))
        .await
        .or_redirect(STUDENTS)?;
    render(&StudentFormPage {
        flash: q.into_flash(),
        title: "Edit Student",
        action: format!("/students/edit/{}", id),
        values: StudentForm::from(&student),
    })
}

/// POST /students/edit/{id}
async fn edit_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<StudentForm>,
) -> Result<Redirect, PageError> {
    let req = form.into_update_req(id).or_redirect(STUDENTS)?;
    with_pool(&state, move |pool| student_update(pool, req))
        .await
        .or_redirect(STUDENTS)?;
    Ok(redirect_with(STUDENTS, FlashKind::Success, "Student updated successfully!"))
}

/// POST /students/delete/{id}
async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, PageError> {
    with_pool(&state, move |pool| student_delete(pool, id))
        .await
        .or_redirect(STUDENTS)?;
    Ok(redirect_with(STUDENTS, FlashKind::Success, "Student deleted successfully!"))
}

/// GET /students/{id}
async fn view_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(q): Query<FlashQuery>,
) -> Result<Html<String>, PageError> {
    let detail = with_pool(&state, move |pool| student_detail(pool, id))
        .await
        .or_redirect(STUDENTS)?;
    render(&StudentViewPage {
        flash: q.into_flash(),
        detail,
    })
}

/// GET /students/{id}/enroll
async fn enroll_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(q): Query<FlashQuery>,
) -> Result<Html<String>, PageError> {
    let (student, subjects) = with_pool(&state, move |pool| {
        Ok((student_get(pool, id)?, subject_list(pool)?))
    })
    .await
    .or_redirect(STUDENTS)?;
    render(&EnrollPage {
        flash: q.into_flash(),
        student,
        subjects,
    })
}

/// POST /students/{id}/enroll
async fn enroll(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<EnrollForm>,
) -> Result<Redirect, PageError> {
    let back = format!("/students/{}", id);
    let req = form.into_req(id).or_redirect(&back)?;
    with_pool(&state, move |pool| enrollment_create(pool, req))
        .await
        .or_redirect(&back)?;
    Ok(redirect_with(&back, FlashKind::Success, "Enrollment successful!"))
}

/// GET /students/{id}/marks
async fn marks_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(q): Query<FlashQuery>,
) -> Result<Html<String>, PageError> {
    let (student, subjects, marks) = with_pool(&state, move |pool| {
        Ok((
            student_get(pool, id)?,
            subject_list(pool)?,
            mark_list_by_student(pool, id)?,
        ))
    })
    .await
    .or_redirect(STUDENTS)?;
    render(&MarksPage {
        flash: q.into_flash(),
        student,
        subjects,
        marks,
    })
}

/// POST /students/{id}/marks
async fn add_mark(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<MarkForm>,
) -> Result<Redirect, PageError> {
    let back = format!("/students/{}/marks", id);
    let req = form.into_create_req(id).or_redirect(&back)?;
    with_pool(&state, move |pool| mark_add(pool, req))
        .await
        .or_redirect(&back)?;
    Ok(redirect_with(&back, FlashKind::Success, "Marks added successfully!"))
}

/// GET /students/{id}/attendance
async fn attendance_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(q): Query<FlashQuery>,
) -> Result<Html<String>, PageError> {
    let (student, subjects, records, summary) = with_pool(&state, move |pool| {
        Ok((
            student_get(pool, id)?,
            subject_list(pool)?,
            attendance_list_by_student(pool, id)?,
            attendance_summary_by_student(pool, id)?,
        ))
    })
    .await
    .or_redirect(STUDENTS)?;
    render(&AttendancePage {
        flash: q.into_flash(),
        student,
        subjects,
        statuses: AttendanceStatus::all(),
        records,
        summary,
    })
}

/// POST /students/{id}/attendance
async fn record_attendance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<AttendanceForm>,
) -> Result<Redirect, PageError> {
    let back = format!("/students/{}/attendance", id);
    let req = form.into_req(id).or_redirect(&back)?;
    with_pool(&state, move |pool| attendance_record(pool, req))
        .await
        .or_redirect(&back)?;
    Ok(redirect_with(&back, FlashKind::Success, "Attendance recorded!"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students))
        .route("/students/add", get(add_student_form).post(add_student))
        .route("/students/edit/{id}", get(edit_student_form).post(edit_student))
        .route("/students/delete/{id}", post(delete_student))
        .route("/students/{id}", get(view_student))
        .route("/students/{id}/enroll", get(enroll_form).post(enroll))
        .route("/students/{id}/marks", get(marks_page).post(add_mark))
        .route(
            "/students/{id}/attendance",
            get(attendance_page).post(record_attendance),
        )
}
