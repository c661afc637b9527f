//! Askama page models. Templates live under `templates/`.

use super::error::PageError;
use super::flash::Flash;
use super::forms::{StudentForm, SubjectForm};
use crate::app::{
    AttendanceDto, AttendanceReportRowDto, AttendanceSummaryDto, MarkDto, StudentDetailDto,
    StudentDto, SubjectDto,
};
use crate::domain::AttendanceStatus;
use crate::error::AppError;
use askama::Template;
use axum::response::Html;

pub fn render<T: Template>(page: &T) -> Result<Html<String>, PageError> {
    page.render()
        .map(Html)
        .map_err(|e| PageError::new(AppError::Internal(format!("template: {}", e)), "/"))
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "students/list.html")]
pub struct StudentListPage {
    pub flash: Option<Flash>,
    pub students: Vec<StudentDto>,
}

/// Shared by the add and edit forms.
#[derive(Template)]
#[template(path = "students/form.html")]
pub struct StudentFormPage {
    pub flash: Option<Flash>,
    pub title: &'static str,
    pub action: String,
    pub values: StudentForm,
}

#[derive(Template)]
#[template(path = "students/view.html")]
pub struct StudentViewPage {
    pub flash: Option<Flash>,
    pub detail: StudentDetailDto,
}

#[derive(Template)]
#[template(path = "students/enroll.html")]
pub struct EnrollPage {
    pub flash: Option<Flash>,
    pub student: StudentDto,
    pub subjects: Vec<SubjectDto>,
}

#[derive(Template)]
#[template(path = "subjects/list.html")]
pub struct SubjectListPage {
    pub flash: Option<Flash>,
    pub subjects: Vec<SubjectDto>,
}

#[derive(Template)]
#[template(path = "subjects/form.html")]
pub struct SubjectFormPage {
    pub flash: Option<Flash>,
    pub title: &'static str,
    pub action: String,
    pub values: SubjectForm,
}

#[derive(Template)]
#[template(path = "marks/manage.html")]
pub struct MarksPage {
    pub flash: Option<Flash>,
    pub student: StudentDto,
    pub subjects: Vec<SubjectDto>,
    pub marks: Vec<MarkDto>,
}

#[derive(Template)]
#[template(path = "marks/edit.html")]
pub struct MarkEditPage {
    pub flash: Option<Flash>,
    pub mark: MarkDto,
    pub subjects: Vec<SubjectDto>,
}

#[derive(Template)]
#[template(path = "students/attendance.html")]
pub struct AttendancePage {
    pub flash: Option<Flash>,
    pub student: StudentDto,
    pub subjects: Vec<SubjectDto>,
    pub statuses: &'static [AttendanceStatus],
    pub records: Vec<AttendanceDto>,
    pub summary: Vec<AttendanceSummaryDto>,
}

#[derive(Template)]
#[template(path = "reports/index.html")]
pub struct ReportsIndexPage {
    pub flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "reports/students.html")]
pub struct StudentReportPage {
    pub flash: Option<Flash>,
    pub students: Vec<StudentDto>,
}

#[derive(Template)]
#[template(path = "reports/subjects.html")]
pub struct SubjectReportPage {
    pub flash: Option<Flash>,
    pub subjects: Vec<SubjectDto>,
}

#[derive(Template)]
#[template(path = "reports/attendance.html")]
pub struct AttendanceReportPage {
    pub flash: Option<Flash>,
    pub rows: Vec<AttendanceReportRowDto>,
}
