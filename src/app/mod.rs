//! Application use cases and transactions.

mod attendance;
mod enrollment;
mod mark;
mod report;
mod student;
mod subject;

use crate::error::AppError;
use chrono::{NaiveDate, Utc};

pub use attendance::{
    attendance_list_by_student, attendance_percentage_for, attendance_record,
    attendance_summary_by_student, AttendanceDto, AttendanceRecordReq, AttendanceSummaryDto,
};
pub use enrollment::{
    enrollment_create, enrollment_list_by_student, EnrollmentCreateReq, EnrollmentDto,
};
pub use mark::{
    mark_add, mark_delete, mark_get, mark_list_by_student, mark_update, MarkCreateReq, MarkDto,
    MarkUpdateReq, DEFAULT_MAX_MARKS,
};
pub use report::{report_attendance, report_students, report_subjects, AttendanceReportRowDto};
pub use student::{
    student_create, student_delete, student_detail, student_get, student_list, student_update,
    StudentCreateReq, StudentDetailDto, StudentDto, StudentUpdateReq,
};
pub use subject::{
    subject_create, subject_delete, subject_get, subject_list, subject_update, SubjectCreateReq,
    SubjectDto, SubjectUpdateReq,
};

/// Normalize an optional `YYYY-MM-DD` input; blank means today (UTC).
fn parse_date_or_today(input: Option<&str>, field: &str) -> Result<String, AppError> {
    match input.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Utc::now().date_naive().to_string()),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(|d| d.to_string())
            .map_err(|_| AppError::Validation(format!("{} must be YYYY-MM-DD, got '{}'", field, s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_date_is_today() {
        let today = Utc::now().date_naive().to_string();
        assert_eq!(parse_date_or_today(None, "date").unwrap(), today);
        assert_eq!(parse_date_or_today(Some("  "), "date").unwrap(), today);
    }

    #[test]
    fn date_is_trimmed() {
        assert_eq!(
            parse_date_or_today(Some(" 2024-03-07 "), "date").unwrap(),
            "2024-03-07"
        );
    }

    #[test]
    fn bad_date_is_validation_error() {
        let err = parse_date_or_today(Some("07/03/2024"), "exam_date").unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.to_string().contains("exam_date"));
    }
}
