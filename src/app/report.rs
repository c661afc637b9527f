//! Read-only report views.

use super::student::{self, StudentDto};
use super::subject::{self, SubjectDto};
use crate::domain::attendance_percentage;
use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceReportRowDto {
    pub student_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub subject_id: i64,
    pub subject_name: String,
    pub present_days: i64,
    pub total_days: i64,
    pub percentage: f64,
}

pub fn report_students(pool: &DbPool) -> Result<Vec<StudentDto>, AppError> {
    let conn = get_connection(pool)?;
    student::list_all(&conn)
}

pub fn report_subjects(pool: &DbPool) -> Result<Vec<SubjectDto>, AppError> {
    let conn = get_connection(pool)?;
    subject::list_all(&conn)
}

/// Attendance percentage for every (student, subject) pair with at least one
/// recorded day, in a single grouped query.
pub fn report_attendance(pool: &DbPool) -> Result<Vec<AttendanceReportRowDto>, AppError> {
    let conn = get_connection(pool)?;
    let mut stmt = conn.prepare(
        "SELECT s.id, s.first_name, s.last_name, sub.id, sub.name,
                SUM(CASE WHEN a.status = 'Present' THEN 1 ELSE 0 END) AS present_days,
                COUNT(a.id) AS total_days
         FROM attendance a
         JOIN students s ON s.id = a.student_id
         JOIN subjects sub ON sub.id = a.subject_id
         GROUP BY s.id, sub.id
         ORDER BY s.last_name, s.first_name, s.id, sub.name",
    )?;
    let rows = stmt.query_map([], |r| {
        let present_days: i64 = r.get(5)?;
        let total_days: i64 = r.get(6)?;
        Ok(AttendanceReportRowDto {
            student_id: r.get(0)?,
            first_name: r.get(1)?,
            last_name: r.get(2)?,
            subject_id: r.get(3)?,
            subject_name: r.get(4)?,
            present_days,
            total_days,
            percentage: attendance_percentage(present_days, total_days),
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
