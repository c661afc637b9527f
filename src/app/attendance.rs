//! Attendance use cases and percentage aggregates.

use super::parse_date_or_today;
use crate::domain::{attendance_percentage, AttendanceStatus};
use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceRecordReq {
    pub student_id: i64,
    pub subject_id: i64,
    /// `YYYY-MM-DD`; today when absent or blank.
    pub date: Option<String>,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceDto {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub subject_name: String,
    pub date: String,
    pub status: String,
}

/// Present/total counts for one student in one subject.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceSummaryDto {
    pub subject_id: i64,
    pub subject_name: String,
    pub present_days: i64,
    pub total_days: i64,
    pub percentage: f64,
}

pub fn attendance_record(pool: &DbPool, req: AttendanceRecordReq) -> Result<AttendanceDto, AppError> {
    let date = parse_date_or_today(req.date.as_deref(), "date")?;

    let conn = get_connection(pool)?;
    conn.execute(
        "INSERT INTO attendance (student_id, subject_id, date, status) VALUES (?1, ?2, ?3, ?4)",
        params![req.student_id, req.subject_id, &date, req.status.as_str()],
    )?;
    let id = conn.last_insert_rowid();
    log::debug!(
        "attendance {} recorded: student {} subject {} {} {}",
        id,
        req.student_id,
        req.subject_id,
        date,
        req.status
    );

    let subject_name: String = conn
        .query_row("SELECT name FROM subjects WHERE id = ?1", [req.subject_id], |r| {
            r.get(0)
        })?;

    Ok(AttendanceDto {
        id,
        student_id: req.student_id,
        subject_id: req.subject_id,
        subject_name,
        date,
        status: req.status.as_str().to_string(),
    })
}

pub fn attendance_list_by_student(
    pool: &DbPool,
    student_id: i64,
) -> Result<Vec<AttendanceDto>, AppError> {
    let conn = get_connection(pool)?;
    list_for_student(&conn, student_id)
}

/// Percentage of `Present` rows for the pair; 0 when nothing is recorded.
pub fn attendance_percentage_for(
    pool: &DbPool,
    student_id: i64,
    subject_id: i64,
) -> Result<f64, AppError> {
    let conn = get_connection(pool)?;
    let (present, total): (i64, i64) = conn.query_row(
        "SELECT COALESCE(SUM(CASE WHEN status = 'Present' THEN 1 ELSE 0 END), 0), COUNT(*)
         FROM attendance
         WHERE student_id = ?1 AND subject_id = ?2",
        params![student_id, subject_id],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;
    Ok(attendance_percentage(present, total))
}

pub fn attendance_summary_by_student(
    pool: &DbPool,
    student_id: i64,
) -> Result<Vec<AttendanceSummaryDto>, AppError> {
    let conn = get_connection(pool)?;
    summary_for_student(&conn, student_id)
}

pub(crate) fn list_for_student(
    conn: &Connection,
    student_id: i64,
) -> Result<Vec<AttendanceDto>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.student_id, a.subject_id, COALESCE(s.name, ''), a.date, a.status
         FROM attendance a
         LEFT JOIN subjects s ON s.id = a.subject_id
         WHERE a.student_id = ?1
         ORDER BY a.date DESC, a.id DESC",
    )?;
    let rows = stmt.query_map([student_id], |r| {
        Ok(AttendanceDto {
            id: r.get(0)?,
            student_id: r.get(1)?,
            subject_id: r.get(2)?,
            subject_name: r.get(3)?,
            date: r.get(4)?,
            status: r.get(5)?,
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// One grouped query for every subject the student has attendance in.
pub(crate) fn summary_for_student(
    conn: &Connection,
    student_id: i64,
) -> Result<Vec<AttendanceSummaryDto>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT a.subject_id, COALESCE(s.name, ''),
                SUM(CASE WHEN a.status = 'Present' THEN 1 ELSE 0 END) AS present_days,
                COUNT(a.id) AS total_days
         FROM attendance a
         LEFT JOIN subjects s ON s.id = a.subject_id
         WHERE a.student_id = ?1
         GROUP BY a.subject_id
         ORDER BY s.name",
    )?;
    let rows = stmt.query_map([student_id], |r| {
        let present_days: i64 = r.get(2)?;
        let total_days: i64 = r.get(3)?;
        Ok(AttendanceSummaryDto {
            subject_id: r.get(0)?,
            subject_name: r.get(1)?,
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
