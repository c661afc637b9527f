//! Enrollment use cases.

use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use chrono::Utc;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct EnrollmentCreateReq {
    pub student_id: i64,
    pub subject_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentDto {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub subject_code: String,
    pub subject_name: String,
    pub enrollment_date: String,
}

/// Enroll a student in a subject, dated today (UTC). Repeat enrollments are
/// not checked for.
pub fn enrollment_create(pool: &DbPool, req: EnrollmentCreateReq) -> Result<EnrollmentDto, AppError> {
    let today = Utc::now().date_naive().to_string();

    let conn = get_connection(pool)?;
    conn.execute(
        "INSERT INTO enrollments (student_id, subject_id, enrollment_date) VALUES (?1, ?2, ?3)",
        params![req.student_id, req.subject_id, &today],
    )?;
    let id = conn.last_insert_rowid();
    log::info!(
        "student {} enrolled in subject {}",
        req.student_id,
        req.subject_id
    );

    let (subject_code, subject_name): (String, String) = conn.query_row(
        "SELECT code, name FROM subjects WHERE id = ?1",
        [req.subject_id],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;

    Ok(EnrollmentDto {
        id,
        student_id: req.student_id,
        subject_id: req.subject_id,
        subject_code,
        subject_name,
        enrollment_date: today,
    })
}

pub fn enrollment_list_by_student(
    pool: &DbPool,
    student_id: i64,
) -> Result<Vec<EnrollmentDto>, AppError> {
    let conn = get_connection(pool)?;
    list_for_student(&conn, student_id)
}

pub(crate) fn list_for_student(
    conn: &Connection,
    student_id: i64,
) -> Result<Vec<EnrollmentDto>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT e.id, e.student_id, e.subject_id, s.code, s.name, e.enrollment_date
         FROM enrollments e
         JOIN subjects s ON s.id = e.subject_id
         WHERE e.student_id = ?1
         ORDER BY e.enrollment_date DESC, e.id DESC",
    )?;
    let rows = stmt.query_map([student_id], |r| {
        Ok(EnrollmentDto {
            id: r.get(0)?,
            student_id: r.get(1)?,
            subject_id: r.get(2)?,
            subject_code: r.get(3)?,
            subject_name: r.get(4)?,
            enrollment_date: r.get(5)?,
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
