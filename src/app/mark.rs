//! Mark (exam score) use cases.

use super::parse_date_or_today;
use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_MARKS: f64 = 100.0;

#[derive(Debug, Clone, Deserialize)]
pub struct MarkCreateReq {
    pub student_id: i64,
    pub subject_id: i64,
    pub marks: f64,
    pub max_marks: Option<f64>,
    /// `YYYY-MM-DD`; today when absent or blank.
    pub exam_date: Option<String>,
}

/// Overwrites subject, score, maximum and date. The owning student is fixed.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkUpdateReq {
    pub id: i64,
    pub subject_id: i64,
    pub marks: f64,
    pub max_marks: Option<f64>,
    pub exam_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkDto {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub subject_name: String,
    pub marks: f64,
    pub max_marks: f64,
    pub exam_date: String,
}

// No ordering between marks and max_marks is enforced.
fn validate_scores(marks: f64, max_marks: Option<f64>) -> Result<f64, AppError> {
    let max_marks = max_marks.unwrap_or(DEFAULT_MAX_MARKS);
    if !marks.is_finite() || marks < 0.0 {
        return Err(AppError::Validation("marks must be a non-negative number".into()));
    }
    if !max_marks.is_finite() || max_marks <= 0.0 {
        return Err(AppError::Validation("max_marks must be greater than zero".into()));
    }
    Ok(max_marks)
}

const MARK_SELECT: &str = "SELECT m.id, m.student_id, m.subject_id, COALESCE(s.name, ''), m.marks, m.max_marks, m.exam_date
     FROM marks m
     LEFT JOIN subjects s ON s.id = m.subject_id";

fn map_mark(r: &Row<'_>) -> rusqlite::Result<MarkDto> {
    Ok(MarkDto {
        id: r.get(0)?,
        student_id: r.get(1)?,
        subject_id: r.get(2)?,
        subject_name: r.get(3)?,
        marks: r.get(4)?,
        max_marks: r.get(5)?,
        exam_date: r.get(6)?,
    })
}

fn get_with(conn: &Connection, id: i64) -> Result<MarkDto, AppError> {
    conn.query_row(&format!("{} WHERE m.id = ?1", MARK_SELECT), [id], map_mark)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AppError::NotFound(format!("mark {}", id)),
            other => other.into(),
        })
}

pub fn mark_add(pool: &DbPool, req: MarkCreateReq) -> Result<MarkDto, AppError> {
    let max_marks = validate_scores(req.marks, req.max_marks)?;
    let exam_date = parse_date_or_today(req.exam_date.as_deref(), "exam_date")?;

    let conn = get_connection(pool)?;
    conn.execute(
        "INSERT INTO marks (student_id, subject_id, marks, max_marks, exam_date) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![req.student_id, req.subject_id, req.marks, max_marks, &exam_date],
    )?;
    let id = conn.last_insert_rowid();
    log::info!(
        "mark {} added for student {} in subject {}",
        id,
        req.student_id,
        req.subject_id
    );

    get_with(&conn, id)
}

pub fn mark_get(pool: &DbPool, id: i64) -> Result<MarkDto, AppError> {
    let conn = get_connection(pool)?;
    get_with(&conn, id)
}

pub fn mark_update(pool: &DbPool, req: MarkUpdateReq) -> Result<MarkDto, AppError> {
    let max_marks = validate_scores(req.marks, req.max_marks)?;
    let exam_date = parse_date_or_today(req.exam_date.as_deref(), "exam_date")?;

    let conn = get_connection(pool)?;
    let rows = conn.execute(
        "UPDATE marks SET subject_id = ?1, marks = ?2, max_marks = ?3, exam_date = ?4 WHERE id = ?5",
        params![req.subject_id, req.marks, max_marks, &exam_date, req.id],
    )?;
    if rows == 0 {
        return Err(AppError::NotFound(format!("mark {}", req.id)));
    }

    get_with(&conn, req.id)
}

/// Delete a mark, returning the id of the student it belonged to.
pub fn mark_delete(pool: &DbPool, id: i64) -> Result<i64, AppError> {
    let mut conn = get_connection(pool)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let student_id: i64 = tx
        .query_row("SELECT student_id FROM marks WHERE id = ?1", [id], |r| {
            r.get(0)
        })
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AppError::NotFound(format!("mark {}", id)),
            other => other.into(),
        })?;
    tx.execute("DELETE FROM marks WHERE id = ?1", [id])?;

    tx.commit()?;
    log::info!("mark {} deleted", id);
    Ok(student_id)
}

/// Marks for a student, most recent exam first.
pub fn mark_list_by_student(pool: &DbPool, student_id: i64) -> Result<Vec<MarkDto>, AppError> {
    let conn = get_connection(pool)?;
    list_for_student(&conn, student_id)
}

pub(crate) fn list_for_student(conn: &Connection, student_id: i64) -> Result<Vec<MarkDto>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "{} WHERE m.student_id = ?1 ORDER BY m.exam_date DESC, m.id DESC",
        MARK_SELECT
    ))?;
    let rows = stmt.query_map([student_id], map_mark)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
