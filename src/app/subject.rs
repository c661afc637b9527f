//! Subject catalog use cases.

use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SubjectCreateReq {
    pub code: String,
    pub name: String,
    pub credits: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubjectUpdateReq {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub credits: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectDto {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub credits: i64,
}

fn validate(code: &str, name: &str, credits: i64) -> Result<(String, String), AppError> {
    let code = code.trim();
    let name = name.trim();
    if code.is_empty() {
        return Err(AppError::Validation("code is required".into()));
    }
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    if credits < 0 {
        return Err(AppError::Validation("credits must not be negative".into()));
    }
    Ok((code.to_string(), name.to_string()))
}

fn map_subject(row: &Row<'_>) -> rusqlite::Result<SubjectDto> {
    Ok(SubjectDto {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        credits: row.get(3)?,
    })
}

pub(crate) fn list_all(conn: &Connection) -> Result<Vec<SubjectDto>, AppError> {
    let mut stmt = conn.prepare("SELECT id, code, name, credits FROM subjects ORDER BY code")?;
    let rows = stmt.query_map([], map_subject)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn get_with(conn: &Connection, id: i64) -> Result<SubjectDto, AppError> {
    conn.query_row(
        "SELECT id, code, name, credits FROM subjects WHERE id = ?1",
        [id],
        map_subject,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::NotFound(format!("subject {}", id)),
        other => other.into(),
    })
}

pub fn subject_list(pool: &DbPool) -> Result<Vec<SubjectDto>, AppError> {
    let conn = get_connection(pool)?;
    list_all(&conn)
}

pub fn subject_create(pool: &DbPool, req: SubjectCreateReq) -> Result<SubjectDto, AppError> {
    let (code, name) = validate(&req.code, &req.name, req.credits)?;

    let conn = get_connection(pool)?;
    conn.execute(
        "INSERT INTO subjects (code, name, credits) VALUES (?1, ?2, ?3)",
        params![code, name, req.credits],
    )?;
    let id = conn.last_insert_rowid();
    log::info!("subject {} created ({})", id, code);

    Ok(SubjectDto {
        id,
        code,
        name,
        credits: req.credits,
    })
}

pub fn subject_get(pool: &DbPool, id: i64) -> Result<SubjectDto, AppError> {
    let conn = get_connection(pool)?;
    get_with(&conn, id)
}

pub fn subject_update(pool: &DbPool, req: SubjectUpdateReq) -> Result<SubjectDto, AppError> {
    let (code, name) = validate(&req.code, &req.name, req.credits)?;

    let conn = get_connection(pool)?;
    let rows = conn.execute(
        "UPDATE subjects SET code = ?1, name = ?2, credits = ?3 WHERE id = ?4",
        params![code, name, req.credits, req.id],
    )?;
    if rows == 0 {
        return Err(AppError::NotFound(format!("subject {}", req.id)));
    }

    get_with(&conn, req.id)
}

/// Delete a subject. Refused while enrollments, marks or attendance still
/// reference it; those have to be removed first.
pub fn subject_delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    let mut conn = get_connection(pool)?;
    // take the write lock before the dependent count
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let (enrollments, marks, attendance): (i64, i64, i64) = tx.query_row(
        "SELECT
            (SELECT COUNT(*) FROM enrollments WHERE subject_id = ?1),
            (SELECT COUNT(*) FROM marks WHERE subject_id = ?1),
            (SELECT COUNT(*) FROM attendance WHERE subject_id = ?1)",
        [id],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
    )?;
    if enrollments + marks + attendance > 0 {
        return Err(AppError::Conflict(format!(
            "subject {} still has {} enrollments, {} marks and {} attendance records",
            id, enrollments, marks, attendance
        )));
    }

    let rows = tx.execute("DELETE FROM subjects WHERE id = ?1", [id])?;
    if rows == 0 {
        return Err(AppError::NotFound(format!("subject {}", id)));
    }

    tx.commit()?;
    log::info!("subject {} deleted", id);
    Ok(())
}
