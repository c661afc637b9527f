//! Student use cases.

use super::attendance::{self, AttendanceDto, AttendanceSummaryDto};
use super::enrollment::{self, EnrollmentDto};
use super::mark::{self, MarkDto};
use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use serde::{Deserialize, Serialize};

const STUDENT_COLUMNS: &str =
    "id, student_id, first_name, last_name, email, phone, address, program, semester";

#[derive(Debug, Clone, Deserialize)]
pub struct StudentCreateReq {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub program: String,
    pub semester: i64,
}

/// Full overwrite of every mutable field.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentUpdateReq {
    pub id: i64,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub program: String,
    pub semester: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentDto {
    pub id: i64,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub program: String,
    pub semester: i64,
}

impl StudentDto {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Serialize)]
pub struct StudentDetailDto {
    pub student: StudentDto,
    pub enrollments: Vec<EnrollmentDto>,
    pub marks: Vec<MarkDto>,
    pub attendance: Vec<AttendanceDto>,
    pub attendance_summary: Vec<AttendanceSummaryDto>,
}

/// Trimmed, validated column values shared by create and update.
struct StudentFields {
    student_id: String,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    address: String,
    program: String,
    semester: i64,
}

#[allow(clippy::too_many_arguments)]
fn validate_fields(
    student_id: &str,
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: Option<String>,
    address: Option<String>,
    program: &str,
    semester: i64,
) -> Result<StudentFields, AppError> {
    let required = [
        ("student_id", student_id),
        ("first_name", first_name),
        ("last_name", last_name),
        ("email", email),
        ("program", program),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{} is required", field)));
        }
    }
    if !email.contains('@') {
        return Err(AppError::Validation(format!("invalid email '{}'", email.trim())));
    }
    if semester < 1 {
        return Err(AppError::Validation("semester must be at least 1".into()));
    }
    Ok(StudentFields {
        student_id: student_id.trim().to_string(),
        first_name: first_name.trim().to_string(),
        last_name: last_name.trim().to_string(),
        email: email.trim().to_string(),
        phone: phone.map(|s| s.trim().to_string()).unwrap_or_default(),
        address: address.map(|s| s.trim().to_string()).unwrap_or_default(),
        program: program.trim().to_string(),
        semester,
    })
}

fn map_student(row: &Row<'_>) -> rusqlite::Result<StudentDto> {
    Ok(StudentDto {
        id: row.get(0)?,
        student_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        address: row.get(6)?,
        program: row.get(7)?,
        semester: row.get(8)?,
    })
}

pub(crate) fn list_all(conn: &Connection) -> Result<Vec<StudentDto>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM students ORDER BY id",
        STUDENT_COLUMNS
    ))?;
    let rows = stmt.query_map([], map_student)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub(crate) fn get_with(conn: &Connection, id: i64) -> Result<StudentDto, AppError> {
    conn.query_row(
        &format!("SELECT {} FROM students WHERE id = ?1", STUDENT_COLUMNS),
        [id],
        map_student,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::NotFound(format!("student {}", id)),
        other => other.into(),
    })
}

pub fn student_list(pool: &DbPool) -> Result<Vec<StudentDto>, AppError> {
    let conn = get_connection(pool)?;
    list_all(&conn)
}

pub fn student_create(pool: &DbPool, req: StudentCreateReq) -> Result<StudentDto, AppError> {
    let f = validate_fields(
        &req.student_id,
        &req.first_name,
        &req.last_name,
        &req.email,
        req.phone,
        req.address,
        &req.program,
        req.semester,
    )?;

    let conn = get_connection(pool)?;
    conn.execute(
        "INSERT INTO students (student_id, first_name, last_name, email, phone, address, program, semester) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            f.student_id,
            f.first_name,
            f.last_name,
            f.email,
            f.phone,
            f.address,
            f.program,
            f.semester
        ],
    )?;
    let id = conn.last_insert_rowid();
    log::info!("student {} created ({})", id, f.student_id);

    Ok(StudentDto {
        id,
        student_id: f.student_id,
        first_name: f.first_name,
        last_name: f.last_name,
        email: f.email,
        phone: f.phone,
        address: f.address,
        program: f.program,
        semester: f.semester,
    })
}

pub fn student_get(pool: &DbPool, id: i64) -> Result<StudentDto, AppError> {
    let conn = get_connection(pool)?;
    get_with(&conn, id)
}

pub fn student_update(pool: &DbPool, req: StudentUpdateReq) -> Result<StudentDto, AppError> {
    let f = validate_fields(
        &req.student_id,
        &req.first_name,
        &req.last_name,
        &req.email,
        req.phone,
        req.address,
        &req.program,
        req.semester,
    )?;

    let conn = get_connection(pool)?;
    let rows = conn.execute(
        "UPDATE students SET student_id = ?1, first_name = ?2, last_name = ?3, email = ?4, phone = ?5, address = ?6, program = ?7, semester = ?8 WHERE id = ?9",
        params![
            f.student_id,
            f.first_name,
            f.last_name,
            f.email,
            f.phone,
            f.address,
            f.program,
            f.semester,
            req.id
        ],
    )?;
    if rows == 0 {
        return Err(AppError::NotFound(format!("student {}", req.id)));
    }

    get_with(&conn, req.id)
}

/// Delete a student together with its marks, attendance and enrollments.
/// All or nothing: a missing student leaves every table untouched.
pub fn student_delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    let mut conn = get_connection(pool)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let marks = tx.execute("DELETE FROM marks WHERE student_id = ?1", [id])?;
    let attendance = tx.execute("DELETE FROM attendance WHERE student_id = ?1", [id])?;
    let enrollments = tx.execute("DELETE FROM enrollments WHERE student_id = ?1", [id])?;
    let rows = tx.execute("DELETE FROM students WHERE id = ?1", [id])?;
    if rows == 0 {
        // tx dropped without commit -> rollback
        return Err(AppError::NotFound(format!("student {}", id)));
    }

    tx.commit()?;
    log::info!(
        "student {} deleted with {} marks, {} attendance rows, {} enrollments",
        id,
        marks,
        attendance,
        enrollments
    );
    Ok(())
}

/// Student with everything recorded against it.
pub fn student_detail(pool: &DbPool, id: i64) -> Result<StudentDetailDto, AppError> {
    let conn = get_connection(pool)?;
    let student = get_with(&conn, id)?;
    Ok(StudentDetailDto {
        enrollments: enrollment::list_for_student(&conn, id)?,
        marks: mark::list_for_student(&conn, id)?,
        attendance: attendance::list_for_student(&conn, id)?,
        attendance_summary: attendance::summary_for_student(&conn, id)?,
        student,
    })
}
