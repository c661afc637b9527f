//! HTML form bodies. Everything arrives as text; conversion into the typed
//! requests is where numbers and enums get checked.

use crate::app::{
    AttendanceRecordReq, EnrollmentCreateReq, MarkCreateReq, MarkUpdateReq, StudentCreateReq,
    StudentDto, StudentUpdateReq, SubjectCreateReq, SubjectDto, SubjectUpdateReq,
};
use crate::domain::AttendanceStatus;
use crate::error::AppError;
use serde::Deserialize;
use std::str::FromStr;

fn parse_field<T: FromStr>(value: &str, field: &str) -> Result<T, AppError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| AppError::Validation(format!("{} is not valid: '{}'", field, value.trim())))
}

fn optional_text(value: String) -> Option<String> {
    Some(value).filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudentForm {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub program: String,
    pub semester: String,
}

impl StudentForm {
    pub fn into_create_req(self) -> Result<StudentCreateReq, AppError> {
        Ok(StudentCreateReq {
            semester: parse_field(&self.semester, "semester")?,
            student_id: self.student_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: optional_text(self.phone),
            address: optional_text(self.address),
            program: self.program,
        })
    }

    pub fn into_update_req(self, id: i64) -> Result<StudentUpdateReq, AppError> {
        let req = self.into_create_req()?;
        Ok(StudentUpdateReq {
            id,
            student_id: req.student_id,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            address: req.address,
            program: req.program,
            semester: req.semester,
        })
    }
}

impl From<&StudentDto> for StudentForm {
    fn from(s: &StudentDto) -> Self {
        Self {
            student_id: s.student_id.clone(),
            first_name: s.first_name.clone(),
            last_name: s.last_name.clone(),
            email: s.email.clone(),
            phone: s.phone.clone(),
            address: s.address.clone(),
            program: s.program.clone(),
            semester: s.semester.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubjectForm {
    pub code: String,
    pub name: String,
    pub credits: String,
}

impl SubjectForm {
    pub fn into_create_req(self) -> Result<SubjectCreateReq, AppError> {
        Ok(SubjectCreateReq {
            credits: parse_field(&self.credits, "credits")?,
            code: self.code,
            name: self.name,
        })
    }

    pub fn into_update_req(self, id: i64) -> Result<SubjectUpdateReq, AppError> {
        let req = self.into_create_req()?;
        Ok(SubjectUpdateReq {
            id,
            code: req.code,
            name: req.name,
            credits: req.credits,
        })
    }
}

impl From<&SubjectDto> for SubjectForm {
    fn from(s: &SubjectDto) -> Self {
        Self {
            code: s.code.clone(),
            name: s.name.clone(),
            credits: s.credits.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnrollForm {
    pub subject: String,
}

impl EnrollForm {
    pub fn into_req(self, student_id: i64) -> Result<EnrollmentCreateReq, AppError> {
        Ok(EnrollmentCreateReq {
            student_id,
            subject_id: parse_field(&self.subject, "subject")?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MarkForm {
    pub subject_id: String,
    pub marks: String,
    pub max_marks: String,
    pub exam_date: String,
}

impl MarkForm {
    fn max_marks(&self) -> Result<Option<f64>, AppError> {
        optional_text(self.max_marks.clone())
            .map(|v| parse_field(&v, "max_marks"))
            .transpose()
    }

    pub fn into_create_req(self, student_id: i64) -> Result<MarkCreateReq, AppError> {
        Ok(MarkCreateReq {
            student_id,
            subject_id: parse_field(&self.subject_id, "subject_id")?,
            marks: parse_field(&self.marks, "marks")?,
            max_marks: self.max_marks()?,
            exam_date: optional_text(self.exam_date),
        })
    }

    pub fn into_update_req(self, id: i64) -> Result<MarkUpdateReq, AppError> {
        Ok(MarkUpdateReq {
            id,
            subject_id: parse_field(&self.subject_id, "subject_id")?,
            marks: parse_field(&self.marks, "marks")?,
            max_marks: self.max_marks()?,
            exam_date: optional_text(self.exam_date),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AttendanceForm {
    pub subject_id: String,
    pub date: String,
    pub status: String,
}

impl AttendanceForm {
    pub fn into_req(self, student_id: i64) -> Result<AttendanceRecordReq, AppError> {
        let status = self
            .status
            .parse::<AttendanceStatus>()
            .map_err(AppError::Validation)?;
        Ok(AttendanceRecordReq {
            student_id,
            subject_id: parse_field(&self.subject_id, "subject_id")?,
            date: optional_text(self.date),
            status,
        })
    }
}
