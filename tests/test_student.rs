//! Student CRUD integration tests

use app_lib::app::{
    attendance_record, enrollment_create, mark_add, student_create, student_delete,
    student_detail, student_get, student_list, student_update, subject_create,
    AttendanceRecordReq, EnrollmentCreateReq, MarkCreateReq, StudentCreateReq, StudentUpdateReq,
    SubjectCreateReq,
};
use app_lib::domain::AttendanceStatus;
use app_lib::infra::db::{get_connection, init_test_db};
use app_lib::infra::DbPool;

// ──────────────────────── Helper ────────────────────────

fn make_create_req(code: &str, first: &str) -> StudentCreateReq {
    StudentCreateReq {
        student_id: code.to_string(),
        first_name: first.to_string(),
        last_name: "Tester".to_string(),
        email: format!("{}@school.edu", first.to_lowercase()),
        phone: Some("555-0100".to_string()),
        address: None,
        program: "BSc CS".to_string(),
        semester: 2,
    }
}

fn count(pool: &DbPool, table: &str, student_id: i64) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE student_id = ?1", table);
    let conn = get_connection(pool).unwrap();
    conn.query_row(&sql, [student_id], |r| r.get(0)).unwrap()
}

/// One enrollment, one mark and one attendance row.
fn add_records(pool: &DbPool, student_id: i64, subject_id: i64) {
    enrollment_create(
        pool,
        EnrollmentCreateReq {
            student_id,
            subject_id,
        },
    )
    .unwrap();
    mark_add(
        pool,
        MarkCreateReq {
            student_id,
            subject_id,
            marks: 70.0,
            max_marks: None,
            exam_date: None,
        },
    )
    .unwrap();
    attendance_record(
        pool,
        AttendanceRecordReq {
            student_id,
            subject_id,
            date: None,
            status: AttendanceStatus::Present,
        },
    )
    .unwrap();
}

// ══════════════════════════════════════════════════════════
//  student_create
// ══════════════════════════════════════════════════════════

#[test]
fn create_student_adds_exactly_one_matching_row() {
    let pool = init_test_db();
    student_create(&pool, make_create_req("S-001", "Alice")).unwrap();
    let before = student_list(&pool).unwrap().len();

    let dto = student_create(&pool, make_create_req("S-002", "Bob")).unwrap();

    let all = student_list(&pool).unwrap();
    assert_eq!(all.len(), before + 1);
    let matching: Vec<_> = all.iter().filter(|s| s.student_id == "S-002").collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(*matching[0], dto);
    assert_eq!(dto.email, "bob@school.edu");
    assert_eq!(dto.phone, "555-0100");
    assert_eq!(dto.address, "");
}

#[test]
fn create_student_trims_fields() {
    let pool = init_test_db();
    let mut req = make_create_req("  S-010  ", "Carol");
    req.first_name = "  Carol ".to_string();
    let dto = student_create(&pool, req).unwrap();
    assert_eq!(dto.student_id, "S-010");
    assert_eq!(dto.first_name, "Carol");
}

#[test]
fn create_student_duplicate_code_is_conflict_and_writes_nothing() {
    let pool = init_test_db();
    student_create(&pool, make_create_req("S-001", "Alice")).unwrap();

    let err = student_create(&pool, make_create_req("S-001", "Other")).unwrap_err();
    assert_eq!(err.code(), "CONFLICT");
    assert_eq!(student_list(&pool).unwrap().len(), 1);
}

#[test]
fn create_student_duplicate_email_is_conflict_and_writes_nothing() {
    let pool = init_test_db();
    student_create(&pool, make_create_req("S-001", "Alice")).unwrap();

    let err = student_create(&pool, make_create_req("S-999", "Alice")).unwrap_err();
    assert_eq!(err.code(), "CONFLICT");
    assert_eq!(student_list(&pool).unwrap().len(), 1);
}

#[test]
fn create_student_missing_required_field_fails() {
    let pool = init_test_db();
    let mut req = make_create_req("S-001", "Alice");
    req.program = "   ".to_string();
    let err = student_create(&pool, req).unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert!(err.to_string().contains("program"));
}

#[test]
fn create_student_rejects_email_without_at() {
    let pool = init_test_db();
    let mut req = make_create_req("S-001", "Alice");
    req.email = "alice.school.edu".to_string();
    let err = student_create(&pool, req).unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert!(err.to_string().contains("email"));
    assert!(student_list(&pool).unwrap().is_empty());
}

#[test]
fn create_student_rejects_zero_semester() {
    let pool = init_test_db();
    let mut req = make_create_req("S-001", "Alice");
    req.semester = 0;
    assert_eq!(
        student_create(&pool, req).unwrap_err().code(),
        "VALIDATION_ERROR"
    );
}

// ══════════════════════════════════════════════════════════
//  student_get / student_update
// ══════════════════════════════════════════════════════════

#[test]
fn get_student_not_found() {
    let pool = init_test_db();
    let err = student_get(&pool, 42).unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[test]
fn update_then_get_returns_updated_fields_verbatim() {
    let pool = init_test_db();
    let created = student_create(&pool, make_create_req("S-001", "Alice")).unwrap();

    let updated = student_update(
        &pool,
        StudentUpdateReq {
            id: created.id,
            student_id: "S-001A".to_string(),
            first_name: "Alicia".to_string(),
            last_name: "Keys".to_string(),
            email: "alicia@school.edu".to_string(),
            phone: None,
            address: Some("1 Main St".to_string()),
            program: "BA Music".to_string(),
            semester: 5,
        },
    )
    .unwrap();

    let fetched = student_get(&pool, created.id).unwrap();
    assert_eq!(fetched, updated);
    assert_eq!(fetched.student_id, "S-001A");
    assert_eq!(fetched.first_name, "Alicia");
    assert_eq!(fetched.last_name, "Keys");
    assert_eq!(fetched.email, "alicia@school.edu");
    assert_eq!(fetched.phone, "");
    assert_eq!(fetched.address, "1 Main St");
    assert_eq!(fetched.program, "BA Music");
    assert_eq!(fetched.semester, 5);
}

#[test]
fn update_missing_student_not_found() {
    let pool = init_test_db();
    let req = make_create_req("S-001", "Alice");
    let err = student_update(
        &pool,
        StudentUpdateReq {
            id: 7,
            student_id: req.student_id,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            address: req.address,
            program: req.program,
            semester: req.semester,
        },
    )
    .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[test]
fn update_to_taken_email_is_conflict() {
    let pool = init_test_db();
    student_create(&pool, make_create_req("S-001", "Alice")).unwrap();
    let bob = student_create(&pool, make_create_req("S-002", "Bob")).unwrap();

    let err = student_update(
        &pool,
        StudentUpdateReq {
            id: bob.id,
            student_id: bob.student_id.clone(),
            first_name: bob.first_name.clone(),
            last_name: bob.last_name.clone(),
            email: "alice@school.edu".to_string(),
            phone: None,
            address: None,
            program: bob.program.clone(),
            semester: bob.semester,
        },
    )
    .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");
    assert_eq!(student_get(&pool, bob.id).unwrap().email, "bob@school.edu");
}

// ══════════════════════════════════════════════════════════
//  student_delete
// ══════════════════════════════════════════════════════════

#[test]
fn delete_student_cascades_to_dependents() {
    let pool = init_test_db();
    let keep = student_create(&pool, make_create_req("S-001", "Alice")).unwrap();
    let gone = student_create(&pool, make_create_req("S-002", "Bob")).unwrap();
    let subject = subject_create(
        &pool,
        SubjectCreateReq {
            code: "MA101".to_string(),
            name: "Calculus".to_string(),
            credits: 4,
        },
    )
    .unwrap();

    for s in [&keep, &gone] {
        add_records(&pool, s.id, subject.id);
    }

    student_delete(&pool, gone.id).unwrap();

    assert_eq!(student_get(&pool, gone.id).unwrap_err().code(), "NOT_FOUND");
    for table in ["marks", "attendance", "enrollments"] {
        assert_eq!(count(&pool, table, gone.id), 0, "orphans left in {}", table);
        assert_eq!(count(&pool, table, keep.id), 1, "collateral loss in {}", table);
    }
}

#[test]
fn delete_missing_student_not_found() {
    let pool = init_test_db();
    student_create(&pool, make_create_req("S-001", "Alice")).unwrap();
    let err = student_delete(&pool, 999).unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(student_list(&pool).unwrap().len(), 1);
}

#[test]
fn failed_delete_rolls_back_whole_cascade() {
    let pool = init_test_db();
    let s = student_create(&pool, make_create_req("S-001", "Alice")).unwrap();
    let subject = subject_create(
        &pool,
        SubjectCreateReq {
            code: "MA101".to_string(),
            name: "Calculus".to_string(),
            credits: 4,
        },
    )
    .unwrap();
    add_records(&pool, s.id, subject.id);

    // last step of the cascade fails after the dependents are gone
    get_connection(&pool)
        .unwrap()
        .execute_batch(
            "CREATE TRIGGER block_student_delete BEFORE DELETE ON students
             BEGIN SELECT RAISE(ABORT, 'student is locked'); END;",
        )
        .unwrap();

    let err = student_delete(&pool, s.id).unwrap_err();
    assert!(err.to_string().contains("student is locked"), "{}", err);

    assert_eq!(student_get(&pool, s.id).unwrap().student_id, "S-001");
    for table in ["marks", "attendance", "enrollments"] {
        assert_eq!(count(&pool, table, s.id), 1, "rows lost from {}", table);
    }
}

// ══════════════════════════════════════════════════════════
//  student_detail
// ══════════════════════════════════════════════════════════

#[test]
fn detail_collects_enrollments_marks_and_attendance() {
    let pool = init_test_db();
    let s = student_create(&pool, make_create_req("S-001", "Alice")).unwrap();
    let subject = subject_create(
        &pool,
        SubjectCreateReq {
            code: "PH101".to_string(),
            name: "Physics".to_string(),
            credits: 3,
        },
    )
    .unwrap();
    enrollment_create(
        &pool,
        EnrollmentCreateReq {
            student_id: s.id,
            subject_id: subject.id,
        },
    )
    .unwrap();
    for status in [AttendanceStatus::Present, AttendanceStatus::Absent] {
        attendance_record(
            &pool,
            AttendanceRecordReq {
                student_id: s.id,
                subject_id: subject.id,
                date: Some("2024-09-01".to_string()),
                status,
            },
        )
        .unwrap();
    }

    let detail = student_detail(&pool, s.id).unwrap();
    assert_eq!(detail.student.id, s.id);
    assert_eq!(detail.enrollments.len(), 1);
    assert_eq!(detail.enrollments[0].subject_name, "Physics");
    assert!(detail.marks.is_empty());
    assert_eq!(detail.attendance.len(), 2);
    assert_eq!(detail.attendance_summary.len(), 1);
    assert_eq!(detail.attendance_summary[0].present_days, 1);
    assert_eq!(detail.attendance_summary[0].total_days, 2);
    assert_eq!(detail.attendance_summary[0].percentage, 50.0);
}

#[test]
fn detail_missing_student_not_found() {
    let pool = init_test_db();
    assert_eq!(student_detail(&pool, 1).unwrap_err().code(), "NOT_FOUND");
}
