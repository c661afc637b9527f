//! Domain types shared by the use cases.

pub mod attendance;

pub use attendance::{attendance_percentage, AttendanceStatus};
