//! Attendance status and percentage arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Present, Self::Absent]
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    /// Accepts the stored literal, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(format!("unknown attendance status '{}'", other)),
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `present / total * 100`, or 0 when nothing has been recorded.
pub fn attendance_percentage(present: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    present as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Present".parse(), Ok(AttendanceStatus::Present));
        assert_eq!(" absent ".parse(), Ok(AttendanceStatus::Absent));
        assert!("late".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn round_trips_stored_literal() {
        for s in AttendanceStatus::all() {
            assert_eq!(s.as_str().parse::<AttendanceStatus>().unwrap(), *s);
        }
    }

    #[test]
    fn percentage_zero_total_is_zero() {
        assert_eq!(attendance_percentage(0, 0), 0.0);
    }

    #[test]
    fn percentage_boundaries() {
        assert_eq!(attendance_percentage(4, 4), 100.0);
        assert_eq!(attendance_percentage(0, 3), 0.0);
        assert_eq!(format!("{:.2}", attendance_percentage(2, 3)), "66.67");
    }
}
