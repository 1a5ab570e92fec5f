//! Attendance draft reconciliation
//!
//! Each sheet owns the unsaved status edits for one scope (a section and
//! date for students, a date for staff), merges them over the server
//! snapshot, enforces the completeness gate and submits one bulk write.

mod draft;
mod errors;
mod staff;
mod students;
mod types;

pub use errors::AttendanceError;
pub use staff::StaffAttendanceSheet;
pub use students::StudentAttendanceSheet;
pub use types::{
    Completeness, DayScope, LoadOutcome, MarkedSummary, RosterEntry, SectionScope, StaffStatus,
    StudentStatus,
};
