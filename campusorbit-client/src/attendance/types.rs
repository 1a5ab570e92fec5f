use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily status for a student roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    Present,
    Absent,
}

/// Daily status for the staff roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffStatus {
    Present,
    Absent,
    Late,
    HalfDay,
    OnLeave,
}

/// Key of one student reconciliation session
///
/// Changing either field invalidates the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionScope {
    pub section: i64,
    pub date: NaiveDate,
}

/// Key of one staff reconciliation session; the roster is school-wide so
/// only the date varies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayScope {
    pub date: NaiveDate,
}

/// One roster line merged from the server snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry<S> {
    pub subject_id: i64,
    pub display_name: String,
    /// Roll number (students) or employee id (staff)
    pub reference: Option<String>,
    /// Status already persisted server-side for this scope, if any
    pub server_status: Option<S>,
}

/// How much of the roster still lacks an effective status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completeness {
    pub unmarked: usize,
    pub total: usize,
}

impl Completeness {
    pub fn all_marked(&self) -> bool {
        self.unmarked == 0
    }
}

/// Server-side tally reported alongside the staff roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MarkedSummary {
    pub marked_count: usize,
    pub total_count: usize,
}

/// Outcome of applying a roster fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Roster applied to the current scope
    Applied,
    /// Response arrived for a scope that is no longer current; dropped
    Discarded,
}

// Wire shapes (backend contract)

#[derive(Debug, Deserialize)]
pub(crate) struct StudentRosterResponse {
    pub students: Vec<StudentRosterRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StudentRosterRecord {
    pub student_id: i64,
    pub student_name: String,
    #[serde(default)]
    pub roll_number: Option<String>,
    #[serde(default)]
    pub status: Option<StudentStatus>,
}

impl From<StudentRosterRecord> for RosterEntry<StudentStatus> {
    fn from(record: StudentRosterRecord) -> Self {
        Self {
            subject_id: record.student_id,
            display_name: record.student_name,
            reference: record.roll_number,
            server_status: record.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentBulkMarkRequest {
    pub section: i64,
    pub date: NaiveDate,
    pub attendances: Vec<StudentMark>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentMark {
    pub student_id: i64,
    pub status: StudentStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StaffRosterResponse {
    pub teachers: Vec<StaffRosterRecord>,
    #[serde(flatten)]
    pub summary: MarkedSummary,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StaffRosterRecord {
    pub teacher_id: i64,
    pub teacher_name: String,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub status: Option<StaffStatus>,
}

impl From<StaffRosterRecord> for RosterEntry<StaffStatus> {
    fn from(record: StaffRosterRecord) -> Self {
        Self {
            subject_id: record.teacher_id,
            display_name: record.teacher_name,
            reference: record.employee_id,
            server_status: record.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StaffBulkMarkRequest {
    pub date: NaiveDate,
    pub attendances: Vec<StaffMark>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StaffMark {
    pub teacher_id: i64,
    pub status: StaffStatus,
}
