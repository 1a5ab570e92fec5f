use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::transport::{TransportClient, TransportError};

use super::draft::DraftBoard;
use super::errors::AttendanceError;
use super::types::{
    Completeness, LoadOutcome, RosterEntry, SectionScope, StudentBulkMarkRequest, StudentMark,
    StudentRosterResponse, StudentStatus,
};

const ROSTER_PATH: &str = "/api/attendance/students/by_section/";
const BULK_MARK_PATH: &str = "/api/attendance/students/bulk_mark/";

/// Draft reconciliation for one section's student roster on one date
///
/// One sheet serves one screen. Re-scoping clears the draft synchronously,
/// before any fetch for the new scope can be issued, and responses that
/// arrive for a superseded scope are discarded.
pub struct StudentAttendanceSheet {
    transport: Arc<TransportClient>,
    inner: Mutex<SheetState>,
}

struct SheetState {
    scope: SectionScope,
    /// Bumped on every rescope; fences stale roster and commit responses
    epoch: u64,
    board: DraftBoard<StudentStatus>,
}

impl StudentAttendanceSheet {
    pub fn new(transport: Arc<TransportClient>, scope: SectionScope) -> Self {
        Self {
            transport,
            inner: Mutex::new(SheetState {
                scope,
                epoch: 0,
                board: DraftBoard::new(),
            }),
        }
    }

    pub fn scope(&self) -> SectionScope {
        self.lock().scope
    }

    /// Point the sheet at a different section or date
    ///
    /// A no-op when the scope is unchanged; otherwise the draft is gone
    /// before this returns.
    pub fn rescope(&self, scope: SectionScope) {
        let mut state = self.lock();
        if state.scope == scope {
            return;
        }
        state.scope = scope;
        state.epoch += 1;
        state.board = DraftBoard::new();
    }

    /// Fetch the roster and any persisted statuses for the current scope
    pub async fn load(&self) -> Result<LoadOutcome, AttendanceError> {
        let (scope, epoch) = {
            let state = self.lock();
            (state.scope, state.epoch)
        };

        let query = [
            ("section", scope.section.to_string()),
            ("date", scope.date.to_string()),
        ];
        let response: StudentRosterResponse = self.transport.get_json(ROSTER_PATH, &query).await?;

        let mut state = self.lock();
        if state.epoch != epoch {
            tracing::debug!(
                "Discarding student roster for superseded scope (section {}, {})",
                scope.section,
                scope.date
            );
            return Ok(LoadOutcome::Discarded);
        }
        state
            .board
            .replace_roster(response.students.into_iter().map(Into::into).collect());
        Ok(LoadOutcome::Applied)
    }

    pub fn set_status(&self, student_id: i64, status: StudentStatus) {
        self.lock().board.set_status(student_id, status);
    }

    pub fn mark_all(&self, status: StudentStatus) {
        self.lock().board.mark_all(status);
    }

    pub fn roster(&self) -> Vec<RosterEntry<StudentStatus>> {
        self.lock().board.roster().to_vec()
    }

    pub fn effective_status(&self, student_id: i64) -> Option<StudentStatus> {
        self.lock().board.effective_status_of(student_id)
    }

    /// Whether any entry has been marked locally and not yet committed
    pub fn is_dirty(&self) -> bool {
        self.lock().board.is_dirty()
    }

    pub fn completeness(&self) -> Completeness {
        self.lock().board.completeness()
    }

    pub fn tally(&self) -> HashMap<StudentStatus, usize> {
        self.lock().board.tally()
    }

    pub fn last_commit_succeeded(&self) -> bool {
        self.lock().board.last_commit_succeeded()
    }

    pub fn commit_error(&self) -> Option<String> {
        self.lock().board.commit_error().map(str::to_string)
    }

    /// Submit one consistent snapshot of the whole roster
    ///
    /// Fails locally with `Incomplete` before any network traffic when a
    /// roster entry still has no effective status. On success the draft is
    /// cleared and the committed values become the snapshot; on rejection
    /// the draft survives so no edit is lost.
    pub async fn commit(&self) -> Result<(), AttendanceError> {
        let (request, payload, epoch) = {
            let state = self.lock();
            let payload = state.board.payload()?;
            let request = StudentBulkMarkRequest {
                section: state.scope.section,
                date: state.scope.date,
                attendances: payload
                    .iter()
                    .map(|(student_id, status)| StudentMark {
                        student_id: *student_id,
                        status: *status,
                    })
                    .collect(),
            };
            (request, payload, state.epoch)
        };

        let outcome = self
            .transport
            .post_json::<serde_json::Value, _>(BULK_MARK_PATH, &request)
            .await;

        let mut state = self.lock();
        match outcome {
            Ok(_) => {
                if state.epoch == epoch {
                    state.board.absorb_commit(&payload);
                }
                Ok(())
            }
            Err(err @ TransportError::Http { .. }) => {
                let message = err.server_message();
                if state.epoch == epoch {
                    state.board.note_rejection(message.clone());
                }
                Err(AttendanceError::Rejected(message))
            }
            Err(other) => Err(AttendanceError::Transport(other)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SheetState> {
        self.inner.lock().expect("sheet state poisoned")
    }
}
