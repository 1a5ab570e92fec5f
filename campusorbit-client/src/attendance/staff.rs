use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::transport::{TransportClient, TransportError};

use super::draft::DraftBoard;
use super::errors::AttendanceError;
use super::types::{
    Completeness, DayScope, LoadOutcome, MarkedSummary, RosterEntry, StaffBulkMarkRequest,
    StaffMark, StaffRosterResponse, StaffStatus,
};

const ROSTER_PATH: &str = "/api/attendance/teachers/today/";
const BULK_MARK_PATH: &str = "/api/attendance/teachers/bulk_mark/";

/// Draft reconciliation for the school-wide staff roster on one date
///
/// Staff statuses are richer than the student pair (late, half day, on
/// leave), and the roster endpoint reports its own marked/total tally,
/// which the sheet retains alongside the locally computed completeness.
pub struct StaffAttendanceSheet {
    transport: Arc<TransportClient>,
    inner: Mutex<SheetState>,
}

struct SheetState {
    scope: DayScope,
    /// Bumped on every rescope; fences stale roster and commit responses
    epoch: u64,
    board: DraftBoard<StaffStatus>,
    summary: Option<MarkedSummary>,
}

impl StaffAttendanceSheet {
    pub fn new(transport: Arc<TransportClient>, scope: DayScope) -> Self {
        Self {
            transport,
            inner: Mutex::new(SheetState {
                scope,
                epoch: 0,
                board: DraftBoard::new(),
                summary: None,
            }),
        }
    }

    pub fn scope(&self) -> DayScope {
        self.lock().scope
    }

    /// Point the sheet at a different date
    ///
    /// A no-op when the date is unchanged; otherwise the draft is gone
    /// before this returns.
    pub fn rescope(&self, scope: DayScope) {
        let mut state = self.lock();
        if state.scope == scope {
            return;
        }
        state.scope = scope;
        state.epoch += 1;
        state.board = DraftBoard::new();
        state.summary = None;
    }

    /// Fetch the roster and any persisted statuses for the current date
    pub async fn load(&self) -> Result<LoadOutcome, AttendanceError> {
        let (scope, epoch) = {
            let state = self.lock();
            (state.scope, state.epoch)
        };

        let query = [("date", scope.date.to_string())];
        let response: StaffRosterResponse = self.transport.get_json(ROSTER_PATH, &query).await?;

        let mut state = self.lock();
        if state.epoch != epoch {
            tracing::debug!(
                "Discarding staff roster for superseded date {}",
                scope.date
            );
            return Ok(LoadOutcome::Discarded);
        }
        state.summary = Some(response.summary);
        state
            .board
            .replace_roster(response.teachers.into_iter().map(Into::into).collect());
        Ok(LoadOutcome::Applied)
    }

    pub fn set_status(&self, teacher_id: i64, status: StaffStatus) {
        self.lock().board.set_status(teacher_id, status);
    }

    pub fn mark_all(&self, status: StaffStatus) {
        self.lock().board.mark_all(status);
    }

    pub fn roster(&self) -> Vec<RosterEntry<StaffStatus>> {
        self.lock().board.roster().to_vec()
    }

    pub fn effective_status(&self, teacher_id: i64) -> Option<StaffStatus> {
        self.lock().board.effective_status_of(teacher_id)
    }

    /// Whether any entry has been marked locally and not yet committed
    pub fn is_dirty(&self) -> bool {
        self.lock().board.is_dirty()
    }

    pub fn completeness(&self) -> Completeness {
        self.lock().board.completeness()
    }

    pub fn tally(&self) -> HashMap<StaffStatus, usize> {
        self.lock().board.tally()
    }

    /// Marked/total tally as the server last reported it
    pub fn server_summary(&self) -> Option<MarkedSummary> {
        self.lock().summary
    }

    pub fn last_commit_succeeded(&self) -> bool {
        self.lock().board.last_commit_succeeded()
    }

    pub fn commit_error(&self) -> Option<String> {
        self.lock().board.commit_error().map(str::to_string)
    }

    /// Submit one consistent snapshot of the whole roster
    ///
    /// Same contract as the student sheet: the completeness gate fails
    /// locally before any network traffic, success clears the draft into
    /// the snapshot, rejection preserves every edit.
    pub async fn commit(&self) -> Result<(), AttendanceError> {
        let (request, payload, epoch) = {
            let state = self.lock();
            let payload = state.board.payload()?;
            let request = StaffBulkMarkRequest {
                date: state.scope.date,
                attendances: payload
                    .iter()
                    .map(|(teacher_id, status)| StaffMark {
                        teacher_id: *teacher_id,
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
